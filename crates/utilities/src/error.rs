use std::error::Error;

/// The boxed error type used at the tool boundaries of the Faro toolset.
///
/// The individual crates define typed domain errors; this alias is for `main`
/// functions and other places that only propagate. Strings convert into it
/// directly, so `"message".into()` produces a usable error.
pub type FaroError = Box<dyn Error + Send + Sync + 'static>;
