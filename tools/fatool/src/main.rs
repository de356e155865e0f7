use std::fs::File;
use std::io::stdout;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;

use faro_automata::Automaton;
use faro_automata::read_fa;
use faro_automata::write_fa;
use faro_transform::determinize;
use faro_transform::minimize;
use faro_utilities::FaroError;
use faro_utilities::Timing;

#[derive(clap::Parser, Debug)]
#[command(name = "fatool", about = "A command line tool for finite automata")]
struct Cli {
    #[command(subcommand)]
    commands: Commands,

    #[arg(long, global = true, help = "Print timing information on exit")]
    timings: bool,
}

/// Defines the subcommands for this tool.
#[derive(Debug, Subcommand)]
enum Commands {
    Info(InfoArgs),
    Simulate(SimulateArgs),
    Determinize(TransformArgs),
    Minimize(TransformArgs),
}

#[derive(clap::Args, Debug)]
#[command(about = "Prints information about the given automaton")]
struct InfoArgs {
    filename: String,
}

#[derive(clap::Args, Debug)]
#[command(about = "Runs an input against the automaton and prints the verdict")]
struct SimulateArgs {
    filename: String,

    /// The input word; every character is one symbol.
    input: String,
}

#[derive(clap::Args, Debug)]
#[command(about = "Derives a new automaton and writes it in the .fa format")]
struct TransformArgs {
    filename: String,

    /// The output path; the result is written to stdout when omitted.
    output: Option<String>,
}

fn main() -> Result<ExitCode, FaroError> {
    let cli = Cli::parse();

    env_logger::Builder::new().parse_default_env().init();

    let timing = Timing::new();

    match cli.commands {
        Commands::Info(args) => {
            let automaton = read_fa(File::open(&args.filename)?)?;

            println!("{automaton}");
            println!(
                "Structurally deterministic: {}",
                automaton.is_structurally_deterministic()
            );
        }
        Commands::Simulate(args) => {
            let automaton = read_fa(File::open(&args.filename)?)?;
            let symbols: Vec<String> = args.input.chars().map(String::from).collect();

            let mut timer = timing.start("simulate");
            let accepted = automaton.accepts(symbols.iter().map(String::as_str))?;
            timer.finish();

            println!("{}", if accepted { "ACCEPTED" } else { "REJECTED" });
        }
        Commands::Determinize(args) => {
            let automaton = read_fa(File::open(&args.filename)?)?;

            let mut timer = timing.start("determinize");
            let result = determinize(&automaton)?;
            timer.finish();

            write_output(&result, args.output.as_deref())?;
        }
        Commands::Minimize(args) => {
            let automaton = read_fa(File::open(&args.filename)?)?;

            let mut timer = timing.start("minimize");
            let result = minimize(&automaton)?;
            timer.finish();

            write_output(&result, args.output.as_deref())?;
        }
    }

    if cli.timings {
        timing.print();
    }

    Ok(ExitCode::SUCCESS)
}

/// Writes the derived automaton to the given path, or to stdout.
fn write_output(automaton: &Automaton, output: Option<&str>) -> Result<(), FaroError> {
    if let Some(path) = output {
        let mut writer = File::create(path)?;
        write_fa(&mut writer, automaton)
    } else {
        let mut writer = stdout();
        write_fa(&mut writer, automaton)
    }
}
