use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use fieldwire::describe_to_json;
use fieldwire_compiler::error::CompileError;
use fieldwire_compiler::{compile_schema, generate_rust};

#[derive(Parser)]
#[command(name = "fwire")]
#[command(about = "Compile record schemas into protobuf-compatible message descriptors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a schema file to a JSON descriptor
    Compile {
        /// Input schema file
        #[arg(short, long)]
        input: PathBuf,

        /// Output `.json` file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a schema file and print its diagnostics
    Check {
        /// Input schema file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Generate Rust message code from a schema file
    GenRust {
        /// Input schema file
        #[arg(short, long)]
        input: PathBuf,

        /// Output `.rs` file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn run(cli: &Cli) -> Result<(), CompileError> {
    match &cli.command {
        Commands::Compile { input, output } => {
            let text = fs::read_to_string(input).map_err(CompileError::Io)?;
            let json = describe_to_json(&text)?;
            if let Some(out_path) = output {
                fs::write(out_path, &json).map_err(CompileError::Io)?;
                println!("Compiled {} -> {}", input.display(), out_path.display());
            } else {
                println!("{}", json);
            }
            Ok(())
        }

        Commands::Check { input } => {
            let text = fs::read_to_string(input).map_err(CompileError::Io)?;
            let output = compile_schema(&text)?;
            for diagnostic in &output.diagnostics {
                eprintln!("{}", diagnostic);
            }
            println!(
                "{}: {} message(s), {} finding(s)",
                input.display(),
                output.messages.len(),
                output.diagnostics.len()
            );
            Ok(())
        }

        Commands::GenRust { input, output } => {
            let text = fs::read_to_string(input).map_err(CompileError::Io)?;
            let compiled = compile_schema(&text)?;
            for diagnostic in &compiled.diagnostics {
                eprintln!("{}", diagnostic);
            }
            let rust_code = generate_rust(&compiled.messages);
            if let Some(out_path) = output {
                fs::write(out_path, &rust_code).map_err(CompileError::Io)?;
                println!("Generated Rust code written to {}", out_path.display());
            } else {
                println!("{}", rust_code);
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
