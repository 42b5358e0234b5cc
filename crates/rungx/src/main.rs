use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;

mod commands;

/// Standardized exit codes for CLI.
/// 0 = OK, 2 = input error, 3 = verification reject, 4 = evaluation fault, 1 = other.
#[allow(dead_code)]
const EXIT_OK: i32 = 0;
const EXIT_OTHER: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_VERIFY: i32 = 3;
const EXIT_EVAL: i32 = 4;

#[derive(Parser)]
#[command(name = "rungx", version, about = "Rung CLI — verify, run, disassemble, fingerprint")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a program file and report its static bounds
    Verify {
        /// Path to program JSON file (or - for stdin)
        #[arg(default_value = "-")]
        file: String,
    },
    /// Evaluate a program against in-memory providers
    Run {
        /// Path to program JSON file (or - for stdin)
        #[arg(default_value = "-")]
        file: String,
        /// Source index to evaluate
        #[arg(long, default_value_t = 0)]
        source: usize,
        /// Context words (decimal or 0x-hex), in order
        #[arg(long = "context", value_name = "WORD")]
        context: Vec<String>,
        /// Caller address observable
        #[arg(long, default_value = "0")]
        caller: String,
        /// Block number observable
        #[arg(long, default_value = "0")]
        block: String,
        /// Block timestamp observable
        #[arg(long, default_value = "0")]
        timestamp: String,
        /// Seed a tier report: <account>=<report>, repeatable
        #[arg(long = "report", value_name = "ACCOUNT=REPORT")]
        reports: Vec<String>,
    },
    /// Print a mnemonic listing of every source
    Disasm {
        /// Path to program JSON file (or - for stdin)
        #[arg(default_value = "-")]
        file: String,
    },
    /// Print the blake3 fingerprint of a program file
    Id {
        /// Path to program JSON file (or - for stdin)
        #[arg(default_value = "-")]
        file: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rung_vm=info".parse().expect("static directive")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Verify { file } => commands::verify(&file),
        Commands::Run { file, source, context, caller, block, timestamp, reports } => {
            commands::run(&file, source, &context, &caller, &block, &timestamp, &reports)
        }
        Commands::Disasm { file } => commands::disasm(&file),
        Commands::Id { file } => commands::id(&file),
    };

    if let Err(err) = result {
        eprintln!("{} {}", "error:".red().bold(), err.message);
        process::exit(err.exit_code);
    }
}

pub(crate) struct CliError {
    pub message: String,
    pub exit_code: i32,
}

impl CliError {
    pub fn input(message: impl Into<String>) -> Self {
        Self { message: message.into(), exit_code: EXIT_INPUT }
    }

    pub fn verify(message: impl Into<String>) -> Self {
        Self { message: message.into(), exit_code: EXIT_VERIFY }
    }

    pub fn eval(message: impl Into<String>) -> Self {
        Self { message: message.into(), exit_code: EXIT_EVAL }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self { message: message.into(), exit_code: EXIT_OTHER }
    }
}
