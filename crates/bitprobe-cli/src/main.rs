//! CLI for bitprobe: turn numeric matrices into bit streams and test them.

mod commands;

use std::path::PathBuf;

use bitprobe_core::{OutputFormat, TraversalOrder};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bitprobe")]
#[command(about = "bitprobe — matrix-to-bitstream conversion and NIST SP 800-22 test runs")]
#[command(version = bitprobe_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the primary array of a matrix file into a bit sequence.
    /// Values are truncated to integers and written as-is; entries other
    /// than 0 or 1 are reported but not changed.
    Convert {
        /// Matrix file: JSON object of named arrays, or a plain-text grid
        input: PathBuf,

        /// Save the rendered sequence here (a `data.txt` copy is written next to it)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Text encoding: binary, 01-ascii (one bit per line), no-whitespace
        #[arg(long, default_value = "binary")]
        format: OutputFormat,

        /// Element order: row-major or column-major
        #[arg(long, default_value = "row-major")]
        order: TraversalOrder,

        /// Restrict to the first N elements (N defaults to 10000 when the flag has no value)
        #[arg(long, num_args = 0..=1, default_missing_value = "10000", allow_negative_numbers = true)]
        subset: Option<i64>,
    },

    /// Run randomness tests over a window of a bit file.
    Run {
        /// Text file of '0'/'1' characters (anything else is ignored)
        #[arg(required_unless_present = "scan")]
        input_file: Option<PathBuf>,

        /// Number of bits to evaluate
        #[arg(required_unless_present = "scan")]
        bit_length: Option<usize>,

        /// Comma-separated test names, or "all" for the full battery
        #[arg(default_value = "all")]
        tests: String,

        /// Bits to skip before the window starts
        #[arg(long, default_value = "0")]
        offset: usize,

        /// List the test catalog and exit without running anything
        #[arg(long)]
        scan: bool,

        /// Write a markdown report to this path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print results and summary as JSON instead of the transcript
        #[arg(long)]
        json: bool,
    },

    /// List test modules, their exports and the test names bound to them.
    Scan,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            order,
            subset,
        } => commands::convert::run(commands::convert::ConvertCommandConfig {
            input,
            output,
            format,
            order,
            subset,
        }),
        Commands::Run {
            input_file,
            bit_length,
            tests,
            offset,
            scan,
            output,
            json,
        } => {
            if scan {
                commands::scan::run();
                return;
            }
            // clap enforces both positionals unless --scan is given.
            let (Some(input_file), Some(bit_length)) = (input_file, bit_length) else {
                eprintln!("Error: input file and bit length are required");
                std::process::exit(2);
            };
            commands::run::run(commands::run::RunCommandConfig {
                input_file,
                bit_length,
                tests: &tests,
                offset,
                output_path: output.as_deref(),
                json,
            })
        }
        Commands::Scan => commands::scan::run(),
    }
}
