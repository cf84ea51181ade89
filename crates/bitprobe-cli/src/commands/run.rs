use std::path::{Path, PathBuf};

use bitprobe_core::{Registry, RunConfig, generate_report, run_selected_tests};

pub struct RunCommandConfig<'a> {
    pub input_file: PathBuf,
    pub bit_length: usize,
    pub tests: &'a str,
    pub offset: usize,
    pub output_path: Option<&'a Path>,
    pub json: bool,
}

pub fn run(cfg: RunCommandConfig<'_>) {
    let config = RunConfig {
        input_file: cfg.input_file,
        bit_length: cfg.bit_length,
        tests: super::parse_tests(cfg.tests),
        offset: cfg.offset,
    };

    let registry = Registry::canonical();
    let catalog = bitprobe_tests::catalog();
    let report = match run_selected_tests(&config, &registry, &catalog) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if cfg.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialize results: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", report.transcript);
    }

    if let Some(path) = cfg.output_path {
        match std::fs::write(path, generate_report(&report)) {
            Ok(()) => eprintln!("Report saved to {}", path.display()),
            Err(e) => eprintln!("Failed to write report to {}: {e}", path.display()),
        }
    }
}
