use std::path::PathBuf;

use bitprobe_core::{ConvertConfig, OutputFormat, SubsetSpec, TraversalOrder};

pub struct ConvertCommandConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub order: TraversalOrder,
    pub subset: Option<i64>,
}

pub fn run(cfg: ConvertCommandConfig) {
    let config = ConvertConfig {
        input: cfg.input,
        output: cfg.output,
        format: cfg.format,
        order: cfg.order,
        subset: cfg.subset.map_or_else(SubsetSpec::disabled, SubsetSpec::of),
    };

    let conversion = match bitprobe_core::convert(&config) {
        Ok(conversion) => conversion,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if conversion.saved.is_some() {
        print!("{}", conversion.transcript);
    } else {
        // Nothing was saved: progress goes to stderr so stdout carries only the bits.
        eprint!("{}", conversion.transcript);
        println!("{}", conversion.text);
    }
}
