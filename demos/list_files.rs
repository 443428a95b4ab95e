//! Option values example.
//!
//! Declares a required, repeatable `--input` option and prints the files it
//! received. On bad input the error and usage are printed instead.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p clif-demos --example list_files -- -i Cargo.toml --input README.md -x
//! cargo run -p clif-demos --example list_files -- -x
//! ```

use clif_core::{CommandLineConfiguration, ConfigError, OptionMetadata, ParameterType};
use clif_parser::{format_error, parse};

fn configuration() -> Result<CommandLineConfiguration, ConfigError> {
    let mut config = CommandLineConfiguration::new("list_files").with_description("List files");
    config
        .add_option(
            OptionMetadata::with_value("i", ParameterType::File)
                .with_long("input")
                .with_required(true)
                .allow_multiple()
                .with_description("Sample desc")
                .with_long_description("A very long sample desc of the option"),
        )?
        .add_flag("x", "Testing single valued")?;
    Ok(config)
}

fn main() {
    let config = match configuration() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    match parse(&config, std::env::args().skip(1)) {
        Ok(result) => {
            let files = result
                .option_input()
                .get("input")
                .and_then(|input| input.as_list())
                .unwrap_or_default();
            for file in files.iter().filter_map(|value| value.as_file()) {
                println!("File: {}", file.display());
            }
            if result.option_input().contains("x") {
                println!("-x was given");
            }
        }
        Err(e) => print!("{}", format_error(&config, &e)),
    }
}
