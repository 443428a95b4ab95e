//! Commands and custom values example.
//!
//! Declares `fetch` and `push` commands, each with its own options and
//! positional parameters, and a custom `host:port` value type. Uses
//! [`matches`] to branch on success without handling the error value,
//! then prints the result as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p clif-demos --example remote -- fetch --depth 3 origin main dev
//! cargo run -p clif-demos --example remote -- push --to example.org:22 origin
//! ```

use clif_core::{
    BoxError, CommandLineConfiguration, CommandMetadata, ConfigError, OptionMetadata,
    ParameterMetadata, ParameterType, Value,
};
use clif_parser::{ParseResult, format, format_message, matches};

#[derive(Debug, Clone, PartialEq)]
struct Endpoint {
    host: String,
    port: u16,
}

fn parse_endpoint(_: &ParameterMetadata, raw: &str) -> Result<Value, BoxError> {
    let (host, port) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected host:port, got '{raw}'"))?;
    Ok(Value::custom(Endpoint {
        host: host.to_string(),
        port: port.parse()?,
    }))
}

fn configuration() -> Result<CommandLineConfiguration, ConfigError> {
    let mut config = CommandLineConfiguration::new("remote")
        .with_description("Talk to remote repositories");

    let mut fetch = CommandMetadata::new("fetch").with_description("Download refs");
    fetch.options_mut().add(
        OptionMetadata::with_parameter(
            "d",
            ParameterMetadata::required("d", ParameterType::Integer),
        )
        .with_long("depth")
        .with_description("Limit history depth"),
    )?;
    fetch
        .parameters_mut()
        .add(ParameterMetadata::required("remote", ParameterType::String))?
        .add(ParameterMetadata::optional("refs", ParameterType::String).allow_multiple())?;

    let mut push = CommandMetadata::new("push").with_description("Upload refs");
    push.options_mut().add(
        OptionMetadata::with_parameter("t", ParameterMetadata::custom("endpoint", parse_endpoint))
            .with_long("to")
            .with_required(true)
            .with_description("Override the remote endpoint"),
    )?;
    push.parameters_mut()
        .add(ParameterMetadata::required("remote", ParameterType::String))?;

    config.add_command(fetch)?.add_command(push)?;
    Ok(config)
}

fn report(result: &ParseResult<'_>) {
    let Some(command) = result.matching_command() else {
        print!("{}", format(result.configuration()));
        return;
    };
    println!("command: {}", command.keyword);

    if let Some(remote) = result.parameter_value("remote") {
        println!("remote: {remote}");
    }
    if let Some(refs) = result.parameter_value("refs").and_then(Value::as_list) {
        for name in refs {
            println!("ref: {name}");
        }
    }
    if let Some(depth) = result.option_value("depth").and_then(Value::as_integer) {
        println!("depth: {depth}");
    }
    if let Some(endpoint) = result
        .option_value("to")
        .and_then(|value| value.downcast_ref::<Endpoint>())
    {
        println!("endpoint: {} port {}", endpoint.host, endpoint.port);
    }
    if let Ok(raw) = serde_json::to_string(&result.to_summary()) {
        println!("summary: {raw}");
    }
}

fn main() {
    let config = match configuration() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let mut result = ParseResult::new(&config);
    if !matches(&config, &mut result, std::env::args().skip(1)) {
        eprint!("{}", format_message(&config, "arguments do not match any command"));
        std::process::exit(2);
    }
    report(&result);
}
