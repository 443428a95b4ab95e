//! Usage text rendering.
//!
//! All functions are pure: they read a configuration and return text. Option
//! and command tables are aligned to the longest rendered entry plus five
//! columns.

use std::fmt::Write as _;

use clif_core::{
    CommandLineConfiguration, CommandLineProperties, CommandMetadata, OptionConfiguration,
    OptionMetadata, ParameterConfiguration, ParameterMetadata, ParameterType,
};

use crate::error::ParseError;

const COLUMN_GAP: usize = 5;

/// How much of each description to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Short descriptions.
    #[default]
    Short,
    /// Long descriptions where present.
    Full,
}

/// Renders the root usage with short descriptions.
///
/// # Examples
///
/// ```
/// use clif_core::{CommandLineConfiguration, CommandLineProperties, OptionMetadata, ParameterType};
/// use clif_parser::format;
///
/// let mut config = CommandLineConfiguration::new("copy")
///     .with_properties(CommandLineProperties::unix());
/// config.add_option(
///     OptionMetadata::with_value("o", ParameterType::Directory)
///         .with_long("output")
///         .with_description("target directory"),
/// )?;
/// config.add_parameter("files", true, true, "")?;
///
/// assert_eq!(
///     format(&config),
///     "Usage:  copy [options] <files>...\n\
///      Options:\n    \
///      -o, --output [<DIRECTORY>]     target directory\n"
/// );
/// # Ok::<(), clif_core::ConfigError>(())
/// ```
pub fn format(config: &CommandLineConfiguration) -> String {
    format_with(config, Verbosity::Short)
}

/// Renders the root usage: description, usage lines, options and commands.
pub fn format_with(config: &CommandLineConfiguration, verbosity: Verbosity) -> String {
    let mut out = String::new();
    push_description(&mut out, config.description());

    let name = config.name();
    let has_root_grammar = !config.options().is_empty() || !config.parameters().is_empty();
    let has_commands = !config.commands().is_empty();
    if has_root_grammar {
        push_line(
            &mut out,
            &format!(
                "Usage:  {name} [options]{}",
                parameter_list(config.parameters())
            ),
        );
        if has_commands {
            push_line(
                &mut out,
                &format!("   or   {name} [command] [options] parameters..."),
            );
        }
    } else if has_commands {
        push_line(
            &mut out,
            &format!("Usage:  {name} [command] [options] parameters..."),
        );
    } else {
        push_line(&mut out, &format!("Usage:  {name}"));
    }

    push_options(&mut out, config.properties(), config.options(), verbosity);
    push_commands(&mut out, config);
    out
}

/// Renders the usage of one command: its description, usage line and
/// options.
pub fn format_command(
    config: &CommandLineConfiguration,
    command: &CommandMetadata,
    verbosity: Verbosity,
) -> String {
    let mut out = String::new();
    push_description(&mut out, &command.description);
    push_line(
        &mut out,
        &format!(
            "Usage:    {} {} [options]{}",
            config.name(),
            command.keyword,
            parameter_list(command.parameters())
        ),
    );
    push_options(&mut out, config.properties(), command.options(), verbosity);
    out
}

/// Renders `Error: <message>` followed by the usage of the scope the error
/// occurred in.
pub fn format_error(config: &CommandLineConfiguration, error: &ParseError) -> String {
    let usage = match error.command().and_then(|keyword| config.command(keyword)) {
        Some(command) => format_command(config, command, Verbosity::Short),
        None => format(config),
    };
    format!("Error: {error}\n{usage}")
}

/// Renders `Error: <message>` followed by the root usage.
pub fn format_message(config: &CommandLineConfiguration, message: &str) -> String {
    format!("Error: {message}\n{}", format(config))
}

/// Renders one option as it appears in the options table, e.g.
/// `-i, --input <FILE>`.
pub fn format_option(properties: &CommandLineProperties, option: &OptionMetadata) -> String {
    let mut rendered = format!("{}{}", properties.short_prefix, option.identifier);
    if let Some(long) = &option.long_identifier {
        let _ = write!(rendered, ", {}{}", properties.long_prefix, long);
    }

    if let Some(parameter) = option.parameter.as_ref().filter(|_| option.is_parameter_accepted()) {
        let placeholder = match parameter.parameter_type {
            ParameterType::Custom => parameter.identifier.as_str(),
            other => other.name(),
        };
        let delimiter = if properties.is_whitespace_delimited() {
            " "
        } else {
            properties.delimiter.as_str()
        };
        if parameter.required {
            let _ = write!(rendered, "{delimiter}<{placeholder}>");
        } else if properties.is_whitespace_delimited() {
            let _ = write!(rendered, " [<{placeholder}>]");
        } else {
            let _ = write!(rendered, "[{delimiter}<{placeholder}>]");
        }
        if option.multi_valued {
            rendered.push_str("...");
        }
    }
    rendered
}

/// Renders one positional parameter: `<id>` if required, `[id]`
/// otherwise, with `...` when multi-valued.
pub fn format_parameter(parameter: &ParameterMetadata) -> String {
    let suffix = if parameter.multi_valued { "..." } else { "" };
    if parameter.required {
        format!("<{}>{suffix}", parameter.identifier)
    } else {
        format!("[{}]{suffix}", parameter.identifier)
    }
}

fn parameter_list(parameters: &ParameterConfiguration) -> String {
    parameters
        .iter()
        .map(|parameter| format!(" {}", format_parameter(parameter)))
        .collect()
}

fn push_description(out: &mut String, description: &str) {
    if !description.is_empty() {
        push_line(out, &format!("Description: {description}"));
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn push_options(
    out: &mut String,
    properties: &CommandLineProperties,
    options: &OptionConfiguration,
    verbosity: Verbosity,
) {
    if options.is_empty() {
        return;
    }
    let rows: Vec<(String, &str)> = options
        .iter()
        .map(|option| {
            let description = match verbosity {
                Verbosity::Short => option.description.as_str(),
                Verbosity::Full => option.long_description(),
            };
            (format_option(properties, option), description)
        })
        .collect();
    push_table(out, "Options:", "    ", &rows);
}

fn push_commands(out: &mut String, config: &CommandLineConfiguration) {
    if config.commands().is_empty() {
        return;
    }
    let rows: Vec<(String, &str)> = config
        .commands()
        .iter()
        .map(|command| (command.keyword.clone(), command.description.as_str()))
        .collect();
    push_table(out, "Commands:", "   ", &rows);
}

fn push_table(out: &mut String, heading: &str, indent: &str, rows: &[(String, &str)]) {
    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0) + COLUMN_GAP;
    push_line(out, heading);
    for (key, description) in rows {
        push_line(out, &format!("{indent}{key:<width$}{description}"));
    }
}

#[cfg(test)]
mod tests {
    use clif_core::{OptionConfiguration, ParameterMetadata};

    use super::*;

    fn sample() -> CommandLineConfiguration {
        let mut config = CommandLineConfiguration::new("mysampleapp")
            .with_properties(CommandLineProperties::unix());
        config
            .add_flag("a", "All files")
            .unwrap()
            .add_option(
                OptionMetadata::with_parameter(
                    "d",
                    ParameterMetadata::required("d", ParameterType::String),
                )
                .with_long("delim")
                .with_description("Delimiter value"),
            )
            .unwrap()
            .add_parameter("source", true, false, "")
            .unwrap()
            .add_parameter("target", false, false, "")
            .unwrap();

        let mut options = OptionConfiguration::new();
        options
            .add_option_with("i", ParameterType::String, "")
            .unwrap()
            .add_option_with("o", ParameterType::String, "output file")
            .unwrap();
        config
            .commands_mut()
            .add_command(
                "list",
                options.clone(),
                "List all modified files",
                vec![
                    ParameterMetadata::required("dir1", ParameterType::String),
                    ParameterMetadata::optional("dir2", ParameterType::String),
                ],
            )
            .unwrap()
            .add_command("pull", options, "Pull files from remote", Vec::new())
            .unwrap();
        config
    }

    #[test]
    fn test_root_usage_layout() {
        let expected = "\
Usage:  mysampleapp [options] <source> [target]
   or   mysampleapp [command] [options] parameters...
Options:
    -a                       All files
    -d, --delim <STRING>     Delimiter value
Commands:
   list     List all modified files
   pull     Pull files from remote
";
        assert_eq!(format(&sample()), expected);
    }

    #[test]
    fn test_command_usage_layout() {
        let config = sample();
        let list = config.command("list").unwrap();
        let expected = "\
Description: List all modified files
Usage:    mysampleapp list [options] <dir1> [dir2]
Options:
    -i [<STRING>]
    -o [<STRING>]     output file
"
        .lines()
        .map(|line| format!("{}\n", line.trim_end()))
        .collect::<String>();
        assert_eq!(format_command(&config, list, Verbosity::Short), expected);
    }

    #[test]
    fn test_format_is_idempotent() {
        let config = sample();
        assert_eq!(format(&config), format(&config));
        assert_eq!(
            format_with(&config, Verbosity::Full),
            format_with(&config, Verbosity::Full)
        );
    }

    #[test]
    fn test_full_verbosity_prefers_long_description() {
        let mut config =
            CommandLineConfiguration::new("app").with_properties(CommandLineProperties::unix());
        config
            .add_option(
                OptionMetadata::with_value("i", ParameterType::File)
                    .with_long("input")
                    .with_description("short")
                    .with_long_description("a much longer description"),
            )
            .unwrap();

        assert!(format(&config).contains("-i, --input [<FILE>]     short\n"));
        assert!(
            format_with(&config, Verbosity::Full)
                .contains("-i, --input [<FILE>]     a much longer description\n")
        );
    }

    #[test]
    fn test_option_placeholders() {
        let eq = CommandLineProperties::unix().with_delimiter("=");
        let required = OptionMetadata::with_parameter(
            "n",
            ParameterMetadata::required("n", ParameterType::Integer),
        )
        .with_long("num");
        assert_eq!(format_option(&eq, &required), "-n, --num=<INTEGER>");

        let optional = OptionMetadata::with_value("n", ParameterType::Integer).allow_multiple();
        assert_eq!(format_option(&eq, &optional), "-n[=<INTEGER>]...");

        let custom = OptionMetadata::with_parameter(
            "p",
            ParameterMetadata::custom(
                "point",
                |_: &ParameterMetadata, raw: &str| -> Result<clif_core::Value, clif_core::BoxError> {
                    Ok(clif_core::Value::String(raw.to_string()))
                },
            ),
        );
        let windows = CommandLineProperties::windows();
        assert_eq!(format_option(&windows, &custom), "/p [<point>]");

        let none = OptionMetadata::with_value("q", ParameterType::None);
        assert_eq!(format_option(&windows, &none), "/q");
    }

    #[test]
    fn test_empty_configuration() {
        let config = CommandLineConfiguration::new("bare").with_description("does nothing");
        assert_eq!(format(&config), "Description: does nothing\nUsage:  bare\n");
    }

    #[test]
    fn test_commands_only_usage() {
        let mut config = CommandLineConfiguration::new("git");
        config
            .add_command(CommandMetadata::new("pull").with_description("fetch"))
            .unwrap();
        assert_eq!(
            format(&config),
            "Usage:  git [command] [options] parameters...\nCommands:\n   pull     fetch\n"
        );
    }

    #[test]
    fn test_format_message_prefixes_error() {
        let config = CommandLineConfiguration::new("app");
        assert_eq!(
            format_message(&config, "something broke"),
            "Error: something broke\nUsage:  app\n"
        );
    }
}
