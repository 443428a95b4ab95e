//! The parser engine.
//!
//! Arguments are joined into one buffer and scanned in three stages:
//! command keyword, prefixed options, then positional parameters. The
//! result is validated for requiredness before it is returned.

use clif_core::{
    CommandConfiguration, CommandLineConfiguration, CommandLineProperties, CommandMetadata,
    IdentifierKind, OptionConfiguration, OptionMetadata, ParameterConfiguration,
    ParameterMetadata, Value,
};
use tracing::{debug, trace, warn};

use crate::coerce::coerce;
use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::result::{OptionInput, ParameterInput, ParseResult};
use crate::validator;

/// Stateless parser service.
///
/// # Examples
///
/// ```
/// use clif_core::{CommandLineConfiguration, CommandLineProperties, ParameterType};
/// use clif_parser::{CommandLineParser, ParseResult};
///
/// let mut config = CommandLineConfiguration::new("app")
///     .with_properties(CommandLineProperties::unix());
/// config.add_option_with("n", ParameterType::Integer, "count")?;
///
/// let parser = CommandLineParser;
/// let result = parser.parse(&config, ["-n", "3"])?;
/// assert_eq!(result.option_input().get("n").and_then(|n| n.as_integer()), Some(3));
///
/// let mut reused = ParseResult::new(&config);
/// assert!(parser.matches(&config, &mut reused, ["-n", "4"]));
/// assert!(!parser.matches(&config, &mut reused, ["-n", "four"]));
/// assert_eq!(reused.option_input().get("n").and_then(|n| n.as_integer()), Some(4));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandLineParser;

impl CommandLineParser {
    /// Parses `args` against `configuration`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered while scanning or
    /// validating. No partial result is returned.
    pub fn parse<'c, I, S>(
        &self,
        configuration: &'c CommandLineConfiguration,
        args: I,
    ) -> Result<ParseResult<'c>, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let buffer = join_arguments(args);
        trace!(buffer = %buffer, "Joined arguments");

        let mut result = ParseResult::new(configuration);
        let mut scanner = match match_command(configuration.commands(), &buffer) {
            Some((command, end)) => {
                debug!(command = %command.keyword, "Matched command");
                result.set_matching_command(command);
                Scanner::for_command(configuration.properties(), command, &buffer[end..])
            }
            None => Scanner::for_root(configuration, &buffer),
        };

        scanner.scan_options(&mut result)?;
        scanner.scan_parameters(&mut result)?;
        scanner.finish();

        validator::validate(&result)?;
        Ok(result)
    }

    /// Parses into `result`, reporting success as a boolean.
    ///
    /// `result` is replaced only when parsing succeeds; on failure it keeps
    /// whatever it held before.
    pub fn matches<'c, I, S>(
        &self,
        configuration: &'c CommandLineConfiguration,
        result: &mut ParseResult<'c>,
        args: I,
    ) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.parse(configuration, args) {
            Ok(parsed) => {
                *result = parsed;
                true
            }
            Err(err) => {
                debug!(error = %err, "Arguments rejected");
                false
            }
        }
    }
}

/// Parses `args` with a [`CommandLineParser`].
///
/// # Errors
///
/// See [`CommandLineParser::parse`].
pub fn parse<'c, I, S>(
    configuration: &'c CommandLineConfiguration,
    args: I,
) -> Result<ParseResult<'c>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    CommandLineParser.parse(configuration, args)
}

/// Checks `args` with a [`CommandLineParser`], filling `result` on success.
pub fn matches<'c, I, S>(
    configuration: &'c CommandLineConfiguration,
    result: &mut ParseResult<'c>,
    args: I,
) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    CommandLineParser.matches(configuration, result, args)
}

/// Joins arguments into one scanning buffer, each followed by a space.
///
/// An argument that is empty or has whitespace outside a quoted span is
/// wrapped in quotes: double quotes, or single quotes when it already
/// contains a double quote. Arguments whose whitespace all sits inside
/// quoted spans, such as `--input="a b"`, pass through unchanged.
///
/// # Examples
///
/// ```
/// use clif_parser::join_arguments;
///
/// assert_eq!(join_arguments(["-i", "a b"]), "-i \"a b\" ");
/// assert_eq!(join_arguments(["--input=\"a b\""]), "--input=\"a b\" ");
/// assert_eq!(join_arguments(["say \"hi\" now"]), "'say \"hi\" now' ");
/// ```
pub fn join_arguments<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut buffer = String::new();
    for arg in args {
        let arg = arg.as_ref();
        if arg.is_empty() || !whitespace_is_quoted(arg) {
            let quote = if arg.contains('"') && !arg.contains('\'') {
                '\''
            } else {
                '"'
            };
            if arg.contains(quote) {
                warn!(argument = arg, "Argument holds both quote kinds and may split");
            }
            buffer.push(quote);
            buffer.push_str(arg);
            buffer.push(quote);
        } else {
            buffer.push_str(arg);
        }
        buffer.push(' ');
    }
    buffer
}

/// `true` when every whitespace character of `arg` lies inside a closed
/// quoted span. A span opens at the start of the argument or after a
/// non-alphanumeric character, so apostrophes inside words are literal.
fn whitespace_is_quoted(arg: &str) -> bool {
    let mut open: Option<char> = None;
    let mut previous: Option<char> = None;
    for c in arg.chars() {
        match open {
            Some(quote) if c == quote => open = None,
            Some(_) => {}
            None if c.is_whitespace() => return false,
            None if (c == '"' || c == '\'')
                && !previous.is_some_and(char::is_alphanumeric) =>
            {
                open = Some(c);
            }
            None => {}
        }
        previous = Some(c);
    }
    open.is_none()
}

/// Finds the longest keyword at the start of `buffer` that is followed by
/// whitespace or the end. Returns the command and the byte offset past it.
fn match_command<'c>(
    commands: &'c CommandConfiguration,
    buffer: &str,
) -> Option<(&'c CommandMetadata, usize)> {
    let trimmed = buffer.trim_start();
    let offset = buffer.len() - trimmed.len();
    commands
        .iter()
        .filter(|command| {
            trimmed
                .strip_prefix(command.keyword.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        })
        .max_by_key(|command| command.keyword.len())
        .map(|command| (command, offset + command.keyword.len()))
}

/// Scans one scope: the root grammar or a matched command.
struct Scanner<'c, 'b> {
    properties: &'c CommandLineProperties,
    command: Option<&'c CommandMetadata>,
    options: &'c OptionConfiguration,
    parameters: &'c ParameterConfiguration,
    cursor: Cursor<'b>,
}

impl<'c, 'b> Scanner<'c, 'b> {
    fn for_root(configuration: &'c CommandLineConfiguration, input: &'b str) -> Self {
        Self {
            properties: configuration.properties(),
            command: None,
            options: configuration.options(),
            parameters: configuration.parameters(),
            cursor: Cursor::new(input),
        }
    }

    fn for_command(
        properties: &'c CommandLineProperties,
        command: &'c CommandMetadata,
        input: &'b str,
    ) -> Self {
        Self {
            properties,
            command: Some(command),
            options: command.options(),
            parameters: command.parameters(),
            cursor: Cursor::new(input),
        }
    }

    fn keyword(&self) -> Option<String> {
        self.command.map(|command| command.keyword.clone())
    }

    /// Resolves an option identifier. Short and long identifiers are only
    /// told apart when the prefixes differ.
    fn resolve(&self, identifier: &str, kind: IdentifierKind) -> Option<&'c OptionMetadata> {
        if self.properties.prefixes_differ() {
            self.options.get_by_kind(identifier, kind)
        } else {
            self.options.get(identifier)
        }
    }

    /// Consumes a long or short prefix, long first.
    fn eat_prefix(&mut self) -> Option<(&'c str, IdentifierKind)> {
        let long = self.properties.long_prefix.as_str();
        let short = self.properties.short_prefix.as_str();
        if !long.is_empty() && self.cursor.eat(long) {
            Some((long, IdentifierKind::Long))
        } else if !short.is_empty() && self.cursor.eat(short) {
            Some((short, IdentifierKind::Short))
        } else {
            None
        }
    }

    fn scan_options(&mut self, result: &mut ParseResult<'c>) -> Result<(), ParseError> {
        loop {
            self.cursor.skip_whitespace();
            let token = self.cursor.rest().split_whitespace().next().unwrap_or("");
            let Some((prefix, kind)) = self.eat_prefix() else {
                return Ok(());
            };

            let identifier =
                self.cursor
                    .eat_identifier()
                    .ok_or_else(|| ParseError::InvalidOptionToken {
                        token: token.to_string(),
                        command: self.keyword(),
                    })?;
            let option =
                self.resolve(identifier, kind)
                    .ok_or_else(|| ParseError::UnknownOption {
                        option: format!("{prefix}{identifier}"),
                        command: self.keyword(),
                    })?;

            let value = match option.parameter.as_ref() {
                Some(parameter) if option.is_parameter_accepted() => {
                    self.scan_option_value(option, parameter, prefix, identifier)?
                }
                _ => None,
            };
            debug!(option = %option.identifier, value = ?value, "Recognised option");
            self.record(result, option, value);
        }
    }

    fn scan_option_value(
        &mut self,
        option: &'c OptionMetadata,
        parameter: &'c ParameterMetadata,
        prefix: &str,
        identifier: &str,
    ) -> Result<Option<Value>, ParseError> {
        if !self.cursor.eat(&self.properties.delimiter) {
            return Ok(None);
        }
        if self.properties.is_whitespace_delimited() {
            self.cursor.skip_whitespace();
        }

        let Some(token) = self.cursor.peek_token() else {
            if parameter.required {
                return Err(ParseError::MissingParameterValue {
                    option: format!("{prefix}{identifier}"),
                    command: self.keyword(),
                });
            }
            trace!(option = %option.identifier, "Option given without a value");
            return Ok(None);
        };

        self.cursor.advance(token.len);
        trace!(
            option = %option.identifier,
            raw = token.text,
            quoted = token.quoted,
            "Read option value"
        );
        self.coerce(parameter, token.text)
    }

    fn record(
        &self,
        result: &mut ParseResult<'c>,
        option: &'c OptionMetadata,
        value: Option<Value>,
    ) {
        let inputs = result.option_input_mut();
        if let Some(input) = inputs.get_mut(&option.identifier) {
            if option.multi_valued {
                input.append(value);
            } else {
                debug!(
                    option = %option.identifier,
                    "Ignoring repeated single-valued option, first occurrence wins"
                );
                input.repeat();
            }
            return;
        }

        let parameter = option
            .parameter
            .as_ref()
            .filter(|_| option.is_parameter_accepted())
            .map(|metadata| {
                let value = if option.multi_valued {
                    Some(Value::List(value.into_iter().collect()))
                } else {
                    value
                };
                ParameterInput::new(metadata, value)
            });
        inputs.insert(OptionInput::new(option, parameter));
    }

    fn scan_parameters(&mut self, result: &mut ParseResult<'c>) -> Result<(), ParseError> {
        for parameter in self.parameters {
            if parameter.multi_valued {
                let mut values = Vec::new();
                while let Some(token) = self.cursor.take_token() {
                    if let Some(value) = self.coerce(parameter, token.text)? {
                        values.push(value);
                    }
                }
                if values.is_empty() {
                    self.require(parameter)?;
                    continue;
                }
                debug!(parameter = %parameter.identifier, count = values.len(), "Matched parameter");
                result
                    .parameter_input_mut()
                    .insert(ParameterInput::new(parameter, Some(Value::List(values))));
            } else {
                let Some(token) = self.cursor.take_token() else {
                    self.require(parameter)?;
                    continue;
                };
                let value = self.coerce(parameter, token.text)?;
                debug!(parameter = %parameter.identifier, value = ?value, "Matched parameter");
                result
                    .parameter_input_mut()
                    .insert(ParameterInput::new(parameter, value));
            }
        }
        Ok(())
    }

    fn require(&self, parameter: &ParameterMetadata) -> Result<(), ParseError> {
        if parameter.required {
            return Err(ParseError::MissingRequiredParameter {
                parameter: parameter.identifier.clone(),
                command: self.keyword(),
            });
        }
        Ok(())
    }

    fn coerce(&self, parameter: &ParameterMetadata, raw: &str) -> Result<Option<Value>, ParseError> {
        coerce(parameter, raw).map_err(|source| ParseError::InvalidParameterValue {
            value: raw.to_string(),
            parameter: parameter.identifier.clone(),
            command: self.keyword(),
            source,
        })
    }

    fn finish(&mut self) {
        self.cursor.skip_whitespace();
        if !self.cursor.is_at_end() {
            debug!(remaining = %self.cursor.rest(), "Ignoring unconsumed input");
        }
    }
}
