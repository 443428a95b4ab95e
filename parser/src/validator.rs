//! Post-parse requiredness checks over the active scope.

use crate::error::ParseError;
use crate::result::{ParameterInput, ParseResult};

/// Checks that every required option and parameter of the matched scope
/// received input.
///
/// Options are checked before parameters, each in declaration order; the
/// first violation is returned.
///
/// # Errors
///
/// - [`ParseError::MissingRequiredOption`] for an absent required option.
/// - [`ParseError::MissingOptionParameter`] for a present option whose
///   required parameter has no value.
/// - [`ParseError::MissingRequiredParameter`] for a required positional
///   parameter without a value.
pub fn validate(result: &ParseResult<'_>) -> Result<(), ParseError> {
    let command = result.matching_command().map(|c| c.keyword.clone());
    let short_prefix = &result.configuration().properties().short_prefix;
    let options = result.option_input();

    for option in options.configuration() {
        match options.get(&option.identifier) {
            None if option.required => {
                return Err(ParseError::MissingRequiredOption {
                    option: format!("{short_prefix}{}", option.identifier),
                    command,
                });
            }
            Some(input) => {
                let parameter_required = option.is_parameter_accepted()
                    && option.parameter.as_ref().is_some_and(|p| p.required);
                if parameter_required && !input.has_value() {
                    return Err(ParseError::MissingOptionParameter {
                        option: format!("{short_prefix}{}", option.identifier),
                        command,
                    });
                }
            }
            None => {}
        }
    }

    let parameters = result.parameter_input();
    for parameter in parameters.configuration() {
        let present = parameters
            .get(&parameter.identifier)
            .is_some_and(ParameterInput::has_value);
        if parameter.required && !present {
            return Err(ParseError::MissingRequiredParameter {
                parameter: parameter.identifier.clone(),
                command,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clif_core::{
        CommandLineConfiguration, CommandLineProperties, CommandMetadata, OptionMetadata,
        ParameterMetadata, ParameterType, Value,
    };

    use super::*;
    use crate::result::OptionInput;

    fn config() -> CommandLineConfiguration {
        let mut config =
            CommandLineConfiguration::new("app").with_properties(CommandLineProperties::unix());
        config
            .add_option(
                OptionMetadata::with_parameter(
                    "o",
                    ParameterMetadata::required("o", ParameterType::String),
                )
                .with_long("output"),
            )
            .unwrap()
            .add_option(OptionMetadata::flag("r").with_required(true))
            .unwrap()
            .add_parameter("src", true, false, "")
            .unwrap();
        config
    }

    #[test]
    fn test_missing_required_option_uses_short_prefix() {
        let config = config();
        let result = ParseResult::new(&config);
        let err = validate(&result).unwrap_err();
        assert!(matches!(
            &err,
            ParseError::MissingRequiredOption { option, command: None } if option == "-r"
        ));
    }

    #[test]
    fn test_option_without_required_value() {
        let config = config();
        let mut result = ParseResult::new(&config);
        let output = config.option("o").unwrap();
        result.option_input_mut().insert(OptionInput::new(
            output,
            Some(ParameterInput::new(output.parameter.as_ref().unwrap(), None)),
        ));
        result
            .option_input_mut()
            .insert(OptionInput::new(config.option("r").unwrap(), None));

        let err = validate(&result).unwrap_err();
        assert_eq!(err.to_string(), "missing parameter for option -o");
    }

    #[test]
    fn test_empty_list_does_not_satisfy_required_parameter() {
        let config = config();
        let mut result = ParseResult::new(&config);
        result
            .option_input_mut()
            .insert(OptionInput::new(config.option("r").unwrap(), None));
        result.parameter_input_mut().insert(ParameterInput::new(
            config.parameters().get("src").unwrap(),
            Some(Value::List(Vec::new())),
        ));

        let err = validate(&result).unwrap_err();
        assert!(matches!(err, ParseError::MissingRequiredParameter { .. }));
    }

    #[test]
    fn test_command_scope_is_validated() {
        let mut config = config();
        let mut list = CommandMetadata::new("list");
        list.parameters_mut()
            .add(ParameterMetadata::required("pattern", ParameterType::String))
            .unwrap();
        config.add_command(list).unwrap();

        let mut result = ParseResult::new(&config);
        result.set_matching_command(config.command("list").unwrap());

        let err = validate(&result).unwrap_err();
        assert_eq!(err.command(), Some("list"));
        assert!(matches!(
            err,
            ParseError::MissingRequiredParameter { ref parameter, .. } if parameter == "pattern"
        ));
    }
}
