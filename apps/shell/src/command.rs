use regform_registration::Field;
use std::borrow::Cow;

pub(crate) const HELP: &str = "\
Commands:
  name|address|phone|email|password <value>   set a field (no value clears it)
  toggle                                      show or hide the password
  submit                                      submit the form
  show                                        render the form
  help                                        this message
  quit                                        leave";

#[regform_derive::regform_error]
pub(crate) enum CommandError {
    #[error("Unknown command{}: {message}", format_context(.context))]
    Unknown { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unexpected argument{}: {message}", format_context(.context))]
    UnexpectedArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Set { field: Field, value: String },
    Toggle,
    Submit,
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parses a line. Blank lines yield `Ok(None)`.
    ///
    /// Everything after the field name and one separating space is the value, so
    /// values may contain spaces (`phone +1 (555) 123-4567`).
    pub(crate) fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(None);
        }

        let line = line.trim_start();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let word = word.to_ascii_lowercase();

        if let Some(field) = Field::ALL.into_iter().find(|f| f.as_ref() == word) {
            return Ok(Some(Self::Set { field, value: rest.to_owned() }));
        }

        let command = match word.as_str() {
            "toggle" => Self::Toggle,
            "submit" => Self::Submit,
            "show" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Err(CommandError::Unknown { message: word.into(), context: None }),
        };

        if rest.trim().is_empty() {
            Ok(Some(command))
        } else {
            Err(CommandError::UnexpectedArgument {
                message: rest.trim().to_owned().into(),
                context: Some(word.into()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(field: Field, value: &str) -> Option<Command> {
        Some(Command::Set { field, value: value.to_owned() })
    }

    #[test]
    fn test_field_commands_keep_inner_spaces() {
        assert_eq!(Command::parse("name Jo").unwrap(), set(Field::Name, "Jo"));
        assert_eq!(
            Command::parse("phone +1 (555) 123-4567\n").unwrap(),
            set(Field::Phone, "+1 (555) 123-4567")
        );
        assert_eq!(Command::parse("Address 1 Main St").unwrap(), set(Field::Address, "1 Main St"));
        assert_eq!(Command::parse("password  lead").unwrap(), set(Field::Password, " lead"));
        assert_eq!(Command::parse("email").unwrap(), set(Field::Email, ""));
    }

    #[test]
    fn test_keywords() {
        assert_eq!(Command::parse("toggle").unwrap(), Some(Command::Toggle));
        assert_eq!(Command::parse("  submit").unwrap(), Some(Command::Submit));
        assert_eq!(Command::parse("SHOW").unwrap(), Some(Command::Show));
        assert_eq!(Command::parse("?").unwrap(), Some(Command::Help));
        assert_eq!(Command::parse("exit").unwrap(), Some(Command::Quit));
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_rejections() {
        let err = Command::parse("register now").unwrap_err();
        assert_eq!(err.to_string(), "Unknown command: register");

        let err = Command::parse("submit twice").unwrap_err();
        assert_eq!(err.to_string(), "Unexpected argument (submit): twice");
    }
}
