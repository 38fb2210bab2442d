use crate::types::SourceLocation;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{code}: {message}")]
pub struct TickScriptError {
    pub code: String,
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl TickScriptError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Builds an error whose message is prefixed with `file:line: `.
    pub fn at(
        code: impl Into<String>,
        message: impl AsRef<str>,
        location: SourceLocation,
    ) -> Self {
        Self {
            code: code.into(),
            message: format!("{}: {}", location, message.as_ref()),
            location: Some(location),
        }
    }

    /// Attaches a location to an error raised without one, e.g. by a command factory.
    pub fn located(self, location: SourceLocation) -> Self {
        if self.location.is_some() {
            return self;
        }
        Self::at(self.code, self.message, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_code_and_message() {
        let error = TickScriptError::new("ENGINE_SCRIPT_NOT_FOUND", "Script \"x\" not found.");
        assert_eq!(
            error.to_string(),
            "ENGINE_SCRIPT_NOT_FOUND: Script \"x\" not found."
        );
        assert!(error.location.is_none());
    }

    #[test]
    fn at_prefixes_file_and_line() {
        let error = TickScriptError::at(
            "PARSE_SYNTAX",
            "unexpected character '#'",
            SourceLocation::new("intro.tks", 4),
        );
        assert_eq!(error.message, "intro.tks:4: unexpected character '#'");
        assert_eq!(error.location, Some(SourceLocation::new("intro.tks", 4)));
    }

    #[test]
    fn located_keeps_an_existing_location() {
        let first = SourceLocation::new("a.tks", 1);
        let error = TickScriptError::at("PARSE_SYNTAX", "bad", first.clone())
            .located(SourceLocation::new("b.tks", 9));
        assert_eq!(error.location, Some(first));
        assert_eq!(error.message, "a.tks:1: bad");

        let error = TickScriptError::new("COMMAND_ARG_COUNT", "Wait expects 1 argument, got 0.")
            .located(SourceLocation::new("b.tks", 9));
        assert_eq!(error.code, "COMMAND_ARG_COUNT");
        assert_eq!(error.message, "b.tks:9: Wait expects 1 argument, got 0.");
    }
}
