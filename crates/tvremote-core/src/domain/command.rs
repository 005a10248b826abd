//! Opaque remote-control command values.

use std::borrow::Cow;
use std::fmt;

/// A single remote-control key press, e.g. `KEY_POWER` or `KEY_VOLUP`.
///
/// The set of valid codes belongs to the TV; this type only carries the
/// string that goes on the wire and never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandCode(Cow<'static, str>);

impl CommandCode {
    /// Creates a command code from a string known at compile time.
    pub const fn from_static(wire_value: &'static str) -> Self {
        Self(Cow::Borrowed(wire_value))
    }

    /// Creates a command code from an owned or borrowed string.
    pub fn new(wire_value: impl Into<String>) -> Self {
        Self(Cow::Owned(wire_value.into()))
    }

    /// The string sent to the TV for this command.
    pub fn wire_value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CommandCode {
    type Err = String;

    /// Parses a command from user input.  Surrounding whitespace is trimmed;
    /// an empty string is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("command code must not be empty".to_string());
        }
        Ok(Self::new(trimmed))
    }
}

impl From<&'static str> for CommandCode {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}
