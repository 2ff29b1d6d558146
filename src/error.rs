use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed literal, unexpected character, unterminated string or
    /// comment.
    Syntax,
    /// Illegal trailing comma, stray comma, missing ':' or ',', mismatched
    /// delimiter.
    Structural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

/// Fatal parse failure. There is no recovery and no partial result; the
/// first violation stops the parse and surfaces here.
#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub location: Option<Location>,
}

impl Error {
    pub fn syntax(message: impl Into<String>, location: Location) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            message: message.into(),
            location: Some(location),
        }
    }

    pub fn structural(message: impl Into<String>, location: Location) -> Self {
        Self {
            kind: ErrorKind::Structural,
            message: message.into(),
            location: Some(location),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Structural => "structural error",
        };
        match self.location {
            Some(location) => write!(
                f,
                "{label} at {}:{}: {}",
                location.line, location.column, self.message
            ),
            None => write!(f, "{label}: {}", self.message),
        }
    }
}

impl std::error::Error for Error {}
