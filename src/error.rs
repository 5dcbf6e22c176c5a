use thiserror::Error;

/// A recoverable problem found while scanning a line. Parsing never stops on one of these; the
/// offending line is dropped and the scan moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: missing a [section] before this option")]
    MissingSection { line: usize },
    #[error("line {line}: ignoring unrecognized line")]
    UnrecognizedLine { line: usize },
}

impl ParseError {
    /// The 1-based line number the diagnostic refers to.
    #[must_use]
    pub fn line(&self) -> usize {
        match *self {
            Self::MissingSection { line } | Self::UnrecognizedLine { line } => line,
        }
    }
}

/// A stored string could not be read as the option's declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("{value:?} is not a boolean")]
    NotBool { value: String },
    #[error("{value:?} is not an integer")]
    NotInt { value: String },
}

/// A section, option or comment built through the API that would not read back the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("section type {kind:?} must be letters, digits, '_' or '-'")]
    InvalidKind { kind: String },
    #[error("section name {name:?} cannot contain ']'")]
    InvalidSectionName { name: String },
    #[error("option name {name:?} must be letters, digits, '_' or '-'")]
    InvalidOptionName { name: String },
    #[error("{text:?} spans more than one line")]
    MultiLine { text: String },
}
