use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading s-expressions and netlists
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("SExpr {0} not found")]
    MissingChild(String),
    #[error("Value not found")]
    MissingValue(),
    #[error("Unexpected end of file at {at:?}")]
    UnexpectedEof { at: logos::Span },
    #[error("Expected {expected} but found {found} at {at:?}")]
    UnexpectedToken {
        expected: String,
        found: String,
        at: logos::Span,
    },
    #[error("Unknown token {found} at {at:?}")]
    UnknownToken { found: String, at: logos::Span },
    #[error("Trailing input at {at:?}")]
    TrailingInput { at: logos::Span },
    #[error("Node refers to unknown component {0}")]
    UnknownRef(String),
}

/// Errors raised while registering components in a design
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DesignError {
    #[error("Component identifier must not be empty")]
    EmptyIdentifier,
    #[error("Duplicate component {0}")]
    DuplicateComponent(String),
    #[error("Duplicate pin {pin} on component {component}")]
    DuplicatePin { component: String, pin: String },
}

/// Errors raised while resolving footprints
#[derive(Error, Debug)]
pub enum FootprintError {
    #[error("Unknown footprint {0}")]
    Unknown(String),
    #[error("Footprint reference {0} is not of the form lib:name")]
    BadReference(String),
    #[error("Could not read footprint {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not parse footprint {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Errors raised while writing a netlist
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Could not write netlist {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
