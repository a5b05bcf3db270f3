//! This module defines all error types used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// XML syntax or encoding errors in a statechart description
    #[error("XML error: {0}")]
    Xml(String),

    /// A required attribute is missing on an element
    #[error("Element <{element}> is missing required attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    /// An edge target that names no known state after resolution
    #[error("Unknown transition target '{0}'")]
    UnknownTarget(String),

    /// A composite initial-state chain that loops back on itself
    #[error("Cyclic initial state detected while resolving '{0}'")]
    CyclicInitialState(String),

    /// Statechart construction errors
    #[error("Statechart error: {0}")]
    Statechart(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file parsing errors
    #[error("Configuration parsing error in {file:?}: {message}")]
    ConfigParse { file: PathBuf, message: String },

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),

    /// Wrapped anyhow errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create an XML error
    pub fn xml(msg: impl Into<String>) -> Self {
        Self::Xml(msg.into())
    }

    /// Create a statechart construction error
    pub fn statechart(msg: impl Into<String>) -> Self {
        Self::Statechart(msg.into())
    }

    /// Create a missing-attribute error
    pub fn missing_attribute(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Check if error is fatal for resolution (as opposed to input defects
    /// that were already downgraded to warnings)
    pub fn is_resolution_error(&self) -> bool {
        matches!(self, Error::UnknownTarget(_) | Error::CyclicInitialState(_))
    }
}

// Implement From traits for common external error types

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(format!("malformed attribute: {}", err))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse {
            file: PathBuf::from("unknown"),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Custom(format!("JSON error: {}", err))
    }
}

// Helper macros for creating errors

/// Create a custom error with formatting
#[macro_export]
macro_rules! custom_error {
    ($($arg:tt)*) => {
        $crate::error::Error::Custom(format!($($arg)*))
    };
}

/// Bail with a custom error message
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::custom_error!($($arg)*))
    };
}

/// Ensure a condition is true or return error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::custom("test error");
        assert_eq!(err.to_string(), "test error");

        let err = Error::missing_attribute("state", "id");
        assert_eq!(
            err.to_string(),
            "Element <state> is missing required attribute 'id'"
        );
    }

    #[test]
    fn test_resolution_errors() {
        assert!(Error::UnknownTarget("X".into()).is_resolution_error());
        assert!(Error::CyclicInitialState("C".into()).is_resolution_error());
        assert!(!Error::custom("other").is_resolution_error());
    }
}
