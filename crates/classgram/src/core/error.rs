//! Core error types for class diagram processing
//!
//! This module defines the error kinds raised along the notation pipeline and
//! the descriptor pipeline.

use thiserror::Error;

/// Core error types for class diagram processing
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Parse error: {message} at line {line}, column {column}")]
    ParseError {
        message: String,
        offset: usize,
        line: usize,
        column: usize,
    },

    #[error("Invalid structure: {message}")]
    InvalidStructure { message: String },

    #[error("Unresolved name: {name}")]
    UnresolvedName { name: String },

    #[error("Descriptor error: {message}")]
    DescriptorError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new parse error
    pub fn parse_error(message: String, offset: usize, line: usize, column: usize) -> Self {
        Self::ParseError {
            message,
            offset,
            line,
            column,
        }
    }

    /// Create a parse error located at a byte offset of `source`
    ///
    /// Line and column are 1-based; the column counts characters, not bytes.
    pub fn parse_error_at(message: String, source: &str, offset: usize) -> Self {
        let (line, column) = line_column(source, offset);
        Self::parse_error(message, offset, line, column)
    }

    /// Create a new invalid structure error
    pub fn invalid_structure(message: String) -> Self {
        Self::InvalidStructure { message }
    }

    /// Create a new unresolved name error
    pub fn unresolved_name(name: impl Into<String>) -> Self {
        Self::UnresolvedName { name: name.into() }
    }

    /// Create a new descriptor error
    pub fn descriptor_error(message: String) -> Self {
        Self::DescriptorError { message }
    }

    /// Byte offset of a parse error, if this is one
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::ParseError { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DiagramError {
    fn from(err: serde_json::Error) -> Self {
        Self::descriptor_error(err.to_string())
    }
}

fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let mut end = offset.min(source.len());
    while !source.is_char_boundary(end) {
        end -= 1;
    }
    let before = &source[..end];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
