//! Core parser trait for diagram markup
//!
//! This trait defines the interface for parsing diagram markup language
//! into structured data that can be stored in a database.

use anyhow::Result;

use super::Database;

/// Core trait for diagram parsers
///
/// # Example
/// ```
/// use classgram::core::{Database, Parser};
/// use classgram::plugins::class::{ClassModel, ClassParser};
///
/// let parser = ClassParser::new();
/// let mut model = ClassModel::new();
/// parser.parse("classDiagram\n    Animal <|-- Dog", &mut model).unwrap();
/// assert_eq!(model.node_count(), 2);
/// ```
pub trait Parser<D: Database>: Send + Sync {
    /// Parse diagram markup into the provided database
    fn parse(&self, input: &str, database: &mut D) -> Result<()>;

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;

    /// Check if the input can be parsed by this parser
    fn can_parse(&self, input: &str) -> bool;
}
