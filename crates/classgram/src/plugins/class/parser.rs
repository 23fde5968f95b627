//! Class diagram parser
//!
//! Lexes notation text, parses the tokens and builds the class model.

use anyhow::Result;
use tracing::{debug, span, Level};

use crate::core::{DiagramError, Parser};

use super::builder::ModelBuilder;
use super::database::ClassModel;
use super::grammar::parse_tokens;
use super::lexer::Lexer;
use super::syntax::Diagram;

/// Class diagram parser
#[derive(Debug, Clone, Default)]
pub struct ClassParser {
    lexer: Lexer,
}

impl ClassParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse notation text into a parse tree
    pub fn parse_diagram(&self, input: &str) -> Result<Diagram, DiagramError> {
        let positions = self.lexer.tokenize(input);
        parse_tokens(input, &positions)
    }

    /// Parse notation text into a fresh class model
    pub fn parse_model(&self, input: &str) -> Result<ClassModel, DiagramError> {
        let parse_span = span!(Level::DEBUG, "parse_class_diagram", input_len = input.len());
        let _enter = parse_span.enter();

        let diagram = self.parse_diagram(input)?;
        debug!(statements = diagram.statements.len(), "parsed statements");
        ModelBuilder::build(&diagram)
    }
}

impl Parser<ClassModel> for ClassParser {
    fn parse(&self, input: &str, database: &mut ClassModel) -> Result<()> {
        let model = self.parse_model(input)?;
        database.merge(model);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "class"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        input
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with("%%"))
            .is_some_and(|line| line.starts_with("classDiagram"))
    }
}
