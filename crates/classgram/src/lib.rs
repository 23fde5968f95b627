//! Classgram - Convert between Mermaid class diagrams, class models and
//! skeletal source code
//!
//! Class diagram notation is lexed, parsed and built into a [`ClassModel`]
//! that renders either as C#-flavoured type skeletons or back into notation.
//! Type descriptors from a [`SymbolProvider`] can be adapted into the same
//! model and rendered as notation.
//!
//! # Quick Start
//!
//! ```rust
//! use classgram::to_source;
//!
//! let source = to_source("classDiagram\n    Animal <|-- Dog").unwrap();
//! assert!(source.contains("public class Dog : Animal"));
//! ```
//!
//! # Advanced Usage
//!
//! ```rust
//! use classgram::prelude::*;
//!
//! let parser = ClassParser::new();
//! let mut model = ClassModel::new();
//! parser
//!     .parse("classDiagram\n    class Shape {\n        +Area() double*\n    }", &mut model)
//!     .unwrap();
//!
//! assert_eq!(model.node_count(), 1);
//! assert!(model.get_class("Shape").unwrap().is_abstract());
//!
//! let notation = DiagramRenderer::new().render(&model).unwrap();
//! assert!(notation.contains("Shape : +Area() double*"));
//! ```
//!
//! [`ClassModel`]: plugins::class::ClassModel
//! [`SymbolProvider`]: plugins::class::SymbolProvider

pub mod core;
pub mod plugins;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Database, DiagramError, MemberFilter, Parser, RelationKind, Renderer, SourceConfig,
        Visibility,
    };
    pub use crate::plugins::class::{
        Class, ClassModel, ClassParser, DescriptorCatalog, DiagramRenderer, Field, Member,
        Method, ModelAdapter, Note, SourceRenderer, SymbolProvider, TypeDescriptor,
    };
    pub use crate::plugins::orchestrator::Orchestrator;
}

/// Parse class diagram notation into a class model
///
/// # Example
/// ```rust
/// use classgram::parse;
/// use classgram::prelude::Database;
///
/// let model = parse("classDiagram\n    A <|-- B <|-- C").unwrap();
/// assert_eq!(model.node_count(), 3);
/// assert_eq!(model.edge_count(), 2);
/// ```
pub fn parse(input: &str) -> anyhow::Result<plugins::class::ClassModel> {
    plugins::orchestrator::Orchestrator::new().notation_to_model(input)
}

/// Convert class diagram notation to skeletal source code
pub fn to_source(input: &str) -> anyhow::Result<String> {
    plugins::orchestrator::Orchestrator::new().notation_to_source(input)
}

/// Convert class diagram notation to skeletal source with custom settings
pub fn to_source_with_config(input: &str, config: core::SourceConfig) -> anyhow::Result<String> {
    plugins::orchestrator::Orchestrator::new()
        .with_source_config(config)
        .notation_to_source(input)
}

/// Render requested types as class diagram notation
///
/// Names are looked up through `provider`; names it cannot resolve end up in
/// a trailing note instead of failing the render.
///
/// # Example
/// ```rust
/// use classgram::plugins::class::{DescriptorCatalog, TypeDescriptor, TypeRef};
/// use classgram::render_descriptors;
///
/// let catalog = DescriptorCatalog::from_descriptors([
///     TypeDescriptor::new("Shape").with_abstract(true),
///     TypeDescriptor::new("Circle").with_base_type(TypeRef::new("Shape", 0)),
/// ])
/// .unwrap();
///
/// let notation = render_descriptors(&["Shape", "Circle", "Square"], &catalog).unwrap();
/// assert!(notation.contains("Circle ..|> Shape"));
/// assert!(notation.contains("note \"Square not found\""));
/// ```
pub fn render_descriptors<S: AsRef<str>>(
    names: &[S],
    provider: &dyn plugins::class::SymbolProvider,
) -> anyhow::Result<String> {
    plugins::orchestrator::Orchestrator::new().names_to_notation(names, provider)
}
