//! Core renderer trait for diagram output
//!
//! This trait defines the interface for rendering diagram data into text
//! outputs (skeleton source code, diagram notation).

use anyhow::Result;

use super::Database;

/// Core trait for diagram renderers
///
/// Each renderer is stateless: the same database always renders to the same
/// output.
///
/// # Example
/// ```
/// use classgram::core::Renderer;
/// use classgram::plugins::class::{ClassModel, SourceRenderer};
///
/// let model = ClassModel::new();
/// let renderer = SourceRenderer::new();
/// let output = renderer.render(&model).unwrap();
/// assert!(output.is_empty());
/// ```
pub trait Renderer<D: Database>: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Render the diagram database into the output format
    fn render(&self, database: &D) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the version of this renderer
    fn version(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}
