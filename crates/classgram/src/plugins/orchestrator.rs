//! Pipeline orchestrator
//!
//! Wires the class plugin pieces into the two conversion flows:
//! notation → parser → model → renderer, and
//! descriptors → adapter → model → diagram renderer.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, span, Level};

use crate::core::{MemberFilter, Renderer, SourceConfig};
use crate::plugins::class::{
    ClassModel, ClassParser, DiagramRenderer, ModelAdapter, SourceRenderer, SymbolProvider,
    TypeDescriptor,
};

/// Counts reported by [`Orchestrator::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub classes: usize,
    pub members: usize,
    pub relations: usize,
    pub notes: usize,
}

impl ValidationSummary {
    pub fn of(model: &ClassModel) -> Self {
        Self {
            classes: model.class_count(),
            members: model.member_count(),
            relations: model.relation_count(),
            notes: model.notes().len(),
        }
    }
}

/// Runs the conversion pipelines
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    parser: ClassParser,
    source_renderer: SourceRenderer,
    diagram_renderer: DiagramRenderer,
    adapter: ModelAdapter,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_config(mut self, config: SourceConfig) -> Self {
        self.source_renderer = SourceRenderer::with_config(config);
        self
    }

    pub fn with_member_filter(mut self, filter: MemberFilter) -> Self {
        self.adapter = ModelAdapter::with_filter(filter);
        self
    }

    /// Parse notation into a class model
    pub fn notation_to_model(&self, input: &str) -> Result<ClassModel> {
        let model = self.parser.parse_model(input)?;
        debug!(
            classes = model.class_count(),
            relations = model.relation_count(),
            "parsed notation"
        );
        Ok(model)
    }

    /// Convert notation to skeletal source code
    pub fn notation_to_source(&self, input: &str) -> Result<String> {
        let pipeline_span = span!(Level::INFO, "notation_to_source", input_len = input.len());
        let _enter = pipeline_span.enter();

        let model = self.notation_to_model(input)?;
        let source = self.source_renderer.render(&model)?;
        info!(classes = model.class_count(), "generated source");
        Ok(source)
    }

    /// Re-render notation in canonical layout
    pub fn notation_to_notation(&self, input: &str) -> Result<String> {
        let pipeline_span = span!(Level::INFO, "notation_to_notation", input_len = input.len());
        let _enter = pipeline_span.enter();

        let model = self.notation_to_model(input)?;
        self.diagram_renderer.render(&model)
    }

    /// Render already looked-up descriptors as notation
    pub fn descriptors_to_notation(
        &self,
        requests: &[(String, Option<TypeDescriptor>)],
    ) -> Result<String> {
        let pipeline_span = span!(Level::INFO, "descriptors_to_notation", requests = requests.len());
        let _enter = pipeline_span.enter();

        let model = self.adapter.adapt(requests);
        let notation = self.diagram_renderer.render(&model)?;
        info!(classes = model.class_count(), "generated diagram");
        Ok(notation)
    }

    /// Look up `names` through `provider` and render them as notation
    pub fn names_to_notation<S: AsRef<str>>(
        &self,
        names: &[S],
        provider: &dyn SymbolProvider,
    ) -> Result<String> {
        let pipeline_span = span!(Level::INFO, "names_to_notation", names = names.len());
        let _enter = pipeline_span.enter();

        let model = self.adapter.adapt_names(names, provider);
        self.diagram_renderer.render(&model)
    }

    /// Parse notation and summarize what it declares
    pub fn validate(&self, input: &str) -> Result<ValidationSummary> {
        let pipeline_span = span!(Level::INFO, "validate", input_len = input.len());
        let _enter = pipeline_span.enter();

        let model = self.notation_to_model(input)?;
        Ok(ValidationSummary::of(&model))
    }
}
