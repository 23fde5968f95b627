//! Class diagram notation renderer
//!
//! Renders a class model back to notation. The output re-parses into an
//! equivalent model.

use anyhow::Result;
use tracing::{debug, span, Level};

use crate::core::{RelationKind, Renderer};

use super::database::{Class, ClassModel, Field, Member, Method, Note};

const INDENT: &str = "    ";

/// Class model to class diagram notation
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramRenderer;

impl DiagramRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_class(&self, class: &Class, lines: &mut Vec<String>) {
        let name = &class.name;
        lines.push(format!("{INDENT}class {name}"));
        for annotation in &class.annotations {
            lines.push(format!("{INDENT}<<{annotation}>> {name}"));
        }
        for member in &class.members {
            lines.push(format!("{INDENT}{name} : {}", member_notation(member)));
        }
        for (parent, kind) in &class.parents {
            lines.push(match kind {
                RelationKind::Inherits => format!("{INDENT}{parent} <|-- {name}"),
                RelationKind::Implements => format!("{INDENT}{name} ..|> {parent}"),
            });
        }
        lines.push(String::new());
    }
}

/// Notation for a single member, without the owning class prefix
pub fn member_notation(member: &Member) -> String {
    match member {
        Member::Field(field) => field_notation(field),
        Member::Method(method) => method_notation(method),
    }
}

fn field_notation(field: &Field) -> String {
    let mut out = String::new();
    out.push(field.visibility.to_char());
    if !field.type_name.is_empty() {
        out.push_str(&field.type_name);
        out.push(' ');
    }
    out.push_str(&field.name);
    if field.is_static {
        out.push('$');
    }
    out
}

fn method_notation(method: &Method) -> String {
    let mut out = format!(
        "{}{}({})",
        method.visibility.to_char(),
        method.name,
        method.arguments
    );
    if !method.return_type.is_empty() {
        out.push(' ');
        out.push_str(&method.return_type);
    }
    if method.is_abstract {
        out.push('*');
    }
    if method.is_static {
        out.push('$');
    }
    out
}

fn note_notation(note: &Note) -> String {
    match &note.target {
        Some(target) => format!("{INDENT}note for {target} \"{}\"", note.text),
        None => format!("{INDENT}note \"{}\"", note.text),
    }
}

impl Renderer<ClassModel> for DiagramRenderer {
    type Output = String;

    fn render(&self, model: &ClassModel) -> Result<Self::Output> {
        let render_span = span!(Level::DEBUG, "render_diagram", classes = model.class_count());
        let _enter = render_span.enter();

        let mut lines = vec!["classDiagram".to_string()];
        for class in model.classes() {
            self.render_class(class, &mut lines);
        }
        lines.extend(model.notes().iter().map(note_notation));

        let mut out = lines.join("\n");
        out.push('\n');
        debug!(lines = lines.len(), "rendered diagram");
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "diagram"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "mermaid"
    }
}
