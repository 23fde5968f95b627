//! Skeletal source renderer
//!
//! Renders a class model as C#-flavoured type skeletons: one block per class
//! with its parent list, accessor-pair fields and stub methods.

use anyhow::Result;
use tracing::{debug, span, Level};

use crate::core::{Renderer, SourceConfig};

use super::database::{Class, ClassModel, Field, Method};

/// Class model to skeletal source code
#[derive(Debug, Clone, Default)]
pub struct SourceRenderer {
    config: SourceConfig,
}

impl SourceRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SourceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn render_class(&self, class: &Class, out: &mut String) {
        out.push_str("public ");
        out.push_str(declaration_keyword(class));
        out.push(' ');
        out.push_str(&class.name);
        if !class.parents.is_empty() {
            let parents: Vec<&str> = class.parents.keys().map(String::as_str).collect();
            out.push_str(" : ");
            out.push_str(&parents.join(", "));
        }
        out.push_str("\n{\n");

        let members: Vec<String> = class
            .fields()
            .map(|field| self.render_field(field))
            .chain(class.methods().map(|method| self.render_method(method)))
            .collect();
        out.push_str(&members.join("\n"));

        out.push_str("}\n");
    }

    fn render_field(&self, field: &Field) -> String {
        let type_name = if field.type_name.is_empty() {
            self.config.placeholder_type.as_str()
        } else {
            field.type_name.as_str()
        };
        format!(
            "{indent}{visibility} {qualifiers}{type_name} {name} {{ get; set; }}\n",
            indent = self.config.indent(),
            visibility = field.visibility.keyword(),
            qualifiers = if field.is_static { "static " } else { "" },
            name = field.name,
        )
    }

    fn render_method(&self, method: &Method) -> String {
        let indent = self.config.indent();
        let mut qualifiers = String::new();
        if method.is_static {
            qualifiers.push_str("static ");
        }
        if method.is_abstract {
            qualifiers.push_str("abstract ");
        }
        let return_type = if method.return_type.is_empty() {
            "void"
        } else {
            method.return_type.as_str()
        };
        let signature = format!(
            "{indent}{visibility} {qualifiers}{return_type} {name}({arguments})",
            visibility = method.visibility.keyword(),
            name = method.name,
            arguments = method.arguments,
        );

        if method.is_abstract {
            format!("{signature};\n")
        } else {
            format!("{signature}\n{indent}{{\n{indent}}}\n")
        }
    }
}

fn declaration_keyword(class: &Class) -> &'static str {
    if class.is_interface() {
        "interface"
    } else if class.is_abstract() {
        "abstract class"
    } else {
        "class"
    }
}

impl Renderer<ClassModel> for SourceRenderer {
    type Output = String;

    fn render(&self, model: &ClassModel) -> Result<Self::Output> {
        let render_span = span!(Level::DEBUG, "render_source", classes = model.class_count());
        let _enter = render_span.enter();

        let mut out = String::new();
        for note in model.notes() {
            match &note.target {
                Some(target) => out.push_str(&format!("// {target}: {}\n", note.text)),
                None => out.push_str(&format!("// {}\n", note.text)),
            }
        }

        for (idx, class) in model.classes().enumerate() {
            if idx > 0 || !model.notes().is_empty() {
                out.push('\n');
            }
            self.render_class(class, &mut out);
        }

        debug!(bytes = out.len(), "rendered source");
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "source"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "csharp"
    }
}
