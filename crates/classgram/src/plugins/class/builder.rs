//! Parse tree to class model
//!
//! Building happens in two phases. Visiting statements collects classes and
//! hierarchy edges into separate maps; [`ModelBuilder::finish`] then attaches
//! every collected edge to its child class in one pass.

use indexmap::IndexMap;
use tracing::{debug, span, trace, Level};

use crate::core::{DiagramError, RelationKind};

use super::database::{Class, ClassModel, Note, RelationEdge};
use super::syntax::{
    AnnotationStatement, ClassDecl, Diagram, MemberStatement, NoteStatement, RelationChain,
    Statement,
};

/// Builds a [`ClassModel`] from a parse tree
#[derive(Debug, Default)]
pub struct ModelBuilder {
    classes: IndexMap<String, Class>,
    inheritance: IndexMap<String, IndexMap<String, RelationKind>>,
    notes: Vec<Note>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visit every statement of `diagram` and finalize
    pub fn build(diagram: &Diagram) -> Result<ClassModel, DiagramError> {
        let build_span = span!(Level::DEBUG, "build_model", statements = diagram.statements.len());
        let _enter = build_span.enter();

        let mut builder = Self::new();
        builder.visit_diagram(diagram)?;
        Ok(builder.finish())
    }

    pub fn visit_diagram(&mut self, diagram: &Diagram) -> Result<(), DiagramError> {
        for statement in &diagram.statements {
            self.visit_statement(statement)?;
        }
        Ok(())
    }

    pub fn visit_statement(&mut self, statement: &Statement) -> Result<(), DiagramError> {
        match statement {
            Statement::Class(decl) => self.visit_class(decl),
            Statement::Annotation(annotation) => self.visit_annotation(annotation),
            Statement::Member(member) => self.visit_member(member),
            Statement::Relation(chain) => self.visit_relation(chain),
            Statement::Note(note) => self.visit_note(note),
        }
    }

    fn visit_class(&mut self, decl: &ClassDecl) -> Result<(), DiagramError> {
        let class = self.class_mut(&decl.name)?;
        class.annotations.extend(decl.annotations.iter().cloned());
        for member in &decl.members {
            self.visit_member(member)?;
        }
        Ok(())
    }

    fn visit_annotation(&mut self, statement: &AnnotationStatement) -> Result<(), DiagramError> {
        self.class_mut(&statement.class_name)?
            .annotations
            .insert(statement.annotation.clone());
        Ok(())
    }

    fn visit_member(&mut self, statement: &MemberStatement) -> Result<(), DiagramError> {
        if statement.class_name.trim().is_empty() {
            return Err(DiagramError::invalid_structure(format!(
                "member '{}' has no owning class",
                statement.member.name()
            )));
        }
        trace!(class = %statement.class_name, member = statement.member.name(), "member");
        self.class_mut(&statement.class_name)?
            .add_member(statement.member.clone());
        Ok(())
    }

    fn visit_relation(&mut self, chain: &RelationChain) -> Result<(), DiagramError> {
        for name in chain.operands() {
            self.class_mut(name)?;
        }
        for edge in chain.edges() {
            trace!(child = %edge.child, parent = %edge.parent, kind = %edge.kind, "relation");
            self.inheritance
                .entry(edge.child)
                .or_default()
                .insert(edge.parent, edge.kind);
        }
        Ok(())
    }

    fn visit_note(&mut self, statement: &NoteStatement) -> Result<(), DiagramError> {
        if let Some(target) = &statement.target {
            self.class_mut(target)?;
        }
        self.notes.push(Note {
            target: statement.target.clone(),
            text: statement.text.clone(),
        });
        Ok(())
    }

    fn class_mut(&mut self, name: &str) -> Result<&mut Class, DiagramError> {
        if name.trim().is_empty() {
            return Err(DiagramError::invalid_structure(
                "class name must not be empty".to_string(),
            ));
        }
        Ok(self
            .classes
            .entry(name.to_string())
            .or_insert_with(|| Class::new(name)))
    }

    /// Edges collected so far and not yet attached to their child classes
    pub fn pending_edges(&self) -> impl Iterator<Item = RelationEdge> + '_ {
        self.inheritance.iter().flat_map(|(child, parents)| {
            parents
                .iter()
                .map(move |(parent, kind)| RelationEdge::new(child, parent, *kind))
        })
    }

    /// Attach every collected edge to its child class and produce the model
    pub fn finish(self) -> ClassModel {
        let Self {
            mut classes,
            inheritance,
            notes,
        } = self;

        for (child, parents) in inheritance {
            classes
                .entry(child.clone())
                .or_insert_with(|| Class::new(child))
                .parents
                .extend(parents);
        }

        debug!(classes = classes.len(), notes = notes.len(), "built class model");
        ClassModel::from_parts(classes, notes)
    }
}
