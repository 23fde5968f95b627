//! Class model
//!
//! Stores classes, their members and their hierarchy edges. Hierarchy edges
//! live on the child class as a parent-name to relation-kind map, so a class
//! and its parents always travel together.

use anyhow::Result;
use indexmap::{IndexMap, IndexSet};

use crate::core::{Database, RelationKind, Visibility};

/// A data member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Declared type, empty when unspecified
    pub type_name: String,
    pub visibility: Visibility,
    pub is_static: bool,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: String::new(),
            visibility: Visibility::Public,
            is_static: false,
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }
}

/// A method member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    /// Return type, empty for no return value
    pub return_type: String,
    /// Argument list text, e.g. `string hi, int count`
    pub arguments: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: String::new(),
            arguments: String::new(),
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
        }
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = return_type.into();
        self
    }

    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = arguments.into();
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }
}

/// A class member
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field(Field),
    Method(Method),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Field(field) => &field.name,
            Member::Method(method) => &method.name,
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            Member::Field(field) => field.visibility,
            Member::Method(method) => method.visibility,
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            Member::Field(field) => field.is_static,
            Member::Method(method) => method.is_static,
        }
    }

    pub fn with_visibility(self, visibility: Visibility) -> Self {
        match self {
            Member::Field(field) => Member::Field(field.with_visibility(visibility)),
            Member::Method(method) => Member::Method(method.with_visibility(visibility)),
        }
    }

    pub fn is_method(&self) -> bool {
        matches!(self, Member::Method(_))
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, Member::Method(method) if method.is_abstract)
    }
}

impl From<Field> for Member {
    fn from(field: Field) -> Self {
        Member::Field(field)
    }
}

impl From<Method> for Member {
    fn from(method: Method) -> Self {
        Member::Method(method)
    }
}

/// A class in the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub name: String,
    pub members: Vec<Member>,
    /// Free-form tags such as `interface` or `abstract`
    pub annotations: IndexSet<String>,
    /// Parent class name to edge kind, in insertion order
    pub parents: IndexMap<String, RelationKind>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            annotations: IndexSet::new(),
            parents: IndexMap::new(),
        }
    }

    pub fn with_member(mut self, member: impl Into<Member>) -> Self {
        self.members.push(member.into());
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.insert(annotation.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>, kind: RelationKind) -> Self {
        self.parents.insert(parent.into(), kind);
        self
    }

    pub fn add_member(&mut self, member: impl Into<Member>) {
        self.members.push(member.into());
    }

    pub fn has_annotation(&self, annotation: &str) -> bool {
        self.annotations
            .iter()
            .any(|a| a.eq_ignore_ascii_case(annotation))
    }

    pub fn is_interface(&self) -> bool {
        self.has_annotation("interface")
    }

    /// Annotated abstract, or declares at least one abstract method
    pub fn is_abstract(&self) -> bool {
        self.has_annotation("abstract") || self.members.iter().any(Member::is_abstract)
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(field) => Some(field),
            Member::Method(_) => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            Member::Field(_) => None,
        })
    }

    /// Fold another declaration of the same class into this one
    pub fn merge(&mut self, other: Class) {
        self.members.extend(other.members);
        self.annotations.extend(other.annotations);
        self.parents.extend(other.parents);
    }
}

/// Free-standing comment, optionally attached to a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub target: Option<String>,
    pub text: String,
}

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            target: None,
            text: text.into(),
        }
    }

    pub fn for_class(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            text: text.into(),
        }
    }
}

/// A hierarchy edge: `child` extends or implements `parent`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEdge {
    pub child: String,
    pub parent: String,
    pub kind: RelationKind,
}

impl RelationEdge {
    pub fn new(child: impl Into<String>, parent: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            child: child.into(),
            parent: parent.into(),
            kind,
        }
    }
}

/// Class diagram model
///
/// Classes are keyed by name and kept in first-seen order. Two models compare
/// equal when they hold the same classes, members, annotations, parents and
/// notes regardless of class order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassModel {
    classes: IndexMap<String, Class>,
    notes: Vec<Note>,
}

impl ClassModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(classes: IndexMap<String, Class>, notes: Vec<Note>) -> Self {
        Self { classes, notes }
    }

    /// Insert a class, merging into any existing class of the same name
    pub fn add_class(&mut self, class: Class) {
        match self.classes.get_mut(&class.name) {
            Some(existing) => existing.merge(class),
            None => {
                self.classes.insert(class.name.clone(), class);
            }
        }
    }

    /// Get or create a class by name
    pub fn get_or_create_class(&mut self, name: &str) -> &mut Class {
        self.classes
            .entry(name.to_string())
            .or_insert_with(|| Class::new(name))
    }

    pub fn get_class(&self, name: &str) -> Option<&Class> {
        self.classes.get(name)
    }

    pub fn get_class_mut(&mut self, name: &str) -> Option<&mut Class> {
        self.classes.get_mut(name)
    }

    pub fn contains_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.values()
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Record a hierarchy edge, creating either endpoint if absent
    pub fn add_relation(&mut self, edge: RelationEdge) {
        self.get_or_create_class(&edge.parent);
        self.get_or_create_class(&edge.child)
            .parents
            .insert(edge.parent, edge.kind);
    }

    /// All hierarchy edges, grouped by child in class order
    pub fn relations(&self) -> impl Iterator<Item = RelationEdge> + '_ {
        self.classes.values().flat_map(|class| {
            class
                .parents
                .iter()
                .map(move |(parent, kind)| RelationEdge::new(&class.name, parent, *kind))
        })
    }

    pub fn relation_count(&self) -> usize {
        self.classes.values().map(|c| c.parents.len()).sum()
    }

    pub fn member_count(&self) -> usize {
        self.classes.values().map(|c| c.members.len()).sum()
    }

    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Fold every class and note of `other` into this model
    pub fn merge(&mut self, other: ClassModel) {
        for class in other.classes.into_values() {
            self.add_class(class);
        }
        self.notes.extend(other.notes);
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.notes.is_empty()
    }
}

impl Database for ClassModel {
    type Node = Class;
    type Edge = RelationEdge;

    fn add_node(&mut self, node: Self::Node) -> Result<()> {
        self.add_class(node);
        Ok(())
    }

    fn add_edge(&mut self, edge: Self::Edge) -> Result<()> {
        self.add_relation(edge);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&Self::Node> {
        self.get_class(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.classes()
    }

    fn edges(&self) -> impl Iterator<Item = Self::Edge> + '_ {
        self.relations()
    }

    fn clear(&mut self) {
        self.classes.clear();
        self.notes.clear();
    }

    fn node_count(&self) -> usize {
        self.class_count()
    }

    fn edge_count(&self) -> usize {
        self.relation_count()
    }
}
