//! Type descriptors and the descriptor to model adapter
//!
//! A [`TypeDescriptor`] is already-resolved type metadata: base type,
//! interfaces, abstractness and members. Descriptors come from a
//! [`SymbolProvider`]; [`DescriptorCatalog`] is the in-memory provider loaded
//! from JSON. [`ModelAdapter`] turns a batch of lookups into a [`ClassModel`]
//! that the diagram renderer can emit.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, span, trace, warn, Level};

use crate::core::{DiagramError, MemberFilter, RelationKind, Visibility};

use super::database::{Class, ClassModel, Field, Member, Method, Note, RelationEdge};

/// Reference to another type by bare name and generic arity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    #[serde(default)]
    pub arity: usize,
}

impl TypeRef {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Method,
    Field,
    Property,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default, alias = "type")]
    pub type_name: String,
}

impl Parameter {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A member of a described type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorMember {
    pub kind: MemberKind,
    pub name: String,
    /// Field or property type; return type for methods
    #[serde(default, alias = "type")]
    pub type_name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub accessibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
}

impl DescriptorMember {
    pub fn new(kind: MemberKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            type_name: String::new(),
            parameters: Vec::new(),
            accessibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_accessibility(mut self, accessibility: Visibility) -> Self {
        self.accessibility = accessibility;
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

/// Resolved metadata for one type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default)]
    pub arity: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub base_type: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    /// Abstract class or interface
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub members: Vec<DescriptorMember>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: 0,
            namespace: None,
            base_type: None,
            interfaces: Vec::new(),
            is_abstract: false,
            members: Vec::new(),
        }
    }

    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_base_type(mut self, base_type: TypeRef) -> Self {
        self.base_type = Some(base_type);
        self
    }

    pub fn with_interface(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn with_member(mut self, member: DescriptorMember) -> Self {
        self.members.push(member);
        self
    }

    /// `Name` or ``Name`2``
    pub fn short_metadata_name(&self) -> String {
        if self.arity == 0 {
            self.name.clone()
        } else {
            format!("{}`{}", self.name, self.arity)
        }
    }

    /// Namespace-qualified metadata name, e.g. ``Shapes.Test`1``
    pub fn metadata_name(&self) -> String {
        match &self.namespace {
            Some(namespace) if !namespace.is_empty() => {
                format!("{namespace}.{}", self.short_metadata_name())
            }
            _ => self.short_metadata_name(),
        }
    }

    /// Base type first, then interfaces in declaration order
    pub fn parent_candidates(&self) -> impl Iterator<Item = &TypeRef> {
        self.base_type.iter().chain(self.interfaces.iter())
    }

    pub fn matches(&self, reference: &TypeRef) -> bool {
        self.name == reference.name && self.arity == reference.arity
    }

    fn same_type(&self, other: &TypeDescriptor) -> bool {
        self.name == other.name && self.arity == other.arity
    }
}

/// Source of type descriptors
pub trait SymbolProvider: Send + Sync {
    /// Look up a type by metadata name (``Name`n`` for generics)
    fn lookup(&self, name: &str) -> Option<TypeDescriptor>;
}

/// In-memory, insertion-ordered descriptor catalog
#[derive(Debug, Clone, Default)]
pub struct DescriptorCatalog {
    types: IndexMap<String, TypeDescriptor>,
}

impl DescriptorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON array of descriptors
    pub fn from_json_str(json: &str) -> Result<Self, DiagramError> {
        let descriptors: Vec<TypeDescriptor> = serde_json::from_str(json)?;
        Self::from_descriptors(descriptors)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, DiagramError> {
        let descriptors: Vec<TypeDescriptor> = serde_json::from_reader(reader)?;
        Self::from_descriptors(descriptors)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DiagramError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading descriptor catalog");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Result<Self, DiagramError> {
        let mut catalog = Self::new();
        for descriptor in descriptors {
            catalog.insert(descriptor)?;
        }
        Ok(catalog)
    }

    /// Add a descriptor, replacing any with the same metadata name
    pub fn insert(&mut self, descriptor: TypeDescriptor) -> Result<(), DiagramError> {
        if descriptor.name.trim().is_empty() {
            return Err(DiagramError::descriptor_error(
                "descriptor name must not be empty".to_string(),
            ));
        }
        self.types.insert(descriptor.metadata_name(), descriptor);
        Ok(())
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl SymbolProvider for DescriptorCatalog {
    fn lookup(&self, name: &str) -> Option<TypeDescriptor> {
        let key = metadata_form(name.trim());
        self.types
            .get(&key)
            .or_else(|| {
                self.types
                    .values()
                    .find(|descriptor| descriptor.short_metadata_name() == key)
            })
            .cloned()
    }
}

/// Rewrite `Foo<A, B>` requests to ``Foo`2`` and drop duplicates
pub fn normalize_requested_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let normalized: IndexSet<String> = names
        .iter()
        .map(|name| name.as_ref().trim())
        .filter(|name| !name.is_empty())
        .map(metadata_form)
        .collect();
    normalized.into_iter().collect()
}

fn metadata_form(name: &str) -> String {
    match (name.find('<'), name.rfind('>')) {
        (Some(open), Some(close)) if open < close => {
            // Only commas between the outermost brackets separate parameters
            let mut depth = 0usize;
            let mut arity = 1;
            for c in name[open + 1..close].chars() {
                match c {
                    '<' => depth += 1,
                    '>' => depth = depth.saturating_sub(1),
                    ',' if depth == 0 => arity += 1,
                    _ => {}
                }
            }
            format!("{}`{}", &name[..open], arity)
        }
        _ => name.to_string(),
    }
}

/// Look up each requested name, keeping request order
pub fn resolve_requests<S: AsRef<str>>(
    names: &[S],
    provider: &dyn SymbolProvider,
) -> Vec<(String, Option<TypeDescriptor>)> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref().to_string();
            let descriptor = provider.lookup(&name);
            (name, descriptor)
        })
        .collect()
}

/// Display name of a type: `Name`, `Name<T, U>`, or `Name2<T, U>` when the
/// bare name is shared with other found types
pub fn display_name(name: &str, arity: usize, disambiguate: bool) -> String {
    if arity == 0 {
        return name.to_string();
    }
    let parameters: Vec<String> = (0..arity).map(type_parameter).collect();
    let suffix = if disambiguate {
        arity.to_string()
    } else {
        String::new()
    };
    format!("{name}{suffix}<{}>", parameters.join(", "))
}

fn type_parameter(index: usize) -> String {
    const LETTERS: [char; 7] = ['T', 'U', 'V', 'W', 'X', 'Y', 'Z'];
    match LETTERS.get(index) {
        Some(letter) => letter.to_string(),
        None => format!("T{index}"),
    }
}

/// Turns looked-up descriptors into a class model
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelAdapter {
    filter: MemberFilter,
}

impl ModelAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: MemberFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> MemberFilter {
        self.filter
    }

    /// Build a model from `(requested name, descriptor)` pairs
    ///
    /// Missing descriptors never abort the build: their requested names end
    /// up in a single trailing `"... not found"` note.
    pub fn adapt(&self, requests: &[(String, Option<TypeDescriptor>)]) -> ClassModel {
        let adapt_span = span!(Level::DEBUG, "adapt_descriptors", requests = requests.len());
        let _enter = adapt_span.enter();

        let mut found: Vec<&TypeDescriptor> = Vec::new();
        let mut unresolved: Vec<&str> = Vec::new();
        for (requested, descriptor) in requests {
            match descriptor {
                Some(descriptor) if found.iter().any(|f| f.same_type(descriptor)) => {
                    debug!(requested = %requested, "skipping duplicate descriptor");
                }
                Some(descriptor) => found.push(descriptor),
                None => {
                    let err = DiagramError::unresolved_name(requested.as_str());
                    warn!(error = %err, "type descriptor not found");
                    unresolved.push(requested);
                }
            }
        }

        let mut family_sizes: IndexMap<&str, usize> = IndexMap::new();
        for descriptor in &found {
            *family_sizes.entry(descriptor.name.as_str()).or_default() += 1;
        }

        let mut model = ClassModel::new();
        for descriptor in &found {
            let mut class = Class::new(class_name(descriptor, &family_sizes));
            class
                .members
                .extend(descriptor.members.iter().filter_map(|m| self.convert_member(m)));
            model.add_class(class);
        }

        for descriptor in &found {
            let child = class_name(descriptor, &family_sizes);
            for candidate in descriptor.parent_candidates() {
                let Some(parent) = found.iter().find(|p| p.matches(candidate)) else {
                    trace!(child = %child, parent = %candidate.name, "parent not among found types");
                    continue;
                };
                if parent.same_type(descriptor) {
                    continue;
                }
                let kind = if parent.is_abstract {
                    RelationKind::Implements
                } else {
                    RelationKind::Inherits
                };
                model.add_relation(RelationEdge::new(
                    child.clone(),
                    class_name(parent, &family_sizes),
                    kind,
                ));
            }
        }

        if !unresolved.is_empty() {
            model.add_note(Note::new(format!("{} not found", unresolved.join(", "))));
        }

        debug!(
            classes = model.class_count(),
            relations = model.relation_count(),
            unresolved = unresolved.len(),
            "adapted descriptors"
        );
        model
    }

    /// Look up `names` through `provider` and adapt the results
    pub fn adapt_names<S: AsRef<str>>(
        &self,
        names: &[S],
        provider: &dyn SymbolProvider,
    ) -> ClassModel {
        let names = normalize_requested_names(names);
        self.adapt(&resolve_requests(&names, provider))
    }

    fn convert_member(&self, member: &DescriptorMember) -> Option<Member> {
        let floor = match member.kind {
            MemberKind::Method => self.filter.methods,
            MemberKind::Field => self.filter.fields,
            MemberKind::Property => self.filter.properties,
        };
        if !member.accessibility.at_least(floor) {
            trace!(member = %member.name, accessibility = %member.accessibility, "filtered out");
            return None;
        }

        let converted = match member.kind {
            MemberKind::Method => Member::Method(
                Method::new(&member.name)
                    .with_return_type(return_type(&member.type_name))
                    .with_arguments(
                        member
                            .parameters
                            .iter()
                            .map(parameter_text)
                            .collect::<Vec<_>>()
                            .join(", "),
                    )
                    .with_visibility(member.accessibility)
                    .with_static(member.is_static)
                    .with_abstract(member.is_abstract),
            ),
            MemberKind::Field | MemberKind::Property => Member::Field(
                Field::new(&member.name)
                    .with_type(&member.type_name)
                    .with_visibility(member.accessibility)
                    .with_static(member.is_static),
            ),
        };
        Some(converted)
    }
}

fn class_name(descriptor: &TypeDescriptor, family_sizes: &IndexMap<&str, usize>) -> String {
    let shared = family_sizes
        .get(descriptor.name.as_str())
        .is_some_and(|&size| size > 1);
    display_name(&descriptor.name, descriptor.arity, shared)
}

fn return_type(type_name: &str) -> &str {
    match type_name {
        "void" | "Void" | "System.Void" => "",
        other => other,
    }
}

fn parameter_text(parameter: &Parameter) -> String {
    match (parameter.type_name.is_empty(), parameter.name.is_empty()) {
        (true, _) => parameter.name.clone(),
        (false, true) => parameter.type_name.clone(),
        (false, false) => format!("{} {}", parameter.type_name, parameter.name),
    }
}
