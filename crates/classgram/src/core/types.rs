//! Core type definitions shared by the notation and descriptor pipelines
//!
//! Member visibility and relation kinds live here because the parser, the
//! model, both renderers and the descriptor adapter all speak them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Visibility (accessibility) of a class member
///
/// Ordered from least to most visible so that accessibility floors can be
/// compared directly: `Private < Protected < Internal < Public`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// `-`
    Private,
    /// `#`
    Protected,
    /// `~`
    #[serde(alias = "package")]
    Internal,
    /// `+`, the default when no marker is written
    #[default]
    Public,
}

impl Visibility {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Visibility::Public),
            '-' => Some(Visibility::Private),
            '#' => Some(Visibility::Protected),
            '~' => Some(Visibility::Internal),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Visibility::Public => '+',
            Visibility::Private => '-',
            Visibility::Protected => '#',
            Visibility::Internal => '~',
        }
    }

    /// Keyword used by the source renderer
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Protected => "protected",
            Visibility::Internal => "internal",
        }
    }

    /// Whether a member with this visibility passes the given floor
    pub fn at_least(self, floor: Visibility) -> bool {
        self >= floor
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Kind of a hierarchy edge between two classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// Child extends parent, `Parent <|-- Child`
    Inherits,
    /// Child realizes parent, `Child ..|> Parent`
    Implements,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::Inherits => write!(f, "inherits"),
            RelationKind::Implements => write!(f, "implements"),
        }
    }
}
