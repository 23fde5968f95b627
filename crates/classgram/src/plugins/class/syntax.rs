//! Parse tree for the class diagram notation
//!
//! Produced by the grammar and consumed by the model builder. Every member
//! statement names the class it belongs to, whether it was written inside a
//! class block or as an inline `Name : member` line.

use crate::core::RelationKind;

use super::database::{Member, RelationEdge};

/// A parsed diagram: the statements following the header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `class Name` with an optional `{ ... }` body
    Class(ClassDecl),
    /// `<<annotation>> Name`
    Annotation(AnnotationStatement),
    /// `Name : member`
    Member(MemberStatement),
    /// `A <|-- B ..|> C : label`
    Relation(RelationChain),
    /// `note "text"` or `note for Name "text"`
    Note(NoteStatement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub annotations: Vec<String>,
    pub members: Vec<MemberStatement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStatement {
    pub class_name: String,
    pub annotation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberStatement {
    /// Owning class
    pub class_name: String,
    pub member: Member,
}

/// Relation operators in the notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationOp {
    /// `<|--`, child on the right
    InheritsLeft,
    /// `--|>`, child on the left
    InheritsRight,
    /// `..|>`, child on the left
    RealizesRight,
    /// `<|..`, child on the right
    RealizesLeft,
}

impl RelationOp {
    pub fn kind(self) -> RelationKind {
        match self {
            RelationOp::InheritsLeft | RelationOp::InheritsRight => RelationKind::Inherits,
            RelationOp::RealizesRight | RelationOp::RealizesLeft => RelationKind::Implements,
        }
    }

    /// Whether the child is the operand on the right of the operator
    pub fn child_on_right(self) -> bool {
        matches!(self, RelationOp::InheritsLeft | RelationOp::RealizesLeft)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            RelationOp::InheritsLeft => "<|--",
            RelationOp::InheritsRight => "--|>",
            RelationOp::RealizesRight => "..|>",
            RelationOp::RealizesLeft => "<|..",
        }
    }

    /// Edge for `left <op> right`
    pub fn edge(self, left: &str, right: &str) -> RelationEdge {
        if self.child_on_right() {
            RelationEdge::new(right, left, self.kind())
        } else {
            RelationEdge::new(left, right, self.kind())
        }
    }
}

/// `head op1 c1 op2 c2 ...`, with an optional trailing label
#[derive(Debug, Clone, PartialEq)]
pub struct RelationChain {
    pub head: String,
    pub links: Vec<(RelationOp, String)>,
    pub label: Option<String>,
}

impl RelationChain {
    /// Every class name in the chain, in written order
    pub fn operands(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.head.as_str()).chain(self.links.iter().map(|(_, name)| name.as_str()))
    }

    /// One edge per adjacent operand pair
    pub fn edges(&self) -> Vec<RelationEdge> {
        let mut left = self.head.as_str();
        let mut edges = Vec::with_capacity(self.links.len());
        for (op, right) in &self.links {
            edges.push(op.edge(left, right));
            left = right;
        }
        edges
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteStatement {
    pub target: Option<String>,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(head: &str, links: &[(RelationOp, &str)]) -> RelationChain {
        RelationChain {
            head: head.to_string(),
            links: links
                .iter()
                .map(|(op, name)| (*op, name.to_string()))
                .collect(),
            label: None,
        }
    }

    #[test]
    fn test_operator_orientation() {
        assert_eq!(
            RelationOp::InheritsLeft.edge("A", "B"),
            RelationEdge::new("B", "A", RelationKind::Inherits)
        );
        assert_eq!(
            RelationOp::InheritsRight.edge("A", "B"),
            RelationEdge::new("A", "B", RelationKind::Inherits)
        );
        assert_eq!(
            RelationOp::RealizesRight.edge("A", "B"),
            RelationEdge::new("A", "B", RelationKind::Implements)
        );
        assert_eq!(
            RelationOp::RealizesLeft.edge("A", "B"),
            RelationEdge::new("B", "A", RelationKind::Implements)
        );
    }

    #[test]
    fn test_chain_decomposes_pairwise() {
        let chain = chain(
            "A",
            &[
                (RelationOp::InheritsLeft, "B"),
                (RelationOp::RealizesRight, "C"),
            ],
        );
        assert_eq!(
            chain.edges(),
            vec![
                RelationEdge::new("B", "A", RelationKind::Inherits),
                RelationEdge::new("B", "C", RelationKind::Implements),
            ]
        );
        assert_eq!(chain.operands().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_symbols() {
        assert_eq!(RelationOp::InheritsLeft.symbol(), "<|--");
        assert_eq!(RelationOp::RealizesRight.symbol(), "..|>");
    }
}
