//! Class diagram plugin
//!
//! Notation in: lexer, grammar and model builder. Model out: skeletal source
//! and notation. Descriptors in: the model adapter.

mod builder;
mod database;
mod descriptor;
mod diagram;
mod grammar;
mod lexer;
mod parser;
mod source;
mod syntax;
mod token;

pub use builder::ModelBuilder;
pub use database::{Class, ClassModel, Field, Member, Method, Note, RelationEdge};
pub use descriptor::{
    display_name, normalize_requested_names, resolve_requests, DescriptorCatalog,
    DescriptorMember, MemberKind, ModelAdapter, Parameter, SymbolProvider, TypeDescriptor,
    TypeRef,
};
pub use diagram::{member_notation, DiagramRenderer};
pub use grammar::{parse_tokens, Lexeme};
pub use lexer::{tokenize, Lexer};
pub use parser::ClassParser;
pub use source::SourceRenderer;
pub use syntax::{
    AnnotationStatement, ClassDecl, Diagram, MemberStatement, NoteStatement, RelationChain,
    RelationOp, Statement,
};
pub use token::{Matcher, Token, TokenCatalog, TokenMatcher, TokenPosition};
