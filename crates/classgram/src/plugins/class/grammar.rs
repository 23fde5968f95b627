//! Chumsky grammar over lexed class diagram tokens
//!
//! Whitespace and comments are dropped before parsing; newlines separate
//! statements and class body items.
//!
//! ```text
//! diagram     := NEWLINE* "classDiagram" (NEWLINE+ statement)* NEWLINE* EOF
//! statement   := class_decl | annotation type_name | relation | type_name ":" member | note
//! class_decl  := "class" type_name ("{" NEWLINE* (body_item NEWLINE*)* "}")?
//! body_item   := annotation | member
//! annotation  := "<<" WORD ">" ">"
//! relation    := type_name (rel_op type_name)+ (":" label)?
//! member      := visibility? (method | field)
//! method      := NAME "(" (argument ("," argument)*)? ")" "*"? (":"? type_name)? ("*" | "$")*
//! argument    := (type_name | KEYWORD)+
//! field       := type_name NAME "$"? | NAME ":" type_name "$"? | NAME "$"?
//! note        := "note" ("for" type_name)? QUOTED
//! type_name   := WORD ("<" type_name ("," type_name)* ">" | "~" type_name ("," type_name)* "~")? suffix*
//! suffix      := "[" ","* "]" | "?"
//! NAME        := WORD | KEYWORD
//! ```

use std::fmt;

use chumsky::input::ValueInput;
use chumsky::prelude::*;
use tracing::debug;

use crate::core::{DiagramError, Visibility};

use super::database::{Field, Member, Method};
use super::syntax::{
    AnnotationStatement, ClassDecl, Diagram, MemberStatement, NoteStatement, RelationChain,
    RelationOp, Statement,
};
use super::token::{Token, TokenPosition};

/// A significant token together with the text it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'src> {
    pub token: Token,
    pub text: &'src str,
    /// Byte offset into the source
    pub offset: usize,
}

impl<'src> Lexeme<'src> {
    pub fn new(token: Token, text: &'src str, offset: usize) -> Self {
        Self {
            token,
            text,
            offset,
        }
    }

    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

impl fmt::Display for Lexeme<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token {
            Token::Word | Token::RawText | Token::QuotedString => {
                write!(f, "{} '{}'", self.token, self.text)
            }
            _ => write!(f, "{}", self.token),
        }
    }
}

type Extra<'tokens, 'src> = extra::Err<Rich<'tokens, Lexeme<'src>>>;

enum BodyItem {
    Annotation(String),
    Member(Member),
}

/// Parse lexed positions of `source` into a parse tree
pub fn parse_tokens(source: &str, positions: &[TokenPosition]) -> Result<Diagram, DiagramError> {
    let lexemes: Vec<Lexeme<'_>> = positions
        .iter()
        .filter(|pos| !pos.token.is_trivia())
        .map(|pos| Lexeme::new(pos.token, pos.text(source), pos.offset))
        .collect();
    debug!(lexemes = lexemes.len(), "parsing class diagram");

    let result = diagram_parser(source)
        .parse(lexemes.as_slice())
        .into_result()
        .map_err(|errors| first_error(source, &lexemes, errors));
    result
}

fn first_error(source: &str, lexemes: &[Lexeme<'_>], errors: Vec<Rich<'_, Lexeme<'_>>>) -> DiagramError {
    let Some(error) = errors.into_iter().next() else {
        return DiagramError::parse_error_at("invalid class diagram".to_string(), source, 0);
    };

    let offset = lexemes
        .get(error.span().start)
        .map(|lexeme| lexeme.offset)
        .unwrap_or(source.len());
    let message = match error.found() {
        Some(lexeme) if lexeme.token == Token::RawText => {
            format!("unrecognized text '{}'", lexeme.text)
        }
        Some(lexeme) => format!("unexpected {lexeme}"),
        None => "unexpected end of input".to_string(),
    };
    DiagramError::parse_error_at(message, source, offset)
}

fn token<'tokens, 'src: 'tokens, I>(
    kind: Token,
) -> impl Parser<'tokens, I, Lexeme<'src>, Extra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Token = Lexeme<'src>, Span = SimpleSpan>,
{
    any().filter(move |lexeme: &Lexeme<'src>| lexeme.token == kind)
}

fn flag<'tokens, 'src: 'tokens, I>(kind: Token) -> impl Parser<'tokens, I, bool, Extra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Token = Lexeme<'src>, Span = SimpleSpan>,
{
    token(kind).or_not().map(|found| found.is_some())
}

fn diagram_parser<'tokens, 'src: 'tokens, I>(
    source: &'src str,
) -> impl Parser<'tokens, I, Diagram, Extra<'tokens, 'src>>
where
    I: ValueInput<'tokens, Token = Lexeme<'src>, Span = SimpleSpan>,
{
    let newline = token(Token::Newline);
    let blank = newline.clone().repeated();
    let word = token(Token::Word).map(|lexeme: Lexeme<'src>| lexeme.text.to_string());
    // Keywords are plain names in member position
    let keyword = choice((
        token(Token::ClassDiagram),
        token(Token::Class),
        token(Token::Note),
        token(Token::For),
    ))
    .map(|lexeme: Lexeme<'src>| lexeme.text.to_string());
    let name = word.clone().or(keyword.clone());

    let type_name = recursive(|type_name| {
        let angle = type_name
            .clone()
            .separated_by(token(Token::Comma))
            .at_least(1)
            .collect::<Vec<String>>()
            .delimited_by(token(Token::OpenAngle), token(Token::CloseAngle))
            .map(|args| format!("<{}>", args.join(", ")));
        let tilde = type_name
            .separated_by(token(Token::Comma))
            .at_least(1)
            .collect::<Vec<String>>()
            .delimited_by(token(Token::Tilde), token(Token::Tilde))
            .map(|args| format!("~{}~", args.join(", ")));

        let array = token(Token::OpenBracket)
            .ignore_then(token(Token::Comma).repeated().collect::<Vec<_>>())
            .then_ignore(token(Token::CloseBracket))
            .map(|commas| format!("[{}]", ",".repeat(commas.len())));
        let nullable = token(Token::Question).to("?".to_string());

        word.clone()
            .then(angle.or(tilde).or_not())
            .then(array.or(nullable).repeated().collect::<Vec<String>>())
            .map(
                |((name, generics), suffixes): ((String, Option<String>), Vec<String>)| {
                    let mut full = name;
                    if let Some(generics) = generics {
                        full.push_str(&generics);
                    }
                    full.extend(suffixes);
                    full
                },
            )
    });

    let visibility = choice((
        token(Token::Plus).to(Visibility::Public),
        token(Token::Minus).to(Visibility::Private),
        token(Token::Hash).to(Visibility::Protected),
        token(Token::Tilde).to(Visibility::Internal),
    ))
    .or_not()
    .map(|visibility: Option<Visibility>| visibility.unwrap_or_default());

    let argument = type_name
        .clone()
        .or(keyword)
        .repeated()
        .at_least(1)
        .collect::<Vec<String>>()
        .map(|parts| parts.join(" "));
    let arguments = argument
        .separated_by(token(Token::Comma))
        .collect::<Vec<String>>()
        .delimited_by(token(Token::OpenParen), token(Token::CloseParen))
        .map(|arguments| arguments.join(", "));
    let return_type = token(Token::Colon)
        .or_not()
        .ignore_then(type_name.clone())
        .or_not();
    let classifiers = token(Token::Asterisk)
        .or(token(Token::Dollar))
        .map(|lexeme: Lexeme<'src>| lexeme.token)
        .repeated()
        .collect::<Vec<Token>>();

    let method = name
        .clone()
        .then(arguments)
        .then(flag(Token::Asterisk))
        .then(return_type)
        .then(classifiers)
        .map(
            |((((name, arguments), abstract_marker), return_type), classifiers)| {
                Member::Method(
                    Method::new(name)
                        .with_arguments(arguments)
                        .with_return_type(return_type.unwrap_or_default())
                        .with_abstract(abstract_marker || classifiers.contains(&Token::Asterisk))
                        .with_static(classifiers.contains(&Token::Dollar)),
                )
            },
        );

    let field = choice((
        type_name
            .clone()
            .then(name.clone())
            .then(flag(Token::Dollar))
            .map(|((type_name, name), is_static)| {
                Field::new(name).with_type(type_name).with_static(is_static)
            }),
        name.clone()
            .then_ignore(token(Token::Colon))
            .then(type_name.clone())
            .then(flag(Token::Dollar))
            .map(|((name, type_name), is_static)| {
                Field::new(name).with_type(type_name).with_static(is_static)
            }),
        name.clone()
            .then(flag(Token::Dollar))
            .map(|(name, is_static)| Field::new(name).with_static(is_static)),
    ))
    .map(Member::Field);

    let member = visibility
        .then(method.or(field))
        .map(|(visibility, member)| member.with_visibility(visibility))
        .boxed();

    let annotation = word
        .clone()
        .delimited_by(
            token(Token::AnnotationStart),
            token(Token::CloseAngle).then(token(Token::CloseAngle)),
        );

    let body_item = choice((
        annotation.clone().map(BodyItem::Annotation),
        member.clone().map(BodyItem::Member),
    ));
    let body = body_item
        .then_ignore(blank.clone())
        .repeated()
        .collect::<Vec<BodyItem>>()
        .delimited_by(
            token(Token::OpenBrace).then(blank.clone()),
            token(Token::CloseBrace),
        );

    let class_decl = token(Token::Class)
        .ignore_then(type_name.clone())
        .then(body.or_not())
        .map(|(name, items)| {
            let mut decl = ClassDecl {
                name,
                annotations: Vec::new(),
                members: Vec::new(),
            };
            for item in items.unwrap_or_default() {
                match item {
                    BodyItem::Annotation(annotation) => decl.annotations.push(annotation),
                    BodyItem::Member(member) => decl.members.push(MemberStatement {
                        class_name: decl.name.clone(),
                        member,
                    }),
                }
            }
            Statement::Class(decl)
        });

    let annotation_statement = annotation
        .then(type_name.clone())
        .map(|(annotation, class_name)| {
            Statement::Annotation(AnnotationStatement {
                class_name,
                annotation,
            })
        });

    let relation_op = choice((
        token(Token::InheritsLeft).to(RelationOp::InheritsLeft),
        token(Token::InheritsRight).to(RelationOp::InheritsRight),
        token(Token::RealizesRight).to(RelationOp::RealizesRight),
        token(Token::RealizesLeft).to(RelationOp::RealizesLeft),
    ));
    let label = token(Token::Colon)
        .ignore_then(
            any()
                .filter(|lexeme: &Lexeme<'src>| lexeme.token != Token::Newline)
                .repeated()
                .at_least(1)
                .collect::<Vec<Lexeme<'src>>>(),
        )
        .map(move |lexemes| span_text(source, &lexemes));
    let relation = type_name
        .clone()
        .then(
            relation_op
                .then(type_name.clone())
                .repeated()
                .at_least(1)
                .collect::<Vec<(RelationOp, String)>>(),
        )
        .then(label.or_not())
        .map(|((head, links), label)| Statement::Relation(RelationChain { head, links, label }));

    let inline_member = type_name
        .clone()
        .then_ignore(token(Token::Colon))
        .then(member)
        .map(|(class_name, member)| Statement::Member(MemberStatement { class_name, member }));

    let quoted = token(Token::QuotedString)
        .map(|lexeme: Lexeme<'src>| lexeme.text.trim_matches('"').to_string());
    let note = token(Token::Note)
        .ignore_then(token(Token::For).ignore_then(type_name).or_not())
        .then(quoted)
        .map(|(target, text)| Statement::Note(NoteStatement { target, text }));

    let statement = choice((
        class_decl,
        annotation_statement,
        relation,
        inline_member,
        note,
    ))
    .boxed();

    blank
        .clone()
        .ignore_then(token(Token::ClassDiagram))
        .ignore_then(
            newline
                .repeated()
                .at_least(1)
                .ignore_then(statement)
                .repeated()
                .collect::<Vec<Statement>>(),
        )
        .then_ignore(blank)
        .then_ignore(end())
        .map(|statements| Diagram { statements })
}

fn span_text(source: &str, lexemes: &[Lexeme<'_>]) -> String {
    match (lexemes.first(), lexemes.last()) {
        (Some(first), Some(last)) => source[first.offset..last.end()].trim().to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::class::lexer::tokenize;

    fn parse(source: &str) -> Result<Diagram, DiagramError> {
        parse_tokens(source, &tokenize(source))
    }

    fn statements(source: &str) -> Vec<Statement> {
        parse(source).unwrap().statements
    }

    #[test]
    fn test_header_only() {
        assert!(statements("classDiagram").is_empty());
        assert!(statements("\n%% leading comment\nclassDiagram\n\n").is_empty());
    }

    #[test]
    fn test_missing_header_is_an_error() {
        let err = parse("class A").unwrap_err();
        assert!(matches!(err, DiagramError::ParseError { offset: 0, .. }));
    }

    #[test]
    fn test_relation_statement() {
        let parsed = statements("classDiagram\n    A <|-- B : extends it");
        let Statement::Relation(chain) = &parsed[0] else {
            panic!("expected relation, got {:?}", parsed[0]);
        };
        assert_eq!(chain.head, "A");
        assert_eq!(chain.links, vec![(RelationOp::InheritsLeft, "B".to_string())]);
        assert_eq!(chain.label.as_deref(), Some("extends it"));
    }

    #[test]
    fn test_relation_chain() {
        let parsed = statements("classDiagram\nA <|-- B ..|> C");
        let Statement::Relation(chain) = &parsed[0] else {
            panic!("expected relation");
        };
        assert_eq!(chain.links.len(), 2);
        assert_eq!(chain.links[1], (RelationOp::RealizesRight, "C".to_string()));
    }

    #[test]
    fn test_class_block_members_carry_owner() {
        let parsed = statements(
            "classDiagram\nclass B {\n    <<interface>>\n    -TestField\n    +int AnotherTestField\n    +TestMethod()* int\n}",
        );
        let Statement::Class(decl) = &parsed[0] else {
            panic!("expected class");
        };
        assert_eq!(decl.name, "B");
        assert_eq!(decl.annotations, vec!["interface".to_string()]);
        assert_eq!(decl.members.len(), 3);
        assert!(decl.members.iter().all(|m| m.class_name == "B"));

        assert_eq!(
            decl.members[0].member,
            Member::Field(Field::new("TestField").with_visibility(Visibility::Private))
        );
        assert_eq!(
            decl.members[1].member,
            Member::Field(Field::new("AnotherTestField").with_type("int"))
        );
        assert_eq!(
            decl.members[2].member,
            Member::Method(Method::new("TestMethod").with_return_type("int").with_abstract(true))
        );
    }

    #[test]
    fn test_empty_class_block() {
        let parsed = statements("classDiagram\nclass A {\n}\nclass B {}");
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_method_arguments_and_markers() {
        let parsed = statements("classDiagram\nA : #DoStuffA(string hi, bye) type*");
        let Statement::Member(stmt) = &parsed[0] else {
            panic!("expected member");
        };
        assert_eq!(stmt.class_name, "A");
        assert_eq!(
            stmt.member,
            Member::Method(
                Method::new("DoStuffA")
                    .with_visibility(Visibility::Protected)
                    .with_arguments("string hi, bye")
                    .with_return_type("type")
                    .with_abstract(true)
            )
        );
    }

    #[test]
    fn test_static_members() {
        let parsed = statements("classDiagram\nA : ~DoStuffB$\nA : +VoidMethod()$");
        let Statement::Member(field) = &parsed[0] else {
            panic!("expected member");
        };
        assert_eq!(
            field.member,
            Member::Field(
                Field::new("DoStuffB")
                    .with_visibility(Visibility::Internal)
                    .with_static(true)
            )
        );
        let Statement::Member(method) = &parsed[1] else {
            panic!("expected member");
        };
        assert!(method.member.is_static());
        assert!(method.member.is_method());
    }

    #[test]
    fn test_colon_typed_members() {
        let parsed = statements("classDiagram\nclass Animal {\n    +name: string\n    +eat(): void\n}");
        let Statement::Class(decl) = &parsed[0] else {
            panic!("expected class");
        };
        assert_eq!(
            decl.members[0].member,
            Member::Field(Field::new("name").with_type("string"))
        );
        assert_eq!(
            decl.members[1].member,
            Member::Method(Method::new("eat").with_return_type("void"))
        );
    }

    #[test]
    fn test_generic_names() {
        let parsed = statements("classDiagram\nclass Test2<T, U>\nTest <|-- Test1~T~\nA : +List~int~ items");
        let Statement::Class(decl) = &parsed[0] else {
            panic!("expected class");
        };
        assert_eq!(decl.name, "Test2<T, U>");
        let Statement::Relation(chain) = &parsed[1] else {
            panic!("expected relation");
        };
        assert_eq!(chain.links[0].1, "Test1~T~");
        let Statement::Member(stmt) = &parsed[2] else {
            panic!("expected member");
        };
        assert_eq!(
            stmt.member,
            Member::Field(Field::new("items").with_type("List~int~"))
        );
    }

    fn inline_member(source: &str) -> Member {
        match statements(source).remove(0) {
            Statement::Member(stmt) => stmt.member,
            other => panic!("expected member, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_generic_types() {
        assert_eq!(
            inline_member("classDiagram\nA : +Dictionary<string, List<int>> Map"),
            Member::Field(Field::new("Map").with_type("Dictionary<string, List<int>>"))
        );
        assert_eq!(
            inline_member("classDiagram\nA : +Get() Task<List<Map<K, V>>>"),
            Member::Method(Method::new("Get").with_return_type("Task<List<Map<K, V>>>"))
        );
    }

    #[test]
    fn test_array_and_nullable_types() {
        assert_eq!(
            inline_member("classDiagram\nA : +int[] Ids"),
            Member::Field(Field::new("Ids").with_type("int[]"))
        );
        assert_eq!(
            inline_member("classDiagram\nA : +string? Label"),
            Member::Field(Field::new("Label").with_type("string?"))
        );
        assert_eq!(
            inline_member("classDiagram\nA : +Find(int?[] keys, double[,] grid) List<int>?"),
            Member::Method(
                Method::new("Find")
                    .with_arguments("int?[] keys, double[,] grid")
                    .with_return_type("List<int>?")
            )
        );
    }

    #[test]
    fn test_keywords_as_member_names() {
        assert_eq!(
            inline_member("classDiagram\nA : +int note"),
            Member::Field(Field::new("note").with_type("int"))
        );
        assert_eq!(
            inline_member("classDiagram\nA : -class"),
            Member::Field(Field::new("class").with_visibility(Visibility::Private))
        );
        assert_eq!(
            inline_member("classDiagram\nA : +for(int note) bool"),
            Member::Method(
                Method::new("for")
                    .with_arguments("int note")
                    .with_return_type("bool")
            )
        );
    }

    #[test]
    fn test_multi_word_arguments() {
        assert_eq!(
            inline_member("classDiagram\nA : +Foo(ref int x, y) int"),
            Member::Method(
                Method::new("Foo")
                    .with_arguments("ref int x, y")
                    .with_return_type("int")
            )
        );
        assert_eq!(
            inline_member("classDiagram\nA : +Parse(out List<string> items, params object[] rest)"),
            Member::Method(
                Method::new("Parse").with_arguments("out List<string> items, params object[] rest")
            )
        );
    }

    #[test]
    fn test_annotation_statement() {
        let parsed = statements("classDiagram\n<<abstract>> Shape");
        assert_eq!(
            parsed[0],
            Statement::Annotation(AnnotationStatement {
                class_name: "Shape".to_string(),
                annotation: "abstract".to_string(),
            })
        );
    }

    #[test]
    fn test_notes() {
        let parsed = statements("classDiagram\nnote \"A, B not found\"\nnote for Shape \"base\"");
        assert_eq!(
            parsed[0],
            Statement::Note(NoteStatement {
                target: None,
                text: "A, B not found".to_string(),
            })
        );
        assert_eq!(
            parsed[1],
            Statement::Note(NoteStatement {
                target: Some("Shape".to_string()),
                text: "base".to_string(),
            })
        );
    }

    #[test]
    fn test_unterminated_class_block() {
        let source = "classDiagram\nclass B {\n    -x\n";
        let err = parse(source).unwrap_err();
        assert_eq!(err.offset(), Some(source.len()));
        assert!(err.to_string().contains("end of input"));
    }

    #[test]
    fn test_raw_text_is_reported() {
        let source = "classDiagram\nA @ B";
        let err = parse(source).unwrap_err();
        assert_eq!(err.offset(), Some(source.find('@').unwrap()));
        assert!(err.to_string().contains("unrecognized text '@'"));
        assert!(err.to_string().contains("line 2, column 3"));
    }

    #[test]
    fn test_unsupported_link_operator() {
        assert!(parse("classDiagram\nA --> B").is_err());
    }
}
