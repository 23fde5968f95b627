//! Tests for the public library surface

use classgram::plugins::class::{ClassParser, DiagramRenderer, SourceRenderer};
use classgram::prelude::*;

#[test]
fn test_prelude_pipeline() {
    let parser = ClassParser::new();
    let mut model = ClassModel::new();
    parser
        .parse("classDiagram\n    Animal <|-- Dog\n    Dog : +Bark()", &mut model)
        .unwrap();
    parser
        .parse("classDiagram\n    Animal <|-- Cat", &mut model)
        .unwrap();

    assert_eq!(model.node_count(), 3);
    assert_eq!(model.edge_count(), 2);
    assert_eq!(parser.name(), "class");

    let source = SourceRenderer::new().render(&model).unwrap();
    assert!(source.contains("public class Dog : Animal"));
    assert!(source.contains("public class Cat : Animal"));

    let renderer = DiagramRenderer::new();
    assert_eq!(renderer.format(), "mermaid");
    assert!(renderer.render(&model).unwrap().contains("Dog : +Bark()"));
}

#[test]
fn test_database_trait_on_model() {
    let mut model = ClassModel::new();
    model.add_node(Class::new("A")).unwrap();
    model
        .add_edge(classgram::plugins::class::RelationEdge::new(
            "B",
            "A",
            RelationKind::Inherits,
        ))
        .unwrap();

    assert!(model.get_node("B").is_some());
    assert_eq!(model.nodes().count(), 2);
    assert_eq!(model.edges().count(), 1);

    model.clear();
    assert_eq!(model.node_count(), 0);
}

#[test]
fn test_source_config_surface() {
    let source = classgram::to_source_with_config(
        "classDiagram\n    Cfg : -count",
        SourceConfig::new()
            .with_indent_width(1)
            .with_placeholder_type("var"),
    )
    .unwrap();
    assert!(source.contains("\n private var count { get; set; }\n"));
}

#[test]
fn test_parse_errors_downcast() {
    let err = classgram::parse("classDiagram\nclass X {").unwrap_err();
    let diagram_error = err.downcast_ref::<DiagramError>().unwrap();
    assert!(diagram_error.offset().is_some());
}

#[test]
fn test_visibility_surface() {
    assert_eq!(Visibility::from_char('#'), Some(Visibility::Protected));
    assert_eq!(Visibility::Internal.keyword(), "internal");
    assert!(Visibility::Public.at_least(Visibility::Private));
    assert!(!Visibility::Private.at_least(Visibility::Internal));
}
