use std::collections::HashMap;
use std::sync::Arc;

use engine::render::primitive::{Axis, Primitive};
use engine::{
    DocumentEngine, EngineServices, NodeRegistry, PropValue, RenderedNode, StaticTheme,
};

fn engine_for(doc: &str) -> DocumentEngine {
    DocumentEngine::from_json(doc, NodeRegistry::with_builtins(), EngineServices::default())
        .expect("Failed to build engine")
}

fn items_binding() -> HashMap<String, PropValue> {
    [(
        "items".to_string(),
        PropValue::Array(vec![
            PropValue::object([("name".to_string(), PropValue::from("A"))]),
            PropValue::object([("name".to_string(), PropValue::from("B"))]),
        ]),
    )]
    .into_iter()
    .collect()
}

fn text_content(node: &RenderedNode) -> String {
    match &node.primitive {
        Primitive::Text { content, .. } => content.clone(),
        other => panic!("Expected text primitive, got {:?}", other),
    }
}

#[test]
fn list_renders_template_per_item_with_distinct_scopes() {
    let engine = engine_for(
        r#"{
            "type": "list",
            "props": { "dataSource": "$.items" },
            "children": {
                "template": [
                    {
                        "type": "container",
                        "children": {
                            "children": [
                                { "type": "text", "props": { "text": "$.currentItem.name" } },
                                {
                                    "type": "button",
                                    "props": {
                                        "label": "$.currentItem.name",
                                        "onTap": [
                                            { "type": "setState", "key": "selected", "value": "$.currentItem.name" }
                                        ]
                                    }
                                }
                            ]
                        }
                    }
                ]
            }
        }"#,
    );

    let rendered = engine.render_with(items_binding());
    assert_eq!(rendered.children.len(), 2, "One template instance per item");

    let names: Vec<String> = rendered
        .children
        .iter()
        .map(|row| text_content(&row.children[0]))
        .collect();
    assert_eq!(names, vec!["A", "B"]);

    // Each item subtree captured its own chained scope.
    for (index, row) in rendered.children.iter().enumerate() {
        let button = &row.children[1];
        assert_eq!(button.events.len(), 1);
        let scope = &button.events[0].scope;
        assert_eq!(
            scope.lookup("index"),
            Some(&PropValue::Integer(index as i64))
        );
        let item = scope.lookup("currentItem").expect("currentItem bound");
        assert_eq!(
            item.field("name"),
            Some(&PropValue::from(if index == 0 { "A" } else { "B" }))
        );
    }
}

#[test]
fn re_render_with_identical_scope_content_is_idempotent() {
    let engine = engine_for(
        r#"{
            "type": "container",
            "props": { "axis": "horizontal", "spacing": 4 },
            "children": {
                "children": [
                    { "type": "text", "props": { "text": "$.state.title" } },
                    {
                        "type": "list",
                        "props": { "dataSource": "$.items" },
                        "children": {
                            "template": [
                                { "type": "text", "props": { "text": "$.currentItem.name" } }
                            ]
                        }
                    }
                ]
            }
        }"#,
    );
    engine.state().write("title", PropValue::from("Home"));

    let first = engine.render_with(items_binding());
    let second = engine.render_with(items_binding());
    assert_eq!(first, second, "Hidden mutable node state leaked between passes");
}

#[test]
fn unknown_node_type_degrades_to_placeholder() {
    let engine = engine_for(
        r#"{
            "type": "container",
            "children": {
                "children": [
                    { "type": "hologram", "refName": "future" },
                    { "type": "text", "props": { "text": "still here" } }
                ]
            }
        }"#,
    );

    let rendered = engine.render();
    assert_eq!(rendered.children.len(), 2);
    assert_eq!(rendered.children[0].primitive, Primitive::Empty);
    assert_eq!(rendered.children[0].ref_name.as_deref(), Some("future"));
    assert_eq!(text_content(&rendered.children[1]), "still here");
}

#[test]
fn conditional_follows_state() {
    let engine = engine_for(
        r#"{
            "type": "conditional",
            "props": { "condition": "$.state.loggedIn" },
            "children": {
                "then": [ { "type": "text", "props": { "text": "Welcome" } } ],
                "else": [ { "type": "text", "props": { "text": "Sign in" } } ]
            }
        }"#,
    );

    assert_eq!(text_content(&engine.render().children[0]), "Sign in");

    engine.state().write("loggedIn", PropValue::Bool(true));
    assert_eq!(text_content(&engine.render().children[0]), "Welcome");
}

#[test]
fn hidden_node_renders_empty_without_children() {
    let engine = engine_for(
        r#"{
            "type": "container",
            "commonProps": { "visible": "$.state.shown" },
            "children": {
                "children": [ { "type": "text", "props": { "text": "secret" } } ]
            }
        }"#,
    );

    // Unresolved visibility keeps the widget default (shown).
    assert_eq!(engine.render().children.len(), 1);

    engine.state().write("shown", PropValue::Bool(false));
    let rendered = engine.render();
    assert_eq!(rendered.primitive, Primitive::Empty);
    assert!(rendered.children.is_empty());
    assert!(!rendered.common.visible);

    engine.state().write("shown", PropValue::Bool(true));
    let rendered = engine.render();
    assert_eq!(rendered.children.len(), 1);
    assert!(rendered.common.visible);
}

#[test]
fn theme_tokens_resolve_through_style_resolvers() {
    let mut services = EngineServices::default();
    services.theme = Arc::new(StaticTheme::new(
        [("accent".to_string(), "#ff5500".to_string())]
            .into_iter()
            .collect(),
    ));
    let engine = DocumentEngine::from_json(
        r#"{ "type": "text", "props": { "text": "hi", "color": "accent" } }"#,
        NodeRegistry::with_builtins(),
        services,
    )
    .unwrap();

    match engine.render().primitive {
        Primitive::Text { color, .. } => assert_eq!(color.as_deref(), Some("#ff5500")),
        other => panic!("Expected text, got {:?}", other),
    }
}

#[test]
fn carousel_pages_see_their_page_index() {
    let engine = engine_for(
        r#"{
            "type": "carousel",
            "props": { "page": 1 },
            "children": {
                "pages": [
                    {
                        "type": "button",
                        "props": {
                            "label": "first",
                            "onTap": [ { "type": "setState", "key": "page", "value": "$.pageIndex" } ]
                        }
                    },
                    {
                        "type": "button",
                        "props": {
                            "label": "second",
                            "onTap": [ { "type": "setState", "key": "page", "value": "$.pageIndex" } ]
                        }
                    }
                ]
            }
        }"#,
    );

    let rendered = engine.render();
    assert_eq!(rendered.primitive, Primitive::Pager { page: 1 });
    for (index, page) in rendered.children.iter().enumerate() {
        assert_eq!(
            page.events[0].scope.lookup("pageIndex"),
            Some(&PropValue::Integer(index as i64))
        );
    }
}

#[test]
fn wrong_typed_expression_falls_back_to_widget_default() {
    let engine = engine_for(
        r#"{
            "type": "text",
            "props": { "text": "label", "size": "$.state.title" }
        }"#,
    );
    engine.state().write("title", PropValue::from("not a size"));

    match engine.render().primitive {
        Primitive::Text { size, content, .. } => {
            assert_eq!(size, None, "Mismatched type must degrade to absent");
            assert_eq!(content, "label");
        }
        other => panic!("Expected text, got {:?}", other),
    }
}

#[test]
fn container_axis_and_spacing_resolve() {
    let engine = engine_for(
        r#"{
            "type": "container",
            "props": { "axis": "horizontal", "spacing": "$.state.gap" },
            "children": { "children": [] }
        }"#,
    );
    engine.state().write("gap", PropValue::from(12.0));

    match engine.render().primitive {
        Primitive::Container { axis, spacing } => {
            assert_eq!(axis, Axis::Horizontal);
            assert!((spacing - 12.0).abs() < f64::EPSILON);
        }
        other => panic!("Expected container, got {:?}", other),
    }
}
