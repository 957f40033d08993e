use molic::graph::Position;
use molic::{SavedLayout, compile, compile_with_layout};
use pretty_assertions::assert_eq;

const SRC: &str = "scene A { u: \"one\" -> B\n u: \"two\" -> B }\nscene B {}";

#[test]
fn spec_capture_then_restore_is_stable() {
    let first = compile(SRC).unwrap();
    let json = SavedLayout::capture(&first).to_json().unwrap();
    let saved = SavedLayout::from_json(&json).unwrap();
    let second = compile_with_layout(SRC, Some(&saved)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn spec_schema_field_names() {
    let graph = compile(SRC).unwrap();
    let value = serde_json::to_value(SavedLayout::capture(&graph)).unwrap();
    assert_eq!(value["nodes"][0]["id"], "A");
    assert_eq!(value["nodes"][0]["position"]["x"], 50.0);
    assert_eq!(value["edges"][0]["id"], "e_A_B_one_0");
    assert_eq!(value["edges"][0]["sourceHandle"], "b-3");
    assert_eq!(value["edges"][0]["targetHandle"], "t-3");
}

#[test]
fn spec_positions_applied_after_transform() {
    let saved = SavedLayout::from_json(
        r#"{"nodes":[{"id":"B","position":{"x":10,"y":20}},{"id":"Gone","position":{"x":0,"y":0}}]}"#,
    )
    .unwrap();
    let graph = compile_with_layout(SRC, Some(&saved)).unwrap();
    assert_eq!(graph.node("A").unwrap().position, Position { x: 50.0, y: 50.0 });
    assert_eq!(graph.node("B").unwrap().position, Position { x: 10.0, y: 20.0 });
}

#[test]
fn spec_swapped_handles_are_kept() {
    let saved = SavedLayout::from_json(
        r#"{"edges":[
            {"id":"e_A_B_one_0","sourceHandle":"b-2","targetHandle":"t-2"},
            {"id":"e_A_B_two_0","sourceHandle":"b-3","targetHandle":"t-3"}
        ]}"#,
    )
    .unwrap();
    let graph = compile_with_layout(SRC, Some(&saved)).unwrap();
    let handles: Vec<(&str, &str)> = graph
        .edges
        .iter()
        .map(|e| (e.source_handle.as_str(), e.target_handle.as_str()))
        .collect();
    assert_eq!(handles, vec![("b-2", "t-2"), ("b-3", "t-3")]);
}

#[test]
fn spec_half_saved_edge_only_overrides_known_side() {
    let saved = SavedLayout::from_json(
        r#"{"edges":[{"id":"e_A_B_one_0","sourceHandle":"r-3","targetHandle":null}]}"#,
    )
    .unwrap();
    assert!(saved.saved_handles().is_empty());
    let graph = compile_with_layout(SRC, Some(&saved)).unwrap();
    let edge = graph.edge("e_A_B_one_0").unwrap();
    assert_eq!(edge.source_handle, "r-3");
    assert_eq!(edge.target_handle, "t-3");
}

#[test]
fn spec_half_saved_anchor_is_not_shared() {
    let saved = SavedLayout::from_json(
        r#"{"edges":[{"id":"e_A_B_two_0","sourceHandle":"b-3","targetHandle":null}]}"#,
    )
    .unwrap();
    let graph = compile_with_layout(SRC, Some(&saved)).unwrap();
    let one = graph.edge("e_A_B_one_0").unwrap();
    let two = graph.edge("e_A_B_two_0").unwrap();
    assert_eq!(two.source_handle, "b-3");
    assert_eq!(one.source_handle, "b-2");
    assert_ne!(one.target_handle, two.target_handle);
}

#[test]
fn spec_malformed_layout_means_no_layout() {
    let saved = SavedLayout::load_or_default("{\"nodes\": [");
    assert_eq!(saved, SavedLayout::default());
    assert_eq!(
        compile_with_layout(SRC, Some(&saved)).unwrap(),
        compile(SRC).unwrap()
    );
}
