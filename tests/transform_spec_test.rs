use std::collections::{HashMap, HashSet};

use molic::graph::{EdgeKind, Graph, Marker, NodeType};
use molic::{Diagnostic, SavedHandles, SavedLayout, parse_molic, transform};
use pretty_assertions::assert_eq;

fn graph(src: &str) -> Graph {
    transform(&parse_molic(src).unwrap(), None)
}

const LOGIN: &str = "\
start S -> Login
main scene Login {
    topic: \"Sign in\"
    u: \"type password\"
    preferred u: \"submit\" -> Auth
    u: \"forgot password\" ..> Recover
}
process Auth \"check credentials\" {
    d: \"ok\" -> Home
    d: \"denied\" ..> Login
}
scene Recover {
    topic: \"Recover\"
    d: \"send link\" -> Mail
    when: \"cancel\" -> Login
}
external Mail
scene Home { topic: \"Home\" }
end E
";

// =============================================================================
// Example scenarios
// =============================================================================

#[test]
fn spec_two_scenes_no_edges() {
    let g = graph("scene A {}\nscene B {}");
    let ids: Vec<&str> = g.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
    assert!(g.edges.is_empty());
    assert!(g.diagnostics.is_empty());
}

#[test]
fn spec_start_block_to_scene() {
    let g = graph("start S { u: \"go\" -> A }\nscene A { topic: \"Home\" }");
    assert_eq!(g.nodes.len(), 2);
    assert_eq!(g.node("A").unwrap().data.label, "Home");
    assert_eq!(g.edges.len(), 1);
    let edge = &g.edges[0];
    assert_eq!((edge.source.as_str(), edge.target.as_str()), ("S", "A"));
    assert_eq!(edge.label.as_ref().unwrap().text(), "u: go");
    assert_eq!(edge.source_handle, "r-1");
    assert_eq!(edge.target_handle, "t-3");
}

#[test]
fn spec_duplicate_ids_do_not_crash() {
    let g = graph("scene A { u: \"next\" -> B }\nscene B {}\nscene A { u: \"again\" -> B }");
    assert_eq!(g.nodes.len(), 3);
    let ids: Vec<&str> = g.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["e_A_B_next_0", "e_A_B_again_0"]);
    assert_eq!(g.diagnostics, vec![Diagnostic::DuplicateElement("A".to_string())]);
}

#[test]
fn spec_simultaneous_scene_process() {
    let g = graph("process P { }\nscene A { du: \"sync\" => P }");
    assert_eq!(g.edges.len(), 1);
    let edge = &g.edges[0];
    assert_eq!(edge.kind, EdgeKind::Simultaneous);
    assert_eq!(edge.label, None);
    assert_eq!(edge.marker_end, None);
    assert_eq!(edge.edge_type, "simultaneous");
}

#[test]
fn spec_full_login_flow() {
    let g = graph(LOGIN);
    let types: Vec<NodeType> = g.nodes.iter().map(|n| n.node_type).collect();
    assert_eq!(
        types,
        vec![
            NodeType::Start,
            NodeType::Scene,
            NodeType::Process,
            NodeType::Scene,
            NodeType::External,
            NodeType::Scene,
            NodeType::End,
        ]
    );

    let summary: Vec<(&str, &str, &str, EdgeKind)> = g
        .edges
        .iter()
        .map(|e| {
            (
                e.id.as_str(),
                e.source_handle.as_str(),
                e.target_handle.as_str(),
                e.kind,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("e_S_Login__0", "r-1", "t-3", EdgeKind::Normal),
            ("e_Login_Auth_submit_0", "b-3", "l-1", EdgeKind::Normal),
            ("e_Login_Recover_forgotpassword_0", "b-2", "t-3", EdgeKind::Repair),
            ("e_Auth_Home_ok_0", "b-3", "t-3", EdgeKind::Normal),
            ("e_Auth_Login_denied_0", "b-2", "t-2", EdgeKind::Repair),
            ("e_Recover_Mail_sendlink_0", "b-3", "l-1", EdgeKind::Mediated),
            ("e_Recover_Login_cancel_0", "b-2", "t-4", EdgeKind::Normal),
        ]
    );

    let submit = g.edge("e_Login_Auth_submit_0").unwrap();
    assert_eq!(submit.style.stroke_width, 3.0);
    let mail = g.edge("e_Recover_Mail_sendlink_0").unwrap();
    assert_eq!(mail.marker_end, Some(Marker::DoubleArrowhead));
    let cancel = g.edge("e_Recover_Login_cancel_0").unwrap();
    assert_eq!(cancel.label.as_ref().unwrap().text(), "when: cancel");
    assert!(g.diagnostics.is_empty());
}

// =============================================================================
// Testable properties
// =============================================================================

#[test]
fn spec_transform_is_deterministic() {
    let ast = parse_molic(LOGIN).unwrap();
    let first = transform(&ast, None);
    let second = transform(&ast, None);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    let saved = SavedLayout::capture(&first).saved_handles();
    let restored = transform(&ast, Some(&saved));
    let again = transform(&ast, Some(&saved));
    assert_eq!(restored, again);
    assert_eq!(restored, first);
}

#[test]
fn spec_allocated_handles_never_collide() {
    let g = graph(LOGIN);
    let mut sources = HashSet::new();
    let mut targets = HashSet::new();
    for edge in &g.edges {
        if edge.source_handle != "r-1" {
            assert!(sources.insert((&edge.source, &edge.source_handle)), "{}", edge.id);
        }
        if edge.target_handle != "l-1" {
            assert!(targets.insert((&edge.target, &edge.target_handle)), "{}", edge.id);
        }
    }
}

#[test]
fn spec_saved_handles_survive_unrelated_edits() {
    let before = graph(LOGIN);
    let saved = SavedLayout::capture(&before).saved_handles();

    let edited = format!("scene Extra {{ u: \"x\" -> Login\n u: \"y\" -> Home }}\n{LOGIN}");
    let after = transform(&parse_molic(&edited).unwrap(), Some(&saved));

    for edge in &before.edges {
        let again = after.edge(&edge.id).unwrap();
        assert_eq!(
            (&again.source_handle, &again.target_handle),
            (&edge.source_handle, &edge.target_handle),
            "{}",
            edge.id
        );
    }
    let extra_to_login = after.edge("e_Extra_Login_x_0").unwrap();
    assert!(
        !before
            .edges
            .iter()
            .any(|e| e.target == "Login" && e.target_handle == extra_to_login.target_handle)
    );
}

#[test]
fn spec_saved_handles_override_defaults() {
    let mut saved = HashMap::new();
    saved.insert(
        "e_A_B_go_0".to_string(),
        SavedHandles {
            source_handle: "r-5".to_string(),
            target_handle: "l-2".to_string(),
        },
    );
    let g = transform(&parse_molic("scene A { u: \"go\" -> B }\nscene B {}").unwrap(), Some(&saved));
    assert_eq!(g.edges[0].source_handle, "r-5");
    assert_eq!(g.edges[0].target_handle, "l-2");
}

#[test]
fn spec_simultaneous_between_scenes_is_dropped() {
    let g = graph("scene A { u: \"sync\" => B }\nscene B {}");
    assert!(g.edges.is_empty());
    assert!(matches!(
        g.diagnostics.as_slice(),
        [Diagnostic::InvalidSimultaneous { .. }]
    ));
}

#[test]
fn spec_dangling_target_keeps_edge() {
    let g = graph("scene A { u: \"go\" -> Missing }");
    assert_eq!(g.edges.len(), 1);
    assert_eq!(g.edges[0].target, "Missing");
    assert!(g.node("Missing").is_none());
    assert_eq!(
        g.diagnostics,
        vec![Diagnostic::DanglingTarget {
            source_id: "A".to_string(),
            target_id: "Missing".to_string(),
        }]
    );
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn spec_default_positions_do_not_overlap() {
    let g = graph(LOGIN);
    for pair in g.nodes.windows(2) {
        assert!(
            pair[1].position.x >= pair[0].position.x + pair[0].width,
            "{} overlaps {}",
            pair[1].id,
            pair[0].id
        );
    }
}

#[test]
fn spec_scene_data_keeps_inline_content() {
    let g = graph(LOGIN);
    let login = g.node("Login").unwrap();
    assert_eq!(login.data.label, "Sign in");
    assert!(login.data.is_main);
    assert_eq!(login.data.raw_content.len(), 2);
}
