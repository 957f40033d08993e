use std::collections::HashMap;

use log::{debug, warn};

use crate::ast::{ArrowKind, ContentNode, Diagram, Element, TerminalKind};
use crate::error::Diagnostic;
use crate::graph::{Edge, EdgeKind, EdgeStyle, Graph, Node, NodeData, NodeType};
use crate::handles::{Anchor, HandleAllocator, inbound_anchor, outbound_anchor};
use crate::label;
use crate::layout::Cursor;
use crate::persistence::{SavedHandles, SavedLayout};

/// One outgoing transition, resolved but not yet anchored.
struct EdgePlan<'a> {
    id: String,
    source: &'a str,
    source_type: NodeType,
    target: &'a str,
    target_type: Option<NodeType>,
    item: &'a ContentNode,
    role: Option<&'a str>,
    kind: EdgeKind,
    preferred: bool,
    index: usize,
    total: usize,
}

/// Anchors an edge must keep, per side. A missing side is allocated fresh.
#[derive(Debug, Clone, Copy, Default)]
struct Pin<'a> {
    source: Option<&'a str>,
    target: Option<&'a str>,
}

/// Turns a parsed diagram into renderable nodes and edges.
///
/// Anchors listed in `saved_handles` are reused verbatim for the edges with
/// matching ids and are never handed out to another edge. The result only
/// depends on the arguments.
pub fn transform(
    diagram: &Diagram,
    saved_handles: Option<&HashMap<String, SavedHandles>>,
) -> Graph {
    let pins = saved_handles
        .into_iter()
        .flatten()
        .map(|(id, saved)| {
            let pin = Pin {
                source: Some(saved.source_handle.as_str()),
                target: Some(saved.target_handle.as_str()),
            };
            (id.as_str(), pin)
        })
        .collect();
    build(diagram, &pins)
}

/// Like [`transform`], but also honours edges of `layout` that saved only
/// one of their two anchors: the saved side is kept and reserved, the other
/// side is allocated around it.
pub fn transform_with_layout(diagram: &Diagram, layout: &SavedLayout) -> Graph {
    let pins = layout
        .edges
        .iter()
        .filter(|e| e.source_handle.is_some() || e.target_handle.is_some())
        .map(|e| {
            let pin = Pin {
                source: e.source_handle.as_deref(),
                target: e.target_handle.as_deref(),
            };
            (e.id.as_str(), pin)
        })
        .collect();
    build(diagram, &pins)
}

fn build(diagram: &Diagram, pins: &HashMap<&str, Pin<'_>>) -> Graph {
    let mut diagnostics = Vec::new();
    let types = classify(diagram, &mut diagnostics);
    let nodes = synthesize_nodes(diagram);
    let plans = plan_edges(diagram, &types, &mut diagnostics);
    let edges = assign_handles(plans, pins);

    debug!(
        "transformed {} elements into {} nodes and {} edges",
        diagram.elements.len(),
        nodes.len(),
        edges.len()
    );

    Graph {
        nodes,
        edges,
        diagnostics,
    }
}

pub fn node_type(element: &Element) -> NodeType {
    match element {
        Element::Scene(_) => NodeType::Scene,
        Element::Global(_) => NodeType::Global,
        Element::Terminal(t) => match t.kind {
            TerminalKind::Start => NodeType::Start,
            TerminalKind::End => NodeType::End,
            TerminalKind::Break => NodeType::Break,
        },
        Element::Fork(_) => NodeType::Fork,
        Element::Process(_) => NodeType::Process,
        Element::External(_) => NodeType::External,
        Element::Contact(_) => NodeType::Contact,
    }
}

/// The arrow kind as rendered between `source` and `target`, or `None` for
/// a simultaneous transition outside a scene/process pair.
///
/// A global is not a scene here, so `=>` between a global and a process is
/// rejected like any other pair.
pub fn resolve_kind(
    arrow: ArrowKind,
    source: NodeType,
    target: Option<NodeType>,
) -> Option<EdgeKind> {
    if arrow == ArrowKind::Simultaneous {
        return match (source, target) {
            (NodeType::Scene, Some(NodeType::Process))
            | (NodeType::Process, Some(NodeType::Scene)) => Some(EdgeKind::Simultaneous),
            _ => None,
        };
    }
    if source == NodeType::Contact
        || matches!(target, Some(NodeType::Contact | NodeType::External))
    {
        return Some(EdgeKind::Mediated);
    }
    Some(match arrow {
        ArrowKind::Repair => EdgeKind::Repair,
        _ => EdgeKind::Normal,
    })
}

fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    warn!("{diagnostic}");
    diagnostics.push(diagnostic);
}

fn classify<'a>(
    diagram: &'a Diagram,
    diagnostics: &mut Vec<Diagnostic>,
) -> HashMap<&'a str, NodeType> {
    let mut types = HashMap::new();
    for element in &diagram.elements {
        if types.contains_key(element.id()) {
            report(diagnostics, Diagnostic::DuplicateElement(element.id().to_string()));
        } else {
            types.insert(element.id(), node_type(element));
        }
    }
    types
}

fn topic(content: &[ContentNode]) -> Option<&str> {
    content.iter().find_map(|c| match c {
        ContentNode::Topic { text } => Some(text.as_str()),
        _ => None,
    })
}

fn synthesize_nodes(diagram: &Diagram) -> Vec<Node> {
    let mut cursor = Cursor::new();
    diagram
        .elements
        .iter()
        .map(|element| {
            let node_type = node_type(element);
            let data = match element {
                Element::Scene(s) => NodeData {
                    raw_content: s.content.clone(),
                    is_main: s.is_main,
                    variant: s.variant,
                    ..NodeData::labelled(topic(&s.content).unwrap_or(s.id.as_str()))
                },
                Element::Global(g) => NodeData {
                    raw_content: g.content.clone(),
                    is_global: true,
                    ..NodeData::labelled(topic(&g.content).unwrap_or(g.id.as_str()))
                },
                Element::Process(p) => NodeData {
                    action: p.action.clone(),
                    ..NodeData::labelled(p.id.as_str())
                },
                Element::Contact(c) => NodeData::labelled(c.name.as_str()),
                Element::Terminal(_) | Element::Fork(_) | Element::External(_) => {
                    NodeData::labelled(element.id())
                }
            };
            let slot = cursor.place(node_type, &data.label, &data.raw_content);
            Node {
                id: element.id().to_string(),
                node_type,
                position: slot.position,
                width: slot.width,
                data,
            }
        })
        .collect()
}

/// Items of `element` that may leave it, with the role name that replaces
/// speaker prefixes on their labels.
fn outgoing(element: &Element) -> (&[ContentNode], Option<&str>) {
    match element {
        Element::Scene(s) => (s.exits.as_slice(), None),
        Element::Global(g) => (g.exits.as_slice(), None),
        Element::Terminal(t) => (t.content.as_slice(), None),
        Element::Fork(f) => (f.content.as_slice(), None),
        Element::Process(p) => (p.content.as_slice(), None),
        Element::Contact(c) => (c.content.as_slice(), Some(c.name.as_str())),
        Element::External(_) => (&[][..], None),
    }
}

fn edge_text(item: &ContentNode) -> &str {
    match item {
        ContentNode::Utterance(u) => &u.text,
        ContentNode::Event(e) => &e.trigger,
        _ => "",
    }
}

fn sanitize(text: &str) -> String {
    text.chars().filter(char::is_ascii_alphanumeric).collect()
}

fn plan_edges<'a>(
    diagram: &'a Diagram,
    types: &HashMap<&str, NodeType>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<EdgePlan<'a>> {
    let mut occurrences: HashMap<String, usize> = HashMap::new();
    let mut plans = Vec::new();

    for element in &diagram.elements {
        let source = element.id();
        let source_type = node_type(element);
        let (items, role) = outgoing(element);
        let first = plans.len();

        for item in items {
            let Some(transition) = item.transition() else {
                continue;
            };
            let target = transition.target_id.as_str();
            let target_type = types.get(target).copied();

            let Some(kind) = resolve_kind(transition.kind, source_type, target_type) else {
                report(
                    diagnostics,
                    Diagnostic::InvalidSimultaneous {
                        source_id: source.to_string(),
                        target_id: target.to_string(),
                        source_type: Some(source_type),
                        target_type,
                    },
                );
                continue;
            };
            if target_type.is_none() {
                report(
                    diagnostics,
                    Diagnostic::DanglingTarget {
                        source_id: source.to_string(),
                        target_id: target.to_string(),
                    },
                );
            }

            let base = format!("e_{source}_{target}_{}", sanitize(edge_text(item)));
            let seen = occurrences.entry(base.clone()).or_insert(0);
            let id = format!("{base}_{seen}");
            *seen += 1;
            let index = plans.len() - first;

            plans.push(EdgePlan {
                id,
                source,
                source_type,
                target,
                target_type,
                item,
                role,
                kind,
                preferred: transition.is_preferred,
                index,
                total: 0,
            });
        }

        let total = plans.len() - first;
        for plan in &mut plans[first..] {
            plan.total = total;
        }
    }
    plans
}

fn assign_handles(plans: Vec<EdgePlan<'_>>, pins: &HashMap<&str, Pin<'_>>) -> Vec<Edge> {
    let pin = |id: &str| pins.get(id).copied().unwrap_or_default();
    let mut sources = HandleAllocator::sources();
    let mut targets = HandleAllocator::targets();

    // Restored anchors are claimed up front so that no fresh allocation,
    // earlier or later in edge order, can land on them.
    for plan in &plans {
        let restored = pin(&plan.id);
        if let Some(handle) = restored.source {
            sources.reserve(plan.source, handle);
        }
        if let Some(handle) = restored.target {
            targets.reserve(plan.target, handle);
        }
    }

    plans
        .into_iter()
        .map(|plan| {
            let restored = pin(&plan.id);
            let source_handle = match restored.source {
                Some(handle) => handle.to_string(),
                None => match outbound_anchor(plan.source_type, plan.index, plan.total) {
                    Anchor::Fixed(handle) => handle.to_string(),
                    Anchor::Allocated => sources.allocate(plan.source),
                },
            };
            let target_handle = match restored.target {
                Some(handle) => handle.to_string(),
                None => match inbound_anchor(plan.target_type) {
                    Anchor::Fixed(handle) => handle.to_string(),
                    Anchor::Allocated => targets.allocate(plan.target),
                },
            };

            Edge {
                label: label::compose(plan.item, plan.role),
                edge_type: plan.kind.edge_type(),
                style: EdgeStyle::new(plan.kind, plan.preferred),
                marker_end: plan.kind.marker(),
                kind: plan.kind,
                id: plan.id,
                source: plan.source.to_string(),
                target: plan.target.to_string(),
                source_handle,
                target_handle,
            }
        })
        .collect()
}
