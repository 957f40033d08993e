//! Anchor ("handle") catalogues and per-node allocation.
//!
//! Handles are named `{side}-{index}` with side in `t`/`r`/`b`/`l` and index
//! 1..=5 along the side, 3 being the middle.

use std::collections::{HashMap, HashSet};

use crate::graph::NodeType;

/// Outgoing preference: bottom, right, left, top; middle first on each side.
pub const SOURCE_ORDER: [&str; 20] = [
    "b-3", "b-2", "b-4", "b-1", "b-5", //
    "r-3", "r-2", "r-4", "r-1", "r-5", //
    "l-3", "l-2", "l-4", "l-1", "l-5", //
    "t-3", "t-2", "t-4", "t-1", "t-5",
];

/// Incoming preference: top, left, right, bottom; middle first on each side.
pub const TARGET_ORDER: [&str; 20] = [
    "t-3", "t-2", "t-4", "t-1", "t-5", //
    "l-3", "l-2", "l-4", "l-1", "l-5", //
    "r-3", "r-2", "r-4", "r-1", "r-5", //
    "b-3", "b-2", "b-4", "b-1", "b-5",
];

pub const FORK_INBOUND: &str = "t-1";
pub const SINGLE_INBOUND: &str = "l-1";
pub const SINGLE_OUTBOUND: &str = "r-1";
pub const FORK_OUTBOUND: [&str; 2] = ["b-2", "b-3"];

/// How an edge endpoint gets its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Fixed(&'static str),
    Allocated,
}

/// Fork receives on its top anchor; kinds with a single inbound anchor
/// receive on the left; scenes and unknown targets fan out.
pub fn inbound_anchor(target: Option<NodeType>) -> Anchor {
    match target {
        Some(NodeType::Fork) => Anchor::Fixed(FORK_INBOUND),
        Some(
            NodeType::Process
            | NodeType::Start
            | NodeType::End
            | NodeType::Break
            | NodeType::External
            | NodeType::Contact
            | NodeType::Global,
        ) => Anchor::Fixed(SINGLE_INBOUND),
        Some(NodeType::Scene) | None => Anchor::Allocated,
    }
}

/// `index` counts the outgoing transitions of the source seen so far,
/// `total` is how many it has overall.
pub fn outbound_anchor(source: NodeType, index: usize, total: usize) -> Anchor {
    match source {
        NodeType::Fork => Anchor::Fixed(FORK_OUTBOUND[index % FORK_OUTBOUND.len()]),
        NodeType::Start | NodeType::Process | NodeType::Contact if total <= 1 => {
            Anchor::Fixed(SINGLE_OUTBOUND)
        }
        _ => Anchor::Allocated,
    }
}

/// Tracks which anchors of each node are taken for one direction.
///
/// Allocation walks `order` and hands out the first free anchor; once a node
/// has used them all it wraps around to the start of `order`.
#[derive(Debug, Clone)]
pub struct HandleAllocator {
    order: &'static [&'static str],
    used: HashMap<String, HashSet<String>>,
    wrapped: HashMap<String, usize>,
}

impl HandleAllocator {
    pub fn new(order: &'static [&'static str]) -> Self {
        HandleAllocator {
            order,
            used: HashMap::new(),
            wrapped: HashMap::new(),
        }
    }

    pub fn sources() -> Self {
        Self::new(&SOURCE_ORDER)
    }

    pub fn targets() -> Self {
        Self::new(&TARGET_ORDER)
    }

    /// Marks `handle` as taken on `node_id` without allocating it.
    pub fn reserve(&mut self, node_id: &str, handle: &str) {
        self.used
            .entry(node_id.to_string())
            .or_default()
            .insert(handle.to_string());
    }

    #[cfg(test)]
    fn is_used(&self, node_id: &str, handle: &str) -> bool {
        self.used
            .get(node_id)
            .is_some_and(|handles| handles.contains(handle))
    }

    pub fn allocate(&mut self, node_id: &str) -> String {
        let used = self.used.entry(node_id.to_string()).or_default();
        if let Some(handle) = self.order.iter().find(|h| !used.contains(**h)) {
            used.insert((*handle).to_string());
            return (*handle).to_string();
        }

        let turn = self.wrapped.entry(node_id.to_string()).or_insert(0);
        let handle = self.order[*turn % self.order.len()];
        *turn += 1;
        handle.to_string()
    }
}
