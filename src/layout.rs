use crate::ast::ContentNode;
use crate::display_width::{content_width, multiline_width};
use crate::graph::{NodeType, Position};

pub const START_X: f64 = 50.0;
pub const START_Y: f64 = 50.0;

/// Minimum width of scene and global nodes.
pub const NODE_WIDTH: f64 = 256.0;
/// Horizontal space between a scene and the next node.
pub const GAP_X: f64 = 44.0;

const CHAR_WIDTH: f64 = 8.0;
const TEXT_PADDING: f64 = 32.0;

/// Width, vertical offset from `START_Y` and horizontal advance of the
/// fixed-size node kinds.
fn footprint(node_type: NodeType) -> (f64, f64, f64) {
    match node_type {
        NodeType::Start | NodeType::End => (48.0, 50.0, 150.0),
        NodeType::Break => (64.0, 0.0, NODE_WIDTH),
        NodeType::Fork => (120.0, 60.0, 200.0),
        NodeType::Process => (100.0, 50.0, 150.0),
        NodeType::External => (96.0, 50.0, 128.0),
        NodeType::Contact => (120.0, 64.0, 200.0),
        NodeType::Scene | NodeType::Global => (NODE_WIDTH, 0.0, NODE_WIDTH + GAP_X),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub position: Position,
    pub width: f64,
}

/// Places nodes left to right in the order they are offered.
///
/// Every slot starts at or after the right edge of the previous one, so
/// default positions never overlap.
#[derive(Debug, Clone)]
pub struct Cursor {
    x: f64,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor { x: START_X }
    }
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, node_type: NodeType, label: &str, content: &[ContentNode]) -> Slot {
        let (base_width, y_offset, advance) = footprint(node_type);
        let width = match node_type {
            NodeType::Scene | NodeType::Global => {
                let columns = multiline_width(label).max(content_width(content));
                base_width.max(columns as f64 * CHAR_WIDTH + TEXT_PADDING)
            }
            _ => base_width,
        };

        let slot = Slot {
            position: Position {
                x: self.x,
                y: START_Y + y_offset,
            },
            width,
        };
        self.x += advance.max(width + GAP_X);
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Speaker, Utterance};
    use pretty_assertions::assert_eq;

    #[test]
    fn first_scene_at_origin() {
        let mut cursor = Cursor::new();
        let slot = cursor.place(NodeType::Scene, "Home", &[]);
        assert_eq!(slot.position, Position { x: 50.0, y: 50.0 });
        assert_eq!(slot.width, 256.0);
    }

    #[test]
    fn scenes_advance_by_width_and_gap() {
        let mut cursor = Cursor::new();
        cursor.place(NodeType::Scene, "A", &[]);
        let second = cursor.place(NodeType::Scene, "B", &[]);
        assert_eq!(second.position.x, 350.0);
    }

    #[test]
    fn per_kind_vertical_offsets() {
        let mut cursor = Cursor::new();
        assert_eq!(cursor.place(NodeType::Start, "s", &[]).position.y, 100.0);
        assert_eq!(cursor.place(NodeType::Fork, "f", &[]).position.y, 110.0);
        assert_eq!(cursor.place(NodeType::Contact, "c", &[]).position.y, 114.0);
        assert_eq!(cursor.place(NodeType::Break, "b", &[]).position.y, 50.0);
    }

    #[test]
    fn long_label_widens_scene() {
        let label = "x".repeat(40);
        let mut cursor = Cursor::new();
        let slot = cursor.place(NodeType::Scene, &label, &[]);
        assert_eq!(slot.width, 40.0 * 8.0 + 32.0);
        let next = cursor.place(NodeType::End, "e", &[]);
        assert!(next.position.x >= slot.position.x + slot.width);
    }

    #[test]
    fn long_utterance_widens_scene() {
        let content = vec![ContentNode::Utterance(Utterance::new(
            Speaker::User,
            "y".repeat(60),
        ))];
        let slot = Cursor::new().place(NodeType::Global, "G", &content);
        assert_eq!(slot.width, 64.0 * 8.0 + 32.0);
    }

    #[test]
    fn slots_never_overlap() {
        let kinds = [
            NodeType::Start,
            NodeType::Scene,
            NodeType::Process,
            NodeType::Fork,
            NodeType::External,
            NodeType::Contact,
            NodeType::Break,
            NodeType::End,
            NodeType::Global,
        ];
        let mut cursor = Cursor::new();
        let slots: Vec<Slot> = kinds.iter().map(|k| cursor.place(*k, "n", &[])).collect();
        for pair in slots.windows(2) {
            assert!(pair[1].position.x >= pair[0].position.x + pair[0].width);
        }
    }
}
