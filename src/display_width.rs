use unicode_width::UnicodeWidthStr;

use crate::ast::ContentNode;

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Maximum display width among `\n`-separated lines.
pub fn multiline_width(s: &str) -> usize {
    s.lines().map(display_width).max().unwrap_or(0)
}

/// Widest text line a node body renders for `content`, in columns.
///
/// Nested flow groupings are rendered indented by two columns per level.
pub fn content_width(content: &[ContentNode]) -> usize {
    content_width_at(content, 0)
}

fn content_width_at(content: &[ContentNode], indent: usize) -> usize {
    content
        .iter()
        .map(|node| match node {
            ContentNode::Topic { text }
            | ContentNode::Subtopic { text }
            | ContentNode::Why { text }
            | ContentNode::Effect { text } => indent + multiline_width(text),
            ContentNode::Let(binding) => {
                indent + display_width(&binding.variable) + 3 + display_width(&binding.value)
            }
            ContentNode::Utterance(u) => indent + 4 + multiline_width(&u.text),
            ContentNode::Event(e) => indent + 6 + multiline_width(&e.trigger),
            ContentNode::Flow(group) => content_width_at(&group.children, indent + 2),
        })
        .max()
        .unwrap_or(0)
}
