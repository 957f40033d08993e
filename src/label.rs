use crate::ast::{ArrowKind, ContentNode, Speaker};
use crate::graph::{EdgeLabel, LabelLine, LineRole};

pub fn speaker_prefix(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::User => "u: ",
        Speaker::System => "d: ",
        Speaker::Mixed => "d+u: ",
        Speaker::Anonymous => "",
    }
}

/// Builds the multi-line label of the edge produced by `item`.
///
/// Lines come in a fixed order: `when`, `if`, the utterance itself, then
/// `let`, `effect` and `why`. `role` replaces the speaker prefix when the
/// edge leaves a named contact. Simultaneous transitions carry no label.
pub fn compose(item: &ContentNode, role: Option<&str>) -> Option<EdgeLabel> {
    let mut lines = Vec::new();
    let mut push = |kind: LineRole, text: String| lines.push(LabelLine { role: kind, text });

    match item {
        ContentNode::Utterance(u) => {
            let transition = u.transition.as_ref();
            if transition.is_some_and(|t| t.kind == ArrowKind::Simultaneous) {
                return None;
            }
            if let Some(when) = &u.when {
                push(LineRole::When, format!("when: {when}"));
            }
            if let Some(cond) = &u.condition {
                push(LineRole::Condition, format!("if: {cond}"));
            }
            let main = match role {
                Some(name) => format!("{name}: {}", u.text),
                None => format!("{}{}", speaker_prefix(u.speaker), u.text),
            };
            if !main.is_empty() {
                push(LineRole::Main, main);
            }
            if let Some(text) = &u.let_text {
                push(LineRole::Let, format!("let: {text}"));
            }
            if let Some(text) = &u.effect {
                push(LineRole::Effect, format!("effect: {text}"));
            }
            if let Some(why) = transition.and_then(|t| t.why.as_ref()).or(u.why.as_ref()) {
                push(LineRole::Why, format!("why: {why}"));
            }
        }
        ContentNode::Event(e) => {
            let transition = e.transition.as_ref();
            if transition.is_some_and(|t| t.kind == ArrowKind::Simultaneous) {
                return None;
            }
            push(LineRole::When, format!("when: {}", e.trigger));
            if let Some(cond) = &e.condition {
                push(LineRole::Condition, format!("if: {cond}"));
            }
            if let Some(why) = transition.and_then(|t| t.why.as_ref()) {
                push(LineRole::Why, format!("why: {why}"));
            }
        }
        _ => return None,
    }

    if lines.is_empty() {
        None
    } else {
        Some(EdgeLabel { lines })
    }
}
