use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Diagram {
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Element {
    Scene(Scene),
    Global(Global),
    Terminal(Terminal),
    Fork(Fork),
    Process(Process),
    External(External),
    Contact(Contact),
}

impl Element {
    pub fn id(&self) -> &str {
        match self {
            Element::Scene(s) => &s.id,
            Element::Global(g) => &g.id,
            Element::Terminal(t) => &t.id,
            Element::Fork(f) => &f.id,
            Element::Process(p) => &p.id,
            Element::External(e) => &e.id,
            Element::Contact(c) => &c.id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SceneVariant {
    #[default]
    Normal,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    pub variant: SceneVariant,
    pub is_main: bool,
    pub content: Vec<ContentNode>,
    pub exits: Vec<ContentNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Global {
    pub id: String,
    pub content: Vec<ContentNode>,
    pub exits: Vec<ContentNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TerminalKind {
    Start,
    End,
    Break,
}

/// `start`, `end` or `break`. Only `start` carries outgoing content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Terminal {
    pub kind: TerminalKind,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    pub content: Vec<ContentNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fork {
    pub id: String,
    pub content: Vec<ContentNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Process {
    pub id: String,
    pub action: Option<String>,
    pub content: Vec<ContentNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct External {
    pub id: String,
}

/// A human interlocutor. `name` comes from `role:` and defaults to the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub content: Vec<ContentNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentNode {
    Topic { text: String },
    Subtopic { text: String },
    Let(LetBinding),
    Why { text: String },
    Effect { text: String },
    Flow(FlowGroup),
    Utterance(Utterance),
    Event(Event),
}

impl ContentNode {
    pub fn transition(&self) -> Option<&Transition> {
        match self {
            ContentNode::Utterance(u) => u.transition.as_ref(),
            ContentNode::Event(e) => e.transition.as_ref(),
            _ => None,
        }
    }

    /// Utterances and events that leave the element render as edges.
    pub fn is_exit(&self) -> bool {
        self.transition().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetBinding {
    pub variable: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowVariant {
    Seq,
    Xor,
    Or,
    And,
    Dialog,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowGroup {
    pub variant: FlowVariant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub children: Vec<ContentNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Speaker {
    User,
    System,
    Mixed,
    Anonymous,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Utterance {
    pub speaker: Speaker,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    #[serde(rename = "let", skip_serializing_if = "Option::is_none")]
    pub let_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
}

impl Utterance {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Utterance {
            speaker,
            text: text.into(),
            condition: None,
            when: None,
            let_text: None,
            effect: None,
            why: None,
            transition: None,
        }
    }

    /// A bare `-> Target`: anonymous, textless, carrying only the transition.
    pub fn redirect(transition: Transition) -> Self {
        Utterance {
            transition: Some(transition),
            ..Utterance::new(Speaker::Anonymous, "")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub trigger: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrowKind {
    Normal,
    Repair,
    Simultaneous,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub target_id: String,
    pub kind: ArrowKind,
    pub is_preferred: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
}

impl Transition {
    pub fn new(kind: ArrowKind, target_id: impl Into<String>) -> Self {
        Transition {
            target_id: target_id.into(),
            kind,
            is_preferred: false,
            why: None,
        }
    }
}
