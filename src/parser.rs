use winnow::combinator::{alt, cut_err, not, opt, preceded, repeat, terminated};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;

use crate::ast::*;
use crate::error::SyntaxError;
use crate::grammar::{
    arrow, expect_char, expect_identifier, expect_string, identifier, keyword, reject,
    string_literal, ws,
};

/// Deepest accepted nesting of `seq`/`xor`/`or`/`and`/`dialog` groupings.
pub const MAX_NESTING: usize = 64;

const ELEMENT_KEYWORDS: &str =
    "`scene`, `main scene`, `global`, `start`, `end`, `break`, `fork`, `process`, `external` or `contact`";

pub fn parse_molic(source: &str) -> Result<Diagram, SyntaxError> {
    diagram.parse(source).map_err(|e| {
        let message = e.inner().to_string().replace('\n', "; ");
        SyntaxError::at_offset(source, e.offset(), message)
    })
}

fn diagram(input: &mut &str) -> ModalResult<Diagram> {
    let mut elements = Vec::new();
    loop {
        ws.parse_next(input)?;
        if input.is_empty() {
            break;
        }
        match opt(element).parse_next(input)? {
            Some(el) => elements.push(el),
            None => return reject("element", ELEMENT_KEYWORDS).parse_next(input),
        }
    }
    Ok(Diagram { elements })
}

fn element(input: &mut &str) -> ModalResult<Element> {
    alt((
        scene.map(Element::Scene),
        global.map(Element::Global),
        terminal.map(Element::Terminal),
        fork.map(Element::Fork),
        process.map(Element::Process),
        external.map(Element::External),
        contact.map(Element::Contact),
    ))
    .parse_next(input)
}

/// Splits a Scene/Global body into inline content and exits (items that
/// carry a transition).
fn partition(items: Vec<ContentNode>) -> (Vec<ContentNode>, Vec<ContentNode>) {
    let (exits, content): (Vec<_>, Vec<_>) = items.into_iter().partition(ContentNode::is_exit);
    (content, exits)
}

fn scene(input: &mut &str) -> ModalResult<Scene> {
    let is_main = opt(keyword("main")).parse_next(input)?.is_some();
    if is_main {
        ws.parse_next(input)?;
        cut_err(keyword("scene"))
            .context(StrContext::Expected(StrContextValue::StringLiteral("scene")))
            .parse_next(input)?;
    } else {
        keyword("scene").parse_next(input)?;
    }
    ws.parse_next(input)?;

    let (variant, id) = cut_err(alt((
        (keyword("alert"), ws, identifier).map(|(_, _, id)| (SceneVariant::Alert, id)),
        identifier.map(|id| (SceneVariant::Normal, id)),
    )))
    .parse_next(input)?;

    let (content, exits) = partition(block(input, 0)?);
    Ok(Scene {
        id: id.to_string(),
        variant,
        is_main,
        content,
        exits,
    })
}

fn global(input: &mut &str) -> ModalResult<Global> {
    keyword("global").parse_next(input)?;
    ws.parse_next(input)?;
    let id = expect_identifier(input)?;
    let (content, exits) = partition(block(input, 0)?);
    Ok(Global {
        id: id.to_string(),
        content,
        exits,
    })
}

fn terminal(input: &mut &str) -> ModalResult<Terminal> {
    let kind = alt((
        keyword("start").value(TerminalKind::Start),
        keyword("end").value(TerminalKind::End),
        keyword("break").value(TerminalKind::Break),
    ))
    .parse_next(input)?;
    ws.parse_next(input)?;
    let id = expect_identifier(input)?.to_string();

    if kind != TerminalKind::Start {
        return Ok(Terminal {
            kind,
            id,
            target_id: None,
            content: Vec::new(),
        });
    }

    ws.parse_next(input)?;
    if let Some(t) = opt(transition).parse_next(input)? {
        return Ok(Terminal {
            kind,
            id,
            target_id: Some(t.target_id.clone()),
            content: vec![ContentNode::Utterance(Utterance::redirect(t))],
        });
    }
    let content = braced(input, outgoing_item)?;
    Ok(Terminal {
        kind,
        id,
        target_id: None,
        content,
    })
}

fn fork(input: &mut &str) -> ModalResult<Fork> {
    keyword("fork").parse_next(input)?;
    ws.parse_next(input)?;
    let id = expect_identifier(input)?;
    let content = braced(input, outgoing_item)?;
    Ok(Fork {
        id: id.to_string(),
        content,
    })
}

fn process(input: &mut &str) -> ModalResult<Process> {
    keyword("process").parse_next(input)?;
    ws.parse_next(input)?;
    let id = expect_identifier(input)?;
    let action = opt(preceded(ws, string_literal)).parse_next(input)?;

    ws.parse_next(input)?;
    let content = if input.starts_with('{') {
        block(input, 0)?
    } else if let Some(t) = opt(transition).parse_next(input)? {
        vec![ContentNode::Utterance(Utterance::redirect(t))]
    } else {
        Vec::new()
    };

    Ok(Process {
        id: id.to_string(),
        action: action.map(str::to_string),
        content,
    })
}

fn external(input: &mut &str) -> ModalResult<External> {
    keyword("external").parse_next(input)?;
    ws.parse_next(input)?;
    let id = expect_identifier(input)?;
    Ok(External { id: id.to_string() })
}

enum ContactItem {
    Role(String),
    Item(ContentNode),
}

fn contact(input: &mut &str) -> ModalResult<Contact> {
    keyword("contact").parse_next(input)?;
    ws.parse_next(input)?;
    let id = expect_identifier(input)?.to_string();

    let mut name = None;
    let mut content = Vec::new();
    for item in braced(input, contact_item)? {
        match item {
            ContactItem::Role(role) => name = Some(role),
            ContactItem::Item(node) => content.push(node),
        }
    }

    Ok(Contact {
        name: name.unwrap_or_else(|| id.clone()),
        id,
        content,
    })
}

fn contact_item(input: &mut &str) -> ModalResult<ContactItem> {
    alt((
        preceded(("role:", ws), expect_string).map(|s| ContactItem::Role(s.to_string())),
        contact_flow.map(ContactItem::Item),
        utterance.map(|u| ContactItem::Item(ContentNode::Utterance(u))),
    ))
    .parse_next(input)
}

/// `role -> Target "label"`
fn contact_flow(input: &mut &str) -> ModalResult<ContentNode> {
    keyword("role").parse_next(input)?;
    ws.parse_next(input)?;
    let t = cut_err(transition).parse_next(input)?;
    let label = opt(preceded(ws, string_literal)).parse_next(input)?;
    Ok(ContentNode::Utterance(Utterance {
        transition: Some(t),
        ..Utterance::new(Speaker::Anonymous, label.unwrap_or_default())
    }))
}

/// Items of start and fork bodies: utterances or bare redirects.
fn outgoing_item(input: &mut &str) -> ModalResult<ContentNode> {
    alt((utterance, transition.map(Utterance::redirect)))
        .map(ContentNode::Utterance)
        .parse_next(input)
}

/// `{ item* }`
fn braced<'s, O, P>(input: &mut &'s str, item: P) -> ModalResult<Vec<O>>
where
    P: Parser<&'s str, O, ErrMode<ContextError>>,
{
    ws.parse_next(input)?;
    expect_char('{').parse_next(input)?;
    let items: Vec<O> = repeat(0.., preceded(ws, item)).parse_next(input)?;
    ws.parse_next(input)?;
    expect_char('}').parse_next(input)?;
    Ok(items)
}

fn block(input: &mut &str, depth: usize) -> ModalResult<Vec<ContentNode>> {
    if depth > MAX_NESTING {
        return reject("flow grouping", "at most 64 nested groupings").parse_next(input);
    }
    braced(input, move |i: &mut &str| block_content(i, depth))
}

fn block_content(input: &mut &str, depth: usize) -> ModalResult<ContentNode> {
    alt((
        preceded(("topic:", ws), expect_string).map(|s| ContentNode::Topic {
            text: s.to_string(),
        }),
        preceded(("subtopic:", ws), expect_string).map(|s| ContentNode::Subtopic {
            text: s.to_string(),
        }),
        let_binding.map(ContentNode::Let),
        preceded(("why:", ws), expect_string).map(|s| ContentNode::Why {
            text: s.to_string(),
        }),
        preceded(("effect:", ws), expect_string).map(|s| ContentNode::Effect {
            text: s.to_string(),
        }),
        move |i: &mut &str| flow_group(i, depth),
        utterance.map(ContentNode::Utterance),
        event.map(ContentNode::Event),
    ))
    .parse_next(input)
}

/// `let[:] name = value`, value being a string or an identifier.
fn let_binding(input: &mut &str) -> ModalResult<LetBinding> {
    keyword("let").parse_next(input)?;
    opt(":").parse_next(input)?;
    ws.parse_next(input)?;
    let variable = identifier.parse_next(input)?;
    ws.parse_next(input)?;
    expect_char('=').parse_next(input)?;
    ws.parse_next(input)?;
    let value = cut_err(alt((string_literal, identifier))).parse_next(input)?;
    Ok(LetBinding {
        variable: variable.to_string(),
        value: value.to_string(),
    })
}

fn flow_group(input: &mut &str, depth: usize) -> ModalResult<ContentNode> {
    let variant = alt((
        keyword("seq").value(FlowVariant::Seq),
        keyword("xor").value(FlowVariant::Xor),
        keyword("or").value(FlowVariant::Or),
        keyword("and").value(FlowVariant::And),
        keyword("dialog").value(FlowVariant::Dialog),
    ))
    .parse_next(input)?;
    ws.parse_next(input)?;

    let (name, condition) = if variant == FlowVariant::Dialog {
        (opt(identifier).parse_next(input)?, None)
    } else {
        (None, opt(condition).parse_next(input)?)
    };

    let children = block(input, depth + 1)?;
    Ok(ContentNode::Flow(FlowGroup {
        variant,
        name: name.map(str::to_string),
        condition,
        children,
    }))
}

/// `if: "text"` or `if "text"`
fn condition(input: &mut &str) -> ModalResult<String> {
    alt(("if:", keyword("if"))).parse_next(input)?;
    ws.parse_next(input)?;
    expect_string.map(str::to_string).parse_next(input)
}

fn speaker(input: &mut &str) -> ModalResult<Speaker> {
    alt((
        "du:".value(Speaker::Mixed),
        "d:".value(Speaker::System),
        "u:".value(Speaker::User),
        "anon:".value(Speaker::Anonymous),
    ))
    .parse_next(input)
}

enum Clause {
    Condition(String),
    When(String),
    Let(String),
    Effect(String),
    Why(String),
}

/// Inline clauses allowed between an utterance's text and its transition.
/// Inline `when` has no colon; `when:` always starts an event.
fn clause(input: &mut &str) -> ModalResult<Clause> {
    alt((
        condition.map(Clause::Condition),
        preceded((keyword("when"), not(":"), ws), expect_string)
            .map(|s| Clause::When(s.to_string())),
        tail_clause,
    ))
    .parse_next(input)
}

/// Clauses also allowed after the transition. `let:` backtracks when no
/// string follows so `let: x = 1` stays a block-level binding.
fn tail_clause(input: &mut &str) -> ModalResult<Clause> {
    alt((
        preceded(("let:", ws), string_literal).map(|s| Clause::Let(s.to_string())),
        preceded(("effect:", ws), expect_string).map(|s| Clause::Effect(s.to_string())),
        preceded(("why:", ws), expect_string).map(|s| Clause::Why(s.to_string())),
    ))
    .parse_next(input)
}

fn utterance(input: &mut &str) -> ModalResult<Utterance> {
    let preferred = opt(terminated(keyword("preferred"), ws))
        .parse_next(input)?
        .is_some();
    let speaker = if preferred {
        cut_err(speaker).parse_next(input)?
    } else {
        speaker.parse_next(input)?
    };
    ws.parse_next(input)?;
    let text = expect_string(input)?;
    let mut utt = Utterance::new(speaker, text);

    while let Some(c) = opt(preceded(ws, clause)).parse_next(input)? {
        apply_clause(&mut utt, c);
    }

    let Some(mut t) = opt(preceded(ws, transition)).parse_next(input)? else {
        return Ok(utt);
    };
    t.is_preferred = preferred;

    while let Some(c) = opt(preceded(ws, tail_clause)).parse_next(input)? {
        match c {
            Clause::Why(why) => t.why = Some(why),
            other => apply_clause(&mut utt, other),
        }
    }
    utt.transition = Some(t);
    Ok(utt)
}

fn apply_clause(utt: &mut Utterance, clause: Clause) {
    match clause {
        Clause::Condition(s) => utt.condition = Some(s),
        Clause::When(s) => utt.when = Some(s),
        Clause::Let(s) => utt.let_text = Some(s),
        Clause::Effect(s) => utt.effect = Some(s),
        Clause::Why(s) => utt.why = Some(s),
    }
}

fn event(input: &mut &str) -> ModalResult<Event> {
    "when:".parse_next(input)?;
    ws.parse_next(input)?;
    let trigger = expect_string(input)?;
    let condition = opt(preceded(ws, condition)).parse_next(input)?;
    let transition = opt(preceded(ws, transition)).parse_next(input)?;
    Ok(Event {
        trigger: trigger.to_string(),
        condition,
        transition,
    })
}

fn transition(input: &mut &str) -> ModalResult<Transition> {
    let kind = arrow.parse_next(input)?;
    ws.parse_next(input)?;
    let target = expect_identifier(input)?;
    Ok(Transition::new(kind, target))
}
