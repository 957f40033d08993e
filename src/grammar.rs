//! Lexical layer of the MoLIC language: insignificant whitespace, keywords,
//! identifiers, string literals and arrows.
//!
//! Every rule here operates on `&mut &str` and leaves leading whitespace to
//! the caller, so rule-level parsers call [`ws`] before each token.

use winnow::ascii::{multispace1, till_line_ending};
use winnow::combinator::{alt, cut_err, fail, not, repeat, terminated};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_until, take_while};

use crate::ast::ArrowKind;

type ModalError = ErrMode<ContextError>;

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whitespace, `// line`, `% line` and `/* block */` comments.
pub(crate) fn ws(input: &mut &str) -> ModalResult<()> {
    repeat(0.., alt((multispace1.void(), line_comment, block_comment))).parse_next(input)
}

fn line_comment(input: &mut &str) -> ModalResult<()> {
    alt(("//", "%")).parse_next(input)?;
    till_line_ending.void().parse_next(input)
}

fn block_comment(input: &mut &str) -> ModalResult<()> {
    "/*".parse_next(input)?;
    cut_err(terminated(take_until(0.., "*/"), "*/"))
        .context(StrContext::Expected(StrContextValue::StringLiteral("*/")))
        .void()
        .parse_next(input)
}

/// A reserved word that must not run into a following identifier char:
/// `scene` matches in `scene A` but not in `scenery`.
pub(crate) fn keyword<'s>(word: &'static str) -> impl Parser<&'s str, &'s str, ModalError> {
    terminated(word, not(one_of(is_ident_char)))
}

/// `letter (alnum | "_")*`
pub(crate) fn identifier<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        one_of(|c: char| c.is_alphabetic()),
        take_while(0.., is_ident_char),
    )
        .take()
        .context(StrContext::Expected(StrContextValue::Description(
            "identifier",
        )))
        .parse_next(input)
}

fn quoted<'s>(mut quote: char) -> impl FnMut(&mut &'s str) -> ModalResult<&'s str> {
    move |input: &mut &'s str| {
        quote.parse_next(input)?;
        let text = take_till(0.., quote).parse_next(input)?;
        cut_err(quote.context(StrContext::Expected(StrContextValue::CharLiteral(quote))))
            .parse_next(input)?;
        Ok(text)
    }
}

/// Double- or single-quoted text. Delimiters are stripped, nothing inside
/// is unescaped.
pub(crate) fn string_literal<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    alt((quoted('"'), quoted('\'')))
        .context(StrContext::Expected(StrContextValue::Description(
            "string literal",
        )))
        .parse_next(input)
}

pub(crate) fn arrow(input: &mut &str) -> ModalResult<ArrowKind> {
    alt((
        "->".value(ArrowKind::Normal),
        "..>".value(ArrowKind::Repair),
        "=>".value(ArrowKind::Simultaneous),
    ))
    .parse_next(input)
}

/// Commits to `c`: a mismatch is reported instead of backtracking.
pub(crate) fn expect_char<'s>(c: char) -> impl Parser<&'s str, char, ModalError> {
    cut_err(c.context(StrContext::Expected(StrContextValue::CharLiteral(c))))
}

pub(crate) fn expect_identifier<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    cut_err(identifier).parse_next(input)
}

pub(crate) fn expect_string<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    cut_err(string_literal).parse_next(input)
}

/// Unconditional committed failure carrying a label and what was expected
/// instead.
pub(crate) fn reject<'s, O>(
    label: &'static str,
    expected: &'static str,
) -> impl Parser<&'s str, O, ModalError> {
    cut_err(
        fail::<_, O, _>
            .context(StrContext::Label(label))
            .context(StrContext::Expected(StrContextValue::Description(expected))),
    )
}
