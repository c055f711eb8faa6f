//! Selector parser and recursive descent stylesheet parser.
//!
//! [`parse_selector`] turns `div .row #title` into a [`Selector`].
//! [`parse_stylesheet`] turns CSS text into [`RuleSource`] records. A broken
//! rule is reported and skipped up to its closing brace; the rules after it
//! still parse.

use logos::Logos;

use crate::css::model::{RuleSource, Selector, SimpleSelector};
use crate::css::tokenizer::{SelectorToken, Token};

/// Errors from selector parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("compound selector `{selector}` at byte {at} is not supported")]
    Compound { selector: String, at: usize },
    #[error("invalid character in selector `{selector}` at byte {at}")]
    InvalidToken { selector: String, at: usize },
}

/// Errors from stylesheet text parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token at byte {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// Parse a whitespace-separated chain of simple selectors.
pub fn parse_selector(input: &str) -> Result<Selector, SelectorError> {
    let mut parts = Vec::new();
    let mut after_separator = true;

    for (result, span) in SelectorToken::lexer(input).spanned() {
        let token = result.map_err(|()| SelectorError::InvalidToken {
            selector: input.to_string(),
            at: span.start,
        })?;
        let text = &input[span.clone()];
        let part = match token {
            SelectorToken::Whitespace => {
                after_separator = true;
                continue;
            }
            SelectorToken::Id => SimpleSelector::Id(text[1..].to_string()),
            SelectorToken::Class => SimpleSelector::Class(text[1..].to_string()),
            SelectorToken::Tag => SimpleSelector::Type(text.to_string()),
        };
        if !after_separator {
            return Err(SelectorError::Compound {
                selector: input.to_string(),
                at: span.start,
            });
        }
        after_separator = false;
        parts.push(part);
    }

    if parts.is_empty() {
        return Err(SelectorError::Empty);
    }
    Ok(Selector { parts })
}

// ---------------------------------------------------------------------------
// Stylesheet text
// ---------------------------------------------------------------------------

/// A token with its byte span in the comment-stripped source.
#[derive(Debug, Clone, Copy)]
struct PToken {
    token: Token,
    start: usize,
    end: usize,
}

/// Replace each `/* ... */` comment with a single space.
///
/// Byte offsets after a comment shift, so error positions refer to the
/// stripped text.
fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("/*") {
        result.push_str(&rest[..start]);
        result.push(' ');
        rest = match rest[start + 2..].find("*/") {
            Some(end) => &rest[start + 2 + end + 2..],
            None => "",
        };
    }
    result.push_str(rest);
    result
}

/// Parse stylesheet text into rule records.
///
/// Returns every rule that parsed and one error per rule that did not. Each
/// error skips input up to and including the next `}`.
pub fn parse_stylesheet(input: &str) -> (Vec<RuleSource>, Vec<ParseError>) {
    let source = strip_comments(input);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    for (result, span) in Token::lexer(&source).spanned() {
        match result {
            Ok(token) => tokens.push(PToken {
                token,
                start: span.start,
                end: span.end,
            }),
            Err(()) => errors.push(ParseError::UnexpectedToken {
                position: span.start,
                message: format!("unrecognized input `{}`", &source[span]),
            }),
        }
    }

    let mut parser = Parser {
        source: &source,
        tokens,
        cursor: 0,
    };
    let mut rules = Vec::new();
    while !parser.is_eof() {
        match parser.parse_rule() {
            Ok(rule) => rules.push(rule),
            Err(err) => {
                tracing::warn!(%err, "skipping malformed stylesheet rule");
                errors.push(err);
                parser.recover();
            }
        }
    }
    (rules, errors)
}

struct Parser<'s> {
    source: &'s str,
    tokens: Vec<PToken>,
    cursor: usize,
}

impl<'s> Parser<'s> {
    fn is_eof(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    fn peek(&self) -> Option<PToken> {
        self.tokens.get(self.cursor).copied()
    }

    fn advance(&mut self) -> Option<PToken> {
        let tok = self.peek()?;
        self.cursor += 1;
        Some(tok)
    }

    fn text(&self, from: usize, to: usize) -> &'s str {
        self.source[from..to].trim()
    }

    /// Consume the next token if it is `expected`. A mismatch is left in
    /// place so `recover` sees it.
    fn expect(&mut self, expected: Token) -> Result<PToken, ParseError> {
        match self.peek() {
            Some(tok) if tok.token == expected => {
                self.cursor += 1;
                Ok(tok)
            }
            Some(tok) => Err(ParseError::UnexpectedToken {
                position: tok.start,
                message: format!(
                    "expected {:?}, got `{}`",
                    expected,
                    self.text(tok.start, tok.end)
                ),
            }),
            None => Err(ParseError::UnexpectedEof(format!("expected {expected:?}"))),
        }
    }

    /// Skip past the next `}` (or to the end).
    fn recover(&mut self) {
        while let Some(tok) = self.advance() {
            if tok.token == Token::BraceClose {
                break;
            }
        }
    }

    /// `selector { property: value; ... }`
    fn parse_rule(&mut self) -> Result<RuleSource, ParseError> {
        let first = self.expect(Token::Text)?;
        let mut last = first;
        while let Some(tok) = self.peek() {
            if tok.token != Token::Text {
                break;
            }
            last = tok;
            self.cursor += 1;
        }
        let selector = self.text(first.start, last.end).to_string();
        self.expect(Token::BraceOpen)?;

        let mut rule = RuleSource {
            selector,
            declaration: Default::default(),
        };
        loop {
            match self.peek() {
                Some(PToken {
                    token: Token::BraceClose,
                    ..
                }) => {
                    self.cursor += 1;
                    return Ok(rule);
                }
                Some(PToken {
                    token: Token::Semicolon,
                    ..
                }) => self.cursor += 1,
                Some(_) => {
                    let (property, value) = self.parse_declaration()?;
                    rule.declaration
                        .insert(property, serde_json::Value::String(value));
                }
                None => return Err(ParseError::UnexpectedEof("expected `}`".into())),
            }
        }
    }

    /// `property: value tokens...` up to `;` or `}` (not consumed).
    fn parse_declaration(&mut self) -> Result<(String, String), ParseError> {
        let name = self.expect(Token::Text)?;
        self.expect(Token::Colon)?;

        let mut span: Option<(usize, usize)> = None;
        while let Some(tok) = self.peek() {
            match tok.token {
                Token::Semicolon | Token::BraceClose => break,
                Token::BraceOpen => {
                    return Err(ParseError::UnexpectedToken {
                        position: tok.start,
                        message: "`{` inside declaration value".into(),
                    })
                }
                Token::Text | Token::Colon => {
                    span = Some((span.map_or(tok.start, |s| s.0), tok.end));
                    self.cursor += 1;
                }
            }
        }
        let value = span.map_or("", |(from, to)| self.text(from, to));
        Ok((
            self.text(name.start, name.end).to_string(),
            value.to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_selector_chain() {
        let sel = parse_selector("div .row #title").unwrap();
        assert_eq!(
            sel.parts,
            vec![
                SimpleSelector::Type("div".into()),
                SimpleSelector::Class("row".into()),
                SimpleSelector::Id("title".into()),
            ]
        );
    }

    #[test]
    fn test_parse_selector_trims() {
        let sel = parse_selector("  #main  ").unwrap();
        assert_eq!(sel.parts, vec![SimpleSelector::Id("main".into())]);
    }

    #[test]
    fn test_parse_selector_errors() {
        assert_eq!(parse_selector("   "), Err(SelectorError::Empty));
        assert!(matches!(
            parse_selector("div.row"),
            Err(SelectorError::Compound { at: 3, .. })
        ));
        assert!(matches!(
            parse_selector("a > b"),
            Err(SelectorError::InvalidToken { at: 2, .. })
        ));
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("a/* x */b"), "a b");
        assert_eq!(strip_comments("a /* open"), "a  ");
    }

    #[test]
    fn test_parse_stylesheet_rules() {
        let (rules, errors) = parse_stylesheet(
            "
            /* layout */
            #main { flex-direction: column; border: 1px solid gray }
            .row .cell { flex: 1; }
            ",
        );
        assert!(errors.is_empty());
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].selector, "#main");
        assert_eq!(rules[0].declaration["flex-direction"], json!("column"));
        assert_eq!(rules[0].declaration["border"], json!("1px solid gray"));
        assert_eq!(rules[1].selector, ".row .cell");
        assert_eq!(rules[1].declaration["flex"], json!("1"));
    }

    #[test]
    fn test_parse_stylesheet_recovers_after_broken_rule() {
        let (rules, errors) = parse_stylesheet("div { width 10px; } span { height: 4px; }");
        assert_eq!(errors.len(), 1);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selector, "span");
    }

    #[test]
    fn test_parse_stylesheet_unterminated() {
        let (rules, errors) = parse_stylesheet("div { width: 10px;");
        assert!(rules.is_empty());
        assert!(matches!(errors[0], ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn test_parse_stylesheet_empty_value() {
        let (rules, errors) = parse_stylesheet("div { color: ; }");
        assert!(errors.is_empty());
        assert_eq!(rules[0].declaration["color"], json!(""));
    }
}
