//! logos-based tokenizers for selectors and stylesheet text.
//!
//! Two small lexers:
//!
//! - [`SelectorToken`] splits a selector such as `div .card #title` into simple
//!   selectors. Whitespace is a real token here: two simple selectors with no
//!   whitespace between them (`div.card`) form a compound selector, which this
//!   engine does not support.
//! - [`Token`] splits stylesheet text into braces, colons, semicolons and runs
//!   of free text. Declaration values are recovered from the source spans, so
//!   `1px dotted gray` survives as written.

use logos::Logos;

/// Token inside a selector string.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorToken {
    /// `#name`
    #[regex(r"#[A-Za-z_-][A-Za-z0-9_-]*")]
    Id,

    /// `.name`
    #[regex(r"\.[A-Za-z_-][A-Za-z0-9_-]*")]
    Class,

    /// Bare tag name.
    #[regex(r"[A-Za-z_-][A-Za-z0-9_-]*")]
    Tag,

    /// Separator between simple selectors.
    #[regex(r"[ \t\n\r\f]+")]
    Whitespace,
}

/// Token inside stylesheet text.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// `{`
    #[token("{")]
    BraceOpen,

    /// `}`
    #[token("}")]
    BraceClose,

    /// `:`
    #[token(":")]
    Colon,

    /// `;`
    #[token(";")]
    Semicolon,

    /// Any run of characters that is not whitespace or punctuation above.
    #[regex(r"[^ \t\n\r\f{}:;]+")]
    Text,
}
