//! Style engine: tokenizer, parser, specificity, cascade.

pub mod tokenizer;
pub mod model;
pub mod parser;
pub mod specificity;
pub mod computed;
pub mod properties;
pub mod stylesheet;

pub use computed::{ComputedStyle, StyleEntry};
pub use model::{RuleSource, Selector, SimpleSelector, StyleRule};
pub use parser::{parse_selector, parse_stylesheet, ParseError, SelectorError};
pub use specificity::Specificity;
pub use stylesheet::{RuleError, Stylesheet};
