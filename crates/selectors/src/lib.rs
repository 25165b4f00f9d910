//! Selector matching for host-page queries.
//!
//! Implements the subset of Selectors Level 3 that the theme's selector
//! table actually uses: type, class, id, and attribute selectors (presence,
//! `=`, and the substring form `*=` the host page's utility classes force on
//! us), plus the four combinators. Matching is abstracted over an
//! [`ElementAdapter`] so the DOM layer stays decoupled.
//!
//! Spec: <https://www.w3.org/TR/selectors-3/>

#![forbid(unsafe_code)]

mod matcher;
mod parser;
mod specificity;

pub use matcher::{matches_complex, matches_compound, matches_list};
pub use parser::{parse_complex, parse_list};
pub use specificity::{Specificity, specificity_of_complex};

use core::error::Error;
use core::fmt;

/// DOM access needed for matching. Implemented by the DOM layer.
pub trait ElementAdapter {
    type Handle: Copy + Eq;

    /// Parent element, if any.
    fn parent(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Previous sibling element, skipping non-element nodes.
    fn previous_sibling_element(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Tag name in ASCII lowercase.
    fn tag_name(&self, element: Self::Handle) -> &str;

    /// Value of the `id` attribute, if present.
    fn element_id(&self, element: Self::Handle) -> Option<&str>;

    /// True if the element's class list contains the given token.
    fn has_class(&self, element: Self::Handle, class: &str) -> bool;

    /// Raw attribute value, if present.
    fn attr(&self, element: Self::Handle, name: &str) -> Option<&str>;
}

/// How an attribute selector compares its value.
/// Spec: Section 8 — Attribute selectors (`[attr]`, `[attr=v]`, `[attr*=v]`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrOp {
    /// `[attr]` — attribute present.
    Exists,
    /// `[attr=value]` — exact value.
    Equals,
    /// `[attr*=value]` — value contains the substring.
    Contains,
}

/// One simple selector.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    /// `*`
    Universal,
    /// `div`
    Tag(String),
    /// `.token`
    Class(String),
    /// `#ident`
    Id(String),
    /// `[name]`, `[name=value]`, `[name*=value]`
    Attr {
        name: String,
        op: AttrOp,
        value: String,
    },
}

/// A sequence of simple selectors with no combinators.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Compound {
    pub parts: Vec<SimpleSelector>,
}

impl Compound {
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Combinators between compounds.
/// Spec: Section 11
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

/// Compounds joined by combinators, stored subject-last: `head` is the
/// leftmost compound and `tail` runs left to right, so the rightmost
/// compound (the subject) is `tail.last()` when `tail` is non-empty.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ComplexSelector {
    pub head: Compound,
    pub tail: Vec<(Combinator, Compound)>,
}

impl ComplexSelector {
    /// The compound the matched element itself must satisfy.
    pub fn subject(&self) -> &Compound {
        self.tail.last().map_or(&self.head, |pair| &pair.1)
    }
}

/// Comma-separated group of complex selectors.
/// Spec: Section 4
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

/// Why a selector string was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The input (or one comma-separated part) contained no selector.
    Empty,
    /// An attribute selector was missing its closing `]`.
    UnclosedAttr,
    /// `.`/`#` was not followed by an identifier, or an unknown byte appeared.
    UnexpectedToken(char),
    /// A combinator had no compound on one of its sides.
    DanglingCombinator,
}

impl fmt::Display for ParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(formatter, "empty selector"),
            Self::UnclosedAttr => write!(formatter, "attribute selector missing ']'"),
            Self::UnexpectedToken(found) => {
                write!(formatter, "unexpected character '{found}' in selector")
            }
            Self::DanglingCombinator => write!(formatter, "combinator without a compound"),
        }
    }
}

impl Error for ParseError {}
