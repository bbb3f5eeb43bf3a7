//! LispIsh: a small parenthesized expression language for eligibility predicates.
//!
//! ```
//! let tree = lispish::parse(r#"(and (= (user-email) "a@b.c") (cohort 3))"#).unwrap();
//! assert_eq!(tree.canonical_name(), "AND");
//! assert_eq!(tree.args().len(), 2);
//! assert_eq!(lispish::parse(&tree.emit(0)).unwrap(), tree);
//! ```
//!
//! Parsing gives a tree with no meaning attached;
//! evaluators dispatch on each call's canonical (uppercase) name.

pub mod reader;
pub use reader::{
    canonicalize, parse, Expected, ParseError, ParseErrorKind, Position, MAX_DEPTH,
};

pub mod data;
pub use data::{Integer, Method, Value};

#[cfg(feature = "render")]
pub mod render;
#[cfg(feature = "render")]
pub use render::render_tree;

#[cfg(feature = "web")]
pub mod web;
