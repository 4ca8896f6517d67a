//! Deterministic DOM widget runtime for restaurant registration forms.
//!
//! The crate parses a page's HTML into a lightweight DOM, installs the
//! registration-form widgets (holiday picker, tag rows, star rating, photo
//! lightbox, nav-icon swap, autocomplete defaults) as native controllers,
//! and exposes a [`Harness`] that drives clicks and hovers against them and
//! asserts on the resulting DOM. Everything is synchronous and
//! single-threaded; a driver call completes all of its DOM updates before
//! returning.

use std::error::Error as StdError;
use std::fmt;

mod dom;
mod events;
mod harness;
mod html;
mod selector;
mod widgets;

pub use harness::Harness;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    WidgetRuntime(String),
    SelectorNotFound(String),
    UnsupportedSelector(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::WidgetRuntime(msg) => write!(f, "widget runtime error: {msg}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests;
