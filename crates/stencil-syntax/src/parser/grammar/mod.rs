//! Grammar rules for templates.
//!
//! The grammar is flat: a template is a sequence of items, and block
//! structure (`@if ... @end`) is left to later analysis so that unbalanced
//! blocks never disturb the shape of the tree.

mod directives;
mod expressions;
mod items;

pub(crate) use items::item;
