//! Model to entity mappers
//!
//! Rows are converted with `TryFrom` because enum-like text and integer
//! columns can hold values the domain does not know about.

mod reaction;
mod user;

pub use reaction::target_kind_from_str;
