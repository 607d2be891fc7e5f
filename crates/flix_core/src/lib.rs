//! Provide the pure, static language data shared by the Flix lexer, parser and tooling.
//!
//! This crate is intentionally small. It holds vocabulary registries (keywords, punctuation), the character
//! classifier used by the lexer, and the immutable precedence table consulted by the grammar engine.
//!
//! ## Notes
//!
//! - This is a "data core" crate: **no IO**, no global mutable state, and no syntax-tree types.
//! - Everything here is either a `const` table or a pure function over one.

pub mod chars;
pub mod lang;
