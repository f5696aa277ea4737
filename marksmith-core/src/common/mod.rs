//! Contains logic shared between the lexer, annotator and serializer.

pub mod escape;
pub mod tree_walk;
