//! Core types: the error taxonomy and the result envelope shared by every tool.

pub mod envelope;
pub mod error;
