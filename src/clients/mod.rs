//! Outbound side: request construction and the upstream executor.

pub mod request;
pub mod upstream;
