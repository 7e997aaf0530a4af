//! Shared types and error definitions used across the comet extension crates.

pub mod error;
pub mod types;

pub use {
    error::FromMessage,
    types::{Body, Payload, Request, WrappedMessage},
};
