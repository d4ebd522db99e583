//! Shared domain types for Parlor.
//!
//! This crate contains the core domain types used across the Parlor client:
//! Username, ChatMessage, the bus wire format, configuration, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod message;
pub mod user;
