//! SitePulse Core - Core types for the SitePulse measurement tracker
//!
//! This crate provides the fundamental types used across the SitePulse
//! workspace:
//! - Value types for parsed response documents
//! - Work item, device and status definitions
//! - Field definitions and the provider catalogue
//! - The sandboxed extraction expression DSL (AST + parser)
//! - Error types

pub mod error;
pub mod expr;
pub mod field;
pub mod item;
pub mod types;

// Re-export commonly used types
pub use error::CoreError;
pub use expr::{parse_expression, BinaryOp, Expr, Segment};
pub use field::{FieldDefinition, Provider};
pub use item::{ConfiguredRow, Device, ItemStatus, QueryMode, WorkItem};
pub use types::Value;
