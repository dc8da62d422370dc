//! Extraction expression DSL
//!
//! Caller-supplied field expressions are parsed into a small, read-only
//! AST and evaluated against a fixed extraction context (the parsed
//! response document, the work item's query mode, and the green-domain
//! list). There is no host-language evaluation: only path navigation,
//! literals, arithmetic, comparisons, and a pre-registered function
//! table are expressible.
//!
//! Examples:
//! - `content.lighthouseResult.audits["largest-contentful-paint"].numericValue`
//! - `round(content.lighthouseResult.categories.performance.score * 100)`
//! - `content.record.collectionPeriods[*].lastDate`
//! - `contains(green_domains, domain(content.id))`

pub mod ast;
pub mod parser;

pub use ast::{BinaryOp, Expr, Segment, UnaryOp};
pub use parser::parse_expression;
