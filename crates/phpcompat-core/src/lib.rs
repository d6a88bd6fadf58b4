//! phpcompat-core: Core abstractions for PHP version-compatibility checks
//!
//! This crate provides:
//! - `Token` / `TokenStream`: a flat token sequence with find-next/previous queries
//! - `tokenize()`: that sequence built from the mago-syntax PHP lexer
//! - `compare()`: numeric, component-wise PHP version ordering
//! - `TestedVersionRange`: the configured `testVersion` window and its gates
//! - `Diagnostic`: the message/code/data tuple sniffs report

mod diagnostic;
pub mod lexer;
pub mod logging;
pub mod test_version;
pub mod token;
pub mod version;

pub use diagnostic::{error_code_for, Diagnostic, Severity};
pub use lexer::{tokenize, tokenize_snippet};
pub use test_version::{ConfigSource, RangeError, TestedVersionRange};
pub use token::{Token, TokenKind, TokenStream};
pub use version::compare;
