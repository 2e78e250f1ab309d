//! Neugram front end
//!
//! Lexer, parser and type checker for Neugram, a scripting language with
//! Go's type system plus `num`-generic functions, tables, methodik
//! declarations and embedded shell expressions.
//!
//! # Example
//!
//! ```rust
//! use neugram::frontend::Compiler;
//!
//! let mut compiler = Compiler::new();
//! let file = compiler
//!     .check_source("hello.ng", "x := 1 + 2\nprint(x)\n")
//!     .unwrap();
//! assert_eq!(file.stmts.len(), 2);
//! ```

#![doc(html_root_url = "https://docs.rs/neugram")]
#![warn(rust_2018_idioms)]

pub mod frontend;
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use frontend::{CompileError, Compiler};
pub use thiserror::Error;

/// Language version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Language name
pub const NAME: &str = "Neugram";
