#![allow(clippy::type_complexity)]
//! A lossless, style-preserving parser and editor for TOML documents.
//!
//! This crate parses TOML into a mutable concrete syntax tree, built on the
//! [rowan] library, and can write it back out byte-for-byte unless
//! something was actually changed: quoting style, numeric base, thousands
//! separators, comments, and blank lines all survive a parse/re-emit cycle
//! untouched.
//!
//! Once parsed, a [`Document`] can be read through [`Table`]/[`ArrayValue`]
//! handles, mutated in place, and written back out with [`ToString`] (or
//! just printed — it implements [`std::fmt::Display`]).
//!
//! # Example
//!
//! ```rust
//! use toml_lossless::Document;
//! use std::str::FromStr;
//!
//! let input = r#"# project metadata
//! name = "demo"
//! version = "0.1.0"
//!
//! [dependencies]
//! rowan = "0.16"
//! "#;
//!
//! let mut doc = Document::from_str(input).unwrap();
//! let mut deps = doc.root_mut().get_or_create_table("dependencies");
//! deps.set("regex", "1").unwrap();
//! assert!(doc.to_string().contains("regex = \"1\""));
//! // everything before the edit is untouched, comment included
//! assert!(doc.to_string().starts_with("# project metadata\n"));
//! ```

mod common;
mod cursor;
pub mod document;
mod error;
mod lex;
pub mod native;
mod parser;
pub mod value;

pub use document::{ArrayOfTables, ArrayValue, Document, Item, Table, Value};
pub use error::{Error, ErrorKind, Result};
pub use native::{from_native, to_native, Native};
