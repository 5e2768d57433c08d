//! Configuration-tree primitives for secretcfg
//!
//! A runtime configuration is a nested JSON object. This crate provides the
//! two local operations the secret loader is built on:
//!
//! - [`tree::set_value`] - write a string value at a dotted or
//!   double-underscore path, creating intermediate objects as needed
//! - [`scan::placeholders`] - find `{GoogleSecret:...}` references embedded
//!   in existing string values

pub mod scan;
pub mod tree;

pub use scan::{DEFAULT_SCAN_ROOTS, DEFAULT_VERSION, PlaceholderEntry, placeholders};
pub use tree::{ConfigTree, set_value};
