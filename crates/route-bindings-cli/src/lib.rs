//! Project configuration and command implementations for the
//! `route-bindings` command-line tool.
//!
//! The binary itself lives behind the `cli` feature:
//!
//! ```text
//! cargo install route-bindings-cli --features cli
//!
//! route-bindings --config route-bindings.yaml list
//! route-bindings url roles.crear-funcionalidad --args 7
//! route-bindings form stock.imprimir --method head
//! route-bindings generate --output src/routes.rs
//! ```
//!
//! The library half ([`ProjectConfig`], [`resolve_request`],
//! [`resolve_form`], [`list_routes`]) is usable without the feature, e.g.
//! from `xtask` crates.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod commands;
mod config;
mod error;

pub use commands::{list_routes, resolve_form, resolve_request, ResolveInput};
pub use config::{CodegenSection, ProjectConfig};
pub use error::{Error, Result};
