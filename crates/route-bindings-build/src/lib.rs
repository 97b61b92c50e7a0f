//! Build-time code generation for client-side route bindings.
//!
//! Turns the server's route manifest into a Rust module: a static
//! [`RouteRegistry`](https://docs.rs/route-bindings) plus one endpoint
//! function per route, nested by the route's dotted name.
//!
//! ```text
//! roles.crear-funcionalidad  →  routes::roles::crear_funcionalidad()
//! stock.imprimir             →  routes::stock::imprimir()
//! ```
//!
//! # Usage
//!
//! ```toml
//! [dependencies]
//! route-bindings = "0.1"
//!
//! [build-dependencies]
//! route-bindings-build = "0.1"
//! ```
//!
//! # Companion Crate
//!
//! | Crate                         | Purpose            | Cargo section          |
//! |-------------------------------|--------------------|------------------------|
//! | `route-bindings`              | Runtime resolution | `[dependencies]`       |
//! | `route-bindings-build` (this) | Build-time codegen | `[build-dependencies]` |

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod codegen;
#[cfg(feature = "helpers")]
mod helpers;

pub use codegen::{generate, generate_from_manifest, BindingsCodegenConfig, GenerateError};
#[cfg(feature = "helpers")]
pub use helpers::{try_write_bindings, write_bindings};
