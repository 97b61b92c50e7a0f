//! Shared route table types for the route-bindings ecosystem.
//!
//! This crate describes the server's route table as the client sees it:
//! HTTP methods, URL templates with named placeholders, per-route defaults,
//! and the manifest format the table is loaded from.
//!
//! Both `route-bindings` (runtime resolution) and `route-bindings-build`
//! (build-time codegen) depend on these types. You should not need to depend
//! on this crate directly — `route-bindings` re-exports everything here.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod definition;
mod error;
mod manifest;
mod method;
mod scalar;
mod template;

pub use definition::{RouteDefinition, SourceLocation};
pub use error::{ManifestError, TemplateError};
pub use manifest::{ManifestRoute, RouteManifest};
pub use method::{Method, ParseMethodError};
pub use scalar::Scalar;
pub use template::{Placeholder, RouteTemplate, Segment, DEFAULT_BINDING_FIELD};
