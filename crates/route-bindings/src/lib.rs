//! Runtime URL resolution for client-side route bindings.
//!
//! A [`RouteRegistry`] mirrors the server's route table. For each route it
//! turns caller arguments into a concrete URL, a `{url, method}` request
//! descriptor, or an HTML form `{action, method}` pair:
//!
//! ```
//! use route_bindings::{Method, QueryOptions, RouteArgs, RouteDefinition, RouteRegistry};
//!
//! let registry = RouteRegistry::builder()
//!     .route(RouteDefinition::new("stock.imprimir", &[Method::Get], "/stock/imprimir").unwrap())
//!     .route(RouteDefinition::new("posts.comments.show", &[Method::Get], "/posts/{post}/comments/{comment}").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let show = registry.endpoint("posts.comments.show").unwrap();
//! let none = QueryOptions::new();
//! assert_eq!(show.url([1, 2], &none).unwrap(), "/posts/1/comments/2");
//! assert_eq!(
//!     show.url(RouteArgs::named([("post", 1), ("comment", 2)]), &none).unwrap(),
//!     "/posts/1/comments/2",
//! );
//!
//! let stock = registry.endpoint("stock.imprimir").unwrap();
//! let form = stock.form_as(Method::Head, (), &none).unwrap();
//! assert_eq!(form.action, "/stock/imprimir?_method=HEAD");
//! ```
//!
//! # Resolution pipeline
//!
//! 1. [`normalize`] binds arguments (single, positional, named or entity)
//!    to placeholders and applies defaults.
//! 2. [`substitute`] fills the URL template.
//! 3. [`QueryOptions::resolve`] combines context, `query` and `merge_query`,
//!    and [`serialize`] renders it with bracket conventions.
//! 4. For forms, [`form_method_for`] and [`apply_override`] spoof methods
//!    HTML cannot submit.
//!
//! Every step is pure; errors are [`ResolveError`] values and no partial
//! URL is ever returned.
//!
//! # Companion Crates
//!
//! | Crate                   | Purpose            | Cargo section           |
//! |-------------------------|--------------------|-------------------------|
//! | `route-bindings` (this) | Runtime resolution | `[dependencies]`        |
//! | `route-bindings-build`  | Build-time codegen | `[build-dependencies]`  |
//! | `route-bindings-cli`    | Config + CLI       | binary                  |

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod args;
mod endpoint;
mod error;
mod form;
mod query;
mod registry;
mod template;

pub use args::{normalize, RouteArg, RouteArgs};
pub use endpoint::Endpoint;
pub use error::{ResolveError, Result};
pub use form::{
    apply_override, form_method_for, FormDescriptor, FormMethod, RouteRequest,
    DEFAULT_OVERRIDE_PARAM,
};
pub use query::{
    decode, serialize, ArrayFormat, QueryMap, QueryOptions, QueryValue, MAX_DECODE_DEPTH,
};
pub use registry::{RouteRegistry, RouteRegistryBuilder};
pub use template::substitute;

pub use route_bindings_core::{
    ManifestError, ManifestRoute, Method, ParseMethodError, Placeholder, RouteDefinition,
    RouteManifest, RouteTemplate, Scalar, Segment, SourceLocation, TemplateError,
    DEFAULT_BINDING_FIELD,
};
