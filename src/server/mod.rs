// src/server/mod.rs
pub mod builder;
pub mod endpoints;
pub mod error_page;
pub mod handler;
pub mod route;

pub use builder::ServerBuilder;
pub use endpoints::Endpoints;
pub use error_page::{ErrorPage, ErrorPageLayer};
pub use handler::{OpsEndpoints, OpsLayer};
pub use route::resolve_route;
