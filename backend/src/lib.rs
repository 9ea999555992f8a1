//! Foodgram backend library.
//!
//! A recipe-sharing service: users publish recipes built from a shared
//! catalogue of tags and ingredients, follow authors, keep favourites and a
//! shopping cart, and download the cart as one aggregated shopping list.
//!
//! The crate is laid out hexagonally: [`domain`] holds types, services and
//! ports; [`inbound`] adapts HTTP onto the services; [`outbound`] implements
//! the ports with Diesel (and an in-memory store behind `test-support`).

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
