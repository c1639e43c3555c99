//! Client-side query processor for an OData/Atom spatial data service.
//!
//! Issues one GET per find-by-property request, parses the Atom feed into a
//! namespace-aware element tree, and maps every `entry` into a typed
//! [`QueryResult`]: coordinates and distance are routed into dedicated
//! fields, everything else is coerced by its `m:type` annotation into a
//! [`PropertyValue`].

pub mod client;
pub mod coerce;
pub mod error;
pub mod executor;
pub mod mapper;
pub mod request_url;
pub mod types;
pub mod values;
pub mod xml;

pub use client::QueryClient;
pub use coerce::coerce_property;
pub use error::{QueryError, QueryFailure};
pub use executor::parse_feed;
pub use mapper::{map_entry, PropertyRoute};
pub use request_url::build_request_url;
pub use types::{PropertyValue, QueryResponse, QueryResult};
