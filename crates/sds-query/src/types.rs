use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sds_core::{Geography, Location};
use serde::Serialize;

use crate::error::QueryFailure;

/// A property value after `m:type` dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Double(f64),
    Int64(i64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Geography(Geography),
    String(String),
    /// Empty geography, an unparseable date, or an OData `m:null` marker.
    Null,
}

impl PropertyValue {
    #[must_use]
    pub fn is_geography(&self) -> bool {
        matches!(self, PropertyValue::Geography(_))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

/// One mapped feed entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Text of the entry's Atom `id`; empty when the entry has none.
    pub entity_url: String,
    pub location: Location,
    /// Distance from the query point, already in the request's units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intersected_geography: Option<Geography>,
    /// Unrouted properties keyed by their element name as written. The first
    /// occurrence of a name wins.
    pub properties: BTreeMap<String, PropertyValue>,
    /// Set when any entry in `properties` is a [`PropertyValue::Geography`].
    pub has_geography: bool,
}

impl QueryResult {
    #[must_use]
    pub fn new(entity_url: impl Into<String>) -> Self {
        Self {
            entity_url: entity_url.into(),
            ..Self::default()
        }
    }
}

/// Envelope handed back by [`crate::QueryClient::execute`].
///
/// `error_message` is set if and only if the query stopped early; `results`
/// then holds whatever was mapped before the failure. Callers must treat a
/// present `error_message` as a failed query no matter how many results
/// came back.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub results: Vec<QueryResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl QueryResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error_message.is_none()
    }
}

impl From<Result<Vec<QueryResult>, QueryFailure>> for QueryResponse {
    fn from(outcome: Result<Vec<QueryResult>, QueryFailure>) -> Self {
        match outcome {
            Ok(results) => Self {
                results,
                error_message: None,
            },
            Err(failure) => Self {
                results: failure.partial_results,
                error_message: Some(failure.error.to_string()),
            },
        }
    }
}
