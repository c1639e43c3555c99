use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::spatial::DistanceUnit;
use crate::{ConfigError, CoreError};

/// Largest page size the query service accepts for `$top`.
pub const MAX_TOP: u32 = 250;

/// A find-by-property query against one entity type of a data source.
///
/// Only `distance_units` is consulted while mapping results; the remaining
/// fields are turned into the request path and OData query options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindByPropertyRequest {
    pub access_id: String,
    pub data_source_name: String,
    pub entity_type_name: String,
    /// OData `$filter` expression, e.g. `PostalCode eq '98004'`.
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub select: Vec<String>,
    #[serde(default)]
    pub order_by: Vec<String>,
    #[serde(default)]
    pub top: Option<u32>,
    #[serde(default)]
    pub skip: Option<u32>,
    #[serde(default)]
    pub distance_units: DistanceUnit,
}

impl FindByPropertyRequest {
    #[must_use]
    pub fn new(
        access_id: impl Into<String>,
        data_source_name: impl Into<String>,
        entity_type_name: impl Into<String>,
    ) -> Self {
        Self {
            access_id: access_id.into(),
            data_source_name: data_source_name.into(),
            entity_type_name: entity_type_name.into(),
            filter: None,
            select: Vec::new(),
            order_by: Vec::new(),
            top: None,
            skip: None,
            distance_units: DistanceUnit::default(),
        }
    }

    /// Checks the fields the request path and paging options depend on.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRequest`] when a path part is blank or
    /// `top` falls outside `1..=MAX_TOP`.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("access_id", &self.access_id),
            ("data_source_name", &self.data_source_name),
            ("entity_type_name", &self.entity_type_name),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::InvalidRequest(format!(
                    "{field} must be non-empty"
                )));
            }
        }

        if let Some(top) = self.top {
            if top == 0 || top > MAX_TOP {
                return Err(CoreError::InvalidRequest(format!(
                    "top must be between 1 and {MAX_TOP}, got {top}"
                )));
            }
        }

        Ok(())
    }
}

/// Load and validate a request from a YAML file.
///
/// A file that omits `distance_units` gets `default_units` rather than the
/// type's own default, so the configured unit applies.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_request(
    path: &Path,
    default_units: DistanceUnit,
) -> Result<FindByPropertyRequest, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RequestFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let raw: serde_yaml::Value = serde_yaml::from_str(&content)?;
    let names_units = raw
        .as_mapping()
        .is_some_and(|m| m.contains_key("distance_units"));

    let mut request: FindByPropertyRequest = serde_yaml::from_value(raw)?;
    if !names_units {
        request.distance_units = default_units;
    }

    request
        .validate()
        .map_err(|e| ConfigError::Validation(e.to_string()))?;

    Ok(request)
}
