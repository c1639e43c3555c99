use reqwest::Url;
use sds_core::FindByPropertyRequest;

use crate::error::QueryError;

/// Builds the GET URL for a find-by-property query.
///
/// Path: `{base}/{access_id}/{data_source_name}/{entity_type_name}`. OData
/// options are appended only when set, followed by `$format=atom` and, if
/// configured, the account `key`. Values are percent-encoded.
///
/// # Errors
///
/// - [`QueryError::InvalidRequest`] when the request fails validation.
/// - [`QueryError::InvalidBaseUrl`] when `base_url` cannot carry a path.
pub fn build_request_url(
    base_url: &Url,
    request: &FindByPropertyRequest,
    key: Option<&str>,
) -> Result<Url, QueryError> {
    request.validate()?;

    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| QueryError::InvalidBaseUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend([
            request.access_id.trim(),
            request.data_source_name.trim(),
            request.entity_type_name.trim(),
        ]);

    {
        let mut pairs = url.query_pairs_mut();
        if let Some(filter) = request.filter.as_deref().filter(|f| !f.trim().is_empty()) {
            pairs.append_pair("$filter", filter);
        }
        if !request.select.is_empty() {
            pairs.append_pair("$select", &request.select.join(","));
        }
        if !request.order_by.is_empty() {
            pairs.append_pair("$orderby", &request.order_by.join(","));
        }
        if let Some(top) = request.top {
            pairs.append_pair("$top", &top.to_string());
        }
        if let Some(skip) = request.skip {
            pairs.append_pair("$skip", &skip.to_string());
        }
        pairs.append_pair("$format", "atom");
        if let Some(key) = key {
            pairs.append_pair("key", key);
        }
    }

    Ok(url)
}

/// `url` without its query string, safe to log or put in an error.
pub(crate) fn redacted(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}
