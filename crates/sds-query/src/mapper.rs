//! Maps one Atom `entry` element into a [`QueryResult`].

use std::collections::btree_map::Entry;

use sds_core::{convert_distance, DistanceUnit, Geography};

use crate::coerce::coerce_property;
use crate::error::QueryError;
use crate::types::QueryResult;
use crate::values::parse_f64;
use crate::xml::{XmlElement, XmlNode, ATOM_NS};

/// Where a property element's value ends up.
///
/// Looked up once per element from its lower-cased local name; anything not
/// in the table goes to the generic property bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyRoute {
    Latitude,
    Longitude,
    /// `__Distance`, always reported by the service in kilometers.
    Distance,
    /// `__IntersectedGeom`, the part of the entity's geometry that
    /// intersects a spatial filter.
    IntersectedGeometry,
    Generic,
}

impl PropertyRoute {
    #[must_use]
    pub fn for_name(local_name: &str) -> Self {
        match local_name.to_lowercase().as_str() {
            "latitude" => PropertyRoute::Latitude,
            "longitude" => PropertyRoute::Longitude,
            "__distance" => PropertyRoute::Distance,
            "__intersectedgeom" => PropertyRoute::IntersectedGeometry,
            _ => PropertyRoute::Generic,
        }
    }
}

/// Builds a result from one feed entry.
///
/// The entity URL comes from the Atom `id` child (empty when missing). The
/// first child element of `content` is the properties container; every
/// element below it, nested ones included, is routed through
/// [`PropertyRoute`].
///
/// # Errors
///
/// Returns [`QueryError::Mapping`] when `content` starts with text instead
/// of a properties element.
pub fn map_entry(
    entry: &XmlElement,
    distance_units: DistanceUnit,
) -> Result<QueryResult, QueryError> {
    let entity_url = match entry.child(ATOM_NS, "id") {
        Some(id) => id.text(),
        None => {
            tracing::debug!("feed entry has no id element");
            String::new()
        }
    };
    let mut result = QueryResult::new(entity_url);

    let Some(content) = entry.child(ATOM_NS, "content") else {
        return Ok(result);
    };

    let properties = match content.first_node() {
        None => return Ok(result),
        Some(XmlNode::Element(properties)) => properties,
        Some(XmlNode::Text(_)) => {
            return Err(QueryError::Mapping(format!(
                "content of entry '{}' is text, expected a properties element",
                result.entity_url
            )));
        }
    };

    for property in properties.descendants() {
        apply_property(&mut result, property, distance_units);
    }

    Ok(result)
}

fn apply_property(
    result: &mut QueryResult,
    property: &XmlElement,
    distance_units: DistanceUnit,
) {
    let name = property.local_name();
    match PropertyRoute::for_name(name) {
        PropertyRoute::Latitude => {
            result.location.latitude = parse_f64(&property.text(), 0.0);
        }
        PropertyRoute::Longitude => {
            result.location.longitude = parse_f64(&property.text(), 0.0);
        }
        PropertyRoute::Distance => {
            let km = parse_f64(&property.text(), 0.0);
            result.distance = Some(convert_distance(
                km,
                DistanceUnit::Kilometers,
                distance_units,
            ));
        }
        PropertyRoute::IntersectedGeometry => {
            let wkt = property.text();
            if !wkt.is_empty() {
                result.intersected_geography = Some(Geography::new(wkt));
            }
        }
        PropertyRoute::Generic => {
            if let Entry::Vacant(slot) = result.properties.entry(name.to_string()) {
                let value = slot.insert(coerce_property(property));
                if value.is_geography() {
                    result.has_geography = true;
                }
            }
        }
    }
}
