//! Turns a raw Atom feed body into mapped results.

use sds_core::DistanceUnit;

use crate::error::QueryFailure;
use crate::mapper::map_entry;
use crate::types::QueryResult;
use crate::xml::{parse_document, ATOM_NS};

/// Parses `body` as an Atom feed and maps every `entry` element, in
/// document order.
///
/// Entries are found anywhere in the document, the root included.
///
/// # Errors
///
/// Returns a [`QueryFailure`] when the body is not a well-formed document
/// (no partial results) or an entry cannot be mapped (every earlier entry
/// kept in `partial_results`). Mapping stops at the first failing entry.
pub fn parse_feed(
    body: &[u8],
    distance_units: DistanceUnit,
) -> Result<Vec<QueryResult>, QueryFailure> {
    let document = parse_document(body)?;

    let mut results = Vec::new();
    let entries = std::iter::once(&document)
        .chain(document.descendants())
        .filter(|el| el.is(ATOM_NS, "entry"));

    for entry in entries {
        match map_entry(entry, distance_units) {
            Ok(result) => results.push(result),
            Err(error) => return Err(QueryFailure::new(results, error)),
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::types::{PropertyValue, QueryResponse};

    fn feed(entries: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?>
<feed xml:base="https://spatial.virtualearth.net/REST/v1/data/abc/FourthCoffeeSample/FourthCoffeeShops"
      xmlns="http://www.w3.org/2005/Atom"
      xmlns:d="http://schemas.microsoft.com/ado/2007/08/dataservices"
      xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata">
  <title type="text" />
  <id>uuid:8a7c7d58-0c0d-4f7c-9a3c-000000000000</id>
  <updated>2017-05-01T00:00:00Z</updated>
  {entries}
</feed>"#
        )
    }

    fn shop(id: u32, name: &str) -> String {
        format!(
            r#"<entry>
    <id>https://spatial.virtualearth.net/REST/v1/data/abc/FourthCoffeeSample/FourthCoffeeShops('{id}')</id>
    <title type="text" />
    <updated>2017-05-01T00:00:00Z</updated>
    <content type="application/xml">
      <m:properties>
        <d:EntityID>{id}</d:EntityID>
        <d:Name>{name}</d:Name>
        <d:Latitude m:type="Edm.Double">47.6</d:Latitude>
        <d:Longitude m:type="Edm.Double">-122.3</d:Longitude>
        <d:IsWifiHotSpot m:type="Edm.Boolean">true</d:IsWifiHotSpot>
        <d:__Distance m:type="Edm.Double">1.5</d:__Distance>
      </m:properties>
    </content>
  </entry>"#
        )
    }

    #[test]
    fn one_result_per_entry_in_document_order() {
        let body = feed(&[shop(1, "Pine"), shop(2, "Union"), shop(3, "Pike")].concat());
        let results = parse_feed(body.as_bytes(), DistanceUnit::Kilometers).unwrap();
        let names: Vec<_> = results
            .iter()
            .map(|r| r.properties["Name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Pine", "Union", "Pike"]);
        assert!(results[1].entity_url.ends_with("FourthCoffeeShops('2')"));
        assert_eq!(
            results[0].properties.get("IsWifiHotSpot"),
            Some(&PropertyValue::Boolean(true))
        );
        assert!((results[2].distance.unwrap() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn feed_level_id_is_not_an_entry() {
        let results = parse_feed(feed("").as_bytes(), DistanceUnit::Kilometers).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn root_entry_is_mapped() {
        let body = r#"<entry xmlns="http://www.w3.org/2005/Atom"><id>urn:solo</id></entry>"#;
        let results = parse_feed(body.as_bytes(), DistanceUnit::Kilometers).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entity_url, "urn:solo");
    }

    #[test]
    fn entries_outside_atom_namespace_are_skipped() {
        let body = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:x="urn:other">
            <x:entry><id>urn:skip</id></x:entry>
            <entry><id>urn:keep</id></entry>
        </feed>"#;
        let results = parse_feed(body.as_bytes(), DistanceUnit::Kilometers).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entity_url, "urn:keep");
    }

    #[test]
    fn malformed_document_has_no_partial_results() {
        let body = feed(&shop(1, "Pine")).replace("</feed>", "</fed>");
        let failure = parse_feed(body.as_bytes(), DistanceUnit::Kilometers).unwrap_err();
        assert!(failure.partial_results.is_empty());
        assert!(matches!(failure.error, QueryError::Xml(_)), "got {:?}", failure.error);
    }

    #[test]
    fn mapping_failure_keeps_earlier_entries() {
        let bad = r#"<entry><id>urn:bad</id><content type="text">oops</content></entry>"#;
        let body = feed(
            &[shop(1, "Pine"), shop(2, "Union"), bad.to_string(), shop(4, "Pike")].concat(),
        );
        let failure = parse_feed(body.as_bytes(), DistanceUnit::Kilometers).unwrap_err();
        assert_eq!(failure.partial_results.len(), 2);
        assert!(matches!(failure.error, QueryError::Mapping(_)));

        let response = QueryResponse::from(Err(failure));
        assert_eq!(response.results.len(), 2);
        assert!(response.error_message.unwrap().contains("urn:bad"));
    }

    #[test]
    fn has_geography_is_false_without_geography_properties() {
        let body = feed(&shop(1, "Pine"));
        let results = parse_feed(body.as_bytes(), DistanceUnit::Kilometers).unwrap();
        assert!(!results[0].has_geography);
    }
}
