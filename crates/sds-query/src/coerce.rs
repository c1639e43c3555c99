//! `m:type` driven coercion of property elements.

use sds_core::Geography;

use crate::types::PropertyValue;
use crate::values::{parse_bool, parse_datetime, parse_f64, parse_i64};
use crate::xml::{XmlElement, METADATA_NS};

/// OData EDM type names the coercer dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdmType {
    Double,
    Int64,
    Boolean,
    DateTime,
    Geography,
    /// `Edm.String`, any unrecognised annotation, or none at all.
    String,
}

impl EdmType {
    #[must_use]
    pub fn from_annotation(annotation: Option<&str>) -> Self {
        match annotation {
            Some("Edm.Double") => EdmType::Double,
            Some("Edm.Int64") => EdmType::Int64,
            Some("Edm.Boolean") => EdmType::Boolean,
            Some("Edm.DateTime") => EdmType::DateTime,
            Some("Edm.Geography") => EdmType::Geography,
            _ => EdmType::String,
        }
    }
}

/// Converts a property element's text into a typed value.
///
/// Never fails: malformed numbers become `0`, malformed booleans `false`,
/// and unparseable dates or empty geographies [`PropertyValue::Null`].
#[must_use]
pub fn coerce_property(property: &XmlElement) -> PropertyValue {
    let text = property.text();
    match EdmType::from_annotation(property.attribute(METADATA_NS, "type")) {
        EdmType::Double => PropertyValue::Double(parse_f64(&text, 0.0)),
        EdmType::Int64 => PropertyValue::Int64(parse_i64(&text, 0)),
        EdmType::Boolean => PropertyValue::Boolean(parse_bool(&text, false)),
        EdmType::DateTime => {
            parse_datetime(&text).map_or(PropertyValue::Null, PropertyValue::DateTime)
        }
        EdmType::Geography if text.is_empty() => PropertyValue::Null,
        EdmType::Geography => PropertyValue::Geography(Geography::new(text)),
        EdmType::String => PropertyValue::String(text),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::xml::parse_document;

    fn property(type_attr: Option<&str>, body: &str) -> XmlElement {
        let attr = type_attr.map_or(String::new(), |t| format!(" m:type=\"{t}\""));
        let xml = format!(
            "<d:P xmlns:d=\"http://schemas.microsoft.com/ado/2007/08/dataservices\" \
             xmlns:m=\"http://schemas.microsoft.com/ado/2007/08/dataservices/metadata\"{attr}>{body}</d:P>"
        );
        parse_document(xml.as_bytes()).expect("valid property xml")
    }

    #[test]
    fn double_annotation() {
        assert_eq!(
            coerce_property(&property(Some("Edm.Double"), "2.75")),
            PropertyValue::Double(2.75)
        );
    }

    #[test]
    fn malformed_double_defaults_to_zero() {
        assert_eq!(
            coerce_property(&property(Some("Edm.Double"), "abc")),
            PropertyValue::Double(0.0)
        );
    }

    #[test]
    fn int64_annotation() {
        assert_eq!(
            coerce_property(&property(Some("Edm.Int64"), "1234567890123")),
            PropertyValue::Int64(1_234_567_890_123)
        );
        assert_eq!(
            coerce_property(&property(Some("Edm.Int64"), "twelve")),
            PropertyValue::Int64(0)
        );
    }

    #[test]
    fn boolean_annotation() {
        assert_eq!(
            coerce_property(&property(Some("Edm.Boolean"), "true")),
            PropertyValue::Boolean(true)
        );
        assert_eq!(
            coerce_property(&property(Some("Edm.Boolean"), "maybe")),
            PropertyValue::Boolean(false)
        );
    }

    #[test]
    fn datetime_annotation() {
        assert_eq!(
            coerce_property(&property(Some("Edm.DateTime"), "2011-03-05T00:00:00")),
            PropertyValue::DateTime(Utc.with_ymd_and_hms(2011, 3, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(
            coerce_property(&property(Some("Edm.DateTime"), "not a date")),
            PropertyValue::Null
        );
    }

    #[test]
    fn geography_annotation() {
        let value = coerce_property(&property(
            Some("Edm.Geography"),
            "POLYGON((0 0,1 0,1 1,0 0))",
        ));
        assert!(value.is_geography());
        assert_eq!(
            value,
            PropertyValue::Geography(Geography::new("POLYGON((0 0,1 0,1 1,0 0))"))
        );
    }

    #[test]
    fn empty_geography_is_null() {
        assert_eq!(
            coerce_property(&property(Some("Edm.Geography"), "")),
            PropertyValue::Null
        );
    }

    #[test]
    fn string_and_unknown_annotations_keep_raw_text() {
        assert_eq!(
            coerce_property(&property(Some("Edm.String"), "hello")),
            PropertyValue::String("hello".to_string())
        );
        assert_eq!(
            coerce_property(&property(Some("Edm.Int32"), "17")),
            PropertyValue::String("17".to_string())
        );
    }

    #[test]
    fn missing_annotation_is_string() {
        assert_eq!(
            coerce_property(&property(None, "hello")),
            PropertyValue::String("hello".to_string())
        );
    }

    #[test]
    fn unrelated_attributes_do_not_count_as_annotation() {
        let xml = "<P xmlns:m=\"http://schemas.microsoft.com/ado/2007/08/dataservices/metadata\" \
                   type=\"Edm.Double\" m:other=\"x\">2.5</P>";
        let el = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(coerce_property(&el), PropertyValue::String("2.5".to_string()));
    }

    #[test]
    fn null_marker_falls_back_to_type_defaults() {
        let nulled = |edm: &str| {
            let xml = format!(
                "<P xmlns:m=\"http://schemas.microsoft.com/ado/2007/08/dataservices/metadata\" \
                 m:type=\"{edm}\" m:null=\"true\" />"
            );
            coerce_property(&parse_document(xml.as_bytes()).unwrap())
        };
        assert_eq!(nulled("Edm.Double"), PropertyValue::Double(0.0));
        assert_eq!(nulled("Edm.Int64"), PropertyValue::Int64(0));
        assert_eq!(nulled("Edm.Boolean"), PropertyValue::Boolean(false));
        assert_eq!(nulled("Edm.String"), PropertyValue::String(String::new()));
        assert_eq!(nulled("Edm.DateTime"), PropertyValue::Null);
        assert_eq!(nulled("Edm.Geography"), PropertyValue::Null);
    }

    #[test]
    fn annotation_lookup_is_exact() {
        assert_eq!(EdmType::from_annotation(Some("edm.double")), EdmType::String);
        assert_eq!(EdmType::from_annotation(None), EdmType::String);
        assert_eq!(EdmType::from_annotation(Some("Edm.Int64")), EdmType::Int64);
    }
}
