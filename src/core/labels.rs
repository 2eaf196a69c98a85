use crate::core::fields::{attribute_code, find_key, FieldIndex};
use crate::domain::layer::{CodedValueDomain, Domain, FieldInfo, LayerSchema};
use crate::domain::model::FeatureAttributes;
use std::borrow::Cow;

/// Coded value domain for `field`, preferring the one scoped to the feature's
/// subtype. Subtype domains are stored as raw JSON and are reified here, so
/// they come back owned; layer-level domains are borrowed.
pub fn coded_domain<'l>(
    attributes: &FeatureAttributes,
    field: &str,
    layer: &'l LayerSchema,
) -> Option<Cow<'l, CodedValueDomain>> {
    if let Some(domain) = subtype_domain(attributes, field, layer) {
        return Some(Cow::Owned(domain));
    }
    layer_domain(field, layer).map(Cow::Borrowed)
}

fn subtype_domain(
    attributes: &FeatureAttributes,
    field: &str,
    layer: &LayerSchema,
) -> Option<CodedValueDomain> {
    let subtype_field = layer.subtype_field.as_deref()?;
    let subtype_code = FieldIndex::new(attributes)
        .value(subtype_field)
        .and_then(attribute_code)?;
    let subtype = layer.subtypes.iter().find(|s| s.code == subtype_code)?;

    let raw = match subtype.domains.get(field) {
        Some(raw) => raw,
        None => subtype.domains.get(find_key(subtype.domains.keys(), field)?)?,
    };

    match Domain::from_raw(raw)? {
        Domain::CodedValue(coded) => Some(coded),
        _ => {
            tracing::trace!(subtype = subtype.code, field, "Subtype domain defers to layer");
            None
        }
    }
}

fn layer_domain<'l>(field: &str, layer: &'l LayerSchema) -> Option<&'l CodedValueDomain> {
    let coded = |f: &'l FieldInfo| f.domain.as_ref().and_then(Domain::as_coded);
    layer
        .fields
        .iter()
        .filter(|f| f.name == field)
        .find_map(coded)
        .or_else(|| {
            layer
                .fields
                .iter()
                .filter(|f| f.name.eq_ignore_ascii_case(field))
                .find_map(coded)
        })
}

/// Display name of the feature's code in `field`, if a coded domain covers it.
pub fn get_coded_label(
    attributes: &FeatureAttributes,
    field: &str,
    layer: &LayerSchema,
) -> Option<String> {
    let domain = coded_domain(attributes, field, layer)?;
    let code = FieldIndex::new(attributes).value(field)?;
    if code.is_null() {
        return None;
    }
    domain.get_name(code).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layer() -> LayerSchema {
        serde_json::from_value(json!({
            "id": 5,
            "name": "Electric Device",
            "subtypeField": "ASSETGROUP",
            "fields": [
                {"name": "ASSETGROUP", "type": "esriFieldTypeInteger"},
                {
                    "name": "ASSETTYPE",
                    "type": "esriFieldTypeSmallInteger",
                    "domain": {"type": "codedValue", "name": "Layer Types", "codedValues": [
                        {"name": "Generic Device", "code": 7},
                        {"name": "Generic Other", "code": 8}
                    ]}
                }
            ],
            "subtypes": [
                {"code": 3, "name": "Switch", "domains": {
                    "ASSETTYPE": {"type": "codedValue", "name": "Switch Types", "codedValues": [
                        {"name": "Fuse", "code": 7}
                    ]}
                }},
                {"code": 4, "name": "Transformer", "domains": {}},
                {"code": 6, "name": "Capacitor", "domains": {"ASSETTYPE": {"type": "inherited"}}}
            ]
        }))
        .unwrap()
    }

    fn attributes(value: serde_json::Value) -> FeatureAttributes {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_subtype_domain_preferred() {
        let attrs = attributes(json!({"assetgroup": 3, "assettype": 7}));
        assert_eq!(get_coded_label(&attrs, "ASSETTYPE", &layer()), Some("Fuse".to_string()));
    }

    #[test]
    fn test_subtype_without_domain_falls_back_to_layer() {
        let attrs = attributes(json!({"assetgroup": 4, "assettype": 7}));
        assert_eq!(
            get_coded_label(&attrs, "ASSETTYPE", &layer()),
            Some("Generic Device".to_string())
        );

        let inherited = attributes(json!({"assetgroup": 6, "assettype": 8}));
        assert_eq!(
            get_coded_label(&inherited, "ASSETTYPE", &layer()),
            Some("Generic Other".to_string())
        );
    }

    #[test]
    fn test_no_domain_configured() {
        let attrs = attributes(json!({"assetgroup": 3, "assettype": 7}));
        assert_eq!(get_coded_label(&attrs, "ASSETGROUP", &layer()), None);

        let mut bare = layer();
        bare.subtype_field = None;
        bare.fields[1].domain = None;
        assert_eq!(get_coded_label(&attrs, "ASSETTYPE", &bare), None);
    }

    #[test]
    fn test_unknown_code_has_no_label() {
        let attrs = attributes(json!({"assetgroup": 3, "assettype": 99}));
        assert_eq!(get_coded_label(&attrs, "ASSETTYPE", &layer()), None);
    }

    #[test]
    fn test_exact_field_name_wins_over_folded_match() {
        let layer: LayerSchema = serde_json::from_value(json!({
            "id": 5,
            "name": "Electric Device",
            "fields": [
                {"name": "assettype", "domain": {"type": "codedValue", "name": "Lower",
                    "codedValues": [{"name": "Lower", "code": 7}]}},
                {"name": "ASSETTYPE", "domain": {"type": "codedValue", "name": "Upper",
                    "codedValues": [{"name": "Upper", "code": 7}]}}
            ]
        }))
        .unwrap();

        let attrs = attributes(json!({"ASSETTYPE": 7}));
        assert_eq!(get_coded_label(&attrs, "ASSETTYPE", &layer), Some("Upper".to_string()));
        assert_eq!(get_coded_label(&attrs, "assettype", &layer), Some("Lower".to_string()));
        assert_eq!(get_coded_label(&attrs, "AssetType", &layer), Some("Lower".to_string()));
    }

    #[test]
    fn test_subtype_domain_is_owned_layer_domain_borrowed() {
        let layer = layer();
        let attrs = attributes(json!({"assetgroup": 3}));
        assert!(matches!(coded_domain(&attrs, "ASSETTYPE", &layer), Some(Cow::Owned(_))));
        let attrs = attributes(json!({"assetgroup": 4}));
        assert!(matches!(coded_domain(&attrs, "ASSETTYPE", &layer), Some(Cow::Borrowed(_))));
    }
}
