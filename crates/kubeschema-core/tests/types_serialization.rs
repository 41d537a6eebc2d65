use kubeschema_core::types::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn attribute(name: &str, attribute_type: AttributeType) -> Attribute {
    Attribute {
        name: name.into(),
        path: name.into(),
        attribute_type,
        description: None,
        required: false,
        computed: false,
        sensitive: false,
        immutable: false,
        has_default: false,
        synthetic_default: false,
    }
}

#[test]
fn attribute_json_keys() {
    let attr = attribute(
        "data",
        AttributeType::Map {
            element: ScalarType::String,
        },
    );
    let json = serde_json::to_value(&attr).unwrap();
    let obj = json.as_object().unwrap();

    assert!(obj.contains_key("name"));
    assert!(obj.contains_key("path"));
    assert!(obj.contains_key("type"));
    assert!(obj.contains_key("element"));
    assert!(obj.contains_key("required"));
    assert!(obj.contains_key("synthetic_default"));
    assert!(!obj.contains_key("description"));
    assert!(!obj.contains_key("attribute_type"));

    assert_eq!(obj["type"], "map");
    assert_eq!(obj["element"], "string");
}

#[test]
fn nested_attribute_json() {
    let attr = Attribute {
        path: "spec.ports".into(),
        ..attribute(
            "ports",
            AttributeType::ListObject {
                attributes: vec![Attribute {
                    path: "spec.ports[*].port".into(),
                    required: true,
                    ..attribute("port", AttributeType::Integer)
                }],
            },
        )
    };
    let json = serde_json::to_value(&attr).unwrap();
    assert_eq!(json["type"], "list_object");
    assert_eq!(json["attributes"][0]["path"], "spec.ports[*].port");
    assert_eq!(json["attributes"][0]["type"], "integer");
    assert_eq!(json["attributes"][0]["required"], true);
}

#[test]
fn attribute_round_trips_through_json() {
    let attr = attribute(
        "metadata",
        AttributeType::Object {
            attributes: vec![attribute("name", AttributeType::String)],
        },
    );
    let json = serde_json::to_string(&attr).unwrap();
    let back: Attribute = serde_json::from_str(&json).unwrap();
    assert_eq!(back, attr);
}

#[test]
fn field_mapping_json() {
    let field = FieldMapping {
        attribute_name: "api_version".into(),
        manifest_key: "apiVersion".into(),
        field_name: "APIVersion".into(),
        kind: FieldKind::String,
        synthetic: false,
    };
    assert_eq!(
        serde_json::to_value(&field).unwrap(),
        json!({
            "attribute_name": "api_version",
            "manifest_key": "apiVersion",
            "field_name": "APIVersion",
            "type": "string"
        })
    );

    let id = FieldMapping {
        attribute_name: "id".into(),
        manifest_key: "id".into(),
        field_name: "ID".into(),
        kind: FieldKind::String,
        synthetic: true,
    };
    assert_eq!(serde_json::to_value(&id).unwrap()["synthetic"], true);
}

#[test]
fn field_mapping_reads_without_synthetic_flag() {
    let field: FieldMapping = serde_json::from_value(json!({
        "attribute_name": "labels",
        "manifest_key": "labels",
        "field_name": "Labels",
        "type": "map",
        "element": "string"
    }))
    .unwrap();
    assert!(!field.synthetic);
    assert_eq!(
        field.kind,
        FieldKind::Map {
            element: ScalarType::String
        }
    );
}

#[test]
fn attribute_spec_yaml_keys() {
    let spec = AttributeSpec::collection("args", "list", "string");
    let json = serde_json::to_value(&spec).unwrap();
    assert_eq!(
        json,
        json!({"name": "args", "type": "list", "element_type": "string"})
    );
}

#[test]
fn diagnostic_json() {
    let diag = Diagnostic {
        code: "KS-W002".into(),
        severity: DiagnosticSeverity::Warning,
        path: "spec.replica".into(),
        message: "Path \"spec.replica\" in required does not match any attribute".into(),
    };
    let json = serde_json::to_value(&diag).unwrap();
    assert_eq!(json["severity"], "warning");
    assert_eq!(json["code"], "KS-W002");
}
