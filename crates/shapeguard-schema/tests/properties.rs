use serde_json::{json, Value};
use shapeguard_schema::{compare, compare_document, Outcome, SchemaDocument, SchemaNode};

fn order_schema() -> SchemaNode {
    SchemaNode::from_value(&json!({
        "type": "object",
        "properties": {
            "orderId": { "type": "string" },
            "total": { "type": "number" },
            "customer": {
                "type": "object",
                "properties": {
                    "id": { "type": "integer" },
                    "vip": { "type": "boolean" }
                }
            },
            "lines": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "sku": { "type": "string" },
                        "qty": { "type": "integer" }
                    }
                }
            },
            "notes": {}
        }
    }))
}

fn payloads() -> Vec<Value> {
    vec![
        json!({
            "orderId": "o-1",
            "total": 12.5,
            "customer": { "id": 7, "vip": false },
            "lines": [{ "sku": "a", "qty": 1 }],
            "notes": null
        }),
        json!({
            "orderId": 1,
            "total": "12.5",
            "customer": { "id": 7.5 },
            "lines": [{ "sku": "a", "qty": 1, "gift": true }, null, []],
            "notes": "x",
            "coupon": "SAVE"
        }),
        json!({}),
        json!(null),
        json!([]),
        json!("order"),
        json!({ "orderId": null, "total": null, "customer": null, "lines": null, "notes": null }),
    ]
}

#[test]
fn match_flag_agrees_with_empty_differences() {
    let schema = order_schema();
    for payload in payloads() {
        let result = compare(&schema, &payload);
        assert_eq!(result.is_match, result.differences.is_empty(), "{payload}");
        assert_eq!(
            result.outcome == Outcome::Match,
            result.is_match,
            "{payload}"
        );
    }
}

#[test]
fn comparison_is_deterministic() {
    let schema = order_schema();
    for payload in payloads() {
        assert_eq!(compare(&schema, &payload), compare(&schema, &payload));
    }
}

#[test]
fn conforming_order_matches() {
    let result = compare(&order_schema(), &payloads()[0]);
    assert!(result.is_match, "{:?}", result.differences);
}

#[test]
fn every_problem_is_reported() {
    let result = compare(&order_schema(), &payloads()[1]);

    assert_eq!(
        result.differences,
        vec![
            ".coupon: Unexpected property not defined in schema",
            ".orderId: Expected string but got number (1)",
            r#".total: Expected number but got string ("12.5")"#,
            ".customer.vip: Missing required property",
            ".customer.id: Expected integer but got number (7.5)",
            ".lines[0].gift: Unexpected property not defined in schema",
            ".lines[1]: Property exists in schema but is null/undefined in payload",
            ".lines[2]: Expected object but got array",
        ]
    );
}

#[test]
fn null_root_is_rejected() {
    let result = compare(&order_schema(), &json!(null));
    assert_eq!(
        result.differences,
        vec![": Property exists in schema but is null/undefined in payload"]
    );
}

#[test]
fn stored_text_schema_round_trip() {
    let document = SchemaDocument::from(
        r#"{"type":"object","properties":{"age":{"type":"integer"}}}"#,
    );

    let result = compare_document(&document, &json!({ "age": "30" }));
    assert!(!result.is_match);
    assert_eq!(result.outcome, Outcome::StructuralMismatch);
    assert!(result.differences[0].contains("Expected integer"));
    assert!(result.differences[0].contains("string"));
}

#[test]
fn template_with_type_field_keeps_closed_objects() {
    let document = SchemaDocument::from(json!({ "type": "admin", "id": null, "roles": [] }));
    let result = compare_document(&document, &json!({ "totally": "different" }));
    assert_eq!(result.outcome, Outcome::StructuralMismatch);
    assert_eq!(
        result.differences,
        vec![
            ".type: Missing required property",
            ".id: Missing required property",
            ".roles: Missing required property",
            ".totally: Unexpected property not defined in schema",
        ]
    );

    let document = SchemaDocument::from(json!({ "event": { "type": "click", "x": null } }));
    let result = compare_document(&document, &json!({ "event": 5 }));
    assert_eq!(result.differences, vec![".event: Expected object but got number"]);

    let matched = compare_document(&document, &json!({ "event": { "type": "tap", "x": 3 } }));
    assert!(matched.is_match);
}
