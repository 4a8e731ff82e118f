use pii_config::Config;
use pii_core::{PiiType, RawRecord, Record};
use pii_engine::{BatchSummary, RecordProcessor, process_batch};
use serde_json::{Value, json};

fn record(id: &str, value: Value) -> Record {
    match value {
        Value::Object(fields) => Record::new(id, fields),
        _ => panic!("test records must be objects"),
    }
}

#[test]
fn test_scenario_phone_and_lone_name() {
    let processor = RecordProcessor::default();
    let input = record("1", json!({"name": "John Doe", "phone": "9876543210"}));
    let output = processor.process(&input);

    assert!(output.is_pii);
    assert_eq!(
        Value::Object(output.fields),
        json!({"name": "John Doe", "phone": "98XXXXXX10"})
    );
}

#[test]
fn test_scenario_all_standalone_types() {
    let processor = RecordProcessor::default();
    let raw = RawRecord::new(
        "2",
        r#"{"name":"Jane Smith","aadhar":"123456789012","passport":"A1234567","upi_id":"jane@upi"}"#,
    );

    let output = processor.process_raw(&raw).unwrap();

    assert!(output.is_pii);
    assert_eq!(
        output.redacted_data_json(),
        r#"{"name":"Jane Smith","aadhar":"XXXXXXXX9012","passport":"AXXXXXX7","upi_id":"[REDACTED_UPI]"}"#
    );
}

#[test]
fn test_scenario_city_only() {
    let processor = RecordProcessor::default();
    let input = record("3", json!({"city": "Springfield"}));
    let output = processor.process(&input);

    assert!(!output.is_pii);
    assert_eq!(output.fields, input.fields);
}

#[test]
fn test_combination_is_a_set_property() {
    let processor = RecordProcessor::default();

    let alone = processor.classify(&record("4", json!({"name": "X"})));
    assert!(!alone.is_pii());

    let together = processor.classify(&record("5", json!({"name": "X", "email": "y@z.com"})));
    assert!(together.is_pii());
    assert_eq!(together.detection_for("name").unwrap().pii_type, PiiType::Name);
    assert_eq!(together.detection_for("email").unwrap().pii_type, PiiType::Email);
}

#[test]
fn test_lone_address_not_flagged() {
    let processor = RecordProcessor::default();
    let output = processor.process(&record(
        "6",
        json!({"address": "221B Baker Street, London", "city": "London"}),
    ));

    assert!(!output.is_pii);
    assert_eq!(output.fields["address"], json!("221B Baker Street, London"));
}

#[test]
fn test_masks_preserve_format() {
    let processor = RecordProcessor::default();
    let output = processor.process(&record(
        "7",
        json!({
            "phone": "98765-43210",
            "aadhar": "1234 5678 9012",
            "passport": "K7654321",
            "name": "Ravi Kumar",
            "email": "ravi.kumar@mail.example.org"
        }),
    ));

    let text = |key: &str| output.fields[key].as_str().unwrap().to_string();
    assert_eq!(text("phone").len(), 10);
    assert_eq!(text("aadhar").len(), 12);
    assert_eq!(text("passport").len(), 8);
    assert!(text("email").ends_with("@mail.example.org"));
    assert_eq!(text("name"), "RXXX KXXXX");
}

#[test]
fn test_masked_values_differ_from_originals() {
    let processor = RecordProcessor::default();
    let input = record(
        "8",
        json!({
            "name": "A",
            "email": "a@b.co",
            "address": "Flat 1",
            "contact": "9123456789",
            "device_id": "DEV-9",
            "upi_id": "x@paytm"
        }),
    );

    let output = processor.process(&input);

    assert_eq!(output.detections.len(), 6);
    for detection in &output.detections {
        let name = &detection.field_name;
        assert_ne!(output.fields[name], input.fields[name], "field {name} unchanged");
    }
}

#[test]
fn test_custom_rule_from_config() {
    let config = Config::from_toml(
        r#"
[[rules]]
name = "birth"
flagged = [{ field = "dob" }]
supporting = ["name", "pincode"]
min_flagged = 1
min_supporting = 2
"#,
    )
    .unwrap();
    let processor = RecordProcessor::new(&config);

    let partial = processor.process(&record("9", json!({"dob": "1990-01-01", "name": "Asha"})));
    assert!(!partial.is_pii);

    let full = processor.process(&record(
        "10",
        json!({"dob": "1990-01-01", "name": "Asha", "pincode": "560001"}),
    ));
    assert!(full.is_pii);
    assert_eq!(full.fields["dob"], json!("[REDACTED]"));
    assert_eq!(full.fields["name"], json!("Asha"));

    // Configured rules add to the built-in ones
    let identity = processor.process(&record(
        "11",
        json!({"name": "John Doe", "email": "john@example.com"}),
    ));
    assert!(identity.is_pii);
    assert_eq!(identity.fields["name"], json!("JXXX DXX"));
}

#[test]
fn test_values_found_outside_their_usual_field_names() {
    let processor = RecordProcessor::default();
    let output = processor.process(&record(
        "12",
        json!({"mobile_number": "9876543210", "id_no": "123456789012", "pay": "jane@upi"}),
    ));

    assert!(output.is_pii);
    assert_eq!(
        Value::Object(output.fields),
        json!({
            "mobile_number": "98XXXXXX10",
            "id_no": "XXXXXXXX9012",
            "pay": "[REDACTED_UPI]"
        })
    );
}

#[test]
fn test_batch_summary() {
    let processor = RecordProcessor::default();
    let records = vec![
        RawRecord::new("1", r#"{"phone": "9876543210"}"#),
        RawRecord::new("2", r#"{"email": "test@example.com", "address": "123 Main St"}"#),
        RawRecord::new("3", r#"{"age": "25", "city": "Mumbai"}"#),
        RawRecord::new("4", "not json"),
    ];

    let outcomes = process_batch(&processor, &records);
    let summary = BatchSummary::from_outcomes(&outcomes);

    assert_eq!(summary.total, 4);
    assert_eq!(summary.pii, 2);
    assert_eq!(summary.clean, 1);
    assert_eq!(summary.malformed, 1);
}
