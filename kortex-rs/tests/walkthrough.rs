use kortex_message::{json, text_format, wire, DynamicMessage, MessageError, Value};
use kortex_proto::base::{SEQUENCE, SSID};
use kortex_rs::walkthrough::{self, five_task_sequence, Section};
use serde_json::json;
use test_log::test;

const HELPERS_OUTPUT: &str = concat!(
    "Content ssid_2: 123\n",
    "Content ssid_3: \n",
    r#"Json object
{
  "name": "A Name",
  "tasks": [
    {
      "groupIdentifier": 10
    },
    {
      "groupIdentifier": 20
    },
    {
      "groupIdentifier": 30
    },
    {
      "groupIdentifier": 40
    },
    {
      "groupIdentifier": 50
    }
  ]
}
Text format
name: "A Name"
tasks {
  group_identifier: 10
}
tasks {
  group_identifier: 20
}
tasks {
  group_identifier: 30
}
tasks {
  group_identifier: 40
}
tasks {
  group_identifier: 50
}

"#
);

fn ssid(identifier: &str) -> DynamicMessage {
    let mut ssid = DynamicMessage::new(&SSID);
    ssid.set("identifier", identifier).unwrap();
    ssid
}

#[test]
fn test_helpers_output() {
    let mut output = Vec::new();
    walkthrough::run(Section::Helpers, &mut output).unwrap();
    assert_eq!(String::from_utf8(output).unwrap(), HELPERS_OUTPUT);
}

#[test]
fn test_all_sections_output() {
    let mut output = Vec::new();
    walkthrough::run(Section::All, &mut output).unwrap();
    let output = String::from_utf8(output).unwrap();
    let expected_list = "sequence ID with index : 10\n\
                         sequence ID with index : 20\n\
                         sequence ID with object iterator : 10\n\
                         sequence ID with object iterator : 20\n";
    assert_eq!(output, format!("{expected_list}{HELPERS_OUTPUT}"));
}

#[test]
fn test_json_structure() {
    let sequence = five_task_sequence().unwrap();
    assert_eq!(
        json::to_json_value(&sequence),
        json!({
            "name": "A Name",
            "tasks": [
                {"groupIdentifier": 10},
                {"groupIdentifier": 20},
                {"groupIdentifier": 30},
                {"groupIdentifier": 40},
                {"groupIdentifier": 50},
            ]
        })
    );
}

#[test]
fn test_clear_gives_empty_json() {
    let mut sequence = five_task_sequence().unwrap();
    sequence.clear();
    assert_eq!(json::to_json(&sequence), "{}");
    sequence.clear();
    assert!(sequence.is_empty());
}

#[test]
fn test_copy_is_deep() {
    let original = five_task_sequence().unwrap();
    let mut copy = DynamicMessage::new(&SEQUENCE);
    copy.set("name", "Old name").unwrap();
    copy.copy_from(&original).unwrap();
    assert_eq!(json::to_json(&copy), json::to_json(&original));

    copy.repeated_mut("tasks")
        .unwrap()
        .get_message_mut(0)
        .unwrap()
        .set("group_identifier", 99)
        .unwrap();
    let first = original.repeated("tasks").unwrap()[0].as_message().unwrap();
    assert_eq!(first.get("group_identifier").unwrap(), Value::U32(10));
}

#[test]
fn test_merge_appends_tasks() {
    let source = five_task_sequence().unwrap();
    let mut target = five_task_sequence().unwrap();
    target.set("name", "Target").unwrap();
    target.merge_from(&source).unwrap();
    assert_eq!(target.repeated("tasks").unwrap().len(), 10);
    assert_eq!(target.get_as::<String, _>("name").unwrap(), "A Name");
}

#[test]
fn test_merge_from_defaults_is_a_no_op() {
    let mut target = five_task_sequence().unwrap();
    target.merge_from(&DynamicMessage::new(&SEQUENCE)).unwrap();
    assert_eq!(target, five_task_sequence().unwrap());
}

#[test]
fn test_ssid_merge_and_copy() {
    let empty = ssid("");
    let mut kept = ssid("123");
    kept.merge_from(&empty).unwrap();
    assert_eq!(kept.get_as::<String, _>("identifier").unwrap(), "123");

    let mut replaced = ssid("@#$");
    replaced.copy_from(&empty).unwrap();
    assert_eq!(replaced.get_as::<String, _>("identifier").unwrap(), "");
}

#[test]
fn test_schema_mismatch() {
    let mut sequence = five_task_sequence().unwrap();
    let error = sequence.merge_from(&ssid("123")).unwrap_err();
    assert!(matches!(error, MessageError::SchemaMismatch { .. }));
    let error = sequence.copy_from(&ssid("123")).unwrap_err();
    assert!(matches!(error, MessageError::SchemaMismatch { .. }));
    assert_eq!(sequence, five_task_sequence().unwrap());
}

#[test]
fn test_extend_then_add() {
    let mut sequence = DynamicMessage::new(&SEQUENCE);
    let tasks = five_task_sequence().unwrap();
    let tasks = tasks.repeated("tasks").unwrap();
    sequence.extend("tasks", &tasks[..2]).unwrap();
    sequence.add("tasks").unwrap();
    let stored = sequence.repeated("tasks").unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(&stored[..2], &tasks[..2]);
    assert!(stored[2].as_message().unwrap().is_empty());
}

#[test]
fn test_encodings_round_trip() {
    let sequence = five_task_sequence().unwrap();
    let from_json = json::from_json(&SEQUENCE, &json::to_json(&sequence)).unwrap();
    let from_text = text_format::from_text(&SEQUENCE, &text_format::to_text(&sequence)).unwrap();
    let from_wire = wire::decode(&SEQUENCE, &wire::encode(&sequence)).unwrap();
    assert_eq!(from_json, sequence);
    assert_eq!(from_text, sequence);
    assert_eq!(from_wire, sequence);
}
