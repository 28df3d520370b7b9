//! A tour of the message API with the Kortex `Base` messages.
//!
//! Each section builds messages the way client code would, and prints what
//! it observes to the given output.

use std::io::Write;

use clap::ValueEnum;
use kortex_message::{json, text_format, DynamicMessage, MessageError, Value};
use kortex_proto::base::{
    FULL_USER_PROFILE, LIMITATION_TYPE_IDENTIFIER, SEQUENCE, SEQUENCE_TASK, SSID, USER_PROFILE,
};
use log::{debug, info};

use crate::application::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    /// Scalar fields.
    Basic,
    /// Nested messages and enums.
    Object,
    /// Repeated message fields.
    List,
    /// Merge, copy, JSON and text format.
    Helpers,
    All,
}

pub fn run(section: Section, output: &mut impl Write) -> Result<(), AppError> {
    match section {
        Section::Basic => {
            basic()?;
        }
        Section::Object => {
            object()?;
        }
        Section::List => {
            list(output)?;
        }
        Section::Helpers => {
            helpers(output)?;
        }
        Section::All => {
            basic()?;
            object()?;
            list(output)?;
            helpers(output)?;
        }
    }
    Ok(())
}

/// A `UserProfile` with a few of its text fields set.
pub fn basic() -> Result<DynamicMessage, MessageError> {
    let mut user_profile = DynamicMessage::new(&USER_PROFILE);
    user_profile.set("username", "jcash")?;
    user_profile.set("firstname", "Johnny")?;
    user_profile.set("lastname", "Cash")?;
    debug!("Built {user_profile:?}");
    Ok(user_profile)
}

/// A `FullUserProfile` filled through its nested profile, and a
/// `LimitationTypeIdentifier` set by enum name.
pub fn object() -> Result<(DynamicMessage, DynamicMessage), MessageError> {
    let mut full_user_profile = DynamicMessage::new(&FULL_USER_PROFILE);
    full_user_profile.set("password", "MyPassword")?;
    let user_profile = full_user_profile.mutable_message("user_profile")?;
    user_profile.set("username", "jcash")?;
    user_profile.set("firstname", "Johnny")?;
    user_profile.set("lastname", "Cash")?;
    debug!("Built {full_user_profile:?}");

    let mut limitation_type_identifier = DynamicMessage::new(&LIMITATION_TYPE_IDENTIFIER);
    limitation_type_identifier.set("type", "FORCE_LIMITATION")?;
    debug!("Built {limitation_type_identifier:?}");

    Ok((full_user_profile, limitation_type_identifier))
}

fn group_identifier(task: &Value) -> Result<u32, MessageError> {
    match task.as_message() {
        Some(task) => task.get_as::<u32, _>("group_identifier"),
        None => Err(MessageError::NotAMessage(String::from("tasks"))),
    }
}

/// A `Sequence` with one task appended with `extend` and one with `add`.
pub fn list(output: &mut impl Write) -> Result<DynamicMessage, AppError> {
    let mut sequence = DynamicMessage::new(&SEQUENCE);
    sequence.set("name", "Sequence")?;

    let mut first_task = DynamicMessage::new(&SEQUENCE_TASK);
    first_task.set("group_identifier", 10)?;
    // Reading the action does not make it present.
    first_task.message("action")?;
    sequence.extend("tasks", [first_task])?;

    let second_task = sequence.add("tasks")?;
    second_task.set("group_identifier", 20)?;
    second_task.message("action")?;

    let task_count = sequence.repeated("tasks")?.len();
    for index in 0..task_count {
        let task = &sequence.repeated("tasks")?[index];
        writeln!(output, "sequence ID with index : {}", group_identifier(task)?)?;
    }
    for task in sequence.repeated("tasks")? {
        writeln!(
            output,
            "sequence ID with object iterator : {}",
            group_identifier(task)?
        )?;
    }
    Ok(sequence)
}

/// The sequence printed by the helpers section: five tasks with group
/// identifiers 10 to 50.
pub fn five_task_sequence() -> Result<DynamicMessage, MessageError> {
    let mut sequence = DynamicMessage::new(&SEQUENCE);
    sequence.set("name", "A Name")?;
    for i in 0..5u32 {
        let task = sequence.add("tasks")?;
        // Zero would not show up in the outputs.
        task.set("group_identifier", 10 * (i + 1))?;
        task.message("action")?;
    }
    Ok(sequence)
}

pub fn helpers(output: &mut impl Write) -> Result<(), AppError> {
    let mut ssid_1 = DynamicMessage::new(&SSID);
    ssid_1.set("identifier", "")?;
    let mut ssid_2 = DynamicMessage::new(&SSID);
    ssid_2.set("identifier", "123")?;
    let mut ssid_3 = DynamicMessage::new(&SSID);
    ssid_3.set("identifier", "@#$")?;

    // An empty identifier is absent, so it does not overwrite on merge.
    ssid_2.merge_from(&ssid_1)?;
    writeln!(
        output,
        "Content ssid_2: {}",
        ssid_2.get_as::<String, _>("identifier")?
    )?;

    ssid_3.copy_from(&ssid_1)?;
    writeln!(
        output,
        "Content ssid_3: {}",
        ssid_3.get_as::<String, _>("identifier")?
    )?;

    let sequence = five_task_sequence()?;
    info!(
        "The sequence has {} tasks.",
        sequence.repeated("tasks")?.len()
    );
    writeln!(output, "Json object")?;
    writeln!(output, "{}", json::to_json(&sequence))?;
    writeln!(output, "Text format")?;
    writeln!(output, "{}", text_format::to_text(&sequence))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_basic() {
        let user_profile = basic().unwrap();
        assert_eq!(
            user_profile.get_as::<String, _>("firstname").unwrap(),
            "Johnny"
        );
        assert!(!user_profile.has_field("handle").unwrap());
        assert!(!user_profile.has_field("application_data").unwrap());
    }

    #[test]
    fn test_object() {
        let (full_user_profile, limitation) = object().unwrap();
        let user_profile = full_user_profile.message("user_profile").unwrap();
        assert_eq!(user_profile.get_as::<String, _>("lastname").unwrap(), "Cash");
        assert_eq!(
            full_user_profile.get_as::<String, _>("password").unwrap(),
            "MyPassword"
        );
        assert_eq!(limitation.get("type").unwrap(), Value::Enum(1));
    }

    #[test]
    fn test_list() {
        let mut output = Vec::new();
        let sequence = list(&mut output).unwrap();
        let tasks = sequence.repeated("tasks").unwrap();
        assert_eq!(tasks.len(), 2);
        for task in tasks {
            assert!(!task.as_message().unwrap().has_field("action").unwrap());
        }
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "sequence ID with index : 10\n\
             sequence ID with index : 20\n\
             sequence ID with object iterator : 10\n\
             sequence ID with object iterator : 20\n"
        );
    }

    #[test]
    fn test_five_task_sequence() {
        let sequence = five_task_sequence().unwrap();
        let identifiers: Vec<u32> = sequence
            .repeated("tasks")
            .unwrap()
            .iter()
            .map(|task| group_identifier(task).unwrap())
            .collect();
        assert_eq!(identifiers, vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_basic_and_object_print_nothing() {
        let mut output = Vec::new();
        run(Section::Basic, &mut output).unwrap();
        run(Section::Object, &mut output).unwrap();
        assert!(output.is_empty());
    }
}
