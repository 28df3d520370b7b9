//! Messages of the `Kinova.Api.Base` package.
//!
//! Only the fields the walkthrough relies on are described; `Action` stops
//! before its parameters.

use kortex_message::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldKind, MessageDescriptor,
};

use crate::common::USER_PROFILE_HANDLE;

pub static LIMITATION_TYPE: EnumDescriptor = EnumDescriptor {
    full_name: "Kinova.Api.Base.LimitationType",
    values: &[
        EnumValueDescriptor { name: "UNSPECIFIED_LIMITATION", number: 0 },
        EnumValueDescriptor { name: "FORCE_LIMITATION", number: 1 },
        EnumValueDescriptor { name: "ACCELERATION_LIMITATION", number: 2 },
        EnumValueDescriptor { name: "VELOCITY_LIMITATION", number: 3 },
    ],
};

pub static ACTION_TYPE: EnumDescriptor = EnumDescriptor {
    full_name: "Kinova.Api.Base.ActionType",
    values: &[
        EnumValueDescriptor { name: "UNSPECIFIED_ACTION", number: 0 },
        EnumValueDescriptor { name: "REACH_POSE", number: 1 },
        EnumValueDescriptor { name: "REACH_JOINT_ANGLES", number: 2 },
        EnumValueDescriptor { name: "TOGGLE_ADMITTANCE_MODE", number: 3 },
        EnumValueDescriptor { name: "SNAP_SHOT", number: 4 },
        EnumValueDescriptor { name: "SWITCH_CONTROL_MAPPING", number: 5 },
        EnumValueDescriptor { name: "NAVIGATE_JOINTS", number: 6 },
        EnumValueDescriptor { name: "NAVIGATE_MAPPINGS", number: 7 },
        EnumValueDescriptor { name: "CHANGE_TWIST", number: 8 },
        EnumValueDescriptor { name: "CHANGE_JOINT_SPEEDS", number: 9 },
        EnumValueDescriptor { name: "CHANGE_WRENCH", number: 10 },
        EnumValueDescriptor { name: "APPLY_EMERGENCY_STOP", number: 11 },
        EnumValueDescriptor { name: "CLEAR_FAULTS", number: 12 },
        EnumValueDescriptor { name: "TIME_DELAY", number: 13 },
        EnumValueDescriptor { name: "EXECUTE_ACTION", number: 14 },
        EnumValueDescriptor { name: "SEND_GRIPPER_COMMAND", number: 15 },
        EnumValueDescriptor { name: "SEND_GPIO_COMMAND", number: 16 },
        EnumValueDescriptor { name: "STOP_ACTION", number: 17 },
    ],
};

pub static USER_PROFILE: MessageDescriptor = MessageDescriptor {
    full_name: "Kinova.Api.Base.UserProfile",
    fields: &[
        FieldDescriptor::singular(1, "handle", FieldKind::Message(&USER_PROFILE_HANDLE)),
        FieldDescriptor::singular(2, "username", FieldKind::String),
        FieldDescriptor::singular(3, "firstname", FieldKind::String),
        FieldDescriptor::singular(4, "lastname", FieldKind::String),
        FieldDescriptor::singular(5, "application_data", FieldKind::String),
    ],
};

pub static FULL_USER_PROFILE: MessageDescriptor = MessageDescriptor {
    full_name: "Kinova.Api.Base.FullUserProfile",
    fields: &[
        FieldDescriptor::singular(1, "user_profile", FieldKind::Message(&USER_PROFILE)),
        FieldDescriptor::singular(2, "password", FieldKind::String),
    ],
};

pub static LIMITATION_TYPE_IDENTIFIER: MessageDescriptor = MessageDescriptor {
    full_name: "Kinova.Api.Base.LimitationTypeIdentifier",
    fields: &[FieldDescriptor::singular(1, "type", FieldKind::Enum(&LIMITATION_TYPE))],
};

pub static SEQUENCE_HANDLE: MessageDescriptor = MessageDescriptor {
    full_name: "Kinova.Api.Base.SequenceHandle",
    fields: &[
        FieldDescriptor::singular(1, "identifier", FieldKind::UInt32),
        FieldDescriptor::singular(2, "permission", FieldKind::UInt32),
    ],
};

pub static ACTION_HANDLE: MessageDescriptor = MessageDescriptor {
    full_name: "Kinova.Api.Base.ActionHandle",
    fields: &[
        FieldDescriptor::singular(1, "identifier", FieldKind::UInt32),
        FieldDescriptor::singular(2, "action_type", FieldKind::Enum(&ACTION_TYPE)),
        FieldDescriptor::singular(3, "permission", FieldKind::UInt32),
    ],
};

pub static ACTION: MessageDescriptor = MessageDescriptor {
    full_name: "Kinova.Api.Base.Action",
    fields: &[
        FieldDescriptor::singular(1, "handle", FieldKind::Message(&ACTION_HANDLE)),
        FieldDescriptor::singular(2, "name", FieldKind::String),
        FieldDescriptor::singular(3, "application_data", FieldKind::String),
    ],
};

pub static SEQUENCE_TASK: MessageDescriptor = MessageDescriptor {
    full_name: "Kinova.Api.Base.SequenceTask",
    fields: &[
        FieldDescriptor::singular(1, "group_identifier", FieldKind::UInt32),
        FieldDescriptor::singular(2, "action", FieldKind::Message(&ACTION)),
        FieldDescriptor::singular(3, "application_data", FieldKind::String),
    ],
};

pub static SEQUENCE: MessageDescriptor = MessageDescriptor {
    full_name: "Kinova.Api.Base.Sequence",
    fields: &[
        FieldDescriptor::singular(1, "handle", FieldKind::Message(&SEQUENCE_HANDLE)),
        FieldDescriptor::singular(2, "name", FieldKind::String),
        FieldDescriptor::singular(3, "application_data", FieldKind::String),
        FieldDescriptor::repeated(4, "tasks", FieldKind::Message(&SEQUENCE_TASK)),
    ],
};

pub static SSID: MessageDescriptor = MessageDescriptor {
    full_name: "Kinova.Api.Base.Ssid",
    fields: &[FieldDescriptor::singular(1, "identifier", FieldKind::String)],
};
