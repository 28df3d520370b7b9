use kortex_message::{FieldDescriptor, FieldKind, MessageDescriptor};

pub static USER_PROFILE_HANDLE: MessageDescriptor = MessageDescriptor {
    full_name: "Kinova.Api.Common.UserProfileHandle",
    fields: &[
        FieldDescriptor::singular(1, "identifier", FieldKind::UInt32),
        FieldDescriptor::singular(2, "permission", FieldKind::UInt32),
    ],
};
