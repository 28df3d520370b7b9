use crate::descriptor::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldKind, MessageDescriptor,
};
use crate::message::DynamicMessage;

pub(crate) static COLOR: EnumDescriptor = EnumDescriptor {
    full_name: "test.Color",
    values: &[
        EnumValueDescriptor { name: "RED", number: 0 },
        EnumValueDescriptor { name: "GREEN", number: 1 },
        EnumValueDescriptor { name: "BLUE", number: 2 },
    ],
};

pub(crate) static POINT: MessageDescriptor = MessageDescriptor {
    full_name: "test.Point",
    fields: &[
        FieldDescriptor::singular(1, "x", FieldKind::Int32),
        FieldDescriptor::singular(2, "y", FieldKind::Int32),
    ],
};

pub(crate) static POLYGON: MessageDescriptor = MessageDescriptor {
    full_name: "test.Polygon",
    fields: &[
        FieldDescriptor::singular(1, "name", FieldKind::String),
        FieldDescriptor::repeated(2, "points", FieldKind::Message(&POINT)),
        FieldDescriptor::repeated(3, "tags", FieldKind::String),
        FieldDescriptor::singular(4, "center", FieldKind::Message(&POINT)),
    ],
};

pub(crate) static TREE: MessageDescriptor = MessageDescriptor {
    full_name: "test.Tree",
    fields: &[
        FieldDescriptor::singular(1, "label", FieldKind::String),
        FieldDescriptor::repeated(2, "children", FieldKind::Message(&TREE)),
    ],
};

pub(crate) static ALL_TYPES: MessageDescriptor = MessageDescriptor {
    full_name: "test.AllTypes",
    fields: &[
        FieldDescriptor::singular(1, "double_value", FieldKind::Double),
        FieldDescriptor::singular(2, "float_value", FieldKind::Float),
        FieldDescriptor::singular(3, "int32_value", FieldKind::Int32),
        FieldDescriptor::singular(4, "int64_value", FieldKind::Int64),
        FieldDescriptor::singular(5, "uint32_value", FieldKind::UInt32),
        FieldDescriptor::singular(6, "uint64_value", FieldKind::UInt64),
        FieldDescriptor::singular(7, "sint32_value", FieldKind::SInt32),
        FieldDescriptor::singular(8, "sint64_value", FieldKind::SInt64),
        FieldDescriptor::singular(9, "fixed32_value", FieldKind::Fixed32),
        FieldDescriptor::singular(10, "fixed64_value", FieldKind::Fixed64),
        FieldDescriptor::singular(11, "sfixed32_value", FieldKind::SFixed32),
        FieldDescriptor::singular(12, "sfixed64_value", FieldKind::SFixed64),
        FieldDescriptor::singular(13, "bool_value", FieldKind::Bool),
        FieldDescriptor::singular(14, "string_value", FieldKind::String),
        FieldDescriptor::singular(15, "bytes_value", FieldKind::Bytes),
        FieldDescriptor::singular(16, "enum_value", FieldKind::Enum(&COLOR)),
        FieldDescriptor::singular(17, "point", FieldKind::Message(&POINT)),
        FieldDescriptor::repeated(18, "int32_values", FieldKind::Int32),
        FieldDescriptor::repeated(19, "string_values", FieldKind::String),
        FieldDescriptor::repeated(20, "colors", FieldKind::Enum(&COLOR)),
        FieldDescriptor::repeated(21, "points", FieldKind::Message(&POINT)),
        FieldDescriptor::repeated(22, "double_values", FieldKind::Double),
        FieldDescriptor::repeated(23, "sint64_values", FieldKind::SInt64),
        FieldDescriptor::repeated(24, "bytes_values", FieldKind::Bytes),
    ],
};

/// A message with every kind of field set to a value that is not trivial
/// to encode.
pub(crate) fn populated_all_types() -> DynamicMessage {
    let mut message = DynamicMessage::new(&ALL_TYPES);
    message.set("double_value", 2.5e-10).unwrap();
    message.set("float_value", 0.1f32).unwrap();
    message.set("int32_value", -42).unwrap();
    message.set("int64_value", i64::MIN).unwrap();
    message.set("uint32_value", u32::MAX).unwrap();
    message.set("uint64_value", u64::MAX).unwrap();
    message.set("sint32_value", -1).unwrap();
    message.set("sint64_value", -123456789012i64).unwrap();
    message.set("fixed32_value", 7u32).unwrap();
    message.set("fixed64_value", 1u64 << 60).unwrap();
    message.set("sfixed32_value", -7).unwrap();
    message.set("sfixed64_value", -(1i64 << 60)).unwrap();
    message.set("bool_value", true).unwrap();
    message.set("string_value", "Quote \" backslash \\ newline \n été").unwrap();
    message.set("bytes_value", vec![0u8, 1, 127, 128, 255, b'"']).unwrap();
    message.set("enum_value", "BLUE").unwrap();
    let point = message.mutable_message("point").unwrap();
    point.set("x", 3).unwrap();
    point.set("y", -4).unwrap();
    message.extend("int32_values", [1, -2, 3]).unwrap();
    message.extend("string_values", ["a", "", "c"]).unwrap();
    message.extend("colors", ["GREEN", "RED"]).unwrap();
    message.push("colors", 9).unwrap();
    message.add("points").unwrap().set("x", 10).unwrap();
    message.add("points").unwrap();
    message.extend("double_values", [1.0, -0.5, 1e300]).unwrap();
    message.extend("sint64_values", [-1i64, 0, i64::MAX]).unwrap();
    message.extend("bytes_values", [vec![], vec![1u8, 2]]).unwrap();
    message
}
