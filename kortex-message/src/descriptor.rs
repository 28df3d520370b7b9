use std::fmt;

use crate::value::Value;

/// Whether a field holds one value or an ordered sequence of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Singular,
    Repeated,
}

/// The declared type of a field.
///
/// Message and enum kinds point to the static descriptor of the type they
/// hold, so schemas can refer to each other, recursively if needed.
#[derive(Clone, Copy)]
pub enum FieldKind {
    Double,
    Float,
    Int32,
    Int64,
    UInt32,
    UInt64,
    SInt32,
    SInt64,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    Bool,
    String,
    Bytes,
    Enum(&'static EnumDescriptor),
    Message(&'static MessageDescriptor),
}

impl FieldKind {
    /// The name of the kind as it would appear in a schema.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::SInt32 => "sint32",
            Self::SInt64 => "sint64",
            Self::Fixed32 => "fixed32",
            Self::Fixed64 => "fixed64",
            Self::SFixed32 => "sfixed32",
            Self::SFixed64 => "sfixed64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Enum(descriptor) => descriptor.full_name,
            Self::Message(descriptor) => descriptor.full_name,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int32
                | Self::Int64
                | Self::UInt32
                | Self::UInt64
                | Self::SInt32
                | Self::SInt64
                | Self::Fixed32
                | Self::Fixed64
                | Self::SFixed32
                | Self::SFixed64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    pub fn is_message(&self) -> bool {
        matches!(self, Self::Message(_))
    }

    /// Repeated fields of these kinds use the packed wire encoding.
    pub fn is_packable(&self) -> bool {
        !matches!(self, Self::String | Self::Bytes | Self::Message(_))
    }

    /// The value an unset field of this kind reads as.
    pub fn default_value(&self) -> Value {
        match self {
            Self::Double => Value::F64(0.0),
            Self::Float => Value::F32(0.0),
            Self::Int32 | Self::SInt32 | Self::SFixed32 => Value::I32(0),
            Self::Int64 | Self::SInt64 | Self::SFixed64 => Value::I64(0),
            Self::UInt32 | Self::Fixed32 => Value::U32(0),
            Self::UInt64 | Self::Fixed64 => Value::U64(0),
            Self::Bool => Value::Bool(false),
            Self::String => Value::String(String::new()),
            Self::Bytes => Value::Bytes(Vec::new()),
            Self::Enum(_) => Value::Enum(0),
            Self::Message(descriptor) => {
                Value::Message(Box::new(crate::DynamicMessage::new(descriptor)))
            }
        }
    }
}

// Schemas can be recursive, so only the type name is printed.
impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum(descriptor) => write!(f, "Enum({})", descriptor.full_name),
            Self::Message(descriptor) => write!(f, "Message({})", descriptor.full_name),
            other => f.write_str(other.type_name()),
        }
    }
}

#[derive(Debug)]
pub struct FieldDescriptor {
    pub number: u32,
    pub name: &'static str,
    pub kind: FieldKind,
    pub cardinality: Cardinality,
}

impl FieldDescriptor {
    pub const fn singular(number: u32, name: &'static str, kind: FieldKind) -> Self {
        Self {
            number,
            name,
            kind,
            cardinality: Cardinality::Singular,
        }
    }

    pub const fn repeated(number: u32, name: &'static str, kind: FieldKind) -> Self {
        Self {
            number,
            name,
            kind,
            cardinality: Cardinality::Repeated,
        }
    }

    pub fn is_repeated(&self) -> bool {
        self.cardinality == Cardinality::Repeated
    }

    /// The key used for this field in the JSON encoding.
    ///
    /// ```
    /// use kortex_message::{FieldDescriptor, FieldKind};
    /// let field = FieldDescriptor::singular(1, "group_identifier", FieldKind::UInt32);
    /// assert_eq!(field.json_name(), "groupIdentifier");
    /// ```
    pub fn json_name(&self) -> String {
        lower_camel_case(self.name)
    }
}

/// Convert a snake_case field name to lowerCamelCase.
///
/// An underscore is dropped and the next character upper-cased, the rest is
/// kept as written.
fn lower_camel_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut capitalize_next = false;
    for character in name.chars() {
        if character == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(character.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(character);
        }
    }
    result
}

#[derive(Debug)]
pub struct EnumValueDescriptor {
    pub name: &'static str,
    pub number: i32,
}

#[derive(Debug)]
pub struct EnumDescriptor {
    pub full_name: &'static str,
    pub values: &'static [EnumValueDescriptor],
}

impl EnumDescriptor {
    pub fn name_of(&self, number: i32) -> Option<&'static str> {
        self.values
            .iter()
            .find(|value| value.number == number)
            .map(|value| value.name)
    }

    pub fn number_of(&self, name: &str) -> Option<i32> {
        self.values
            .iter()
            .find(|value| value.name == name)
            .map(|value| value.number)
    }
}

/// The schema of a message: its name and its fields in declaration order.
#[derive(Debug)]
pub struct MessageDescriptor {
    pub full_name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl MessageDescriptor {
    /// The last segment of the full name.
    pub fn name(&self) -> &'static str {
        self.full_name
            .rsplit('.')
            .next()
            .unwrap_or(self.full_name)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&'static FieldDescriptor> {
        let fields: &'static [FieldDescriptor] = self.fields;
        fields.iter().find(|field| field.name == name)
    }

    pub fn field_by_number(&self, number: u32) -> Option<&'static FieldDescriptor> {
        let fields: &'static [FieldDescriptor] = self.fields;
        fields.iter().find(|field| field.number == number)
    }

    /// Find a field by its JSON name, or by its declared name.
    pub fn field_by_json_name(&self, name: &str) -> Option<&'static FieldDescriptor> {
        let fields: &'static [FieldDescriptor] = self.fields;
        fields
            .iter()
            .find(|field| field.json_name() == name)
            .or_else(|| self.field_by_name(name))
    }

    pub fn same_schema(&self, other: &MessageDescriptor) -> bool {
        self.full_name == other.full_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("identifier", "identifier")]
    #[case("group_identifier", "groupIdentifier")]
    #[case("application_data", "applicationData")]
    #[case("a_b_c", "aBC")]
    #[case("already_camelCase", "alreadyCamelCase")]
    fn test_lower_camel_case(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(lower_camel_case(name), expected);
    }

    #[test]
    fn test_enum_lookup() {
        static COLOR: EnumDescriptor = EnumDescriptor {
            full_name: "test.Color",
            values: &[
                EnumValueDescriptor { name: "RED", number: 0 },
                EnumValueDescriptor { name: "BLUE", number: 3 },
            ],
        };
        assert_eq!(COLOR.name_of(3), Some("BLUE"));
        assert_eq!(COLOR.name_of(1), None);
        assert_eq!(COLOR.number_of("RED"), Some(0));
        assert_eq!(COLOR.number_of("GREEN"), None);
    }
}
