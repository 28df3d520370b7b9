//! Schema-typed messages for the Kortex API.
//!
//! A [`DynamicMessage`] follows a static [`MessageDescriptor`]: every
//! assignment is checked against the declared type of the field. Messages
//! can be cleared, copied and merged, and written or read in JSON
//! ([`json`]), in the text format ([`text_format`]), and in the binary
//! wire format ([`wire`]).
//!
//! ```
//! use kortex_message::{DynamicMessage, FieldDescriptor, FieldKind, MessageDescriptor};
//!
//! static SSID: MessageDescriptor = MessageDescriptor {
//!     full_name: "Kinova.Api.Base.Ssid",
//!     fields: &[FieldDescriptor::singular(1, "identifier", FieldKind::String)],
//! };
//!
//! let mut ssid = DynamicMessage::new(&SSID);
//! ssid.set("identifier", "123").unwrap();
//! assert_eq!(ssid.get_as::<String, _>("identifier").unwrap(), "123");
//! assert!(ssid.set("identifier", 123).is_err());
//! ```

pub mod descriptor;
pub mod error;
pub mod json;
pub mod message;
pub mod pack;
pub mod repeated;
pub mod text_format;
pub mod value;
pub mod wire;

#[cfg(test)]
mod testing;

pub use descriptor::{
    Cardinality, EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldKind,
    MessageDescriptor,
};
pub use error::MessageError;
pub use message::{DynamicMessage, FieldKey};
pub use pack::{Pack, UnPack};
pub use repeated::RepeatedField;
pub use value::Value;
