use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::descriptor::{FieldDescriptor, FieldKind, MessageDescriptor};
use crate::error::MessageError;
use crate::pack::{Pack, UnPack};
use crate::repeated::{add_message, RepeatedField};
use crate::value::{coerce, Value};

/// Something that designates a field of a message: its name, its number,
/// or its descriptor.
pub trait FieldKey {
    fn resolve(
        &self,
        descriptor: &'static MessageDescriptor,
    ) -> Result<&'static FieldDescriptor, MessageError>;
}

impl FieldKey for &str {
    fn resolve(
        &self,
        descriptor: &'static MessageDescriptor,
    ) -> Result<&'static FieldDescriptor, MessageError> {
        descriptor
            .field_by_name(self)
            .ok_or_else(|| MessageError::UnknownField {
                message: descriptor.full_name.to_string(),
                field: self.to_string(),
            })
    }
}

impl FieldKey for u32 {
    fn resolve(
        &self,
        descriptor: &'static MessageDescriptor,
    ) -> Result<&'static FieldDescriptor, MessageError> {
        descriptor
            .field_by_number(*self)
            .ok_or_else(|| MessageError::UnknownFieldNumber {
                message: descriptor.full_name.to_string(),
                number: *self,
            })
    }
}

impl FieldKey for &'static FieldDescriptor {
    fn resolve(
        &self,
        descriptor: &'static MessageDescriptor,
    ) -> Result<&'static FieldDescriptor, MessageError> {
        if descriptor
            .fields
            .iter()
            .any(|field| std::ptr::eq(field, *self))
        {
            Ok(self)
        } else {
            Err(MessageError::UnknownField {
                message: descriptor.full_name.to_string(),
                field: self.name.to_string(),
            })
        }
    }
}

/// How many levels of nested messages the decoders accept.
pub(crate) const RECURSION_LIMIT: usize = 100;

/// A message whose schema is given by a [`MessageDescriptor`].
///
/// Only present fields are stored: scalars that differ from their default,
/// nested messages that were written to, and repeated fields. Reading an
/// absent field gives its default without touching the message.
#[derive(Clone)]
pub struct DynamicMessage {
    descriptor: &'static MessageDescriptor,
    singular: BTreeMap<u32, Value>,
    repeated: BTreeMap<u32, Vec<Value>>,
}

impl DynamicMessage {
    /// Create a message with every field at its default.
    pub fn new(descriptor: &'static MessageDescriptor) -> Self {
        Self {
            descriptor,
            singular: BTreeMap::new(),
            repeated: BTreeMap::new(),
        }
    }

    pub fn descriptor(&self) -> &'static MessageDescriptor {
        self.descriptor
    }

    fn singular_field<K: FieldKey>(&self, key: K) -> Result<&'static FieldDescriptor, MessageError> {
        let field = key.resolve(self.descriptor)?;
        if field.is_repeated() {
            return Err(MessageError::Repeated(field.name.to_string()));
        }
        Ok(field)
    }

    fn repeated_field<K: FieldKey>(&self, key: K) -> Result<&'static FieldDescriptor, MessageError> {
        let field = key.resolve(self.descriptor)?;
        if !field.is_repeated() {
            return Err(MessageError::NotRepeated(field.name.to_string()));
        }
        Ok(field)
    }

    /// Assign a singular field.
    ///
    /// Assigning the default value of the field makes it absent again.
    pub fn set<K: FieldKey, V: Pack>(&mut self, key: K, value: V) -> Result<(), MessageError> {
        let field = self.singular_field(key)?;
        let value = coerce(field, value.pack())?;
        if value.is_default() {
            self.singular.remove(&field.number);
        } else {
            self.singular.insert(field.number, value);
        }
        Ok(())
    }

    /// Read a singular field, or its default when it is absent.
    pub fn get<K: FieldKey>(&self, key: K) -> Result<Value, MessageError> {
        let field = self.singular_field(key)?;
        Ok(self
            .singular
            .get(&field.number)
            .cloned()
            .unwrap_or_else(|| field.kind.default_value()))
    }

    /// Read a singular field as a native type.
    pub fn get_as<T, K: FieldKey>(&self, key: K) -> Result<T, MessageError>
    where
        Value: UnPack<T>,
    {
        let field = self.singular_field(key)?;
        let value = self.get(field)?;
        let found = value.kind_name();
        value.unpack().ok_or_else(|| MessageError::TypeMismatch {
            field: field.name.to_string(),
            expected: std::any::type_name::<T>().to_string(),
            found,
        })
    }

    pub fn has_field<K: FieldKey>(&self, key: K) -> Result<bool, MessageError> {
        let field = key.resolve(self.descriptor)?;
        if field.is_repeated() {
            Ok(self
                .repeated
                .get(&field.number)
                .is_some_and(|values| !values.is_empty()))
        } else {
            Ok(self.singular.contains_key(&field.number))
        }
    }

    /// Reset one field to its default.
    pub fn clear_field<K: FieldKey>(&mut self, key: K) -> Result<(), MessageError> {
        let field = key.resolve(self.descriptor)?;
        self.singular.remove(&field.number);
        self.repeated.remove(&field.number);
        Ok(())
    }

    /// Read a nested message.
    ///
    /// When the field is absent, a default instance is returned and the
    /// parent is left as is.
    pub fn message<K: FieldKey>(&self, key: K) -> Result<Cow<'_, DynamicMessage>, MessageError> {
        let field = self.singular_field(key)?;
        let FieldKind::Message(descriptor) = field.kind else {
            return Err(MessageError::NotAMessage(field.name.to_string()));
        };
        Ok(
            match self.singular.get(&field.number).and_then(Value::as_message) {
                Some(message) => Cow::Borrowed(message),
                None => Cow::Owned(DynamicMessage::new(descriptor)),
            },
        )
    }

    /// Get write access to a nested message, creating it if needed.
    ///
    /// The field is present from then on, even if nothing is written in the
    /// nested message.
    pub fn mutable_message<K: FieldKey>(&mut self, key: K) -> Result<&mut DynamicMessage, MessageError> {
        let field = self.singular_field(key)?;
        let FieldKind::Message(descriptor) = field.kind else {
            return Err(MessageError::NotAMessage(field.name.to_string()));
        };
        self.singular
            .entry(field.number)
            .or_insert_with(|| Value::Message(Box::new(DynamicMessage::new(descriptor))))
            .as_message_mut()
            .ok_or_else(|| MessageError::NotAMessage(field.name.to_string()))
    }

    /// The elements of a repeated field; empty when the field is absent.
    pub fn repeated<K: FieldKey>(&self, key: K) -> Result<&[Value], MessageError> {
        let field = self.repeated_field(key)?;
        Ok(self
            .repeated
            .get(&field.number)
            .map(Vec::as_slice)
            .unwrap_or(&[]))
    }

    pub fn repeated_mut<K: FieldKey>(&mut self, key: K) -> Result<RepeatedField<'_>, MessageError> {
        let field = self.repeated_field(key)?;
        let values = self.repeated.entry(field.number).or_default();
        Ok(RepeatedField::new(field, values))
    }

    /// Append one element to a repeated field.
    pub fn push<K: FieldKey, V: Pack>(&mut self, key: K, value: V) -> Result<(), MessageError> {
        self.repeated_mut(key)?.push(value)
    }

    /// Append elements to a repeated field, in order.
    ///
    /// Nothing is appended if one of the elements does not fit the field.
    pub fn extend<K, I>(&mut self, key: K, values: I) -> Result<(), MessageError>
    where
        K: FieldKey,
        I: IntoIterator,
        I::Item: Pack,
    {
        self.repeated_mut(key)?.extend(values)
    }

    /// Append a default message to a repeated message field and return it.
    pub fn add<K: FieldKey>(&mut self, key: K) -> Result<&mut DynamicMessage, MessageError> {
        let field = self.repeated_field(key)?;
        let values = self.repeated.entry(field.number).or_default();
        add_message(field, values)
    }

    /// Whether no field is present.
    pub fn is_empty(&self) -> bool {
        self.singular.is_empty() && self.repeated.values().all(Vec::is_empty)
    }

    /// The present fields, in declaration order, with their values.
    ///
    /// Singular fields come with a one-element slice.
    pub fn present_fields(&self) -> impl Iterator<Item = (&'static FieldDescriptor, &[Value])> + '_ {
        let fields: &'static [FieldDescriptor] = self.descriptor.fields;
        fields.iter().filter_map(move |field| {
            let values: &[Value] = if field.is_repeated() {
                self.repeated.get(&field.number)?.as_slice()
            } else {
                std::slice::from_ref(self.singular.get(&field.number)?)
            };
            (!values.is_empty()).then_some((field, values))
        })
    }

    /// Reset every field to its default.
    pub fn clear(&mut self) {
        self.singular.clear();
        self.repeated.clear();
    }

    fn check_schema(&self, source: &DynamicMessage) -> Result<(), MessageError> {
        if self.descriptor.same_schema(source.descriptor) {
            Ok(())
        } else {
            Err(MessageError::SchemaMismatch {
                expected: self.descriptor.full_name.to_string(),
                found: source.descriptor.full_name.to_string(),
            })
        }
    }

    /// Combine `source` into this message.
    ///
    /// Present scalars of `source` overwrite, nested messages are merged
    /// recursively, repeated elements are appended. Messages of different
    /// schemas cannot be merged; the target is then left untouched.
    pub fn merge_from(&mut self, source: &DynamicMessage) -> Result<(), MessageError> {
        self.check_schema(source)?;
        debug!("Merging into a {}.", self.descriptor.name());
        self.merge_unchecked(source);
        Ok(())
    }

    fn merge_unchecked(&mut self, source: &DynamicMessage) {
        for (number, value) in &source.singular {
            match value {
                Value::Message(nested) => {
                    let target = self.singular.entry(*number).or_insert_with(|| {
                        Value::Message(Box::new(DynamicMessage::new(nested.descriptor)))
                    });
                    match target.as_message_mut() {
                        Some(target) => target.merge_unchecked(nested),
                        None => *target = value.clone(),
                    }
                }
                scalar => {
                    self.singular.insert(*number, scalar.clone());
                }
            }
        }
        for (number, values) in &source.repeated {
            if values.is_empty() {
                continue;
            }
            self.repeated
                .entry(*number)
                .or_default()
                .extend(values.iter().cloned());
        }
    }

    /// Replace the content of this message by a deep copy of `source`.
    ///
    /// The schemas are compared before anything is cleared.
    pub fn copy_from(&mut self, source: &DynamicMessage) -> Result<(), MessageError> {
        self.check_schema(source)?;
        debug!("Copying into a {}.", self.descriptor.name());
        self.clear();
        self.merge_unchecked(source);
        Ok(())
    }
}

impl PartialEq for DynamicMessage {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.same_schema(other.descriptor)
            && self
                .present_fields()
                .map(|(field, values)| (field.number, values))
                .eq(other
                    .present_fields()
                    .map(|(field, values)| (field.number, values)))
    }
}

impl fmt::Debug for DynamicMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct(self.descriptor.name());
        for (field, values) in self.present_fields() {
            match values {
                [value] if !field.is_repeated() => debug.field(field.name, value),
                _ => debug.field(field.name, &values),
            };
        }
        debug.finish()
    }
}

/// Messages display in the text format.
impl fmt::Display for DynamicMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::text_format::printer::write_message(self, 0, f)
    }
}
