use std::slice;

use crate::descriptor::{FieldDescriptor, FieldKind};
use crate::error::MessageError;
use crate::message::DynamicMessage;
use crate::pack::Pack;
use crate::value::{coerce, Value};

/// Write access to the elements of a repeated field.
///
/// Message elements are boxed, and appending never moves the existing
/// elements to another index.
pub struct RepeatedField<'a> {
    field: &'static FieldDescriptor,
    values: &'a mut Vec<Value>,
}

impl<'a> RepeatedField<'a> {
    pub(crate) fn new(field: &'static FieldDescriptor, values: &'a mut Vec<Value>) -> Self {
        Self { field, values }
    }

    pub fn field(&self) -> &'static FieldDescriptor {
        self.field
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn get_message_mut(&mut self, index: usize) -> Option<&mut DynamicMessage> {
        self.values.get_mut(index).and_then(Value::as_message_mut)
    }

    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        self.values.as_slice()
    }

    pub fn push<V: Pack>(&mut self, value: V) -> Result<(), MessageError> {
        let value = coerce(self.field, value.pack())?;
        self.values.push(value);
        Ok(())
    }

    /// Append every element, or none if one of them does not fit.
    pub fn extend<I>(&mut self, values: I) -> Result<(), MessageError>
    where
        I: IntoIterator,
        I::Item: Pack,
    {
        let checked = values
            .into_iter()
            .map(|value| coerce(self.field, value.pack()))
            .collect::<Result<Vec<_>, _>>()?;
        self.values.extend(checked);
        Ok(())
    }

    /// Append a default message and return it for further editing.
    pub fn add(&mut self) -> Result<&mut DynamicMessage, MessageError> {
        add_message(self.field, self.values)
    }

    pub fn remove(&mut self, index: usize) -> Option<Value> {
        (index < self.values.len()).then(|| self.values.remove(index))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

pub(crate) fn add_message<'v>(
    field: &'static FieldDescriptor,
    values: &'v mut Vec<Value>,
) -> Result<&'v mut DynamicMessage, MessageError> {
    let FieldKind::Message(descriptor) = field.kind else {
        return Err(MessageError::NotAMessage(field.name.to_string()));
    };
    values.push(Value::Message(Box::new(DynamicMessage::new(descriptor))));
    values
        .last_mut()
        .and_then(Value::as_message_mut)
        .ok_or_else(|| MessageError::NotAMessage(field.name.to_string()))
}
