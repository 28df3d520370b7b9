use crate::message::DynamicMessage;
use crate::value::Value;

/// Get a native value out of a field [`Value`].
///
/// Unpacking is strict: a `Value::I32` does not unpack as a `u32`, and the
/// result is `None` whenever the variant does not match.
///
/// ```
/// use kortex_message::{UnPack, Value};
/// let value = Value::U32(42);
/// let unpacked: Option<u32> = (&value).unpack();
/// assert_eq!(unpacked, Some(42));
/// let wrong: Option<i32> = value.unpack();
/// assert_eq!(wrong, None);
/// ```
pub trait UnPack<T> {
    fn unpack(self) -> Option<T>;
}

/// Build a field [`Value`] from a native value.
///
/// ```
/// use kortex_message::{Pack, Value};
/// let number: u32 = 10;
/// assert_eq!(number.pack(), Value::U32(10));
/// ```
///
/// Text and byte sequences are kept apart.
///
/// ```
/// use kortex_message::{Pack, Value};
/// assert_eq!("jcash".pack(), Value::String(String::from("jcash")));
/// assert_eq!(b"jcash".as_slice().pack(), Value::Bytes(b"jcash".to_vec()));
/// ```
///
/// Whether the value fits the field it is assigned to is checked on
/// assignment, not when packing.
pub trait Pack {
    fn pack(self) -> Value;
}

macro_rules! pack_copy {
    ($native:ty, $variant:ident) => {
        impl Pack for $native {
            fn pack(self) -> Value {
                Value::$variant(self)
            }
        }

        impl UnPack<$native> for &Value {
            fn unpack(self) -> Option<$native> {
                let Value::$variant(value) = self else {
                    return None;
                };
                Some(*value)
            }
        }

        impl UnPack<$native> for Value {
            fn unpack(self) -> Option<$native> {
                (&self).unpack()
            }
        }
    };
}

pack_copy!(bool, Bool);
pack_copy!(i32, I32);
pack_copy!(i64, I64);
pack_copy!(u32, U32);
pack_copy!(u64, U64);
pack_copy!(f32, F32);
pack_copy!(f64, F64);

impl Pack for Value {
    fn pack(self) -> Value {
        self
    }
}

impl Pack for &Value {
    fn pack(self) -> Value {
        self.clone()
    }
}

impl Pack for String {
    fn pack(self) -> Value {
        Value::String(self)
    }
}

impl Pack for &String {
    fn pack(self) -> Value {
        Value::String(self.clone())
    }
}

impl Pack for &str {
    fn pack(self) -> Value {
        Value::String(self.to_owned())
    }
}

impl Pack for Vec<u8> {
    fn pack(self) -> Value {
        Value::Bytes(self)
    }
}

impl Pack for &[u8] {
    fn pack(self) -> Value {
        Value::Bytes(self.to_vec())
    }
}

impl Pack for DynamicMessage {
    fn pack(self) -> Value {
        Value::Message(Box::new(self))
    }
}

impl Pack for &DynamicMessage {
    fn pack(self) -> Value {
        Value::Message(Box::new(self.clone()))
    }
}

impl UnPack<String> for &Value {
    /// Get a string out of a reference to a field value
    ///
    /// ```
    /// use kortex_message::{UnPack, Value};
    /// let value = Value::String(String::from("Hello"));
    /// let unpacked: String = (&value).unpack().unwrap();
    /// assert_eq!(unpacked, String::from("Hello"));
    /// ```
    fn unpack(self) -> Option<String> {
        let Value::String(content) = self else {
            return None;
        };
        Some(content.clone())
    }
}

impl UnPack<String> for Value {
    fn unpack(self) -> Option<String> {
        let Value::String(content) = self else {
            return None;
        };
        Some(content)
    }
}

impl UnPack<Vec<u8>> for &Value {
    fn unpack(self) -> Option<Vec<u8>> {
        let Value::Bytes(content) = self else {
            return None;
        };
        Some(content.clone())
    }
}

impl UnPack<Vec<u8>> for Value {
    /// Get a byte sequence out of a field value. Text does not unpack as
    /// bytes.
    ///
    /// ```
    /// use kortex_message::{UnPack, Value};
    /// let text = Value::String(String::from("abc"));
    /// let unpacked: Option<Vec<u8>> = text.unpack();
    /// assert_eq!(unpacked, None);
    /// ```
    fn unpack(self) -> Option<Vec<u8>> {
        let Value::Bytes(content) = self else {
            return None;
        };
        Some(content)
    }
}

impl UnPack<DynamicMessage> for &Value {
    fn unpack(self) -> Option<DynamicMessage> {
        self.as_message().cloned()
    }
}

impl UnPack<DynamicMessage> for Value {
    fn unpack(self) -> Option<DynamicMessage> {
        let Value::Message(message) = self else {
            return None;
        };
        Some(*message)
    }
}
