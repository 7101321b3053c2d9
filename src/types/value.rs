use crate::error::{SentinelError, SentinelErrorKind};
use bytes::Bytes;
use bytes_utils::Str;
use std::{borrow::Cow, fmt, str};

/// The kind of value returned by the server or passed as a command argument.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValueKind {
  Null,
  Integer,
  String,
  Bytes,
  Array,
}

impl fmt::Display for ValueKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let s = match *self {
      ValueKind::Null => "nil",
      ValueKind::Integer => "Integer",
      ValueKind::String => "String",
      ValueKind::Bytes => "Bytes",
      ValueKind::Array => "Array",
    };

    write!(f, "{}", s)
  }
}

/// A value used in a sentinel command or reply.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
  /// A `nil` value.
  Null,
  /// An integer value.
  Integer(i64),
  /// A string value.
  String(Str),
  /// A binary value to represent non-UTF8 strings.
  Bytes(Bytes),
  /// An ordered list of values.
  Array(Vec<Value>),
}

impl Value {
  /// Read the type of the value without any associated data.
  pub fn kind(&self) -> ValueKind {
    match *self {
      Value::Null => ValueKind::Null,
      Value::Integer(_) => ValueKind::Integer,
      Value::String(_) => ValueKind::String,
      Value::Bytes(_) => ValueKind::Bytes,
      Value::Array(_) => ValueKind::Array,
    }
  }

  /// Check if the value is null.
  pub fn is_null(&self) -> bool {
    matches!(*self, Value::Null)
  }

  /// Check if the value is a string.
  pub fn is_string(&self) -> bool {
    matches!(*self, Value::String(_))
  }

  /// Read the value as a string slice if it is a string or UTF-8 bytes.
  ///
  /// Integers are formatted and returned as owned strings.
  pub fn as_str(&self) -> Option<Cow<str>> {
    match *self {
      Value::String(ref s) => Some(Cow::Borrowed(&**s)),
      Value::Bytes(ref b) => str::from_utf8(b).ok().map(Cow::Borrowed),
      Value::Integer(ref i) => Some(Cow::Owned(i.to_string())),
      _ => None,
    }
  }

  /// Read the value as an integer, parsing strings if necessary.
  pub fn as_i64(&self) -> Option<i64> {
    match *self {
      Value::Integer(i) => Some(i),
      Value::String(ref s) => s.parse::<i64>().ok(),
      _ => None,
    }
  }

  /// Convert the value to an array of values, wrapping single values and returning an empty array for `nil`.
  pub fn into_array(self) -> Vec<Value> {
    match self {
      Value::Array(values) => values,
      Value::Null => Vec::new(),
      _ => vec![self],
    }
  }

  /// Convert the value to the provided type.
  pub fn convert<R>(self) -> Result<R, SentinelError>
  where
    R: FromValue,
  {
    R::from_value(self)
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      Value::Null => write!(f, "nil"),
      Value::Integer(ref i) => write!(f, "{}", i),
      Value::String(ref s) => write!(f, "{}", s),
      Value::Bytes(ref b) => write!(f, "{:?}", b),
      Value::Array(ref values) => {
        write!(f, "[")?;
        for (idx, value) in values.iter().enumerate() {
          if idx > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{}", value)?;
        }
        write!(f, "]")
      },
    }
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self {
    Value::String(s.into())
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self {
    Value::String(s.into())
  }
}

impl From<&String> for Value {
  fn from(s: &String) -> Self {
    Value::String(s.as_str().into())
  }
}

impl From<Str> for Value {
  fn from(s: Str) -> Self {
    Value::String(s)
  }
}

impl From<Bytes> for Value {
  fn from(b: Bytes) -> Self {
    Value::Bytes(b)
  }
}

impl From<i64> for Value {
  fn from(i: i64) -> Self {
    Value::Integer(i)
  }
}

impl From<i32> for Value {
  fn from(i: i32) -> Self {
    Value::Integer(i as i64)
  }
}

impl From<u16> for Value {
  fn from(i: u16) -> Self {
    Value::Integer(i as i64)
  }
}

impl From<Vec<Value>> for Value {
  fn from(values: Vec<Value>) -> Self {
    Value::Array(values)
  }
}

impl<T> From<Option<T>> for Value
where
  T: Into<Value>,
{
  fn from(value: Option<T>) -> Self {
    match value {
      Some(value) => value.into(),
      None => Value::Null,
    }
  }
}

/// A trait used to [convert](Value::convert) a [Value] into different types.
pub trait FromValue: Sized {
  fn from_value(value: Value) -> Result<Self, SentinelError>;
}

impl FromValue for Value {
  fn from_value(value: Value) -> Result<Self, SentinelError> {
    Ok(value)
  }
}

impl FromValue for () {
  fn from_value(_: Value) -> Result<Self, SentinelError> {
    Ok(())
  }
}

impl FromValue for String {
  fn from_value(value: Value) -> Result<Self, SentinelError> {
    match value {
      Value::Null => Err(SentinelError::new(
        SentinelErrorKind::NotFound,
        "Cannot convert nil response to string.",
      )),
      Value::Array(_) => Err(SentinelError::new_parse("Cannot convert array to string.")),
      _ => value
        .as_str()
        .map(|s| s.into_owned())
        .ok_or_else(|| SentinelError::new_parse("Cannot convert to string.")),
    }
  }
}

impl FromValue for i64 {
  fn from_value(value: Value) -> Result<Self, SentinelError> {
    match value {
      Value::Integer(i) => Ok(i),
      Value::String(s) => s.parse::<i64>().map_err(|e| e.into()),
      Value::Null => Err(SentinelError::new(
        SentinelErrorKind::NotFound,
        "Cannot convert nil to number.",
      )),
      _ => Err(SentinelError::new_parse("Cannot convert to number.")),
    }
  }
}

impl FromValue for bool {
  fn from_value(value: Value) -> Result<Self, SentinelError> {
    match value {
      Value::Integer(i) => Ok(i != 0),
      Value::String(ref s) => match &**s {
        "1" | "true" | "TRUE" | "OK" => Ok(true),
        "0" | "false" | "FALSE" => Ok(false),
        _ => Err(SentinelError::new_parse("Cannot convert string to bool.")),
      },
      Value::Null => Ok(false),
      _ => Err(SentinelError::new_parse("Cannot convert to bool.")),
    }
  }
}

impl<T> FromValue for Option<T>
where
  T: FromValue,
{
  fn from_value(value: Value) -> Result<Self, SentinelError> {
    if value.is_null() {
      Ok(None)
    } else {
      T::from_value(value).map(Some)
    }
  }
}

impl<T> FromValue for Vec<T>
where
  T: FromValue,
{
  fn from_value(value: Value) -> Result<Self, SentinelError> {
    value.into_array().into_iter().map(T::from_value).collect()
  }
}
