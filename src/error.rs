use bytes_utils::string::Utf8Error as BytesUtf8Error;
use redis_protocol::error::RedisProtocolError;
use std::{
  borrow::{Borrow, Cow},
  error::Error,
  fmt,
  io::Error as IoError,
  num::ParseIntError,
  str::Utf8Error,
  string::FromUtf8Error,
};
use tokio::{task::JoinError, time::error::Elapsed};
use url::ParseError;

/// An enum representing the type of error from the sentinel client.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SentinelErrorKind {
  /// An invalid client configuration.
  Config,
  /// An invalid URL error.
  Url,
  /// An invalid argument or set of arguments to a command, such as a non-string master name.
  InvalidArgument,
  /// A notification payload did not contain the tokens required by its layout.
  MalformedPayload,
  /// An error with either of the underlying connections.
  Transport,
  /// A protocol error such as an invalid or unexpected frame from the server.
  Protocol,
  /// A parser error.
  Parse,
  /// An error indicating a value was not found, often used when trying to cast a `nil` response from the server to a
  /// non-nullable type.
  NotFound,
  /// A timeout error.
  Timeout,
  /// An error indicating the request was canceled.
  Canceled,
  /// An unknown error.
  Unknown,
}

impl SentinelErrorKind {
  pub fn to_str(&self) -> &'static str {
    match *self {
      SentinelErrorKind::Config => "Config Error",
      SentinelErrorKind::Url => "Url Error",
      SentinelErrorKind::InvalidArgument => "Invalid Argument",
      SentinelErrorKind::MalformedPayload => "Malformed Payload",
      SentinelErrorKind::Transport => "Transport Error",
      SentinelErrorKind::Protocol => "Protocol Error",
      SentinelErrorKind::Parse => "Parse Error",
      SentinelErrorKind::NotFound => "Not Found",
      SentinelErrorKind::Timeout => "Timeout Error",
      SentinelErrorKind::Canceled => "Canceled",
      SentinelErrorKind::Unknown => "Unknown Error",
    }
  }
}

/// An error from the sentinel client.
pub struct SentinelError {
  /// Details about the specific error condition.
  details: Cow<'static, str>,
  /// The kind of error.
  kind:    SentinelErrorKind,
}

impl Clone for SentinelError {
  fn clone(&self) -> Self {
    SentinelError::new(self.kind.clone(), self.details.clone())
  }
}

impl PartialEq for SentinelError {
  fn eq(&self, other: &Self) -> bool {
    self.kind == other.kind && self.details == other.details
  }
}

impl Eq for SentinelError {}

impl fmt::Debug for SentinelError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "Sentinel Error - kind: {:?}, details: {}", self.kind, self.details)
  }
}

impl fmt::Display for SentinelError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}: {}", self.kind.to_str(), self.details)
  }
}

#[doc(hidden)]
impl From<RedisProtocolError> for SentinelError {
  fn from(e: RedisProtocolError) -> Self {
    SentinelError::new(SentinelErrorKind::Protocol, format!("{}", e))
  }
}

#[doc(hidden)]
impl From<IoError> for SentinelError {
  fn from(e: IoError) -> Self {
    SentinelError::new(SentinelErrorKind::Transport, format!("{:?}", e))
  }
}

#[doc(hidden)]
impl From<ParseError> for SentinelError {
  fn from(e: ParseError) -> Self {
    SentinelError::new(SentinelErrorKind::Url, format!("{:?}", e))
  }
}

#[doc(hidden)]
impl From<ParseIntError> for SentinelError {
  fn from(_: ParseIntError) -> Self {
    SentinelError::new(SentinelErrorKind::Parse, "Invalid integer string.")
  }
}

#[doc(hidden)]
impl From<FromUtf8Error> for SentinelError {
  fn from(_: FromUtf8Error) -> Self {
    SentinelError::new(SentinelErrorKind::Parse, "Invalid UTF-8 string.")
  }
}

#[doc(hidden)]
impl From<Utf8Error> for SentinelError {
  fn from(_: Utf8Error) -> Self {
    SentinelError::new(SentinelErrorKind::Parse, "Invalid UTF-8 string.")
  }
}

#[doc(hidden)]
impl<S> From<BytesUtf8Error<S>> for SentinelError {
  fn from(e: BytesUtf8Error<S>) -> Self {
    e.utf8_error().into()
  }
}

#[doc(hidden)]
impl From<Elapsed> for SentinelError {
  fn from(_: Elapsed) -> Self {
    SentinelError::new(SentinelErrorKind::Timeout, "Connection timed out.")
  }
}

#[doc(hidden)]
impl From<JoinError> for SentinelError {
  fn from(e: JoinError) -> Self {
    SentinelError::new(SentinelErrorKind::Unknown, format!("Spawn Error: {:?}", e))
  }
}

#[doc(hidden)]
impl From<tokio::sync::oneshot::error::RecvError> for SentinelError {
  fn from(e: tokio::sync::oneshot::error::RecvError) -> Self {
    SentinelError::new(SentinelErrorKind::Canceled, format!("{}", e))
  }
}

impl SentinelError {
  /// Create a new error with the provided details.
  pub fn new<T>(kind: SentinelErrorKind, details: T) -> SentinelError
  where
    T: Into<Cow<'static, str>>,
  {
    SentinelError {
      kind,
      details: details.into(),
    }
  }

  /// Read the type of error without any associated data.
  pub fn kind(&self) -> &SentinelErrorKind {
    &self.kind
  }

  /// Change the kind of the error.
  pub fn change_kind(&mut self, kind: SentinelErrorKind) {
    self.kind = kind;
  }

  /// Read details about the error.
  pub fn details(&self) -> &str {
    self.details.borrow()
  }

  /// Create a new empty Canceled error.
  pub fn new_canceled() -> Self {
    SentinelError::new(SentinelErrorKind::Canceled, "Canceled.")
  }

  pub(crate) fn new_parse<T>(details: T) -> Self
  where
    T: Into<Cow<'static, str>>,
  {
    SentinelError::new(SentinelErrorKind::Parse, details)
  }

  pub(crate) fn new_malformed<T>(details: T) -> Self
  where
    T: Into<Cow<'static, str>>,
  {
    SentinelError::new(SentinelErrorKind::MalformedPayload, details)
  }

  pub(crate) fn new_protocol<T>(details: T) -> Self
  where
    T: Into<Cow<'static, str>>,
  {
    SentinelError::new(SentinelErrorKind::Protocol, details)
  }

  /// Whether the error is a `Transport` error.
  pub fn is_transport(&self) -> bool {
    matches!(self.kind, SentinelErrorKind::Transport)
  }

  /// Whether the error is an `InvalidArgument` error.
  pub fn is_invalid_argument(&self) -> bool {
    matches!(self.kind, SentinelErrorKind::InvalidArgument)
  }

  /// Whether the error is a `MalformedPayload` error.
  pub fn is_malformed_payload(&self) -> bool {
    matches!(self.kind, SentinelErrorKind::MalformedPayload)
  }

  /// Whether the error is a `Canceled` error.
  pub fn is_canceled(&self) -> bool {
    matches!(self.kind, SentinelErrorKind::Canceled)
  }

  /// Whether the error is a `NotFound` error.
  pub fn is_not_found(&self) -> bool {
    matches!(self.kind, SentinelErrorKind::NotFound)
  }
}

impl Error for SentinelError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    None
  }
}
