use crate::{
  error::{SentinelError, SentinelErrorKind},
  interfaces::Command,
  types::{PatternMessage, Value},
};
use bytes::Bytes;
use bytes_utils::Str;
use redis_protocol::resp2::types::BytesFrame as Resp2Frame;
use std::borrow::Cow;

pub const PSUBSCRIBE: &str = "PSUBSCRIBE";
pub const PMESSAGE: &str = "pmessage";
pub const PSUBSCRIBE_ACK: &str = "psubscribe";

/// Map an error reply to an error kind based on its leading word.
pub fn pretty_error(resp: &str) -> SentinelError {
  let kind = {
    let mut parts = resp.split_whitespace();

    match parts.next().unwrap_or("") {
      "" => SentinelErrorKind::Unknown,
      "WRONGTYPE" => SentinelErrorKind::InvalidArgument,
      "Invalid" => match parts.next().unwrap_or("") {
        "argument(s)" | "Argument" | "argument" => SentinelErrorKind::InvalidArgument,
        _ => SentinelErrorKind::Unknown,
      },
      _ => SentinelErrorKind::Unknown,
    }
  };

  let details = if resp.is_empty() {
    Cow::Borrowed("No response!")
  } else {
    Cow::Owned(resp.to_owned())
  };
  SentinelError::new(kind, details)
}

fn bytes_to_value(data: Bytes) -> Value {
  match Str::from_inner(data) {
    Ok(s) => Value::String(s),
    Err(e) => Value::Bytes(e.into_inner()),
  }
}

/// Convert a reply frame into a value, returning error frames as errors.
pub fn frame_to_value(frame: Resp2Frame) -> Result<Value, SentinelError> {
  Ok(match frame {
    Resp2Frame::SimpleString(data) | Resp2Frame::BulkString(data) => bytes_to_value(data),
    Resp2Frame::Integer(i) => Value::Integer(i),
    Resp2Frame::Null => Value::Null,
    Resp2Frame::Error(s) => return Err(pretty_error(&s)),
    Resp2Frame::Array(frames) => Value::Array(
      frames
        .into_iter()
        .map(frame_to_value)
        .collect::<Result<Vec<Value>, SentinelError>>()?,
    ),
  })
}

/// Parse the frame as a string, without support for error frames.
pub fn frame_into_string(frame: Resp2Frame) -> Result<String, SentinelError> {
  match frame {
    Resp2Frame::SimpleString(data) | Resp2Frame::BulkString(data) => Ok(String::from_utf8(data.to_vec())?),
    Resp2Frame::Integer(i) => Ok(i.to_string()),
    _ => Err(SentinelError::new_protocol("Expected protocol string.")),
  }
}

fn value_to_outgoing_resp2_frame(value: &Value) -> Result<Resp2Frame, SentinelError> {
  let frame = match value {
    Value::String(ref s) => Resp2Frame::BulkString(s.inner().clone()),
    Value::Bytes(ref b) => Resp2Frame::BulkString(b.clone()),
    Value::Integer(ref i) => Resp2Frame::BulkString(i.to_string().into()),
    _ => {
      return Err(SentinelError::new(
        SentinelErrorKind::InvalidArgument,
        format!("Invalid argument type: {}", value.kind()),
      ))
    },
  };

  Ok(frame)
}

/// Encode a command as an array of bulk strings.
pub fn command_to_frame(command: &Command) -> Result<Resp2Frame, SentinelError> {
  let mut frames = Vec::with_capacity(command.args.len() + 1);
  frames.push(Resp2Frame::BulkString(command.cmd.inner().clone()));
  for arg in command.args.iter() {
    frames.push(value_to_outgoing_resp2_frame(arg)?);
  }

  Ok(Resp2Frame::Array(frames))
}

/// Check whether the frame acknowledges a `PSUBSCRIBE` call.
pub fn is_psubscribe_ack(frame: &Resp2Frame) -> bool {
  match frame {
    Resp2Frame::Array(ref frames) => match frames.first() {
      Some(Resp2Frame::SimpleString(ref s)) | Some(Resp2Frame::BulkString(ref s)) => {
        s.eq_ignore_ascii_case(PSUBSCRIBE_ACK.as_bytes())
      },
      _ => false,
    },
    _ => false,
  }
}

/// Whether the error came from decoding a single frame, leaving the connection usable.
pub fn is_decode_error(error: &SentinelError) -> bool {
  matches!(error.kind(), SentinelErrorKind::Parse | SentinelErrorKind::Protocol)
}

/// Parse a `pmessage` frame as `(pattern, channel, payload)`.
///
/// Returns `None` for other push frames, such as subscription acknowledgements.
pub fn parse_pmessage(frame: Resp2Frame) -> Result<Option<PatternMessage>, SentinelError> {
  let mut frames = match frame {
    Resp2Frame::Array(frames) => frames,
    Resp2Frame::Error(s) => return Err(pretty_error(&s)),
    _ => return Err(SentinelError::new_protocol("Expected array frame on subscriber connection.")),
  };

  let is_pmessage = match frames.first() {
    Some(Resp2Frame::SimpleString(ref s)) | Some(Resp2Frame::BulkString(ref s)) => {
      s.eq_ignore_ascii_case(PMESSAGE.as_bytes())
    },
    _ => false,
  };
  if !is_pmessage {
    return Ok(None);
  }
  if frames.len() != 4 {
    return Err(SentinelError::new_protocol(format!(
      "Invalid pmessage frame with {} elements.",
      frames.len()
    )));
  }

  let payload = frame_into_string(frames.pop().unwrap_or(Resp2Frame::Null))?;
  let channel = frame_into_string(frames.pop().unwrap_or(Resp2Frame::Null))?;
  let pattern = frame_into_string(frames.pop().unwrap_or(Resp2Frame::Null))?;
  Ok(Some(PatternMessage::new(pattern, channel, payload)))
}
