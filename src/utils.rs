use crate::{
  error::{SentinelError, SentinelErrorKind},
  interfaces::Command,
  modules::inner::SentinelInner,
  types::Value,
};
use bytes_utils::Str;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use url::Url;

static CLIENT_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Accepted URL schemes for sentinel nodes.
pub const SENTINEL_SCHEMES: [&str; 2] = ["redis-sentinel", "redis"];

/// Create a client name used to prefix log lines.
pub fn client_name(id: Option<&String>) -> String {
  match id {
    Some(id) => id.clone(),
    None => format!("vigil-{}", CLIENT_COUNTER.fetch_add(1, Ordering::Relaxed)),
  }
}

/// Check that a command argument is a string, returning an `InvalidArgument` error otherwise.
pub fn expect_string_arg(name: &'static str, value: Value) -> Result<Str, SentinelError> {
  match value {
    Value::String(s) => Ok(s),
    _ => Err(SentinelError::new(
      SentinelErrorKind::InvalidArgument,
      format!("{} should be a string, found {}", name, value.kind()),
    )),
  }
}

/// Read a reply record as a flat array of fields.
pub fn expect_fields(value: Value, record: &'static str) -> Result<Vec<Value>, SentinelError> {
  match value {
    Value::Array(fields) => Ok(fields),
    Value::Null => Err(SentinelError::new(
      SentinelErrorKind::NotFound,
      format!("Missing {} reply.", record),
    )),
    _ => Err(SentinelError::new_protocol(format!(
      "Expected array for {} reply, found {}.",
      record,
      value.kind()
    ))),
  }
}

/// Read the field at `idx` as a string, returning an empty string when the position is missing or not a string.
pub fn read_field(fields: &[Value], idx: usize) -> String {
  fields
    .get(idx)
    .and_then(|v| v.as_str())
    .map(|s| s.into_owned())
    .unwrap_or_default()
}

pub fn parse_url(url: &str, default_port: Option<u16>) -> Result<(Url, String, u16), SentinelError> {
  let url = Url::parse(url)?;
  if !SENTINEL_SCHEMES.contains(&url.scheme()) {
    return Err(SentinelError::new(
      SentinelErrorKind::Config,
      format!("Invalid scheme: {}", url.scheme()),
    ));
  }

  let host = if let Some(host) = url.host_str() {
    host.to_owned()
  } else {
    return Err(SentinelError::new(SentinelErrorKind::Config, "Invalid or missing host."));
  };
  let port = if let Some(port) = url.port().or(default_port) {
    port
  } else {
    return Err(SentinelError::new(SentinelErrorKind::Config, "Invalid or missing port."));
  };

  Ok((url, host, port))
}

/// Check whether an `INFO` reply reports the provided run ID.
pub fn info_has_run_id(info: &str, run_id: &str) -> bool {
  info.contains(&format!("run_id:{}", run_id))
}

/// Check whether the leader from an `is-master-down-by-addr` reply is the sentinel that produced the `INFO` text.
///
/// `*` and empty leaders mean no vote was cast.
pub fn is_leader_run_id(info: &str, leader_run_id: &str) -> bool {
  if leader_run_id.is_empty() || leader_run_id == "*" {
    false
  } else {
    info_has_run_id(info, leader_run_id)
  }
}

pub fn expect_ok(value: &Value) -> Result<(), SentinelError> {
  match value.as_str() {
    Some(s) if s == "OK" => Ok(()),
    _ => Err(SentinelError::new_protocol(format!("Expected OK, found {}.", value))),
  }
}

/// Send a command on the client's command transport.
pub async fn request_response(inner: &Arc<SentinelInner>, command: Command) -> Result<Value, SentinelError> {
  _trace!(inner, "Sending command {}", command);

  match inner.transport.request(command).await {
    Ok(value) => Ok(value),
    Err(e) => {
      _debug!(inner, "Command failed: {:?}", e);
      Err(e)
    },
  }
}
