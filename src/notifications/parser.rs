use crate::{
  error::SentinelError,
  types::{DuplicateOf, InstanceDetails, NotificationDetails, ParseMode, PayloadKind, SwitchMasterDetails},
};

const TOKEN_SEPARATOR: char = ' ';
const MARKER_STARTING: &str = "#starting";
const MARKER_QUORUM: &str = "#quorum";
const MARKER_DUPLICATE: &str = "#duplicate";
const MARKER_MASTER: &str = "@";

/// Positional access to the tokens of a notification payload.
struct Tokens<'a> {
  tokens: Vec<&'a str>,
  mode:   ParseMode,
}

impl<'a> Tokens<'a> {
  fn new(payload: &'a str, mode: ParseMode) -> Self {
    Tokens {
      tokens: payload.split(TOKEN_SEPARATOR).collect(),
      mode,
    }
  }

  fn marker(&self) -> Option<&'a str> {
    self.tokens.get(4).copied()
  }

  /// Copy the token at `idx`. Missing tokens are empty strings unless running in strict mode.
  fn take(&self, idx: usize, field: &'static str) -> Result<String, SentinelError> {
    match self.tokens.get(idx) {
      Some(token) => Ok((*token).to_owned()),
      None if self.mode.is_strict() => Err(SentinelError::new_malformed(format!(
        "Missing {} at position {} in payload with {} tokens.",
        field,
        idx,
        self.tokens.len()
      ))),
      None => Ok(String::new()),
    }
  }
}

/// Decode an instance payload: `<type> <name> <ip> <port> [<marker> ...]`.
pub fn parse_instance_details(payload: &str, mode: ParseMode) -> Result<InstanceDetails, SentinelError> {
  let tokens = Tokens::new(payload, mode);
  let mut details = InstanceDetails {
    kind: tokens.take(0, "type")?,
    name: tokens.take(1, "name")?,
    ip: tokens.take(2, "ip")?,
    port: tokens.take(3, "port")?,
    ..Default::default()
  };

  match tokens.marker() {
    Some(MARKER_STARTING) => {
      details.starting_millis = Some(tokens.take(6, "starting-millis")?);
    },
    Some(MARKER_QUORUM) => {
      details.quorum = Some(tokens.take(5, "quorum")?);
    },
    Some(MARKER_DUPLICATE) => {
      details.duplicate_of = Some(DuplicateOf {
        name:  tokens.take(6, "duplicate name")?,
        runid: tokens.take(8, "duplicate runid")?,
      });
    },
    Some(MARKER_MASTER) => {
      details.master_name = Some(tokens.take(5, "master-name")?);
      details.master_ip = Some(tokens.take(6, "master-ip")?);
      details.master_port = Some(tokens.take(7, "master-port")?);
    },
    _ => {},
  };

  Ok(details)
}

/// Decode a switch-master payload: `<master-name> <old-ip> <old-port> <new-ip> <new-port>`.
///
/// This layout has no optional parts, so a short payload is always an error.
pub fn parse_switch_master_details(payload: &str) -> Result<SwitchMasterDetails, SentinelError> {
  let tokens = Tokens::new(payload, ParseMode::Strict);

  Ok(SwitchMasterDetails {
    master_name: tokens.take(0, "master-name")?,
    old_ip:      tokens.take(1, "old-ip")?,
    old_port:    tokens.take(2, "old-port")?,
    new_ip:      tokens.take(3, "new-ip")?,
    new_port:    tokens.take(4, "new-port")?,
  })
}

/// Decode a payload with the provided layout.
pub fn parse_details(kind: PayloadKind, payload: &str, mode: ParseMode) -> Result<NotificationDetails, SentinelError> {
  match kind {
    PayloadKind::Instance => parse_instance_details(payload, mode).map(NotificationDetails::Instance),
    PayloadKind::SwitchMaster => parse_switch_master_details(payload).map(NotificationDetails::SwitchMaster),
  }
}
