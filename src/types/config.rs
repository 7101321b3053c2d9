use crate::{
  error::{SentinelError, SentinelErrorKind},
  utils,
};
use std::{fmt, str::FromStr, time::Duration};

/// The default port on which sentinel nodes listen.
pub const DEFAULT_SENTINEL_PORT: u16 = 26379;
/// The pattern used to subscribe to every sentinel notification channel.
pub const DEFAULT_PATTERN: &str = "*";
/// The default timeout when establishing new connections.
pub const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 10_000;

/// How strictly notification payloads are decoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseMode {
  /// Tokens missing from a payload are read as empty strings.
  Lenient,
  /// Tokens missing from a payload fail with a `MalformedPayload` error.
  Strict,
}

impl Default for ParseMode {
  fn default() -> Self {
    ParseMode::Lenient
  }
}

impl ParseMode {
  pub fn to_str(&self) -> &'static str {
    match *self {
      ParseMode::Lenient => "lenient",
      ParseMode::Strict => "strict",
    }
  }

  pub fn is_strict(&self) -> bool {
    matches!(*self, ParseMode::Strict)
  }
}

impl fmt::Display for ParseMode {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.to_str())
  }
}

impl FromStr for ParseMode {
  type Err = SentinelError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "lenient" | "LENIENT" => Ok(ParseMode::Lenient),
      "strict" | "STRICT" => Ok(ParseMode::Strict),
      _ => Err(SentinelError::new(
        SentinelErrorKind::Config,
        format!("Invalid parse mode: {}", s),
      )),
    }
  }
}

/// Configuration options for a sentinel client.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SentinelConfig {
  /// The hostname for the sentinel node.
  ///
  /// Default: `127.0.0.1`
  pub host:                  String,
  /// The port on which the sentinel node is listening.
  ///
  /// Default: `26379`
  pub port:                  u16,
  /// The pattern used on the subscribing connection.
  ///
  /// Default: `*`
  pub pattern:               String,
  /// How notification payloads are decoded.
  ///
  /// Default: `Lenient`
  pub parse_mode:            ParseMode,
  /// The timeout, in milliseconds, used when establishing each connection.
  ///
  /// Default: `10_000`
  pub connection_timeout_ms: u64,
  /// An optional name used to prefix log lines. A name such as `vigil-0` is generated when `None`.
  ///
  /// Default: `None`
  pub id:                    Option<String>,
}

impl Default for SentinelConfig {
  fn default() -> Self {
    SentinelConfig {
      host:                  "127.0.0.1".into(),
      port:                  DEFAULT_SENTINEL_PORT,
      pattern:               DEFAULT_PATTERN.into(),
      parse_mode:            ParseMode::default(),
      connection_timeout_ms: DEFAULT_CONNECTION_TIMEOUT_MS,
      id:                    None,
    }
  }
}

impl SentinelConfig {
  /// Create a config from a URL.
  ///
  /// ```
  /// # use vigil::types::{ParseMode, SentinelConfig};
  /// let config = SentinelConfig::from_url("redis-sentinel://10.0.0.2:26380?parse_mode=strict").unwrap();
  /// assert_eq!(config.host, "10.0.0.2");
  /// assert_eq!(config.port, 26380);
  /// assert_eq!(config.parse_mode, ParseMode::Strict);
  /// ```
  ///
  /// Supported schemes are `redis-sentinel` and `redis`. The port defaults to `26379`. The following query
  /// parameters are read, and any others are ignored:
  ///
  /// * `pattern` - the subscription pattern.
  /// * `parse_mode` - `lenient` or `strict`.
  /// * `connection_timeout_ms` - the connection timeout.
  /// * `id` - the client name used in logs.
  pub fn from_url(url: &str) -> Result<SentinelConfig, SentinelError> {
    let (url, host, port) = utils::parse_url(url, Some(DEFAULT_SENTINEL_PORT))?;
    let mut config = SentinelConfig {
      host,
      port,
      ..Default::default()
    };

    for (key, value) in url.query_pairs() {
      match key.as_ref() {
        "pattern" => config.pattern = value.into_owned(),
        "parse_mode" => config.parse_mode = value.parse()?,
        "connection_timeout_ms" => config.connection_timeout_ms = value.parse()?,
        "id" => config.id = Some(value.into_owned()),
        _ => {},
      };
    }

    Ok(config)
  }

  /// Read the `host:port` string for the sentinel node.
  pub fn server(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }

  pub(crate) fn connection_timeout(&self) -> Duration {
    Duration::from_millis(self.connection_timeout_ms)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn should_parse_url_with_defaults() {
    let config = SentinelConfig::from_url("redis-sentinel://sentinel-1").unwrap();
    let expected = SentinelConfig {
      host: "sentinel-1".into(),
      ..Default::default()
    };

    assert_eq!(config, expected);
  }

  #[test]
  fn should_parse_url_query_params() {
    let config = SentinelConfig::from_url(
      "redis://127.0.0.1:26380?pattern=%2Bswitch-master&connection_timeout_ms=500&id=watcher&foo=bar",
    )
    .unwrap();

    assert_eq!(config.port, 26380);
    assert_eq!(config.pattern, "+switch-master");
    assert_eq!(config.connection_timeout_ms, 500);
    assert_eq!(config.id, Some("watcher".into()));
    assert_eq!(config.parse_mode, ParseMode::Lenient);
  }

  #[test]
  fn should_reject_unknown_scheme() {
    let err = SentinelConfig::from_url("http://127.0.0.1:26379").unwrap_err();
    assert_eq!(*err.kind(), SentinelErrorKind::Config);
  }

  #[test]
  fn should_reject_invalid_parse_mode() {
    let err = SentinelConfig::from_url("redis-sentinel://127.0.0.1?parse_mode=loose").unwrap_err();
    assert_eq!(*err.kind(), SentinelErrorKind::Config);
  }
}
