use crate::{
  interfaces::CommandTransport,
  notifications::Dispatcher,
  types::SentinelConfig,
};
use std::{fmt, sync::Arc};

/// The state shared by every clone of a sentinel client.
pub struct SentinelInner {
  /// An ID used to prefix log lines.
  pub id:         Arc<String>,
  /// The client config.
  pub config:     SentinelConfig,
  /// The transport used for request/response commands.
  pub transport:  Arc<dyn CommandTransport>,
  /// The observers for sentinel notifications.
  pub dispatcher: Arc<Dispatcher>,
}

impl fmt::Debug for SentinelInner {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SentinelInner")
      .field("id", &self.id)
      .field("server", &self.config.server())
      .field("dispatcher", &self.dispatcher)
      .finish()
  }
}

impl SentinelInner {
  pub fn new(id: Arc<String>, config: SentinelConfig, transport: Arc<dyn CommandTransport>) -> Arc<SentinelInner> {
    let dispatcher = Arc::new(Dispatcher::new(id.clone(), config.parse_mode));

    Arc::new(SentinelInner {
      id,
      config,
      transport,
      dispatcher,
    })
  }

  pub fn log_client_name_fn<F>(&self, level: log::Level, func: F)
  where
    F: FnOnce(&str),
  {
    if log::log_enabled!(level) {
      func(self.id.as_str())
    }
  }

  pub fn client_name(&self) -> &str {
    self.id.as_str()
  }
}
