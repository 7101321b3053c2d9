use crate::{
  error::SentinelError,
  interfaces::{ClientLike, CommandTransport, SentinelInterface, SubscriptionTransport},
  modules::inner::SentinelInner,
  notifications::{Dispatcher, SubscriptionHandle},
  protocol::connection::{CommandConnection, SubscriberConnection},
  types::{EventKind, Notification, SentinelConfig},
  utils,
};
use std::{fmt, sync::Arc};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;

#[cfg(any(test, feature = "mocks"))]
use crate::modules::mocks::{MockTransport, Mocks};

/// A client for a single sentinel node.
///
/// The client sends [sentinel commands](crate::interfaces::SentinelInterface) on one connection and receives
/// notifications on another. Notifications are decoded into typed events and routed to the observers registered with
/// [subscribe](Self::subscribe) or [on_event](Self::on_event).
///
/// ```rust no_run
/// use vigil::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), SentinelError> {
///   let config = SentinelConfig::from_url("redis-sentinel://127.0.0.1:26379")?;
///   let (client, task) = SentinelClient::connect(config).await?;
///
///   client.subscribe(EventKind::SwitchMaster, |notification| {
///     if let Some(details) = notification.switch_master() {
///       println!("{} moved to {}:{}", details.master_name, details.new_ip, details.new_port);
///     }
///   });
///
///   let address = client.get_master_address("mymaster").await?;
///   println!("Current master: {}:{}", address.ip, address.port);
///
///   task.await??;
///   Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct SentinelClient {
  inner: Arc<SentinelInner>,
}

impl fmt::Debug for SentinelClient {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SentinelClient")
      .field("id", &self.inner.id)
      .field("server", &self.inner.config.server())
      .finish()
  }
}

impl ClientLike for SentinelClient {
  #[doc(hidden)]
  fn inner(&self) -> &Arc<SentinelInner> {
    &self.inner
  }
}

impl SentinelInterface for SentinelClient {}

impl SentinelClient {
  /// Create a client that sends commands on the provided transport.
  ///
  /// Notifications are not delivered until a subscription transport is passed to
  /// [spawn_subscriber](Self::spawn_subscriber).
  pub fn new<T>(config: SentinelConfig, transport: T) -> SentinelClient
  where
    T: CommandTransport,
  {
    let id = Arc::new(utils::client_name(config.id.as_ref()));
    SentinelClient {
      inner: SentinelInner::new(id, config, Arc::new(transport)),
    }
  }

  /// Create a client that routes every command to the provided mocking layer.
  #[cfg(any(test, feature = "mocks"))]
  #[cfg_attr(docsrs, doc(cfg(feature = "mocks")))]
  pub fn with_mocks(config: SentinelConfig, mocks: Arc<dyn Mocks>) -> SentinelClient {
    SentinelClient::new(config, MockTransport::new(mocks))
  }

  /// Connect to the sentinel node, subscribe to notifications with the configured pattern, and spawn the task that
  /// dispatches them.
  ///
  /// The returned task ends with the error that closed the subscription connection, if any. Connections are not
  /// re-established.
  pub async fn connect(
    config: SentinelConfig,
  ) -> Result<(SentinelClient, JoinHandle<Result<(), SentinelError>>), SentinelError> {
    let id = Arc::new(utils::client_name(config.id.as_ref()));
    let commands = CommandConnection::connect(&config, &id).await?;
    let subscriber = SubscriberConnection::connect(&config, &id).await?;

    let client = SentinelClient {
      inner: SentinelInner::new(id, config, Arc::new(commands)),
    };
    let task = client.spawn_subscriber(subscriber).await?;
    _info!(client.inner, "Connected to sentinel {}", client.inner.config.server());

    Ok((client, task))
  }

  /// Subscribe the transport to the configured pattern and spawn a task that dispatches each message to the
  /// registered observers.
  pub async fn spawn_subscriber<S>(
    &self,
    mut transport: S,
  ) -> Result<JoinHandle<Result<(), SentinelError>>, SentinelError>
  where
    S: SubscriptionTransport,
  {
    transport.psubscribe(&self.inner.config.pattern).await?;
    _debug!(self.inner, "Subscribed to {}", self.inner.config.pattern);

    let dispatcher = self.inner.dispatcher.clone();
    Ok(tokio::spawn(async move { dispatcher.run(transport).await }))
  }

  /// Read the dispatcher that routes notifications to observers.
  pub fn dispatcher(&self) -> &Arc<Dispatcher> {
    &self.inner.dispatcher
  }

  /// Register an observer for the provided event.
  ///
  /// Observers run on the task that reads notifications, in registration order.
  pub fn subscribe<F>(&self, event: EventKind, handler: F) -> SubscriptionHandle
  where
    F: Fn(&Notification) + Send + Sync + 'static,
  {
    self.inner.dispatcher.subscribe(event, handler)
  }

  /// Remove an observer, returning whether it was registered.
  pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
    self.inner.dispatcher.unsubscribe(handle)
  }

  /// Listen for notifications of the provided event as a stream.
  ///
  /// Dropping the stream removes the observer on the next matching notification.
  pub fn on_event(&self, event: EventKind) -> (SubscriptionHandle, UnboundedReceiverStream<Notification>) {
    self.inner.dispatcher.on_event(event)
  }
}
