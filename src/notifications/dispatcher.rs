use crate::{
  error::SentinelError,
  interfaces::SubscriptionTransport,
  notifications::table,
  types::{EventKind, Notification, ParseMode},
};
use parking_lot::RwLock;
use std::{
  any::Any,
  collections::HashMap,
  fmt,
  panic::{self, AssertUnwindSafe},
  sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
  },
};
use tokio::sync::mpsc::unbounded_channel;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// An observer registered for a notification event.
pub type Handler = Arc<dyn Fn(&Notification) + Send + Sync>;

type ClosedFn = Arc<dyn Fn() -> bool + Send + Sync>;

#[derive(Clone)]
struct Observer {
  id:      u64,
  handler: Handler,
  /// Checked before each call. Observers that report closed are removed instead of called.
  closed:  Option<ClosedFn>,
}

impl Observer {
  fn is_closed(&self) -> bool {
    self.closed.as_ref().map(|f| f()).unwrap_or(false)
  }
}

/// A handle used to remove an observer.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubscriptionHandle {
  id:    u64,
  event: EventKind,
}

impl SubscriptionHandle {
  /// The event the observer is registered for.
  pub fn event(&self) -> EventKind {
    self.event
  }

  pub fn id(&self) -> u64 {
    self.id
  }
}

fn panic_details(payload: &(dyn Any + Send)) -> &str {
  if let Some(s) = payload.downcast_ref::<&str>() {
    s
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.as_str()
  } else {
    "unknown panic"
  }
}

/// Routes sentinel notifications to the observers registered for each event.
///
/// Observers run synchronously on the task that delivers messages, in registration order. A slow observer delays
/// the next notification, so observers that need to block or await should hand off to their own queue, for example
/// with [on_event](Self::on_event).
///
/// A panic inside an observer is caught and logged. The remaining observers for the same notification still run.
pub struct Dispatcher {
  id:         Arc<String>,
  parse_mode: ParseMode,
  next_id:    AtomicU64,
  observers:  RwLock<HashMap<EventKind, Vec<Observer>>>,
}

impl fmt::Debug for Dispatcher {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let observers: usize = self.observers.read().values().map(|v| v.len()).sum();

    f.debug_struct("Dispatcher")
      .field("id", &self.id)
      .field("parse_mode", &self.parse_mode)
      .field("observers", &observers)
      .finish()
  }
}

impl Dispatcher {
  /// Create a new dispatcher without any observers.
  pub fn new(id: Arc<String>, parse_mode: ParseMode) -> Self {
    Dispatcher {
      id,
      parse_mode,
      next_id: AtomicU64::new(0),
      observers: RwLock::new(HashMap::new()),
    }
  }

  pub(crate) fn log_client_name_fn<F>(&self, level: log::Level, func: F)
  where
    F: FnOnce(&str),
  {
    if log::log_enabled!(level) {
      func(self.id.as_str())
    }
  }

  /// The mode used to decode notification payloads.
  pub fn parse_mode(&self) -> ParseMode {
    self.parse_mode
  }

  fn register(&self, event: EventKind, handler: Handler, closed: Option<ClosedFn>) -> SubscriptionHandle {
    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
    self
      .observers
      .write()
      .entry(event)
      .or_default()
      .push(Observer { id, handler, closed });

    _debug!(self, "Added observer {} for {}", id, event);
    SubscriptionHandle { id, event }
  }

  /// Register an observer for the provided event.
  pub fn subscribe<F>(&self, event: EventKind, handler: F) -> SubscriptionHandle
  where
    F: Fn(&Notification) + Send + Sync + 'static,
  {
    self.register(event, Arc::new(handler), None)
  }

  /// Remove an observer, returning whether it was registered.
  pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
    let mut guard = self.observers.write();
    let removed = match guard.get_mut(&handle.event) {
      Some(handlers) => {
        let len = handlers.len();
        handlers.retain(|observer| observer.id != handle.id);
        handlers.len() != len
      },
      None => false,
    };

    if removed {
      _debug!(self, "Removed observer {} for {}", handle.id, handle.event);
    }
    removed
  }

  /// Register an observer that forwards notifications into an unbounded channel, returning the receiving side as a
  /// stream.
  ///
  /// The observer is removed on the next matching notification after the stream is dropped.
  pub fn on_event(&self, event: EventKind) -> (SubscriptionHandle, UnboundedReceiverStream<Notification>) {
    let (tx, rx) = unbounded_channel::<Notification>();
    let _tx = tx.clone();
    let handler: Handler = Arc::new(move |notification: &Notification| {
      let _ = tx.send(notification.clone());
    });
    let handle = self.register(event, handler, Some(Arc::new(move || _tx.is_closed())));

    (handle, UnboundedReceiverStream::new(rx))
  }

  /// Read the number of observers registered for the provided event.
  pub fn observer_count(&self, event: EventKind) -> usize {
    self.observers.read().get(&event).map(|h| h.len()).unwrap_or(0)
  }

  /// Handle one message from the subscription transport, returning the number of observers invoked.
  ///
  /// Messages on channels without a table entry are dropped. Payloads that cannot be decoded are logged and dropped.
  pub fn on_message(&self, pattern: &str, channel: &str, payload: &str) -> usize {
    _trace!(self, "Recv message on {} ({}): {}", channel, pattern, payload);

    let notification = match table::classify(channel, payload, self.parse_mode) {
      Some(Ok(notification)) => notification,
      Some(Err(e)) => {
        _warn!(self, "Dropping notification on {}: {:?}", channel, e);
        return 0;
      },
      None => {
        _trace!(self, "Skipping message on unknown channel {}", channel);
        return 0;
      },
    };

    self.dispatch(&notification)
  }

  /// Invoke every observer registered for the notification's event, returning the number of observers invoked.
  pub fn dispatch(&self, notification: &Notification) -> usize {
    // the lock is released before calling observers so they can add or remove observers
    let observers: Vec<Observer> = match self.observers.read().get(&notification.event) {
      Some(observers) => observers.clone(),
      None => return 0,
    };

    let mut invoked = 0;
    let mut closed = Vec::new();
    for observer in observers.iter() {
      if observer.is_closed() {
        closed.push(observer.id);
        continue;
      }

      invoked += 1;
      if let Err(e) = panic::catch_unwind(AssertUnwindSafe(|| (observer.handler)(notification))) {
        _error!(
          self,
          "Observer {} for {} panicked: {}",
          observer.id,
          notification.event,
          panic_details(e.as_ref())
        );
      }
    }

    if !closed.is_empty() {
      if let Some(observers) = self.observers.write().get_mut(&notification.event) {
        observers.retain(|observer| !closed.contains(&observer.id));
      }
      _debug!(self, "Removed {} closed observer(s) for {}", closed.len(), notification.event);
    }
    invoked
  }

  /// Read messages from the transport until it closes, dispatching each message before reading the next.
  ///
  /// Returns the transport error that ended the stream, if any.
  pub async fn run<S>(&self, mut transport: S) -> Result<(), SentinelError>
  where
    S: SubscriptionTransport,
  {
    _debug!(self, "Starting notification stream processing.");

    while let Some(message) = transport.next_message().await {
      match message {
        Ok(message) => {
          self.on_message(&message.pattern, &message.channel, &message.payload);
        },
        Err(e) => {
          _error!(self, "Error on subscription transport: {:?}", e);
          return Err(e);
        },
      }
    }

    _debug!(self, "Subscription transport closed.");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    modules::mocks::MockSubscription,
    notifications::table::CHANNELS,
    types::{EventStatus, PatternMessage, PayloadKind},
  };
  use futures::StreamExt;
  use parking_lot::Mutex;
  use std::sync::atomic::AtomicUsize;

  const INSTANCE_PAYLOAD: &str = "master mymaster 127.0.0.1 6379 #quorum 2";
  const SWITCH_MASTER_PAYLOAD: &str = "mymaster 127.0.0.1 6379 127.0.0.1 6380";

  fn dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new("test".into()), ParseMode::Lenient)
  }

  fn record_all(dispatcher: &Dispatcher) -> Arc<Mutex<Vec<(EventKind, Option<EventStatus>)>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    for event in EventKind::ALL.iter() {
      let seen = seen.clone();
      dispatcher.subscribe(*event, move |n| seen.lock().push((n.event, n.status)));
    }
    seen
  }

  #[test]
  fn should_emit_one_event_per_known_channel() {
    let _ = pretty_env_logger::try_init();
    let dispatcher = dispatcher();
    let seen = record_all(&dispatcher);

    for entry in CHANNELS.iter() {
      let payload = match entry.payload {
        PayloadKind::Instance => INSTANCE_PAYLOAD,
        PayloadKind::SwitchMaster => SWITCH_MASTER_PAYLOAD,
      };

      assert_eq!(dispatcher.on_message("*", entry.channel, payload), 1, "{}", entry.channel);
      let last = seen.lock().pop();
      assert_eq!(last, Some((entry.event, entry.status)), "{}", entry.channel);
      assert!(seen.lock().is_empty());
    }
  }

  #[test]
  fn should_emit_table_names_and_statuses() {
    let dispatcher = dispatcher();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let _seen = seen.clone();
    dispatcher.subscribe(EventKind::SlaveReconfStatus, move |n| {
      _seen.lock().push((n.name(), n.status.map(|s| s.to_str())));
    });

    dispatcher.on_message("*", "+slave-reconf-sent", INSTANCE_PAYLOAD);
    dispatcher.on_message("*", "+slave-reconf-inprog", INSTANCE_PAYLOAD);
    dispatcher.on_message("*", "+slave-reconf-done", INSTANCE_PAYLOAD);
    dispatcher.on_message("*", "-slave-reconf-undo", INSTANCE_PAYLOAD);

    let expected = vec![
      ("slave-reconf-status", Some("started")),
      ("slave-reconf-status", Some("in-progress")),
      ("slave-reconf-status", Some("done")),
      ("slave-reconf-status", Some("aborted")),
    ];
    assert_eq!(*seen.lock(), expected);
  }

  #[test]
  fn should_skip_unknown_channels() {
    let dispatcher = dispatcher();
    let seen = record_all(&dispatcher);

    assert_eq!(dispatcher.on_message("*", "+unknown-future-event", INSTANCE_PAYLOAD), 0);
    assert_eq!(dispatcher.on_message("*", "__sentinel__:hello", "127.0.0.1,26379,abc,0"), 0);
    assert!(seen.lock().is_empty());
  }

  #[test]
  fn should_drop_malformed_payloads() {
    let dispatcher = Dispatcher::new(Arc::new("test".into()), ParseMode::Strict);
    let seen = record_all(&dispatcher);

    assert_eq!(dispatcher.on_message("*", "+switch-master", "mymaster 127.0.0.1"), 0);
    assert_eq!(dispatcher.on_message("*", "+slave", "slave 127.0.0.1:6380 127.0.0.1 6380 @"), 0);
    assert!(seen.lock().is_empty());

    assert_eq!(dispatcher.on_message("*", "+sdown", INSTANCE_PAYLOAD), 1);
  }

  #[test]
  fn should_call_observers_in_registration_order() {
    let dispatcher = dispatcher();
    let calls = Arc::new(Mutex::new(Vec::new()));

    for idx in 0 .. 3 {
      let calls = calls.clone();
      dispatcher.subscribe(EventKind::InstanceOdown, move |_| calls.lock().push(idx));
    }

    assert_eq!(dispatcher.on_message("*", "+odown", INSTANCE_PAYLOAD), 3);
    assert_eq!(*calls.lock(), vec![0, 1, 2]);
  }

  #[test]
  fn should_continue_after_observer_panic() {
    let dispatcher = dispatcher();
    let calls = Arc::new(AtomicUsize::new(0));

    let _calls = calls.clone();
    dispatcher.subscribe(EventKind::TiltModeEntered, move |_| {
      _calls.fetch_add(1, Ordering::SeqCst);
    });
    dispatcher.subscribe(EventKind::TiltModeEntered, |_| panic!("observer failure"));
    let _calls = calls.clone();
    dispatcher.subscribe(EventKind::TiltModeEntered, move |_| {
      _calls.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(dispatcher.on_message("*", "+tilt", INSTANCE_PAYLOAD), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(dispatcher.on_message("*", "+tilt", INSTANCE_PAYLOAD), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
  }

  #[test]
  fn should_unsubscribe_observers() {
    let dispatcher = dispatcher();
    let calls = Arc::new(AtomicUsize::new(0));

    let _calls = calls.clone();
    let handle = dispatcher.subscribe(EventKind::NewSentinel, move |_| {
      _calls.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(dispatcher.observer_count(EventKind::NewSentinel), 1);

    assert!(dispatcher.unsubscribe(&handle));
    assert!(!dispatcher.unsubscribe(&handle));
    assert_eq!(dispatcher.observer_count(EventKind::NewSentinel), 0);
    assert_eq!(dispatcher.on_message("*", "+sentinel", INSTANCE_PAYLOAD), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn should_allow_unsubscribe_from_observer() {
    let dispatcher = Arc::new(dispatcher());
    let calls = Arc::new(AtomicUsize::new(0));
    let handle = Arc::new(Mutex::new(None));

    let (_dispatcher, _calls, _handle) = (dispatcher.clone(), calls.clone(), handle.clone());
    let registered = dispatcher.subscribe(EventKind::PromotedSlave, move |_| {
      _calls.fetch_add(1, Ordering::SeqCst);
      if let Some(handle) = _handle.lock().take() {
        _dispatcher.unsubscribe(&handle);
      }
    });
    *handle.lock() = Some(registered);

    assert_eq!(dispatcher.on_message("*", "+promoted-slave", INSTANCE_PAYLOAD), 1);
    assert_eq!(dispatcher.on_message("*", "+promoted-slave", INSTANCE_PAYLOAD), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn should_forward_events_to_stream() {
    let dispatcher = dispatcher();
    let (_, mut stream) = dispatcher.on_event(EventKind::SwitchMaster);

    dispatcher.on_message("*", "+switch-master", SWITCH_MASTER_PAYLOAD);
    let notification = stream.next().await.unwrap();
    assert_eq!(notification.switch_master().unwrap().new_port, "6380");
  }

  #[tokio::test]
  async fn should_remove_stream_observer_after_stream_is_dropped() {
    let dispatcher = dispatcher();
    let (_, stream) = dispatcher.on_event(EventKind::InstanceSdown);
    let (_, mut kept) = dispatcher.on_event(EventKind::InstanceSdown);
    assert_eq!(dispatcher.observer_count(EventKind::InstanceSdown), 2);

    drop(stream);
    assert_eq!(dispatcher.observer_count(EventKind::InstanceSdown), 2);
    assert_eq!(dispatcher.on_message("*", "+sdown", INSTANCE_PAYLOAD), 1);
    assert_eq!(dispatcher.observer_count(EventKind::InstanceSdown), 1);
    assert_eq!(kept.next().await.unwrap().event, EventKind::InstanceSdown);

    drop(kept);
    assert_eq!(dispatcher.on_message("*", "+sdown", INSTANCE_PAYLOAD), 0);
    assert_eq!(dispatcher.observer_count(EventKind::InstanceSdown), 0);
  }

  #[tokio::test]
  async fn should_process_messages_in_order() {
    let dispatcher = dispatcher();
    let log = Arc::new(Mutex::new(Vec::new()));

    let _log = log.clone();
    dispatcher.subscribe(EventKind::InstanceSdown, move |n| {
      let name = n.instance().unwrap().name.clone();
      _log.lock().push(format!("start {}", name));
      std::thread::sleep(std::time::Duration::from_millis(20));
      _log.lock().push(format!("end {}", name));
    });
    let _log = log.clone();
    dispatcher.subscribe(EventKind::InstanceSdownRecover, move |n| {
      _log.lock().push(format!("recover {}", n.instance().unwrap().name));
    });

    let transport = MockSubscription::new(vec![
      PatternMessage::new("*", "+sdown", "master m1 127.0.0.1 6379"),
      PatternMessage::new("*", "+sdown", "master m2 127.0.0.1 6380"),
      PatternMessage::new("*", "-sdown", "master m1 127.0.0.1 6379"),
    ]);
    dispatcher.run(transport).await.unwrap();

    let expected = vec!["start m1", "end m1", "start m2", "end m2", "recover m1"];
    assert_eq!(*log.lock(), expected);
  }

  #[tokio::test]
  async fn should_return_transport_errors() {
    let dispatcher = dispatcher();
    let seen = record_all(&dispatcher);
    let transport = MockSubscription::new(vec![PatternMessage::new("*", "+tilt", INSTANCE_PAYLOAD)])
      .with_error(SentinelError::new(crate::error::SentinelErrorKind::Transport, "closed"));

    let err = dispatcher.run(transport).await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(seen.lock().len(), 1);
  }
}
