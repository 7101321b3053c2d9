//! An interface for mocking sentinel commands and notifications.
//!
//! There are several patterns for utilizing a mocking layer in tests. In some cases a simple "echo" interface is
//! enough, in others callers may need canned replies for the commands under test or may want to inspect the
//! commands sent by the client.
//!
//! This module exposes several structs for supporting the above use cases:
//! * `Echo` - A simple mocking struct that returns the provided arguments back to the caller.
//! * `Buffer` - A mocking struct that buffers commands internally, returning `OK` to each command.
//! * `SimpleResponses` - A mocking struct that returns a canned reply for each command and records every call.
//! * `MockSubscription` - A scripted subscription transport that yields a fixed list of messages.
//!
//! The base `Mocks` trait is directly exposed so callers can implement their own mocking layer as well.

use crate::{
  error::{SentinelError, SentinelErrorKind},
  interfaces::{Command, CommandTransport, SubscriptionTransport},
  types::{PatternMessage, Value},
};
use bytes_utils::Str;
use parking_lot::Mutex;
use std::{
  collections::{HashMap, VecDeque},
  fmt::Debug,
  sync::Arc,
};

/// A wrapper type for the parts of a sentinel command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MockCommand {
  pub cmd:        Str,
  pub subcommand: Option<Str>,
  pub args:       Vec<Value>,
}

impl From<Command> for MockCommand {
  fn from(command: Command) -> Self {
    let mut args = command.args;
    let subcommand = if &*command.cmd == "SENTINEL" && !args.is_empty() {
      match args.remove(0) {
        Value::String(s) => Some(s),
        other => {
          args.insert(0, other);
          None
        },
      }
    } else {
      None
    };

    MockCommand {
      cmd: command.cmd,
      subcommand,
      args,
    }
  }
}

impl MockCommand {
  /// Read the key used by [SimpleResponses], such as `PING` or `SENTINEL masters`.
  pub fn key(&self) -> String {
    match self.subcommand {
      Some(ref subcommand) => format!("{} {}", self.cmd, subcommand),
      None => self.cmd.to_string(),
    }
  }
}

/// An interface for intercepting and processing sentinel commands in a mocking layer.
pub trait Mocks: Debug + Send + Sync + 'static {
  /// Intercept and process a command, returning any `Value`.
  ///
  /// # Important
  ///
  /// The caller must ensure the response value makes sense in the context of the specific command(s) being mocked.
  /// The parsing logic following each command on the public interface will still be applied.
  fn process_command(&self, command: MockCommand) -> Result<Value, SentinelError>;
}

/// A command transport that routes every command to a mocking layer.
#[derive(Debug)]
pub struct MockTransport {
  mocks: Arc<dyn Mocks>,
}

impl MockTransport {
  pub fn new(mocks: Arc<dyn Mocks>) -> Self {
    MockTransport { mocks }
  }
}

#[async_trait]
impl CommandTransport for MockTransport {
  async fn request(&self, command: Command) -> Result<Value, SentinelError> {
    self.mocks.process_command(command.into())
  }
}

/// An implementation of a mocking layer that returns the provided arguments to the caller.
#[derive(Debug)]
pub struct Echo;

impl Mocks for Echo {
  fn process_command(&self, command: MockCommand) -> Result<Value, SentinelError> {
    Ok(Value::Array(command.args))
  }
}

/// A mocking layer that buffers the commands internally and returns `OK` to the caller.
#[derive(Debug, Default)]
pub struct Buffer {
  commands: Mutex<VecDeque<MockCommand>>,
}

impl Buffer {
  /// Create a new empty `Buffer`.
  pub fn new() -> Self {
    Buffer {
      commands: Mutex::new(VecDeque::new()),
    }
  }

  /// Read the length of the internal buffer.
  pub fn len(&self) -> usize {
    self.commands.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.commands.lock().is_empty()
  }

  /// Clear the inner buffer.
  pub fn clear(&self) {
    self.commands.lock().clear();
  }

  /// Drain and return the internal command buffer.
  pub fn take(&self) -> Vec<MockCommand> {
    self.commands.lock().drain(..).collect()
  }

  /// Read a copy of the internal command buffer without modifying the contents.
  pub fn inner(&self) -> Vec<MockCommand> {
    self.commands.lock().iter().cloned().collect()
  }

  /// Push a new command onto the back of the internal buffer.
  pub fn push_back(&self, command: MockCommand) {
    self.commands.lock().push_back(command);
  }

  /// Pop a command from the front of the internal buffer.
  pub fn pop_front(&self) -> Option<MockCommand> {
    self.commands.lock().pop_front()
  }
}

impl Mocks for Buffer {
  fn process_command(&self, command: MockCommand) -> Result<Value, SentinelError> {
    self.push_back(command);
    Ok(Value::from("OK"))
  }
}

/// A mocking layer that returns canned replies keyed by [MockCommand::key] and records each command it receives.
///
/// Commands without a reply fail with an `Unknown` error.
#[derive(Debug, Default)]
pub struct SimpleResponses {
  responses: Mutex<HashMap<String, Result<Value, SentinelError>>>,
  calls:     Buffer,
}

impl SimpleResponses {
  /// Create a new mocking layer without any replies.
  pub fn new() -> Self {
    SimpleResponses::default()
  }

  /// Set the reply for a command key, such as `INFO` or `SENTINEL get-master-addr-by-name`.
  pub fn reply<K, V>(self, key: K, value: V) -> Self
  where
    K: Into<String>,
    V: Into<Value>,
  {
    self.responses.lock().insert(key.into(), Ok(value.into()));
    self
  }

  /// Set an error reply for a command key.
  pub fn fail<K>(self, key: K, error: SentinelError) -> Self
  where
    K: Into<String>,
  {
    self.responses.lock().insert(key.into(), Err(error));
    self
  }

  /// Read a copy of the commands received so far.
  pub fn calls(&self) -> Vec<MockCommand> {
    self.calls.inner()
  }

  /// Read the number of commands received so far.
  pub fn call_count(&self) -> usize {
    self.calls.len()
  }
}

impl Mocks for SimpleResponses {
  fn process_command(&self, command: MockCommand) -> Result<Value, SentinelError> {
    let key = command.key();
    self.calls.push_back(command);

    match self.responses.lock().get(&key) {
      Some(response) => response.clone(),
      None => Err(SentinelError::new(
        SentinelErrorKind::Unknown,
        format!("Missing mock response for {}", key),
      )),
    }
  }
}

/// A scripted subscription transport.
///
/// Each call to `next_message` yields the next scripted message. Once the messages run out the optional error is
/// returned, after which the stream ends.
#[derive(Debug, Default)]
pub struct MockSubscription {
  messages: VecDeque<PatternMessage>,
  error:    Option<SentinelError>,
  patterns: Arc<Mutex<Vec<String>>>,
}

impl MockSubscription {
  pub fn new(messages: Vec<PatternMessage>) -> Self {
    MockSubscription {
      messages: messages.into(),
      error:    None,
      patterns: Arc::new(Mutex::new(Vec::new())),
    }
  }

  /// Return the provided error after the scripted messages.
  pub fn with_error(mut self, error: SentinelError) -> Self {
    self.error = Some(error);
    self
  }

  /// A shared handle to the patterns passed to `psubscribe`.
  pub fn patterns(&self) -> Arc<Mutex<Vec<String>>> {
    self.patterns.clone()
  }
}

#[async_trait]
impl SubscriptionTransport for MockSubscription {
  async fn psubscribe(&mut self, pattern: &str) -> Result<(), SentinelError> {
    self.patterns.lock().push(pattern.to_owned());
    Ok(())
  }

  async fn next_message(&mut self) -> Option<Result<PatternMessage, SentinelError>> {
    match self.messages.pop_front() {
      Some(message) => Some(Ok(message)),
      None => self.error.take().map(Err),
    }
  }
}
