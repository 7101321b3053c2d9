use crate::{
  commands,
  error::SentinelError,
  modules::inner::SentinelInner,
  types::{
    MasterAddress,
    MasterDownReply,
    MasterInfo,
    PatternMessage,
    SentinelConfig,
    SentinelInfo,
    SlaveInfo,
    Value,
  },
  utils,
};
use bytes_utils::Str;
use std::{fmt, sync::Arc};

/// A command sent to the sentinel node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Command {
  /// The command name, such as `SENTINEL` or `PING`.
  pub cmd:  Str,
  /// The command arguments, including any subcommand.
  pub args: Vec<Value>,
}

impl Command {
  pub fn new<C>(cmd: C, args: Vec<Value>) -> Self
  where
    C: Into<Str>,
  {
    Command { cmd: cmd.into(), args }
  }

  /// Read the subcommand, if the first argument is a string.
  pub fn subcommand(&self) -> Option<&str> {
    match self.args.first() {
      Some(Value::String(ref s)) => Some(&**s),
      _ => None,
    }
  }
}

impl fmt::Display for Command {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.cmd)?;
    for arg in self.args.iter() {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// A request/response connection to a sentinel node.
///
/// Implementations are expected to be connected before use. Reconnection is the caller's concern.
#[async_trait]
pub trait CommandTransport: Send + Sync + 'static {
  /// Send a command and wait for its reply.
  ///
  /// Error replies from the server and connection failures are returned as errors.
  async fn request(&self, command: Command) -> Result<Value, SentinelError>;
}

/// A connection that receives messages published on subscribed patterns.
#[async_trait]
pub trait SubscriptionTransport: Send + 'static {
  /// Subscribe to the provided channel pattern.
  async fn psubscribe(&mut self, pattern: &str) -> Result<(), SentinelError>;

  /// Wait for the next published message, returning `None` when the connection closes.
  async fn next_message(&mut self) -> Option<Result<PatternMessage, SentinelError>>;
}

/// Any sentinel client that shares the client state.
pub trait ClientLike: Unpin + Send + Sync + Sized {
  #[doc(hidden)]
  fn inner(&self) -> &Arc<SentinelInner>;

  /// The unique ID identifying this client in logs.
  fn id(&self) -> &Arc<String> {
    &self.inner().id
  }

  /// Read the config used to initialize the client.
  fn client_config(&self) -> &SentinelConfig {
    &self.inner().config
  }
}

/// Functions that implement the [sentinel](https://redis.io/docs/management/sentinel/#sentinel-api) command interface.
///
/// Required arguments accept anything that converts into a [Value], but every argument must be a string. Any other
/// value fails with an `InvalidArgument` error before a command is sent.
#[async_trait]
pub trait SentinelInterface: ClientLike {
  /// Check that the sentinel node is reachable, returning `PONG`.
  async fn ping(&self) -> Result<String, SentinelError> {
    commands::sentinel::ping(self.inner()).await?.convert()
  }

  /// Read the state of every master monitored by the sentinel.
  async fn masters(&self) -> Result<Vec<MasterInfo>, SentinelError> {
    commands::sentinel::masters(self.inner()).await?.convert()
  }

  /// Read the state of one monitored master.
  async fn master<N>(&self, master: N) -> Result<MasterInfo, SentinelError>
  where
    N: Into<Value> + Send,
  {
    string_args!(master);
    commands::sentinel::master(self.inner(), master).await?.convert()
  }

  /// Read the replicas of a master.
  async fn slaves<N>(&self, master: N) -> Result<Vec<SlaveInfo>, SentinelError>
  where
    N: Into<Value> + Send,
  {
    string_args!(master);
    commands::sentinel::slaves(self.inner(), master).await?.convert()
  }

  /// Read the other sentinels monitoring a master.
  async fn sentinels<N>(&self, master: N) -> Result<Vec<SentinelInfo>, SentinelError>
  where
    N: Into<Value> + Send,
  {
    string_args!(master);
    commands::sentinel::sentinels(self.inner(), master).await?.convert()
  }

  /// Ask the sentinel whether the master at `host:port` is down, and which sentinel it voted as leader.
  async fn is_master_down<H, P>(&self, host: H, port: P) -> Result<MasterDownReply, SentinelError>
  where
    H: Into<Value> + Send,
    P: Into<Value> + Send,
  {
    string_args!(host, port);
    commands::sentinel::is_master_down(self.inner(), host, port)
      .await?
      .convert()
  }

  /// Read the address of the current master with the provided name.
  ///
  /// Fails with a `NotFound` error if the sentinel does not monitor the master.
  async fn get_master_address<N>(&self, master: N) -> Result<MasterAddress, SentinelError>
  where
    N: Into<Value> + Send,
  {
    string_args!(master);
    commands::sentinel::get_master_address(self.inner(), master)
      .await?
      .convert()
  }

  /// Reset the state of every master matching the provided glob pattern, returning whether exactly one master was
  /// reset.
  async fn reset<N>(&self, master: N) -> Result<bool, SentinelError>
  where
    N: Into<Value> + Send,
  {
    string_args!(master);
    let reply = commands::sentinel::reset(self.inner(), master).await?;
    Ok(reply.as_i64() == Some(1))
  }

  /// Check whether this sentinel is the leader elected for the master at `host:port`.
  ///
  /// This sends `is-master-down-by-addr` and then compares the reported leader to the `run_id` in `INFO`.
  async fn is_leader<H, P>(&self, host: H, port: P) -> Result<bool, SentinelError>
  where
    H: Into<Value> + Send,
    P: Into<Value> + Send,
  {
    string_args!(host, port);
    let reply: MasterDownReply = commands::sentinel::is_master_down(self.inner(), host, port)
      .await?
      .convert()?;
    let info: String = commands::sentinel::info(self.inner()).await?.convert()?;

    Ok(utils::is_leader_run_id(&info, &reply.leader_run_id))
  }

  /// Read the run ID of the sentinel.
  async fn myid(&self) -> Result<String, SentinelError> {
    commands::sentinel::myid(self.inner()).await?.convert()
  }

  /// Check whether the sentinels can reach the quorum and majority needed to fail over the master.
  async fn ckquorum<N>(&self, master: N) -> Result<String, SentinelError>
  where
    N: Into<Value> + Send,
  {
    string_args!(master);
    commands::sentinel::ckquorum(self.inner(), master).await?.convert()
  }

  /// Force a failover of the master without asking other sentinels for agreement.
  async fn failover<N>(&self, master: N) -> Result<(), SentinelError>
  where
    N: Into<Value> + Send,
  {
    string_args!(master);
    let reply = commands::sentinel::failover(self.inner(), master).await?;
    utils::expect_ok(&reply)
  }

  /// Read the `INFO` text of the sentinel.
  async fn info(&self) -> Result<String, SentinelError> {
    commands::sentinel::info(self.inner()).await?.convert()
  }
}
