use crate::{
  error::{SentinelError, SentinelErrorKind},
  interfaces::{Command, CommandTransport, SubscriptionTransport},
  protocol::{codec::SentinelCodec, utils as protocol_utils},
  types::{PatternMessage, SentinelConfig, Value},
};
use futures::{SinkExt, StreamExt};
use redis_protocol::resp2::types::BytesFrame as Resp2Frame;
use std::{fmt, sync::Arc};
use tokio::{net::TcpStream, sync::Mutex as AsyncMutex, time::timeout};
use tokio_util::codec::Framed;

/// A framed RESP2 connection to a sentinel node.
pub struct RedisTransport {
  /// The client name used in logs.
  pub name:      Arc<String>,
  /// The `host:port` of the sentinel node.
  pub server:    String,
  pub transport: Framed<TcpStream, SentinelCodec>,
}

impl fmt::Debug for RedisTransport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RedisTransport")
      .field("name", &self.name)
      .field("server", &self.server)
      .finish()
  }
}

impl RedisTransport {
  /// Connect to the sentinel node in the config, failing with a `Timeout` error after `connection_timeout_ms`.
  pub async fn connect(config: &SentinelConfig, name: &Arc<String>) -> Result<RedisTransport, SentinelError> {
    let server = config.server();
    log::debug!("{}: Connecting to {}", name, server);

    let socket = timeout(config.connection_timeout(), TcpStream::connect(server.as_str())).await??;
    let codec = SentinelCodec::new(name, server.clone());

    Ok(RedisTransport {
      name: name.clone(),
      server,
      transport: Framed::new(socket, codec),
    })
  }

  pub(crate) fn log_client_name_fn<F>(&self, level: log::Level, func: F)
  where
    F: FnOnce(&str),
  {
    if log::log_enabled!(level) {
      func(self.name.as_str())
    }
  }

  /// Write a frame and flush the socket.
  pub async fn write(&mut self, frame: Resp2Frame) -> Result<(), SentinelError> {
    self.transport.send(frame).await
  }

  /// Read the next frame, returning `None` when the server closes the connection.
  pub async fn read(&mut self) -> Option<Result<Resp2Frame, SentinelError>> {
    self.transport.next().await
  }

  /// Write a frame and wait for the next frame in reply.
  pub async fn request_response(&mut self, frame: Resp2Frame) -> Result<Resp2Frame, SentinelError> {
    self.write(frame).await?;

    match self.read().await {
      Some(result) => result,
      None => Err(SentinelError::new(SentinelErrorKind::Transport, "Connection closed.")),
    }
  }
}

/// A request/response connection to a sentinel node.
///
/// Requests are serialized on the connection, so each caller waits for the reply to any command sent before it.
#[derive(Debug)]
pub struct CommandConnection {
  transport: AsyncMutex<RedisTransport>,
}

impl CommandConnection {
  pub async fn connect(config: &SentinelConfig, name: &Arc<String>) -> Result<CommandConnection, SentinelError> {
    let transport = RedisTransport::connect(config, name).await?;
    _debug!(transport, "Opened command connection to {}", transport.server);

    Ok(CommandConnection {
      transport: AsyncMutex::new(transport),
    })
  }
}

#[async_trait]
impl CommandTransport for CommandConnection {
  async fn request(&self, command: Command) -> Result<Value, SentinelError> {
    let frame = protocol_utils::command_to_frame(&command)?;
    let mut transport = self.transport.lock().await;
    _trace!(transport, "Sending command {} to {}", command, transport.server);

    let response = match transport.request_response(frame).await {
      Ok(frame) => frame,
      Err(e) => {
        _error!(transport, "Error sending {} to {}: {:?}", command.cmd, transport.server, e);
        return Err(e);
      },
    };
    protocol_utils::frame_to_value(response)
  }
}

/// A connection that only reads pattern messages after `PSUBSCRIBE`.
#[derive(Debug)]
pub struct SubscriberConnection {
  transport: RedisTransport,
}

impl SubscriberConnection {
  pub async fn connect(config: &SentinelConfig, name: &Arc<String>) -> Result<SubscriberConnection, SentinelError> {
    let transport = RedisTransport::connect(config, name).await?;
    _debug!(transport, "Opened subscriber connection to {}", transport.server);

    Ok(SubscriberConnection { transport })
  }
}

#[async_trait]
impl SubscriptionTransport for SubscriberConnection {
  async fn psubscribe(&mut self, pattern: &str) -> Result<(), SentinelError> {
    let command = Command::new(protocol_utils::PSUBSCRIBE, vec![pattern.into()]);
    self
      .transport
      .write(protocol_utils::command_to_frame(&command)?)
      .await?;

    loop {
      let frame = match self.transport.read().await {
        Some(frame) => frame?,
        None => {
          return Err(SentinelError::new(
            SentinelErrorKind::Transport,
            "Connection closed before PSUBSCRIBE reply.",
          ))
        },
      };

      if protocol_utils::is_psubscribe_ack(&frame) {
        _debug!(self.transport, "Subscribed to {} on {}", pattern, self.transport.server);
        return Ok(());
      }
      if let Resp2Frame::Error(ref s) = frame {
        return Err(protocol_utils::pretty_error(s));
      }
      _trace!(self.transport, "Skipping frame before PSUBSCRIBE reply: {:?}", frame);
    }
  }

  async fn next_message(&mut self) -> Option<Result<PatternMessage, SentinelError>> {
    loop {
      let frame = match self.transport.read().await? {
        Ok(frame) => frame,
        Err(e) => return Some(Err(e)),
      };

      match protocol_utils::parse_pmessage(frame) {
        Ok(Some(message)) => return Some(Ok(message)),
        Ok(None) => continue,
        Err(e) if protocol_utils::is_decode_error(&e) => {
          _warn!(self.transport, "Skipping undecodable frame from {}: {:?}", self.transport.server, e);
          continue;
        },
        Err(e) => return Some(Err(e)),
      }
    }
  }
}
