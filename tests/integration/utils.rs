#![allow(unused_macros)]
#![allow(dead_code)]

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use redis_protocol::resp2::types::BytesFrame as Frame;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{
  net::{TcpListener, TcpStream},
  sync::broadcast::{self, error::RecvError},
  task::JoinHandle,
};
use tokio_util::codec::Framed;
use vigil::{protocol::codec::SentinelCodec, types::SentinelConfig};

pub const RUN_ID: &str = "e1b4a3c2d6f8e1b4a3c2d6f8e1b4a3c2d6f8e1b4";
pub const MASTER_NAME: &str = "mymaster";
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Fail the test if the future does not finish within `TEST_TIMEOUT`.
macro_rules! within_timeout (
  ($ft:expr) => {
    tokio::time::timeout(crate::utils::TEST_TIMEOUT, $ft)
      .await
      .expect("Timed out waiting for test future.")
  };
);

/// An in-process sentinel node that answers a fixed set of commands and forwards published notifications to every
/// `PSUBSCRIBE` connection.
pub struct FakeSentinel {
  pub addr:  SocketAddr,
  publisher: broadcast::Sender<(String, Bytes)>,
  task:      JoinHandle<()>,
}

impl FakeSentinel {
  pub async fn start() -> FakeSentinel {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read listener address");
    let (publisher, _) = broadcast::channel(64);

    let _publisher = publisher.clone();
    let task = tokio::spawn(async move {
      while let Ok((socket, _)) = listener.accept().await {
        tokio::spawn(handle_connection(socket, _publisher.subscribe()));
      }
    });

    FakeSentinel { addr, publisher, task }
  }

  pub fn config(&self) -> SentinelConfig {
    SentinelConfig {
      host: self.addr.ip().to_string(),
      port: self.addr.port(),
      id: Some("integration".into()),
      ..Default::default()
    }
  }

  /// Publish a notification to every subscribed connection.
  pub fn publish(&self, channel: &str, payload: &str) {
    self.publish_bytes(channel, Bytes::from(payload.to_owned()));
  }

  /// Publish a notification with an arbitrary payload, which may not be valid UTF-8.
  pub fn publish_bytes(&self, channel: &str, payload: Bytes) {
    let _ = self.publisher.send((channel.to_owned(), payload));
  }

  /// Stop accepting connections and close every subscribed connection.
  pub fn shutdown(self) {
    self.task.abort();
  }
}

pub fn bulk(s: &str) -> Frame {
  Frame::BulkString(Bytes::from(s.to_owned()))
}

fn flat(pairs: &[(&str, &str)]) -> Frame {
  Frame::Array(pairs.iter().flat_map(|(k, v)| vec![bulk(k), bulk(v)]).collect())
}

fn master_record() -> Frame {
  flat(&[
    ("name", MASTER_NAME),
    ("ip", "127.0.0.1"),
    ("port", "6379"),
    ("runid", "a1b2"),
    ("flags", "master"),
    ("link-pending-commands", "0"),
    ("last-ok-ping-reply", "310"),
    ("last-ping-reply", "310"),
    ("info-refresh", "4521"),
    ("num-slaves", "1"),
    ("num-other-sentinels", "2"),
    ("quorum", "2"),
  ])
}

fn frame_to_args(frame: Frame) -> Vec<String> {
  match frame {
    Frame::Array(frames) => frames
      .into_iter()
      .filter_map(|f| match f {
        Frame::BulkString(b) | Frame::SimpleString(b) => String::from_utf8(b.to_vec()).ok(),
        _ => None,
      })
      .collect(),
    _ => Vec::new(),
  }
}

fn reply_to(args: &[String]) -> Frame {
  let args: Vec<&str> = args.iter().map(|s| s.as_str()).collect();

  match args.as_slice() {
    ["PING"] => Frame::SimpleString(Bytes::from_static(b"PONG")),
    ["INFO"] => bulk(&format!(
      "# Server\r\nredis_version:7.2.4\r\nredis_mode:sentinel\r\nrun_id:{}\r\ntcp_port:26379\r\n",
      RUN_ID
    )),
    ["SENTINEL", "masters"] => Frame::Array(vec![master_record()]),
    ["SENTINEL", "master", MASTER_NAME] => master_record(),
    ["SENTINEL", "slaves", MASTER_NAME] => Frame::Array(vec![flat(&[
      ("name", "127.0.0.1:6380"),
      ("ip", "127.0.0.1"),
      ("port", "6380"),
    ])]),
    ["SENTINEL", "sentinels", MASTER_NAME] => Frame::Array(vec![]),
    ["SENTINEL", "get-master-addr-by-name", MASTER_NAME] => Frame::Array(vec![bulk("127.0.0.1"), bulk("6379")]),
    ["SENTINEL", "get-master-addr-by-name", _] => Frame::Null,
    ["SENTINEL", "is-master-down-by-addr", _, _] => {
      Frame::Array(vec![Frame::Integer(0), bulk(RUN_ID), Frame::Integer(0)])
    },
    ["SENTINEL", "reset", _] => Frame::Integer(1),
    ["SENTINEL", "myid"] => bulk(RUN_ID),
    ["SENTINEL", "failover", MASTER_NAME] => Frame::SimpleString(Bytes::from_static(b"OK")),
    ["SENTINEL", "failover", _] => Frame::Error("ERR No such master with that name".into()),
    _ => Frame::Error(format!("ERR unknown command '{}'", args.join(" ")).into()),
  }
}

async fn handle_connection(socket: TcpStream, mut messages: broadcast::Receiver<(String, Bytes)>) {
  let name = Arc::new("fake-sentinel".to_owned());
  let mut framed = Framed::new(socket, SentinelCodec::new(&name, "client".into()));

  while let Some(Ok(frame)) = framed.next().await {
    let args = frame_to_args(frame);

    if args.first().map(|s| s.eq_ignore_ascii_case("PSUBSCRIBE")).unwrap_or(false) {
      let pattern = args.get(1).cloned().unwrap_or_default();
      let ack = Frame::Array(vec![bulk("psubscribe"), bulk(&pattern), Frame::Integer(1)]);
      if framed.send(ack).await.is_err() {
        return;
      }

      loop {
        match messages.recv().await {
          Ok((channel, payload)) => {
            let frame = Frame::Array(vec![bulk("pmessage"), bulk(&pattern), bulk(&channel), Frame::BulkString(payload)]);
            if framed.send(frame).await.is_err() {
              return;
            }
          },
          Err(RecvError::Lagged(_)) => continue,
          Err(RecvError::Closed) => return,
        }
      }
    }

    if framed.send(reply_to(&args)).await.is_err() {
      return;
    }
  }
}
