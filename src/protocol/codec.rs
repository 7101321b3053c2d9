use crate::error::SentinelError;
use bytes::BytesMut;
use redis_protocol::resp2::{
  decode::decode_bytes_mut as resp2_decode,
  encode::extend_encode as resp2_encode,
  types::BytesFrame as Resp2Frame,
};
use std::sync::Arc;
use tokio_util::codec::{Decoder, Encoder};

#[cfg(feature = "network-logs")]
use std::str;

#[cfg(not(feature = "network-logs"))]
fn log_resp2_frame(_: &str, _: &Resp2Frame, _: bool) {}

#[cfg(feature = "network-logs")]
#[derive(Debug)]
enum DebugFrame {
  String(String),
  Bytes(Vec<u8>),
  Integer(i64),
  Array(Vec<DebugFrame>),
}

#[cfg(feature = "network-logs")]
impl<'a> From<&'a Resp2Frame> for DebugFrame {
  fn from(f: &'a Resp2Frame) -> Self {
    match f {
      Resp2Frame::Error(s) => DebugFrame::String(s.to_string()),
      Resp2Frame::SimpleString(b) | Resp2Frame::BulkString(b) => match str::from_utf8(b) {
        Ok(s) => DebugFrame::String(s.to_owned()),
        Err(_) => DebugFrame::Bytes(b.to_vec()),
      },
      Resp2Frame::Integer(i) => DebugFrame::Integer(*i),
      Resp2Frame::Null => DebugFrame::String("nil".into()),
      Resp2Frame::Array(frames) => DebugFrame::Array(frames.iter().map(|f| f.into()).collect()),
    }
  }
}

#[cfg(feature = "network-logs")]
fn log_resp2_frame(name: &str, frame: &Resp2Frame, encode: bool) {
  let prefix = if encode { "Encoded" } else { "Decoded" };
  log::trace!("{}: {} {:?}", name, prefix, DebugFrame::from(frame))
}

fn resp2_encode_frame(codec: &SentinelCodec, item: Resp2Frame, dst: &mut BytesMut) -> Result<(), SentinelError> {
  let offset = dst.len();

  let _ = resp2_encode(dst, &item)?;
  let len = dst.len().saturating_sub(offset);

  log::trace!(
    "{}: Encoded {} bytes to {}. Buffer len: {}",
    codec.name,
    len,
    codec.server,
    dst.len()
  );
  log_resp2_frame(&codec.name, &item, true);
  Ok(())
}

fn resp2_decode_frame(codec: &SentinelCodec, src: &mut BytesMut) -> Result<Option<Resp2Frame>, SentinelError> {
  log::trace!("{}: Recv {} bytes from {}.", codec.name, src.len(), codec.server);
  if src.is_empty() {
    return Ok(None);
  }

  if let Some((frame, amt, _)) = resp2_decode(src)? {
    log::trace!("{}: Parsed {} bytes from {}", codec.name, amt, codec.server);
    log_resp2_frame(&codec.name, &frame, false);

    Ok(Some(frame))
  } else {
    Ok(None)
  }
}

/// A RESP2 codec for connections to a sentinel node.
pub struct SentinelCodec {
  pub name:   Arc<String>,
  pub server: String,
}

impl SentinelCodec {
  pub fn new(name: &Arc<String>, server: String) -> Self {
    SentinelCodec {
      name: name.clone(),
      server,
    }
  }
}

impl Encoder<Resp2Frame> for SentinelCodec {
  type Error = SentinelError;

  fn encode(&mut self, item: Resp2Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
    resp2_encode_frame(self, item, dst)
  }
}

impl Decoder for SentinelCodec {
  type Item = Resp2Frame;
  type Error = SentinelError;

  fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
    resp2_decode_frame(self, src)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use bytes::Bytes;

  fn codec() -> SentinelCodec {
    SentinelCodec::new(&Arc::new("test".into()), "127.0.0.1:26379".into())
  }

  #[test]
  fn should_decode_pmessage_frame() {
    let mut buf = BytesMut::from(
      "*4\r\n$8\r\npmessage\r\n$1\r\n*\r\n$6\r\n+sdown\r\n$30\r\nmaster mymaster 127.0.0.1 6379\r\n".as_bytes(),
    );
    let frame = codec().decode(&mut buf).unwrap().unwrap();

    let expected = Resp2Frame::Array(vec![
      Resp2Frame::BulkString(Bytes::from_static(b"pmessage")),
      Resp2Frame::BulkString(Bytes::from_static(b"*")),
      Resp2Frame::BulkString(Bytes::from_static(b"+sdown")),
      Resp2Frame::BulkString(Bytes::from_static(b"master mymaster 127.0.0.1 6379")),
    ]);
    assert_eq!(frame, expected);
    assert!(buf.is_empty());
  }

  #[test]
  fn should_wait_for_partial_frames() {
    let mut buf = BytesMut::from("*2\r\n$4\r\nPING\r\n".as_bytes());
    assert!(codec().decode(&mut buf).unwrap().is_none());
  }

  #[test]
  fn should_encode_command_frame() {
    let mut buf = BytesMut::new();
    let frame = Resp2Frame::Array(vec![Resp2Frame::BulkString(Bytes::from_static(b"PING"))]);
    codec().encode(frame, &mut buf).unwrap();

    assert_eq!(&buf[..], b"*1\r\n$4\r\nPING\r\n");
  }
}
