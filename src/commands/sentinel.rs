use crate::{error::SentinelError, interfaces::Command, modules::inner::SentinelInner, types::Value, utils};
use bytes_utils::Str;
use std::sync::Arc;

pub static SENTINEL: &str = "SENTINEL";
pub static PING: &str = "PING";
pub static INFO: &str = "INFO";

async fn sentinel_cmd(inner: &Arc<SentinelInner>, args: Vec<Value>) -> Result<Value, SentinelError> {
  utils::request_response(inner, Command::new(SENTINEL, args)).await
}

pub async fn ping(inner: &Arc<SentinelInner>) -> Result<Value, SentinelError> {
  utils::request_response(inner, Command::new(PING, vec![])).await
}

pub async fn info(inner: &Arc<SentinelInner>) -> Result<Value, SentinelError> {
  utils::request_response(inner, Command::new(INFO, vec![])).await
}

pub async fn masters(inner: &Arc<SentinelInner>) -> Result<Value, SentinelError> {
  sentinel_cmd(inner, vec!["masters".into()]).await
}

pub async fn master(inner: &Arc<SentinelInner>, name: Str) -> Result<Value, SentinelError> {
  sentinel_cmd(inner, vec!["master".into(), name.into()]).await
}

pub async fn slaves(inner: &Arc<SentinelInner>, name: Str) -> Result<Value, SentinelError> {
  sentinel_cmd(inner, vec!["slaves".into(), name.into()]).await
}

pub async fn sentinels(inner: &Arc<SentinelInner>, name: Str) -> Result<Value, SentinelError> {
  sentinel_cmd(inner, vec!["sentinels".into(), name.into()]).await
}

pub async fn is_master_down(inner: &Arc<SentinelInner>, host: Str, port: Str) -> Result<Value, SentinelError> {
  sentinel_cmd(inner, vec!["is-master-down-by-addr".into(), host.into(), port.into()]).await
}

pub async fn get_master_address(inner: &Arc<SentinelInner>, name: Str) -> Result<Value, SentinelError> {
  sentinel_cmd(inner, vec!["get-master-addr-by-name".into(), name.into()]).await
}

pub async fn reset(inner: &Arc<SentinelInner>, pattern: Str) -> Result<Value, SentinelError> {
  sentinel_cmd(inner, vec!["reset".into(), pattern.into()]).await
}

pub async fn myid(inner: &Arc<SentinelInner>) -> Result<Value, SentinelError> {
  sentinel_cmd(inner, vec!["myid".into()]).await
}

pub async fn ckquorum(inner: &Arc<SentinelInner>, name: Str) -> Result<Value, SentinelError> {
  sentinel_cmd(inner, vec!["ckquorum".into(), name.into()]).await
}

pub async fn failover(inner: &Arc<SentinelInner>, name: Str) -> Result<Value, SentinelError> {
  sentinel_cmd(inner, vec!["failover".into(), name.into()]).await
}
