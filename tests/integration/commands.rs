use crate::utils::{FakeSentinel, MASTER_NAME, RUN_ID};
use vigil::{
  clients::SentinelClient,
  error::SentinelErrorKind,
  interfaces::*,
  types::{SentinelConfig, Value},
};

async fn connect() -> (FakeSentinel, SentinelClient) {
  let _ = pretty_env_logger::try_init();
  let sentinel = FakeSentinel::start().await;
  let (client, _) = within_timeout!(SentinelClient::connect(sentinel.config())).expect("Failed to connect");
  (sentinel, client)
}

#[tokio::test]
async fn should_ping_over_tcp() {
  let (_sentinel, client) = connect().await;
  assert_eq!(within_timeout!(client.ping()).unwrap(), "PONG");
}

#[tokio::test]
async fn should_read_master_records() {
  let (_sentinel, client) = connect().await;

  let masters = within_timeout!(client.masters()).unwrap();
  assert_eq!(masters.len(), 1);
  assert_eq!(masters[0].name, MASTER_NAME);
  assert_eq!(masters[0].num_other_sentinels, "2");
  assert_eq!(masters[0].quorum, "2");

  let master = within_timeout!(client.master(MASTER_NAME)).unwrap();
  assert_eq!(master, masters[0]);

  let slaves = within_timeout!(client.slaves(MASTER_NAME)).unwrap();
  assert_eq!(slaves[0].port, "6380");
  assert_eq!(slaves[0].master_link_status, "");
  assert!(within_timeout!(client.sentinels(MASTER_NAME)).unwrap().is_empty());
}

#[tokio::test]
async fn should_resolve_master_address() {
  let (_sentinel, client) = connect().await;

  let address = within_timeout!(client.get_master_address(MASTER_NAME)).unwrap();
  assert_eq!((address.ip.as_str(), address.port.as_str()), ("127.0.0.1", "6379"));

  let err = within_timeout!(client.get_master_address("unknown")).unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn should_check_leader_with_info() {
  let (_sentinel, client) = connect().await;

  let reply = within_timeout!(client.is_master_down("127.0.0.1", "6379")).unwrap();
  assert!(!reply.is_down);
  assert_eq!(reply.leader_run_id, RUN_ID);
  assert!(within_timeout!(client.is_leader("127.0.0.1", "6379")).unwrap());
  assert_eq!(within_timeout!(client.myid()).unwrap(), RUN_ID);
}

#[tokio::test]
async fn should_reset_and_fail_over() {
  let (_sentinel, client) = connect().await;

  assert!(within_timeout!(client.reset(MASTER_NAME)).unwrap());
  within_timeout!(client.failover(MASTER_NAME)).unwrap();

  let err = within_timeout!(client.failover("unknown")).unwrap_err();
  assert_eq!(err.details(), "ERR No such master with that name");
}

#[tokio::test]
async fn should_reject_non_string_args_before_sending() {
  let (_sentinel, client) = connect().await;

  let err = within_timeout!(client.is_master_down("127.0.0.1", Value::Integer(6379))).unwrap_err();
  assert!(err.is_invalid_argument());
  // the connection is still usable since nothing was written
  assert_eq!(within_timeout!(client.ping()).unwrap(), "PONG");
}

#[tokio::test]
async fn should_fail_to_connect_to_closed_port() {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let port = listener.local_addr().unwrap().port();
  drop(listener);

  let config = SentinelConfig {
    host: "127.0.0.1".into(),
    port,
    ..Default::default()
  };
  let err = within_timeout!(SentinelClient::connect(config)).unwrap_err();
  assert_eq!(*err.kind(), SentinelErrorKind::Transport);
}
