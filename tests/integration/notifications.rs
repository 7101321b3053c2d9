use crate::utils::FakeSentinel;
use bytes::Bytes;
use futures::StreamExt;
use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use vigil::{
  clients::SentinelClient,
  types::{EventKind, EventStatus, InstanceKind, ParseMode},
};

#[tokio::test]
async fn should_subscribe_and_deliver_notifications() {
  let _ = pretty_env_logger::try_init();
  let sentinel = FakeSentinel::start().await;
  let (client, _task) = within_timeout!(SentinelClient::connect(sentinel.config())).unwrap();
  let (_, mut stream) = client.on_event(EventKind::InstanceOdown);

  sentinel.publish("+odown", "master mymaster 127.0.0.1 6379 #quorum 2/2");
  let notification = within_timeout!(stream.next()).unwrap();
  let details = notification.instance().unwrap();

  assert_eq!(notification.name(), "instance-odown");
  assert_eq!(details.instance_kind(), InstanceKind::Master);
  assert_eq!(details.name, "mymaster");
  assert_eq!(details.quorum.as_deref(), Some("2/2"));
}

#[tokio::test]
async fn should_deliver_events_in_publish_order() {
  let sentinel = FakeSentinel::start().await;
  let (client, _task) = within_timeout!(SentinelClient::connect(sentinel.config())).unwrap();
  let log = Arc::new(Mutex::new(Vec::new()));

  let _log = log.clone();
  client.subscribe(EventKind::InstanceSdown, move |n| {
    let name = n.instance().unwrap().name.clone();
    _log.lock().push(format!("start {}", name));
    std::thread::sleep(Duration::from_millis(20));
    _log.lock().push(format!("end {}", name));
  });
  let (_, mut recovered) = client.on_event(EventKind::InstanceSdownRecover);

  sentinel.publish("+sdown", "master m1 127.0.0.1 6379");
  sentinel.publish("+unknown-future-event", "master m1 127.0.0.1 6379");
  sentinel.publish("+sdown", "master m2 127.0.0.1 6380");
  sentinel.publish("-sdown", "master m1 127.0.0.1 6379");

  let notification = within_timeout!(recovered.next()).unwrap();
  assert_eq!(notification.instance().unwrap().name, "m1");
  assert_eq!(*log.lock(), vec!["start m1", "end m1", "start m2", "end m2"]);
}

#[tokio::test]
async fn should_deliver_switch_master_and_failover_status() {
  let sentinel = FakeSentinel::start().await;
  let (client, _task) = within_timeout!(SentinelClient::connect(sentinel.config())).unwrap();
  let (_, mut statuses) = client.on_event(EventKind::FailoverStatus);
  let (_, mut switches) = client.on_event(EventKind::SwitchMaster);

  sentinel.publish("+failover-state-select-slave", "master mymaster 127.0.0.1 6379");
  sentinel.publish("+switch-master", "mymaster 127.0.0.1 6379 127.0.0.1 6380");
  sentinel.publish("+failover-end", "master mymaster 127.0.0.1 6379");

  let first = within_timeout!(statuses.next()).unwrap();
  let second = within_timeout!(statuses.next()).unwrap();
  assert_eq!(first.status, Some(EventStatus::SelectingSlave));
  assert_eq!(second.status, Some(EventStatus::Succeeded));

  let switch = within_timeout!(switches.next()).unwrap();
  let details = switch.switch_master().unwrap();
  assert_eq!(details.master_name, "mymaster");
  assert_eq!((details.old_port.as_str(), details.new_port.as_str()), ("6379", "6380"));
}

#[tokio::test]
async fn should_drop_malformed_payloads_in_strict_mode() {
  let sentinel = FakeSentinel::start().await;
  let mut config = sentinel.config();
  config.parse_mode = ParseMode::Strict;
  let (client, _task) = within_timeout!(SentinelClient::connect(config)).unwrap();
  let (_, mut slaves) = client.on_event(EventKind::NewSlave);

  sentinel.publish("+slave", "slave 127.0.0.1:6380 127.0.0.1 6380 @");
  sentinel.publish("+slave", "slave 127.0.0.1:6381 127.0.0.1 6381 @ mymaster 127.0.0.1 6379");

  let notification = within_timeout!(slaves.next()).unwrap();
  let details = notification.instance().unwrap();
  assert_eq!(details.port, "6381");
  assert_eq!(details.master_name.as_deref(), Some("mymaster"));
  assert_eq!(details.master_port.as_deref(), Some("6379"));
}

#[tokio::test]
async fn should_keep_delivering_after_non_utf8_message() {
  let sentinel = FakeSentinel::start().await;
  let (client, task) = within_timeout!(SentinelClient::connect(sentinel.config())).unwrap();
  let (_, mut sdown) = client.on_event(EventKind::InstanceSdown);

  sentinel.publish_bytes("app:blob", Bytes::from_static(&[0xff, 0xfe]));
  sentinel.publish("+sdown", "master m 127.0.0.1 6379");

  let notification = within_timeout!(sdown.next()).unwrap();
  assert_eq!(notification.instance().unwrap().name, "m");
  assert!(!task.is_finished());
}

#[tokio::test]
async fn should_end_subscriber_task_when_server_closes() {
  let sentinel = FakeSentinel::start().await;
  let (_client, task) = within_timeout!(SentinelClient::connect(sentinel.config())).unwrap();

  sentinel.shutdown();
  assert!(within_timeout!(task).unwrap().is_ok());
}
