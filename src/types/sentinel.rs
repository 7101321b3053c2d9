use crate::{
  error::SentinelError,
  types::{FromValue, Value},
  utils,
};

/// A master monitored by the sentinel, from `SENTINEL masters` or `SENTINEL master`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MasterInfo {
  pub name:                String,
  pub ip:                  String,
  pub port:                String,
  pub runid:               String,
  pub flags:               String,
  pub pending_commands:    String,
  pub last_ok_ping_reply:  String,
  pub last_ping_reply:     String,
  pub info_refresh:        String,
  pub num_slaves:          String,
  pub num_other_sentinels: String,
  pub quorum:              String,
}

impl FromValue for MasterInfo {
  fn from_value(value: Value) -> Result<Self, SentinelError> {
    let fields = utils::expect_fields(value, "master")?;

    Ok(MasterInfo {
      name:                utils::read_field(&fields, 1),
      ip:                  utils::read_field(&fields, 3),
      port:                utils::read_field(&fields, 5),
      runid:               utils::read_field(&fields, 7),
      flags:               utils::read_field(&fields, 9),
      pending_commands:    utils::read_field(&fields, 11),
      last_ok_ping_reply:  utils::read_field(&fields, 13),
      last_ping_reply:     utils::read_field(&fields, 15),
      info_refresh:        utils::read_field(&fields, 17),
      num_slaves:          utils::read_field(&fields, 19),
      num_other_sentinels: utils::read_field(&fields, 21),
      quorum:              utils::read_field(&fields, 23),
    })
  }
}

/// A replica of a monitored master, from `SENTINEL slaves`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SlaveInfo {
  pub name:                  String,
  pub ip:                    String,
  pub port:                  String,
  pub runid:                 String,
  pub flags:                 String,
  pub pending_commands:      String,
  pub last_ok_ping_reply:    String,
  pub last_ping_reply:       String,
  pub info_refresh:          String,
  pub master_link_down_time: String,
  pub master_link_status:    String,
  pub master_host:           String,
  pub master_port:           String,
  pub slave_priority:        String,
}

impl FromValue for SlaveInfo {
  fn from_value(value: Value) -> Result<Self, SentinelError> {
    let fields = utils::expect_fields(value, "slave")?;

    Ok(SlaveInfo {
      name:                  utils::read_field(&fields, 1),
      ip:                    utils::read_field(&fields, 3),
      port:                  utils::read_field(&fields, 5),
      runid:                 utils::read_field(&fields, 7),
      flags:                 utils::read_field(&fields, 9),
      pending_commands:      utils::read_field(&fields, 11),
      last_ok_ping_reply:    utils::read_field(&fields, 13),
      last_ping_reply:       utils::read_field(&fields, 15),
      info_refresh:          utils::read_field(&fields, 17),
      master_link_down_time: utils::read_field(&fields, 19),
      master_link_status:    utils::read_field(&fields, 21),
      master_host:           utils::read_field(&fields, 23),
      master_port:           utils::read_field(&fields, 25),
      slave_priority:        utils::read_field(&fields, 27),
    })
  }
}

/// Another sentinel monitoring the same master, from `SENTINEL sentinels`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SentinelInfo {
  pub name:                    String,
  pub ip:                      String,
  pub port:                    String,
  pub runid:                   String,
  pub flags:                   String,
  pub pending_commands:        String,
  pub last_ok_ping_reply:      String,
  pub last_ping_reply:         String,
  pub last_hello_message:      String,
  pub can_failover_its_master: String,
}

impl FromValue for SentinelInfo {
  fn from_value(value: Value) -> Result<Self, SentinelError> {
    let fields = utils::expect_fields(value, "sentinel")?;

    Ok(SentinelInfo {
      name:                    utils::read_field(&fields, 1),
      ip:                      utils::read_field(&fields, 3),
      port:                    utils::read_field(&fields, 5),
      runid:                   utils::read_field(&fields, 7),
      flags:                   utils::read_field(&fields, 9),
      pending_commands:        utils::read_field(&fields, 11),
      last_ok_ping_reply:      utils::read_field(&fields, 13),
      last_ping_reply:         utils::read_field(&fields, 15),
      last_hello_message:      utils::read_field(&fields, 17),
      can_failover_its_master: utils::read_field(&fields, 19),
    })
  }
}

/// The reply to `SENTINEL is-master-down-by-addr`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MasterDownReply {
  /// Whether the sentinel considers the master down.
  pub is_down:       bool,
  /// The run ID of the sentinel voted as leader, or `*` when no vote was cast.
  pub leader_run_id: String,
}

impl FromValue for MasterDownReply {
  fn from_value(value: Value) -> Result<Self, SentinelError> {
    let fields = utils::expect_fields(value, "is-master-down-by-addr")?;

    Ok(MasterDownReply {
      is_down:       fields.first().and_then(|v| v.as_i64()) == Some(1),
      leader_run_id: utils::read_field(&fields, 1),
    })
  }
}

/// The address of a master, from `SENTINEL get-master-addr-by-name`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MasterAddress {
  pub ip:   String,
  pub port: String,
}

impl FromValue for MasterAddress {
  fn from_value(value: Value) -> Result<Self, SentinelError> {
    let fields = utils::expect_fields(value, "get-master-addr-by-name")?;

    Ok(MasterAddress {
      ip:   utils::read_field(&fields, 0),
      port: utils::read_field(&fields, 1),
    })
  }
}
