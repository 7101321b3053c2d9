use crate::error::{SentinelError, SentinelErrorKind};
use std::{fmt, str::FromStr};

/// The application level name of a sentinel notification.
///
/// Several channels can map to the same event. Failover progress, for example, is published on a dozen channels
/// that all surface as [FailoverStatus](EventKind::FailoverStatus) with a different [EventStatus].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum EventKind {
  ResetMaster,
  NewSlave,
  FailoverStatus,
  FailoverDetected,
  SlaveReconfStatus,
  DupSentinelRemoved,
  NewSentinel,
  InstanceSdown,
  InstanceSdownRecover,
  InstanceOdown,
  InstanceOdownRecover,
  FailoverTakedown,
  FailoverTriggered,
  SwitchMaster,
  DemoteOldSlave,
  TiltModeEntered,
  TiltModeExited,
  PromotedSlave,
}

impl EventKind {
  /// Every event kind, in declaration order.
  pub const ALL: [EventKind; 18] = [
    EventKind::ResetMaster,
    EventKind::NewSlave,
    EventKind::FailoverStatus,
    EventKind::FailoverDetected,
    EventKind::SlaveReconfStatus,
    EventKind::DupSentinelRemoved,
    EventKind::NewSentinel,
    EventKind::InstanceSdown,
    EventKind::InstanceSdownRecover,
    EventKind::InstanceOdown,
    EventKind::InstanceOdownRecover,
    EventKind::FailoverTakedown,
    EventKind::FailoverTriggered,
    EventKind::SwitchMaster,
    EventKind::DemoteOldSlave,
    EventKind::TiltModeEntered,
    EventKind::TiltModeExited,
    EventKind::PromotedSlave,
  ];

  /// The stable event name.
  pub fn to_str(&self) -> &'static str {
    match *self {
      EventKind::ResetMaster => "reset-master",
      EventKind::NewSlave => "new-slave",
      EventKind::FailoverStatus => "failover-status",
      EventKind::FailoverDetected => "failover-detected",
      EventKind::SlaveReconfStatus => "slave-reconf-status",
      EventKind::DupSentinelRemoved => "dup-sentinel-removed",
      EventKind::NewSentinel => "new-sentinel",
      EventKind::InstanceSdown => "instance-sdown",
      EventKind::InstanceSdownRecover => "instance-sdown-recover",
      EventKind::InstanceOdown => "instance-odown",
      EventKind::InstanceOdownRecover => "instance-odown-recover",
      EventKind::FailoverTakedown => "failover-takedown",
      EventKind::FailoverTriggered => "failover-triggered",
      EventKind::SwitchMaster => "switch-master",
      EventKind::DemoteOldSlave => "demote-old-slave",
      EventKind::TiltModeEntered => "tilt-mode-entered",
      EventKind::TiltModeExited => "tilt-mode-exited",
      EventKind::PromotedSlave => "promoted-slave",
    }
  }
}

impl fmt::Display for EventKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.to_str())
  }
}

impl FromStr for EventKind {
  type Err = SentinelError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    EventKind::ALL
      .iter()
      .find(|kind| kind.to_str() == s)
      .copied()
      .ok_or_else(|| SentinelError::new(SentinelErrorKind::InvalidArgument, format!("Invalid event name: {}", s)))
  }
}

/// The sub-phase label attached to multi-state events such as `failover-status` and `slave-reconf-status`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EventStatus {
  ReconfigureSlaves,
  Started,
  InProgress,
  Done,
  Aborted,
  WaitStart,
  SelectingSlave,
  AbortNoGoodSlaveFound,
  SlaveSelected,
  SentSlaveofNoone,
  Timeout,
  Succeeded,
  AbortXSdown,
  AbortMasterIsBack,
  WaitPromotion,
}

impl EventStatus {
  pub const ALL: [EventStatus; 15] = [
    EventStatus::ReconfigureSlaves,
    EventStatus::Started,
    EventStatus::InProgress,
    EventStatus::Done,
    EventStatus::Aborted,
    EventStatus::WaitStart,
    EventStatus::SelectingSlave,
    EventStatus::AbortNoGoodSlaveFound,
    EventStatus::SlaveSelected,
    EventStatus::SentSlaveofNoone,
    EventStatus::Timeout,
    EventStatus::Succeeded,
    EventStatus::AbortXSdown,
    EventStatus::AbortMasterIsBack,
    EventStatus::WaitPromotion,
  ];

  pub fn to_str(&self) -> &'static str {
    match *self {
      EventStatus::ReconfigureSlaves => "reconfigure-slaves",
      EventStatus::Started => "started",
      EventStatus::InProgress => "in-progress",
      EventStatus::Done => "done",
      EventStatus::Aborted => "aborted",
      EventStatus::WaitStart => "wait-start",
      EventStatus::SelectingSlave => "selecting-slave",
      EventStatus::AbortNoGoodSlaveFound => "abort-no-good-slave-found",
      EventStatus::SlaveSelected => "slave-selected",
      EventStatus::SentSlaveofNoone => "sent-slaveof-noone",
      EventStatus::Timeout => "timeout",
      EventStatus::Succeeded => "succeeded",
      EventStatus::AbortXSdown => "abort-x-sdown",
      EventStatus::AbortMasterIsBack => "abort-master-is-back",
      EventStatus::WaitPromotion => "wait-promotion",
    }
  }
}

impl fmt::Display for EventStatus {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.to_str())
  }
}

impl FromStr for EventStatus {
  type Err = SentinelError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    EventStatus::ALL
      .iter()
      .find(|status| status.to_str() == s)
      .copied()
      .ok_or_else(|| SentinelError::new(SentinelErrorKind::InvalidArgument, format!("Invalid event status: {}", s)))
  }
}

/// The layout used to decode a notification payload.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PayloadKind {
  /// `<type> <name> <ip> <port> [<marker> ...]`
  Instance,
  /// `<master-name> <old-ip> <old-port> <new-ip> <new-port>`
  SwitchMaster,
}

/// The kind of instance described by a notification, read from the first payload token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InstanceKind {
  Master,
  Slave,
  Sentinel,
  Other(String),
}

/// The master and run ID of a sentinel that was removed as a duplicate.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DuplicateOf {
  pub name:  String,
  pub runid: String,
}

/// A monitored instance as reported in a sentinel notification.
///
/// The optional fields are mutually exclusive. Which one is set depends on the marker token following the port:
///
/// * `#starting` sets `starting_millis`
/// * `#quorum` sets `quorum`
/// * `#duplicate` sets `duplicate_of`
/// * `@` sets `master_name`, `master_ip`, and `master_port`
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InstanceDetails {
  /// The instance type: `master`, `slave`, or `sentinel`.
  pub kind:            String,
  pub name:            String,
  pub ip:              String,
  pub port:            String,
  pub starting_millis: Option<String>,
  pub quorum:          Option<String>,
  pub duplicate_of:    Option<DuplicateOf>,
  pub master_name:     Option<String>,
  pub master_ip:       Option<String>,
  pub master_port:     Option<String>,
}

impl InstanceDetails {
  /// Read the instance type as an enum.
  pub fn instance_kind(&self) -> InstanceKind {
    match self.kind.as_str() {
      "master" => InstanceKind::Master,
      "slave" => InstanceKind::Slave,
      "sentinel" => InstanceKind::Sentinel,
      other => InstanceKind::Other(other.to_owned()),
    }
  }
}

/// A completed master failover, as reported on the `+switch-master` channel.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SwitchMasterDetails {
  pub master_name: String,
  pub old_ip:      String,
  pub old_port:    String,
  pub new_ip:      String,
  pub new_port:    String,
}

/// The decoded payload of a notification.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NotificationDetails {
  Instance(InstanceDetails),
  SwitchMaster(SwitchMasterDetails),
}

/// A structured sentinel event, created once per received notification.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
  /// The event name.
  pub event:   EventKind,
  /// The sub-phase label, if the event has more than one state.
  pub status:  Option<EventStatus>,
  /// The decoded payload.
  pub details: NotificationDetails,
}

impl Notification {
  /// The stable event name.
  pub fn name(&self) -> &'static str {
    self.event.to_str()
  }

  /// Read the instance details, if the payload describes an instance.
  pub fn instance(&self) -> Option<&InstanceDetails> {
    match self.details {
      NotificationDetails::Instance(ref details) => Some(details),
      _ => None,
    }
  }

  /// Read the switch-master details, if the payload describes a completed failover.
  pub fn switch_master(&self) -> Option<&SwitchMasterDetails> {
    match self.details {
      NotificationDetails::SwitchMaster(ref details) => Some(details),
      _ => None,
    }
  }
}

/// A message received on a pattern subscription.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatternMessage {
  /// The pattern that matched the channel.
  pub pattern: String,
  /// The channel on which the message was published.
  pub channel: String,
  /// The raw message payload.
  pub payload: String,
}

impl PatternMessage {
  pub fn new<P, C, M>(pattern: P, channel: C, payload: M) -> Self
  where
    P: Into<String>,
    C: Into<String>,
    M: Into<String>,
  {
    PatternMessage {
      pattern: pattern.into(),
      channel: channel.into(),
      payload: payload.into(),
    }
  }
}
