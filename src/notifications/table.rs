use crate::{
  error::SentinelError,
  notifications::parser,
  types::{EventKind, EventStatus, Notification, ParseMode, PayloadKind},
};

/// A row in the channel table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChannelEntry {
  /// The exact channel name, including the leading `+` or `-`.
  pub channel: &'static str,
  pub event:   EventKind,
  pub status:  Option<EventStatus>,
  pub payload: PayloadKind,
}

/// Every sentinel notification channel that produces an event.
///
/// The `+` prefix marks progress or a new condition, the `-` prefix marks a recovery or an aborted operation.
pub static CHANNELS: &[ChannelEntry] = &[
  channel!("+reset-master", ResetMaster),
  channel!("+slave", NewSlave),
  channel!("+failover-state-reconf-slaves", FailoverStatus, ReconfigureSlaves),
  channel!("+failover-detected", FailoverDetected),
  channel!("+slave-reconf-sent", SlaveReconfStatus, Started),
  channel!("+slave-reconf-inprog", SlaveReconfStatus, InProgress),
  channel!("+slave-reconf-done", SlaveReconfStatus, Done),
  channel!("-slave-reconf-undo", SlaveReconfStatus, Aborted),
  channel!("-dup-sentinel", DupSentinelRemoved),
  channel!("+sentinel", NewSentinel),
  channel!("+sdown", InstanceSdown),
  channel!("-sdown", InstanceSdownRecover),
  channel!("+odown", InstanceOdown),
  channel!("-odown", InstanceOdownRecover),
  channel!("+failover-takedown", FailoverTakedown),
  channel!("+failover-triggered", FailoverTriggered),
  channel!("+failover-state-wait-start", FailoverStatus, WaitStart),
  channel!("+failover-state-select-slave", FailoverStatus, SelectingSlave),
  channel!("-failover-abort-no-good-slave", FailoverStatus, AbortNoGoodSlaveFound),
  channel!("+selected-slave", FailoverStatus, SlaveSelected),
  channel!("+failover-state-send-slaveof-noone", FailoverStatus, SentSlaveofNoone),
  channel!("+failover-end-for-timeout", FailoverStatus, Timeout),
  channel!("+failover-end", FailoverStatus, Succeeded),
  ChannelEntry {
    channel: "+switch-master",
    event:   EventKind::SwitchMaster,
    status:  None,
    payload: PayloadKind::SwitchMaster,
  },
  channel!("+demote-old-slave", DemoteOldSlave),
  channel!("-failover-abort-x-sdown", FailoverStatus, AbortXSdown),
  channel!("+tilt", TiltModeEntered),
  channel!("-tilt", TiltModeExited),
  channel!("-failover-abort-master-is-back", FailoverStatus, AbortMasterIsBack),
  channel!("+failover-state-wait-promotion", FailoverStatus, WaitPromotion),
  channel!("+promoted-slave", PromotedSlave),
];

/// Find the table entry for a channel.
pub fn lookup(channel: &str) -> Option<&'static ChannelEntry> {
  CHANNELS.iter().find(|entry| entry.channel == channel)
}

/// Build the notification for a channel and payload.
///
/// Returns `None` for channels not in the table.
pub fn classify(channel: &str, payload: &str, mode: ParseMode) -> Option<Result<Notification, SentinelError>> {
  lookup(channel).map(|entry| {
    parser::parse_details(entry.payload, payload, mode).map(|details| Notification {
      event: entry.event,
      status: entry.status,
      details,
    })
  })
}
