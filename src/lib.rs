#![cfg_attr(docsrs, deny(rustdoc::broken_intra_doc_links))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]

//! Vigil
//! =====
//!
//! An async client for [Redis Sentinel](https://redis.io/docs/management/sentinel/) nodes based on Tokio.
//!
//! The client subscribes to every sentinel notification channel and turns each message into a typed
//! [Notification](crate::types::Notification), delivered to the observers registered for its
//! [EventKind](crate::types::EventKind). The same client exposes the sentinel command surface used to inspect
//! masters, replicas and other sentinels.
//!
//! ```rust no_run
//! use vigil::prelude::*;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), SentinelError> {
//!   let config = SentinelConfig {
//!     host: "10.0.0.5".into(),
//!     ..Default::default()
//!   };
//!   let (client, _task) = SentinelClient::connect(config).await?;
//!
//!   for master in client.masters().await? {
//!     println!("{} at {}:{} with quorum {}", master.name, master.ip, master.port, master.quorum);
//!   }
//!
//!   let (_, mut failovers) = client.on_event(EventKind::FailoverStatus);
//!   while let Some(notification) = failovers.next().await {
//!     println!("{:?}: {:?}", notification.status, notification.instance());
//!   }
//!   Ok(())
//! }
//! ```
//!
//! Payloads are decoded leniently by default, where missing tokens become empty strings. Set
//! [ParseMode::Strict](crate::types::ParseMode::Strict) to drop notifications with missing tokens instead.
pub extern crate bytes;
pub extern crate bytes_utils;

#[macro_use]
extern crate async_trait;

#[macro_use]
mod macros;

mod commands;
mod modules;
mod utils;

/// Sentinel client implementations.
pub mod clients;
/// Error structs returned by the client.
pub mod error;
/// Traits that implement the command interface and the transports.
pub mod interfaces;
/// Notification parsing, classification and dispatch.
pub mod notifications;
/// The RESP2 connections to a sentinel node.
pub mod protocol;
/// The structs and enums used by the client.
pub mod types;

#[cfg(feature = "mocks")]
#[cfg_attr(docsrs, doc(cfg(feature = "mocks")))]
pub use crate::modules::mocks;

/// Utility functions used by the client that may also be useful to callers.
pub mod util {
  pub use crate::utils::{client_name, info_has_run_id, is_leader_run_id};
}

/// Convenience module to import a `SentinelClient`, the interfaces, error types, and common argument or reply types.
pub mod prelude {
  pub use crate::{
    clients::SentinelClient,
    error::{SentinelError, SentinelErrorKind},
    interfaces::*,
    notifications::SubscriptionHandle,
    types::{
      EventKind,
      EventStatus,
      FromValue,
      MasterAddress,
      MasterDownReply,
      MasterInfo,
      Notification,
      NotificationDetails,
      ParseMode,
      SentinelConfig,
      SentinelInfo,
      SlaveInfo,
      Value,
    },
  };
}
