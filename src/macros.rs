#![allow(unused_macros)]

macro_rules! _trace(
  ($inner:expr, $($arg:tt)*) => { {
    $inner.log_client_name_fn(log::Level::Trace, |name| {
      log::trace!("{}: {}", name, format!($($arg)*));
    })
   } }
);

macro_rules! _debug(
  ($inner:expr, $($arg:tt)*) => { {
    $inner.log_client_name_fn(log::Level::Debug, |name| {
      log::debug!("{}: {}", name, format!($($arg)*));
    })
   } }
);

macro_rules! _error(
  ($inner:expr, $($arg:tt)*) => { {
    $inner.log_client_name_fn(log::Level::Error, |name| {
      log::error!("{}: {}", name, format!($($arg)*));
    })
   } }
);

macro_rules! _warn(
  ($inner:expr, $($arg:tt)*) => { {
    $inner.log_client_name_fn(log::Level::Warn, |name| {
      log::warn!("{}: {}", name, format!($($arg)*));
    })
   } }
);

macro_rules! _info(
  ($inner:expr, $($arg:tt)*) => { {
    $inner.log_client_name_fn(log::Level::Info, |name| {
      log::info!("{}: {}", name, format!($($arg)*));
    })
   } }
);

/// Read the provided arguments as required string arguments, returning `InvalidArgument` from the enclosing
/// function if any of them is not a string.
macro_rules! string_args (
  ($($val:ident),+) => (
    $(let $val = crate::utils::expect_string_arg(stringify!($val), $val.into())?;)+
  );
);

/// Declare a channel table entry.
macro_rules! channel (
  ($channel:expr, $event:ident) => {
    crate::notifications::table::ChannelEntry {
      channel: $channel,
      event:   crate::types::EventKind::$event,
      status:  None,
      payload: crate::types::PayloadKind::Instance,
    }
  };
  ($channel:expr, $event:ident, $status:ident) => {
    crate::notifications::table::ChannelEntry {
      channel: $channel,
      event:   crate::types::EventKind::$event,
      status:  Some(crate::types::EventStatus::$status),
      payload: crate::types::PayloadKind::Instance,
    }
  };
);
