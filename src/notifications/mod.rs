mod dispatcher;
/// The payload decoders for instance and switch-master notifications.
pub mod parser;
/// The static mapping from notification channels to events.
pub mod table;

pub use dispatcher::{Dispatcher, Handler, SubscriptionHandle};
