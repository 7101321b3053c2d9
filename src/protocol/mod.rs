/// The RESP2 codec used by both sentinel connections.
pub mod codec;
/// TCP implementations of the command and subscription transports.
pub mod connection;
pub mod utils;
