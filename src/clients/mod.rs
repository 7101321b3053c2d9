mod sentinel;

pub use sentinel::SentinelClient;
