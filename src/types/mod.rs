mod config;
mod notifications;
mod sentinel;
mod value;

pub use config::*;
pub use notifications::*;
pub use sentinel::*;
pub use value::*;
