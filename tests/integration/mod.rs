#[macro_use]
pub mod utils;

mod commands;
mod notifications;
