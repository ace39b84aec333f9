//! Commands for the blocktrace CLI.

pub mod advance;
pub mod balance;
pub mod history;
pub mod mint;
pub mod replace_history;
pub mod transfer;
