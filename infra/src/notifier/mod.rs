//! Password reset delivery

pub mod log_notifier;

#[cfg(test)]
mod tests;

pub use log_notifier::{mask_email, LogResetNotifier};
