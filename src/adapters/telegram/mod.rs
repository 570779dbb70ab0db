//! Telegram delivery: Bot API notifier and a dry-run stand-in.

pub mod bot_api;
pub mod dry_run;

pub use bot_api::TelegramNotifier;
pub use dry_run::DryRunNotifier;
