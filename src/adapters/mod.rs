//! Infrastructure adapters. Implement outbound ports.
//!
//! HackerNews scraping, Telegram Bot API, SQLite users. Map errors to DomainError.

pub mod hackernews;
pub mod persistence;
pub mod telegram;
