//! Application use cases. Orchestrate domain logic via ports.

pub mod aggregator;
pub mod broadcaster;
pub mod digest_job;
pub mod formatter;

pub use aggregator::CategoryAggregator;
pub use broadcaster::Broadcaster;
pub use digest_job::DigestJob;
pub use formatter::MessageFormatter;
