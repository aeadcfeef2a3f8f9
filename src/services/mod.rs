pub mod backend;
pub mod clock;
pub mod context;
pub mod i18n;
pub mod metrics;
pub mod notifier;
pub mod persistence;
pub mod query_cache;
pub mod rate_limit;
pub mod security;
