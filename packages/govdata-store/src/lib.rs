//! The relational store: a fixed, ordered migration runner plus
//! one upsert per record kind, built directly on `sqlx::query` and raw
//! SQL rather than the compile-time `query!` macros — no `DATABASE_URL`
//! needs to exist at build time.

mod bills;
mod error;
mod legislators;
mod migrations;
mod votes;

pub use bills::upsert_bill;
pub use error::is_unique_violation;
pub use legislators::upsert_legislator;
pub use migrations::run_migrations;
pub use votes::upsert_vote;
