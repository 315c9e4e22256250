//! Append-only violation audit trail
//!
//! Every failed check becomes a [`Violation`] appended to an
//! [`AuditStore`]. The trail never mutates or deletes an entry; the
//! query surface filters by tenant, category, severity, and time for
//! observability dashboards.

pub mod error;
pub mod query;
pub mod store;
pub mod violation;

pub use error::{AuditError, AuditResult};
pub use query::ViolationQuery;
pub use store::{AuditStore, FileAuditStore, InMemoryAuditStore};
pub use violation::Violation;
