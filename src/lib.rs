//! Wellspring - Analytics core for a personal-wellness tracker
//!
//! Wellspring turns timestamped wellness entries into derived views through
//! a deterministic pipeline: entry store → aggregation → insight generation
//! → chart presentation, with an injectable persistence bridge underneath.
//!
//! ## Modules
//!
//! - **Entry Store**: Validated CRUD over mood, metric, and journal entries
//! - **Aggregator**: Group-by statistics, goal attainment, tag correlation
//! - **Insight Generator**: Fixed-rule natural-language observations
//! - **Presentation Adapter**: Flat ordered chart series
//! - **Persistence Bridge**: Snapshot load/store behind a storage port
//! - **Collaborator seams**: Session guard, appointment booking, countdown timer

pub mod aggregate;
pub mod auth;
pub mod booking;
pub mod error;
pub mod insight;
pub mod persist;
pub mod present;
pub mod store;
pub mod timer;
pub mod types;

pub use error::{CoreError, FieldIssue, ValidationErrors};
pub use store::{Confirmation, EntryDraft, EntryFilter, EntryPatch, EntryStore};

// Persistence exports
pub use persist::{FileStorage, MemoryStorage, PersistentStore, StoragePort};

// Derived-view exports
pub use types::{
    AggregateBucket, Entry, EntryId, EntryValue, Goal, Insight, InsightKind, Metric,
    MetricSummary, SeriesPoint, TagCorrelation, TimeOfDay,
};

/// Crate version reported by the CLI and embedded in diagnostics
pub const WELLSPRING_VERSION: &str = env!("CARGO_PKG_VERSION");
