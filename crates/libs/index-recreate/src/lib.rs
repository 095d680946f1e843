//! Zero-downtime recreation of a search index exposed through an alias.
//!
//! A logical index name (`plastic`) is served by a physical, timestamped
//! index (`plastic_2024-01-01_00-00-00`) through an alias of the same name.
//! [`RecreateOrchestrator`] builds and populates a fresh physical index, then
//! swaps the alias over in one atomic update and drops the superseded indexes.
//! Serving traffic never sees a missing or half populated index.

pub mod alias;
pub mod lock;
pub mod naming;
pub mod ports;
pub mod readable;
pub mod recreate;

pub use alias::AliasResolver;
pub use recreate::{Error, RecreateOrchestrator, RecreateRequest, RecreationOutcome, Stage};
