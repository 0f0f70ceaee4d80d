//! Katalyst Protocol - backend data model and endpoint definitions
//!
//! Every type here mirrors a JSON document owned by the Katalyst analytics
//! backend. The frontend never enforces invariants on this data: it is
//! fetched, rendered, replaced on refresh and dropped.

pub mod constants;
pub mod dashboard;
pub mod entities;
pub mod envelope;
pub mod error;
pub mod events;
pub mod github;
pub mod network;
pub mod release;
pub mod serde_util;
pub mod team_health;
pub mod triage;

pub use constants::*;
pub use dashboard::*;
pub use entities::*;
pub use envelope::Envelope;
pub use error::*;
pub use events::*;
pub use github::*;
pub use network::*;
pub use release::*;
pub use team_health::*;
pub use triage::*;
