//! Colloquy Social
//!
//! Relationship toggle engine: follows, topic follows and answer
//! likes/dislikes/collections.
//!
//! # Overview
//!
//! Every user owns five relationship sets:
//!
//! | Set | Targets | Counter | Opposite |
//! |-----|---------|---------|----------|
//! | `following` | users | | |
//! | `followingTopics` | topics | | |
//! | `likingAnswers` | answers | `voteCount` +1/−1 | `dislikingAnswers` |
//! | `dislikingAnswers` | answers | | `likingAnswers` |
//! | `collectingAnswers` | answers | | |
//!
//! The engine is the only writer of these sets. It relies on the store for
//! atomic add-if-absent, remove-element and counter increments, and layers
//! idempotence, counter sync and like/dislike exclusion on top.
//!
//! # Usage
//!
//! ```no_run
//! use colloquy_domain::{EntityId, RelationshipSet};
//! use colloquy_social::RelationshipEngine;
//! use colloquy_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::new("colloquy.db")?;
//! let engine = RelationshipEngine::new();
//! # let (me, topic) = (EntityId::new(), EntityId::new());
//!
//! engine.add(&mut store, me, RelationshipSet::FollowingTopics, topic)?;
//! for entity in engine.list(&store, me, RelationshipSet::FollowingTopics)? {
//!     println!("{}", entity.id());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod engine;
mod error;
mod metrics;

pub use engine::{RelationshipEngine, ToggleOutcome};
pub use error::ToggleError;
pub use metrics::{MetricsSnapshot, ToggleMetrics};
