//! Music search abstraction.
//!
//! This module defines the canonical `SearchItem` shape shared by every
//! provider adapter, the `SearchProvider` trait they implement, and the
//! relevance scoring used to rank results.

mod score;
mod types;

pub use score::{popularity_bonus, relevance_score, title_relevance_score};
pub use types::*;
