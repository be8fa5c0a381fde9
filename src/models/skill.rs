//! Skill derived from aggregated language bytes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One language with its share of all observed bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Skill {
    /// Language name as reported by GitHub
    pub name: String,
    /// Rounded share of total bytes (0-100)
    pub percentage: u32,
    /// Display color (hex)
    pub color: String,
}
