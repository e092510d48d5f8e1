use crate::alias::Alias;
use serde::{Deserialize, Serialize};

/// A stored mapping from an alias to the URL it shortens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub alias: Alias,
    /// The URL exactly as it was submitted.
    pub original_url: String,
}

impl Link {
    pub fn new(alias: Alias, original_url: impl Into<String>) -> Self {
        Self {
            alias,
            original_url: original_url.into(),
        }
    }
}
