use serde::{Deserialize, Serialize};

/// A chart slice: how many records share one category value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DistributionPoint {
    pub name: String,
    pub value: u64,
}
