use serde::{Deserialize, Serialize};

pub const EMPTY_DATA_FACT: &str = "No appointment data found to generate facts.";

/// Outcome of asking the generative-text service for facts.
#[derive(Debug, Clone, PartialEq)]
pub enum AiFacts {
    Generated(Vec<String>),
    /// No credential configured; holds remediation instructions.
    MissingCredential(Vec<String>),
    /// The request or its response failed; holds the generic fallback facts.
    ServiceFailure(Vec<String>),
}

/// What the fact section of the dashboard shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FactState {
    NormalFacts { facts: Vec<String> },
    EmptyData { message: String },
    MissingCredential { instructions: Vec<String> },
}

impl FactState {
    pub fn empty_data() -> Self {
        FactState::EmptyData {
            message: EMPTY_DATA_FACT.to_string(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FactState::NormalFacts { .. } => "normal_facts",
            FactState::EmptyData { .. } => "empty_data",
            FactState::MissingCredential { .. } => "missing_credential",
        }
    }
}
