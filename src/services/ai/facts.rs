use serde::Deserialize;
use serde_json::json;

use crate::config::CredentialSource;
use crate::models::{AiFacts, Appointment};
use crate::services::ai::{GenerationRequest, LlmProvider};

/// Records beyond this are not sent to the model.
pub const MAX_PROMPT_RECORDS: usize = 200;

pub const MISSING_KEY_INSTRUCTIONS: [&str; 4] = [
    "The Gemini API key needs to be configured for your hosting provider.",
    "Hosting platforms require a special prefix for security.",
    "In your Vercel project settings, please rename your environment variable from 'API_KEY' to 'PUBLIC_API_KEY'.",
    "You must redeploy your project after making this change.",
];

pub const FALLBACK_FACTS: [&str; 5] = [
    "Could not generate facts due to an API error.",
    "The data might be too complex for a quick analysis.",
    "The connection to the AI service may have failed.",
    "Retrying might resolve the issue.",
    "Please check the console for more details.",
];

const PROMPT: &str = "Analyze the following JSON data which represents a list of appointments.
Based on this data, provide 5 interesting and concise facts.
Focus on distributions, common patterns, or any notable insights.";

#[derive(Deserialize)]
struct FactsResponse {
    facts: Vec<String>,
}

pub struct FactRequester {
    llm: Box<dyn LlmProvider>,
    credential: CredentialSource,
}

impl FactRequester {
    pub fn new(llm: Box<dyn LlmProvider>, credential: CredentialSource) -> Self {
        Self { llm, credential }
    }

    /// Asks the model for facts about `records`. Never fails: a missing key and
    /// any request or parse failure come back as their own variants.
    pub async fn request_facts(&self, records: &[Appointment]) -> AiFacts {
        let Some(api_key) = self.credential.resolve() else {
            tracing::warn!("Gemini API key is not configured, skipping fact generation");
            return AiFacts::MissingCredential(to_strings(&MISSING_KEY_INSTRUCTIONS));
        };

        match self.try_request(&api_key, records).await {
            Ok(facts) => {
                tracing::info!(count = facts.len(), "generated facts from Gemini");
                AiFacts::Generated(facts)
            }
            Err(e) => {
                tracing::error!(error = %e, "error generating facts from Gemini");
                AiFacts::ServiceFailure(to_strings(&FALLBACK_FACTS))
            }
        }
    }

    async fn try_request(&self, api_key: &str, records: &[Appointment]) -> anyhow::Result<Vec<String>> {
        let request = build_request(records)?;
        let response = self.llm.generate(api_key, &request).await?;
        parse_facts_response(&response)
    }
}

pub fn build_request(records: &[Appointment]) -> anyhow::Result<GenerationRequest> {
    let sample = &records[..records.len().min(MAX_PROMPT_RECORDS)];
    let data = serde_json::to_string_pretty(sample)?;

    Ok(GenerationRequest {
        prompt: format!("{PROMPT}\n\nData:\n{data}"),
        response_schema: json!({
            "type": "OBJECT",
            "properties": {
                "facts": {
                    "type": "ARRAY",
                    "description": "An array of 5 interesting and concise facts derived from the appointment data.",
                    "items": { "type": "STRING" }
                }
            },
            "required": ["facts"]
        }),
    })
}

fn parse_facts_response(response: &str) -> anyhow::Result<Vec<String>> {
    let trimmed = response.trim();
    let cleaned = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let cleaned = cleaned.strip_suffix("```").unwrap_or(cleaned).trim();

    let parsed: FactsResponse = serde_json::from_str(cleaned)
        .map_err(|e| anyhow::anyhow!("invalid response format from Gemini API: {e}"))?;

    if parsed.facts.is_empty() {
        anyhow::bail!("empty facts list in Gemini response");
    }
    Ok(parsed.facts)
}

fn to_strings(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}
