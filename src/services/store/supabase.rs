use anyhow::Context;
use async_trait::async_trait;

use super::AppointmentStore;
use crate::models::Appointment;

const SELECT_COLUMNS: &str = "Status,Appt_type";

pub struct SupabaseStore {
    url: String,
    api_key: String,
    table: String,
    client: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(url: String, api_key: String, table: String) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            api_key,
            table,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AppointmentStore for SupabaseStore {
    async fn fetch_appointments(&self) -> anyhow::Result<Vec<Appointment>> {
        let resp = self
            .client
            .get(format!("{}/rest/v1/{}", self.url, self.table))
            .query(&[("select", SELECT_COLUMNS)])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("failed to reach Supabase")?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("failed to read Supabase response")?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["message"].as_str().map(|s| s.to_string()))
                .unwrap_or_else(|| format!("Supabase returned {status}"));
            anyhow::bail!(message);
        }

        let data: serde_json::Value = if body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body).context("failed to parse Supabase response")?
        };

        parse_rows(data)
    }
}

fn parse_rows(data: serde_json::Value) -> anyhow::Result<Vec<Appointment>> {
    if data.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(data).context("unexpected appointment row format")
}
