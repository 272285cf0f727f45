use std::env;

use crate::errors::AppError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub supabase_url: String,
    pub supabase_key: String,
    pub appointments_table: String,
    pub gemini_api_url: String,
    pub gemini_model: String,
    /// Name of the env var holding the Gemini key. Read on every request.
    pub gemini_key_var: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            supabase_url: env::var("SUPABASE_URL").unwrap_or_default(),
            supabase_key: env::var("SUPABASE_KEY").unwrap_or_default(),
            appointments_table: env::var("APPOINTMENTS_TABLE")
                .unwrap_or_else(|_| "Appointments".to_string()),
            gemini_api_url: env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            gemini_key_var: env::var("GEMINI_KEY_VAR")
                .unwrap_or_else(|_| "PUBLIC_API_KEY".to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.supabase_url.trim().is_empty() {
            return Err(AppError::Config("SUPABASE_URL must be set".to_string()));
        }
        if self.supabase_key.trim().is_empty() {
            return Err(AppError::Config("SUPABASE_KEY must be set".to_string()));
        }
        Ok(())
    }

    pub fn credential_source(&self) -> CredentialSource {
        CredentialSource::Env(self.gemini_key_var.clone())
    }
}

/// Where the generative-text credential comes from.
#[derive(Clone, Debug)]
pub enum CredentialSource {
    Env(String),
    Fixed(Option<String>),
}

impl CredentialSource {
    /// Resolves the credential now. Blank values count as missing.
    pub fn resolve(&self) -> Option<String> {
        let value = match self {
            CredentialSource::Env(var) => env::var(var).ok(),
            CredentialSource::Fixed(value) => value.clone(),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}
