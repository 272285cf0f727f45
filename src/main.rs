use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use appointment_dashboard::config::AppConfig;
use appointment_dashboard::handlers;
use appointment_dashboard::services::ai::facts::FactRequester;
use appointment_dashboard::services::ai::gemini::GeminiProvider;
use appointment_dashboard::services::dashboard::Dashboard;
use appointment_dashboard::services::store::supabase::SupabaseStore;
use appointment_dashboard::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    config.validate()?;

    let store = SupabaseStore::new(
        config.supabase_url.clone(),
        config.supabase_key.clone(),
        config.appointments_table.clone(),
    );
    tracing::info!("using Gemini model {} (key from {})", config.gemini_model, config.gemini_key_var);
    let llm = GeminiProvider::new(config.gemini_api_url.clone(), config.gemini_model.clone());
    let facts = FactRequester::new(Box::new(llm), config.credential_source());

    let state = Arc::new(AppState {
        dashboard: Arc::new(Dashboard::new(Box::new(store), facts)),
    });

    // Initial load; the page polls until it resolves.
    let initial = Arc::clone(&state);
    tokio::spawn(async move {
        if let Err(e) = initial.dashboard.load().await {
            tracing::warn!(error = %e, "initial dashboard load skipped");
        }
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
