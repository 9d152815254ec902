mod llm;
mod routes;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use llm::types::SuggestionProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse::<u16>()
        .map_err(|e| format!("invalid PORT: {e}"))?;
    let static_dir = std::env::var("STATIC_DIR").ok().map(PathBuf::from);

    // Non-fatal: the suggestion route reports the missing key per request.
    let suggester: Option<Arc<dyn SuggestionProvider>> = match llm::client_from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "Gemini client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Gemini client not configured, suggestions disabled");
            None
        }
    };

    let app = routes::app(state::AppState::new(suggester), static_dir);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "cardstudio listening");
    axum::serve(listener, app).await?;
    Ok(())
}
