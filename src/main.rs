use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use mealmate::api;
use mealmate::config::Config;
use mealmate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("LLM provider: {} ({})", config.llm.provider, config.llm.base_url);

    let state = AppState::new(config.clone())?;

    let app = Router::new()
        .route(
            "/recipes",
            get(api::recipes::list_recipes).post(api::recipes::create_recipe),
        )
        .route("/recipes/highlights", get(api::recipes::highlighted_recipes))
        .route("/recipes/random", get(api::recipes::random_recipes))
        .route(
            "/recipes/{recipe_id}",
            get(api::recipes::get_recipe)
                .put(api::recipes::update_recipe)
                .delete(api::recipes::delete_recipe),
        )
        .route("/recipes/generate/list", post(api::generate::generate_recipe_list))
        .route(
            "/recipes/generate/details",
            post(api::generate::generate_recipe_details),
        )
        .route("/categories", get(api::recipes::list_categories))
        .route("/areas", get(api::recipes::list_areas))
        .route("/search", get(api::recipes::search_recipes))
        .route("/detect-ingredients", post(api::generate::detect_ingredients))
        .layer(TraceLayer::new_for_http())
        // The mobile client is served from arbitrary origins
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.shutdown()?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutting down");
}
