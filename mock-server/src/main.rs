use mock_server::{AppState, Store};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Parses `SENDY_LISTS`, a comma-separated list of `list_id:brand_id` pairs.
fn seed_lists(spec: &str) -> Store {
    spec.split(',')
        .filter_map(|pair| pair.trim().split_once(':'))
        .fold(Store::default(), |store, (list_id, brand_id)| {
            store.with_list(list_id.trim(), brand_id.trim())
        })
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let api_key = std::env::var("SENDY_API_KEY").unwrap_or_else(|_| "test-api-key".to_string());
    let lists = std::env::var("SENDY_LISTS").unwrap_or_else(|_| "test-list-id:1".to_string());

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "mock sendy listening");
    mock_server::run(listener, AppState::new(&api_key, seed_lists(&lists))).await
}
