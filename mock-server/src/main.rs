use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const DEMO_VIEW: &str = "ga:56576851";

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;

    let state = mock_server::AppState::default();
    state.set_active_users(DEMO_VIEW, Some(42)).await;

    tracing::info!(%addr, view = DEMO_VIEW, "mock realtime API listening");
    mock_server::run(listener, state).await
}
