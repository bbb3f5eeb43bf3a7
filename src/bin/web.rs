use tracing_subscriber::EnvFilter;

/// Address to listen on, unless `LISPISH_ADDR` says otherwise.
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // install global collector configured based on RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lispish=info")),
        )
        .init();

    let addr = std::env::var("LISPISH_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_owned());
    let server = lispish::web::get_server();

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, server).await
}
