use anyhow::Context;
use hotel_price_service::{
    router, AppConfig, AppState, CurrencyService, HotelPriceService, SignedSupplierClient,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hotel_price_service=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().context("failed to read configuration")?;
    if config.supplier.base_url.is_empty() {
        warn!("supplier base URL is not set, searches will fail");
    }
    if !config.supplier.has_credentials() {
        warn!("supplier API key or secret is not set, searches will fail");
    }

    let client = SignedSupplierClient::new(config.supplier.clone())
        .context("failed to build supplier client")?;
    let hotel_service = HotelPriceService::new(Arc::new(client), Arc::new(CurrencyService::new()));

    let app = router(AppState {
        hotel_service: Arc::new(hotel_service),
    });

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Hotel price service starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
