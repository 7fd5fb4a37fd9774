use std::sync::Arc;
use gts_stock::config::StoreBackend;
use gts_stock::db::{run_migrations, MemoryStockStore, PgStockStore, StockStore};
use gts_stock::{api, create_pool, AppConfig, StockService};
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // local-time log format
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // load config
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    let store: Arc<dyn StockStore> = match config.stock.backend {
        StoreBackend::Postgres => {
            let pool = create_pool(&config.database).await?;
            info!("Database pool created");
            if config.database.run_migrations {
                run_migrations(&pool).await?;
            }
            Arc::new(PgStockStore::new(pool))
        }
        StoreBackend::Memory => {
            info!("Using in-memory store, data is lost on exit");
            Arc::new(MemoryStockStore::new())
        }
    };

    let service = Arc::new(StockService::new(
        store,
        config.stock.unit_volume()?,
        config.stock.reset_warehouse.clone(),
    ));

    let app = api::router(service).layer(ServiceBuilder::new());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /api/health                         - liveness");
    info!("  GET  /api/products                       - package report");
    info!("  GET  /api/products/export                - package report as CSV");
    info!("  POST /api/products/import                - upsert units");
    info!("  GET  /api/get_gts_status/:barcode        - GTS status of unit or package");
    info!("  GET  /api/get_product_details/:barcode   - stored rows of unit or package");
    info!("  POST /api/update_product                 - partial update of unit or package");
    info!("  POST /api/stock/refresh                  - reset and restock warehouses");
    info!("  GET  /stock/summary                      - in-stock totals per package");
    info!("  GET  /stock/warehouse_summary            - in-stock totals per warehouse");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
