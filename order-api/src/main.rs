use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::PgPool;
use tokio::net::TcpListener;

use common_auth::{JwtVerifier, TokenConfig, TokenSigner};
use order_api::app::build_router;
use order_api::config::load_config;
use order_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = load_config()?;

    let db = PgPool::connect(&config.database_url).await?;
    // Ensure database schema is up to date before serving traffic
    sqlx::migrate!("./migrations").run(&db).await?;

    let token_config = TokenConfig::new(&config.jwt_secret, config.jwt_expiration_seconds);
    let signer = Arc::new(TokenSigner::new(&token_config));
    let verifier = Arc::new(JwtVerifier::new(&token_config));

    let state = AppState {
        db,
        verifier,
        signer,
        config: Arc::new(config.clone()),
    };
    let app = build_router(state);

    let ip: std::net::IpAddr = config.host.parse()?;
    let addr = SocketAddr::from((ip, config.port));

    println!("starting order-api on {addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
