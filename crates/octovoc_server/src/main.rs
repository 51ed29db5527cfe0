//! Web backend for Octovoc.

use eyre::WrapErr;
use std::{env, net::SocketAddr};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let server_url = env::var("SERVER_URL")
        .wrap_err("Missing SERVER_URL")?
        .parse::<SocketAddr>()
        .wrap_err("Invalid SERVER_URL")?;

    let database_url = env::var("DATABASE_URL").wrap_err("Missing DATABASE_URL")?;
    let private_cookie_password =
        env::var("PRIVATE_COOKIE_PASSWORD").wrap_err("Missing PRIVATE_COOKIE_PASSWORD")?;
    let cors_origin = env::var("CORS_ORIGIN").ok();

    let router = octovoc_server::router_from_vars(
        &database_url,
        &private_cookie_password,
        cors_origin.as_deref(),
    )
    .await
    .wrap_err("Failed to build router")?;

    tracing::info!("Starting server at {server_url}");
    let server_addr = TcpListener::bind(server_url)
        .await
        .wrap_err("Failed to bind to address")?;
    axum::serve(server_addr, router.into_make_service())
        .await
        .wrap_err("Failed to start server")?;
    Ok(())
}
