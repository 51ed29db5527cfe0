//! Web backend for Octovoc.

pub mod authentication;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod schema;
pub mod utils;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use diesel::{
    prelude::*,
    r2d2::{ConnectionManager, Pool},
};
use eyre::WrapErr;
use handlers::{auth, content, difficult_words, final_round, progress, quotes};
use std::{fmt::Debug, ops::Deref, sync::Arc, time::Duration};
use tower_cookies::{CookieManagerLayer, Key};
use tower_http::cors::CorsLayer;

pub type OctovocPool = Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct OctovocState(Arc<OctovocStateCore>);

impl Deref for OctovocState {
    type Target = OctovocStateCore;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Debug for OctovocState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Octovoc")
    }
}

pub struct OctovocStateCore {
    pub pool: OctovocPool,
    pub private_cookie_key: Key,
}

pub fn router(state: OctovocState, cors: Option<CorsLayer>) -> Router<()> {
    let api = Router::new()
        .nest(
            "/auth",
            Router::new().route("/current", get(auth::current)),
        )
        .nest(
            "/content",
            Router::new()
                .route("/modules", get(content::modules))
                .route("/modules/{id}", get(content::module_outline))
                .route("/batteries/{id}", get(content::battery)),
        )
        .nest(
            "/student",
            Router::new()
                .nest(
                    "/module/{id}",
                    Router::new()
                        .route("/start", post(progress::start_module))
                        .route("/complete", post(progress::complete_module))
                        .route("/final-round/start", post(final_round::start))
                        .route("/final-round/answer", post(final_round::answer)),
                )
                .route("/battery/{id}/start", post(progress::start_battery))
                .route("/question/answer", post(progress::answer_question))
                .route("/difficult-words", get(difficult_words::get_all))
                .route("/difficult-words/{word_id}", delete(difficult_words::delete))
                .route("/quote/random", get(quotes::random)),
        )
        .layer(CookieManagerLayer::new());
    let api = match cors {
        Some(cors) => api.layer(cors),
        None => api,
    };

    Router::new().nest("/api", api).with_state(state)
}

/// Allows the browser client served from `origin` to call the API with its cookies.
pub fn cors_layer(origin: &str) -> eyre::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .wrap_err_with(|| format!("Invalid CORS origin {origin}"))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));
    Ok(cors)
}

pub async fn router_from_vars(
    database_url: &str,
    private_cookie_password: &str,
    cors_origin: Option<&str>,
) -> eyre::Result<Router<()>> {
    // conservative pool config aimed at not using the database too much
    let pool = Pool::builder()
        .min_idle(Some(0))
        .idle_timeout(Some(Duration::from_secs(30)))
        .build(ConnectionManager::new(database_url))
        .wrap_err_with(|| format!("Failed to connect to the database at {database_url}"))?;

    if private_cookie_password.len() < 64 {
        eyre::bail!("The private cookie password must be at least 64 bytes long");
    }
    let private_cookie_key = Key::from(private_cookie_password.as_bytes());
    let cors = cors_origin.map(cors_layer).transpose()?;

    let state = OctovocState(Arc::new(OctovocStateCore {
        pool,
        private_cookie_key,
    }));
    Ok(self::router(state, cors))
}
