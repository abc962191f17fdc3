use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use std::net::SocketAddr;
use talentpool_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::{auth, rate_limit},
    routes, AppState,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    // Public surface: anonymous callers allowed, identity resolved when a
    // session is present. Favorite toggle lives here because anonymous
    // calls are a no-op rather than a 401.
    let public_api = Router::new()
        .route("/api/search", get(routes::search::search))
        .route("/api/candidate/:id", get(routes::candidate::get_candidate))
        .route("/api/candidate/:id/cv", get(routes::candidate::get_cv_url))
        .route("/api/favorite", post(routes::engagement::toggle_favorite))
        .route("/api/views", post(routes::engagement::record_view))
        .layer(axum::middleware::from_fn(auth::resolve_session))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(config.public_rps),
            rate_limit::rps_middleware,
        ));

    // Everything below requires a session; finer role and ownership gates
    // are enforced in the services.
    let authed_api = Router::new()
        .route("/api/like", post(routes::engagement::like))
        .route(
            "/api/favorite-note",
            post(routes::engagement::upsert_favorite_note)
                .delete(routes::engagement::delete_favorite_note),
        )
        .route("/api/profile", post(routes::candidate::save_profile))
        .route("/api/dashboard", get(routes::candidate::dashboard))
        .route("/api/contact/request", post(routes::contact::create_request))
        .route("/api/contact/decision", post(routes::contact::decide))
        .route("/api/contact/cancel", post(routes::contact::cancel))
        .route("/api/contact/received", get(routes::contact::list_received))
        .route("/api/recruiter/stats", get(routes::recruiter::stats))
        .route(
            "/api/recruiter/timeseries",
            get(routes::recruiter::timeseries),
        )
        .route(
            "/api/recruiter/favorites",
            get(routes::recruiter::list_favorites),
        )
        .route(
            "/api/recruiter/profile",
            post(routes::recruiter::upsert_profile),
        )
        .route("/api/admin/report", post(routes::admin::create_report))
        .route(
            "/api/admin/report/:id",
            patch(routes::admin::update_report_status),
        )
        .route("/api/admin/reports", get(routes::admin::list_reports))
        .layer(axum::middleware::from_fn(auth::require_session));

    let app = base_routes
        .merge(public_api)
        .merge(authed_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
