use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::{create_in_memory_pool, create_pool, migrations, DbPool};
use crate::handlers;
use crate::notify::{spawn_worker, Mailer, Notifier};
use crate::state::AppState;

/// Build the application state and Axum router from a [`Config`].
///
/// Creates the database pool (in memory when the path is `:memory:`), runs
/// migrations, starts the notification worker and assembles the middleware
/// stack. Must be called from within a tokio runtime.
pub fn build_app(config: Config) -> Result<(AppState, Router), Box<dyn std::error::Error>> {
    let db = if config.database_path.as_os_str() == ":memory:" {
        create_in_memory_pool()?
    } else {
        create_pool(&config.database_path)?
    };

    prepare_database(&db, &config)?;

    let mailer = Mailer::from_webhook(config.mail_webhook_url.as_deref())?;
    let (notifier, rx) = Notifier::channel();
    spawn_worker(rx, mailer);

    let state = AppState {
        db,
        config: Arc::new(config),
        notifier,
    };

    let app = handlers::routes(state.clone())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    Ok((state, app))
}

fn prepare_database(db: &DbPool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let conn = db.get()?;
    migrations::run_migrations(&conn, &config.migrations_path)?;
    let purged = crate::db::queries::sessions::purge_expired(&conn)?;
    if purged > 0 {
        tracing::info!(purged, "Removed expired sessions and reset tokens");
    }
    Ok(())
}

/// Bind the router to `host:port` and spawn the server as a tokio task.
///
/// Returns the actual port the server bound to (useful when `port` is 0 for
/// OS-assigned ports) and a [`JoinHandle`] for the server task.
pub async fn serve(
    app: Router,
    host: &str,
    port: u16,
) -> Result<(u16, JoinHandle<()>), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_port, handle))
}
