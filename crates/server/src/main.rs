// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod owner;
mod session;
mod store;

#[cfg(test)]
mod tests;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use clap::Parser;
use pemilo::{Clock, SystemClock};
use pemilo_api::{AuthenticationService, PasswordPolicy};
use pemilo_persistence::Persistence;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::handlers::{
    handle_cast_vote, handle_close_room, handle_create_admin, handle_create_candidate,
    handle_create_room, handle_create_sub_candidate, handle_create_ticket,
    handle_create_tickets_bulk, handle_get_quota, handle_get_voter_room, handle_health,
    handle_list_candidates, handle_list_tickets, handle_login, handle_logout,
    handle_realtime_tally, handle_update_admin, handle_verify_ticket, handle_vote_tally,
};
use crate::owner::OwnerCredentials;
use crate::store::Store;

/// How often expired sessions and stale login attempts are pruned.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Pemilo Server - HTTP server for the Pemilo voting system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Username of an admin to create at startup if it does not exist yet
    #[arg(long, requires = "admin_password")]
    admin_username: Option<String>,

    /// Password for `--admin-username`
    #[arg(long, requires = "admin_username")]
    admin_password: Option<String>,

    /// Room ceiling for the bootstrap admin
    #[arg(long, default_value_t = 10)]
    admin_max_room: i64,

    /// Voter ceiling for the bootstrap admin
    #[arg(long, default_value_t = 1000)]
    admin_max_voters: i64,

    /// Username for the owner routes (HTTP Basic). Owner routes are disabled
    /// without it.
    #[arg(long, requires = "owner_password")]
    owner_username: Option<String>,

    /// Password for `--owner-username`
    #[arg(long, requires = "owner_username")]
    owner_password: Option<String>,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// Where each request gets its persistence handle.
    store: Store,
    /// The time source for every rule that depends on "now".
    clock: Arc<dyn Clock>,
    /// Credentials for the owner routes, if enabled.
    owner: Option<Arc<OwnerCredentials>>,
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    let cors: CorsLayer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(handle_health))
        .route("/voter/rooms/{room_id}", get(handle_get_voter_room))
        .route("/voter/tickets/verify", post(handle_verify_ticket))
        .route("/voter/votes", post(handle_cast_vote))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/admin/quota", get(handle_get_quota))
        .route("/admin/rooms", post(handle_create_room))
        .route("/admin/rooms/{room_id}/close", post(handle_close_room))
        .route(
            "/admin/rooms/{room_id}/candidates",
            get(handle_list_candidates).post(handle_create_candidate),
        )
        .route(
            "/admin/candidates/{candidate_id}/sub_candidates",
            post(handle_create_sub_candidate),
        )
        .route(
            "/admin/rooms/{room_id}/tickets",
            get(handle_list_tickets).post(handle_create_ticket),
        )
        .route(
            "/admin/rooms/{room_id}/tickets/bulk",
            post(handle_create_tickets_bulk),
        )
        .route("/admin/rooms/{room_id}/realtime", get(handle_realtime_tally))
        .route("/admin/rooms/{room_id}/tally", get(handle_vote_tally))
        .route("/owner/admins", post(handle_create_admin))
        .route("/owner/admins/{admin_id}", post(handle_update_admin))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Creates the bootstrap admin unless an admin with that username exists.
async fn bootstrap_admin(state: &AppState, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(username), Some(password)) = (&args.admin_username, &args.admin_password) else {
        return Ok(());
    };

    let mut persistence = state.store.acquire().await.map_err(|e| e.message)?;
    if persistence.get_admin_by_username(username)?.is_some() {
        info!(username, "Bootstrap admin already exists");
        return Ok(());
    }

    AuthenticationService::provision_admin(
        &mut persistence,
        state.clock.as_ref(),
        &PasswordPolicy::default(),
        username,
        password,
        args.admin_max_room,
        args.admin_max_voters,
    )?;
    Ok(())
}

/// Periodically prunes expired sessions and old login attempts.
fn spawn_cleanup_task(state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let mut persistence = match state.store.acquire().await {
                Ok(persistence) => persistence,
                Err(e) => {
                    warn!(error = %e.message, "Cleanup skipped");
                    continue;
                }
            };
            if let Err(e) = AuthenticationService::cleanup(&mut persistence, state.clock.as_ref()) {
                warn!(error = %e, "Cleanup failed");
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Pemilo Server");

    let store: Store = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Store::file(PathBuf::from(db_path))?
    } else {
        info!("Using in-memory database");
        Store::shared(Persistence::new_in_memory()?)
    };

    let owner: Option<Arc<OwnerCredentials>> = match (&args.owner_username, &args.owner_password)
    {
        (Some(username), Some(password)) => {
            info!(username, "Owner routes enabled");
            Some(Arc::new(OwnerCredentials::new(
                username.clone(),
                password.clone(),
            )))
        }
        _ => None,
    };

    let app_state: AppState = AppState {
        store,
        clock: Arc::new(SystemClock),
        owner,
    };

    bootstrap_admin(&app_state, &args).await?;
    spawn_cleanup_task(app_state.clone());

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
