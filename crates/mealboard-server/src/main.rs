// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use mealboard_model::{DepartmentId, DietTypeId, TenantId};
use mealboard_server::{build_router, ApiConfig, AppState};
use mealboard_store::Store;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(mealboard_core::ENV_MEALBOARD_LOG_LEVEL)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("MEALBOARD_LOG_JSON", true) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Seed entries look like `1/west=West Wing,1/east=East Wing`: tenant,
/// slash, id, equals, display name. Bad entries are logged and skipped.
fn seed_entries(raw: &str) -> Vec<(TenantId, String, String)> {
    raw.split(',')
        .filter_map(|item| {
            let piece = item.trim();
            if piece.is_empty() {
                return None;
            }
            let (scope, name) = piece.split_once('=')?;
            let (tenant, id) = scope.split_once('/')?;
            let tenant = TenantId::parse(tenant).ok()?;
            let id = id.trim();
            let name = name.trim();
            if id.is_empty() || name.is_empty() {
                return None;
            }
            Some((tenant, id.to_string(), name.to_string()))
        })
        .collect()
}

fn seed_registries(store: &Store) -> Result<(), String> {
    for (tenant, id, name) in seed_entries(
        &env::var("MEALBOARD_SEED_DEPARTMENTS").unwrap_or_default(),
    ) {
        match DepartmentId::parse(&id) {
            Ok(department) => store
                .upsert_department(tenant, &department, &name)
                .map_err(|e| format!("seed department {id} failed: {e}"))?,
            Err(e) => warn!("skipping seed department {id}: {e}"),
        }
    }
    for (tenant, id, name) in seed_entries(
        &env::var("MEALBOARD_SEED_DIET_TYPES").unwrap_or_default(),
    ) {
        match DietTypeId::parse(&id) {
            Ok(diet_type) => store
                .upsert_diet_type(tenant, &diet_type, &name)
                .map_err(|e| format!("seed diet type {id} failed: {e}"))?,
            Err(e) => warn!("skipping seed diet type {id}: {e}"),
        }
    }
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("MEALBOARD_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let db_path = PathBuf::from(
        env::var(mealboard_core::ENV_MEALBOARD_DB_PATH)
            .unwrap_or_else(|_| "mealboard.db".to_string()),
    );

    let store = Store::open(&db_path).map_err(|e| format!("open store at {db_path:?}: {e}"))?;
    seed_registries(&store)?;

    let api = ApiConfig {
        max_body_bytes: env_usize("MEALBOARD_MAX_BODY_BYTES", 64 * 1024),
    };
    let state = AppState::with_config(Arc::new(store), api);
    let app = build_router(state);

    let addr: std::net::SocketAddr = bind_addr
        .parse()
        .map_err(|e| format!("invalid bind addr {bind_addr}: {e}"))?;
    let socket = if addr.is_ipv4() {
        tokio::net::TcpSocket::new_v4().map_err(|e| format!("socket v4 failed: {e}"))?
    } else {
        tokio::net::TcpSocket::new_v6().map_err(|e| format!("socket v6 failed: {e}"))?
    };
    socket
        .set_reuseaddr(true)
        .map_err(|e| format!("set_reuseaddr failed: {e}"))?;
    socket.bind(addr).map_err(|e| format!("bind failed: {e}"))?;
    let listener: TcpListener = socket
        .listen(1024)
        .map_err(|e| format!("listen failed: {e}"))?;
    info!("mealboard-server listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            let drain_ms = env_u64("MEALBOARD_SHUTDOWN_DRAIN_MS", 2000);
            tokio::time::sleep(Duration::from_millis(drain_ms)).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
