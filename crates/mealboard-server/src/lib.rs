// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod http_handlers;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, put};
use axum::{Json, Router};
use mealboard_api::{
    parse_choice_params, parse_export_params, parse_registration_params, parse_report_params,
    Alt2PutBody, ApiError, CountsPatchBody, MarksPatchBody, MenuChoicePutBody,
};
use mealboard_model::{check_menu_choice, Validator};
use mealboard_report::{render, weekly_report, DepartmentFacts};
use mealboard_store::{PutChoiceOutcome, Store};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub const CRATE_NAME: &str = "mealboard-server";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Per-route request counters rendered on /metrics. Kept deliberately
/// small; latency histograms belong to the scrape side.
#[derive(Default)]
pub(crate) struct RequestMetrics {
    counts: Mutex<HashMap<(String, u16), u64>>,
}

impl RequestMetrics {
    pub(crate) fn observe(&self, route: &str, status: StatusCode) {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        *counts
            .entry((route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
    }

    pub(crate) fn render(&self) -> String {
        let counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries: Vec<(&(String, u16), &u64)> = counts.iter().collect();
        entries.sort();
        let mut out = String::from(
            "# TYPE mealboard_requests_total counter\n",
        );
        for ((route, status), count) in entries {
            out.push_str(&format!(
                "mealboard_requests_total{{route=\"{route}\",status=\"{status}\"}} {count}\n"
            ));
        }
        out
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub api: ApiConfig,
    pub(crate) metrics: Arc<RequestMetrics>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        Self::with_config(store, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(store: Arc<Store>, api: ApiConfig) -> Self {
        Self {
            store,
            api,
            metrics: Arc::new(RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(http_handlers::healthz_handler))
        .route("/metrics", get(http_handlers::metrics_handler))
        .route("/v1/version", get(http_handlers::version_handler))
        .route(
            "/v1/registrations",
            get(http_handlers::registrations_get_handler),
        )
        .route(
            "/v1/registrations/marks",
            patch(http_handlers::marks_patch_handler),
        )
        .route(
            "/v1/registrations/residents",
            patch(http_handlers::residents_patch_handler),
        )
        .route(
            "/v1/registrations/alt2",
            put(http_handlers::alt2_put_handler),
        )
        .route(
            "/v1/menu-choices",
            get(http_handlers::menu_choices_get_handler)
                .put(http_handlers::menu_choice_put_handler),
        )
        .route("/v1/reports/weekly", get(http_handlers::report_handler))
        .route("/v1/exports/weekly", get(http_handlers::export_handler))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
