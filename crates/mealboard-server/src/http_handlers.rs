// SPDX-License-Identifier: Apache-2.0

use super::*;

fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    make_request_id(state)
}

fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", v);
    }
    response
}

fn api_error_response(err: ApiError, request_id: &str) -> Response {
    let status = StatusCode::from_u16(err.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    // A stale-precondition rejection also exposes the current validator in
    // the ETag header so the caller can retry from the response alone.
    let etag = err
        .current_validator()
        .map(|current| format!("\"{current}\""));
    let err = err.with_request_id(request_id);
    let mut response = (status, Json(json!({"error": err}))).into_response();
    if let Some(raw) = etag {
        if let Ok(value) = HeaderValue::from_str(&raw) {
            response.headers_mut().insert("etag", value);
        }
    }
    response
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(std::string::ToString::to_string)
}

fn put_validator_headers(response: &mut Response, validator: &Validator) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str("no-cache") {
        headers.insert("cache-control", value);
    }
    if let Ok(value) = HeaderValue::from_str(&validator.etag()) {
        headers.insert("etag", value);
    }
}

/// If-None-Match comparison. `*` matches everything; otherwise the header
/// must equal the current validator after quote/weak-prefix stripping.
fn not_modified(headers: &HeaderMap, validator: &Validator) -> bool {
    let Some(raw) = header_string(headers, "if-none-match") else {
        return false;
    };
    let trimmed = raw.trim();
    if trimmed == "*" {
        return true;
    }
    trimmed
        .strip_prefix("W/")
        .unwrap_or(trimmed)
        .trim_matches('"')
        == validator.as_str()
}

fn not_modified_response(validator: &Validator) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    put_validator_headers(&mut response, validator);
    response
}

fn parse_json_body<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::invalid_body(&e.to_string()))
}

fn json_with_validator(payload: serde_json::Value, validator: &Validator) -> Response {
    let mut response = Json(payload).into_response();
    put_validator_headers(&mut response, validator);
    response
}

fn finish(
    state: &AppState,
    route: &str,
    request_id: &str,
    result: Result<Response, ApiError>,
) -> Response {
    let response = match result {
        Ok(response) => response,
        Err(err) => api_error_response(err, request_id),
    };
    state.metrics.observe(route, response.status());
    with_request_id(response, request_id)
}

pub(crate) async fn healthz_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let response = (StatusCode::OK, "ok").into_response();
    state.metrics.observe("/healthz", StatusCode::OK);
    with_request_id(response, &request_id)
}

pub(crate) async fn version_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let payload = json!({
        "name": CRATE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "schema_version": mealboard_store::SCHEMA_VERSION,
    });
    let response = Json(payload).into_response();
    state.metrics.observe("/v1/version", StatusCode::OK);
    with_request_id(response, &request_id)
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let body = state.metrics.render();
    state.metrics.observe("/metrics", StatusCode::OK);
    with_request_id((StatusCode::OK, body).into_response(), &request_id)
}

/// GET /v1/registrations. With a department the response is that scope's
/// facts under its own validator; without one it is every active
/// department of the tenant week under the aggregate validator.
pub(crate) async fn registrations_get_handler(
    State(state): State<AppState>,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = registrations_get(&state, &query, &headers);
    finish(&state, "/v1/registrations", &request_id, result)
}

fn registrations_get(
    state: &AppState,
    query: &BTreeMap<String, String>,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    if query.contains_key("department") {
        let scope = parse_registration_params(query)?;
        let validator = state.store.registration_validator(&scope)?;
        if not_modified(headers, &validator) {
            return Ok(not_modified_response(&validator));
        }
        let (facts, validator) = state.store.load_registration(&scope)?;
        return Ok(json_with_validator(
            json!({
                "scope": scope,
                "facts": facts,
                "validator": validator,
            }),
            &validator,
        ));
    }

    let params = parse_report_params(query)?;
    let validator = state.store.aggregate_validator(&params.week)?;
    if not_modified(headers, &validator) {
        return Ok(not_modified_response(&validator));
    }
    let departments: Vec<serde_json::Value> = state
        .store
        .week_departments(&params.week)?
        .into_iter()
        .map(|(department, name, facts)| {
            json!({
                "department": department,
                "name": name,
                "facts": facts,
            })
        })
        .collect();
    Ok(json_with_validator(
        json!({
            "tenant": params.week.tenant,
            "year": params.week.year,
            "week": params.week.week,
            "departments": departments,
            "validator": validator,
        }),
        &validator,
    ))
}

pub(crate) async fn marks_patch_handler(
    State(state): State<AppState>,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = (|| {
        let scope = parse_registration_params(&query)?;
        let ops = parse_json_body::<MarksPatchBody>(&body)?.into_ops()?;
        let if_match = header_string(&headers, "if-match");
        let validator = state
            .store
            .toggle_marks(&scope, &ops, if_match.as_deref())?;
        Ok(json_with_validator(
            json!({"validator": validator}),
            &validator,
        ))
    })();
    finish(&state, "/v1/registrations/marks", &request_id, result)
}

pub(crate) async fn residents_patch_handler(
    State(state): State<AppState>,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = (|| {
        let scope = parse_registration_params(&query)?;
        let ops = parse_json_body::<CountsPatchBody>(&body)?.into_ops()?;
        let if_match = header_string(&headers, "if-match");
        let validator = state
            .store
            .upsert_resident_counts(&scope, &ops, if_match.as_deref())?;
        Ok(json_with_validator(
            json!({"validator": validator}),
            &validator,
        ))
    })();
    finish(&state, "/v1/registrations/residents", &request_id, result)
}

pub(crate) async fn alt2_put_handler(
    State(state): State<AppState>,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = (|| {
        let scope = parse_registration_params(&query)?;
        let days = parse_json_body::<Alt2PutBody>(&body)?.into_days()?;
        let if_match = header_string(&headers, "if-match");
        let validator = state
            .store
            .replace_alt2_days(&scope, &days, if_match.as_deref())?;
        Ok(json_with_validator(
            json!({"validator": validator}),
            &validator,
        ))
    })();
    finish(&state, "/v1/registrations/alt2", &request_id, result)
}

pub(crate) async fn menu_choices_get_handler(
    State(state): State<AppState>,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = (|| {
        let scope = parse_choice_params(&query)?;
        let (choices, validator) = state.store.load_menu_choices(&scope)?;
        if not_modified(&headers, &validator) {
            return Ok(not_modified_response(&validator));
        }
        Ok(json_with_validator(
            json!({
                "scope": scope,
                "choices": choices,
                "validator": validator,
            }),
            &validator,
        ))
    })();
    finish(&state, "/v1/menu-choices", &request_id, result)
}

pub(crate) async fn menu_choice_put_handler(
    State(state): State<AppState>,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = (|| {
        let scope = parse_choice_params(&query)?;
        let (day, choice) = parse_json_body::<MenuChoicePutBody>(&body)?.into_value()?;
        // The weekend rule rejects before any precondition is consulted:
        // intent is wrong regardless of freshness.
        check_menu_choice(&scope.department, scope.week, day, choice)?;
        let if_match = header_string(&headers, "if-match");
        let outcome = state
            .store
            .put_menu_choice(&scope, day, choice, if_match.as_deref())?;
        let (validator, changed) = match outcome {
            PutChoiceOutcome::Applied(v) => (v, true),
            PutChoiceOutcome::Unchanged(v) => (v, false),
        };
        Ok(json_with_validator(
            json!({"validator": validator, "changed": changed}),
            &validator,
        ))
    })();
    finish(&state, "/v1/menu-choices", &request_id, result)
}

/// Resolves the report validator and input facts for a tenant week, with
/// an optional single-department filter. A filtered report rides on that
/// scope's validator; the full report rides on the aggregate one.
fn report_inputs(
    state: &AppState,
    params: &mealboard_api::ReportParams,
) -> Result<(Validator, Vec<DepartmentFacts>), ApiError> {
    match &params.department {
        Some(department) => {
            let scope = params.week.scoped(department.clone());
            let (facts, validator) = state.store.load_registration(&scope)?;
            let name = state
                .store
                .department_name(params.week.tenant, department)?
                .unwrap_or_else(|| department.as_str().to_string());
            Ok((
                validator,
                vec![DepartmentFacts {
                    department: department.clone(),
                    department_name: name,
                    facts,
                }],
            ))
        }
        None => {
            let validator = state.store.aggregate_validator(&params.week)?;
            let departments = state
                .store
                .week_departments(&params.week)?
                .into_iter()
                .map(|(department, department_name, facts)| DepartmentFacts {
                    department,
                    department_name,
                    facts,
                })
                .collect();
            Ok((validator, departments))
        }
    }
}

fn report_validator(
    state: &AppState,
    params: &mealboard_api::ReportParams,
) -> Result<Validator, ApiError> {
    match &params.department {
        Some(department) => {
            let scope = params.week.scoped(department.clone());
            Ok(state.store.registration_validator(&scope)?)
        }
        None => Ok(state.store.aggregate_validator(&params.week)?),
    }
}

pub(crate) async fn report_handler(
    State(state): State<AppState>,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = (|| {
        let params = parse_report_params(&query)?;
        // Unchanged preconditions short-circuit before fact tables are read.
        let validator = report_validator(&state, &params)?;
        if not_modified(&headers, &validator) {
            return Ok(not_modified_response(&validator));
        }
        let (validator, departments) = report_inputs(&state, &params)?;
        let diet_names = state.store.diet_names(params.week.tenant)?;
        let report = weekly_report(&params.week, &departments, &diet_names);
        // Canonical hash of the report body: equal reports always hash
        // equal, so snapshots can compare one string.
        let content_hash = mealboard_core::canonical::stable_json_hash_hex(&report)
            .map_err(|e| ApiError::internal(&e.to_string()))?;
        Ok(json_with_validator(
            json!({
                "report": report,
                "validator": validator,
                "content_hash": content_hash,
            }),
            &validator,
        ))
    })();
    finish(&state, "/v1/reports/weekly", &request_id, result)
}

pub(crate) async fn export_handler(
    State(state): State<AppState>,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = (|| {
        let params = parse_export_params(&query)?;
        let base = report_validator(&state, &params.report)?;
        let validator = base.with_format_suffix(params.format.token());
        if not_modified(&headers, &validator) {
            return Ok(not_modified_response(&validator));
        }
        let (_, departments) = report_inputs(&state, &params.report)?;
        let diet_names = state.store.diet_names(params.report.week.tenant)?;
        let report = weekly_report(&params.report.week, &departments, &diet_names);
        let bytes = render(&report, params.format);
        let digest = format!("sha256:{}", mealboard_core::sha256_hex(&bytes));
        let mut response = (StatusCode::OK, bytes).into_response();
        if let Ok(value) = HeaderValue::from_str(params.format.content_type()) {
            response.headers_mut().insert("content-type", value);
        }
        if let Ok(value) = HeaderValue::from_str(&digest) {
            response.headers_mut().insert("x-mealboard-digest", value);
        }
        put_validator_headers(&mut response, &validator);
        Ok(response)
    })();
    finish(&state, "/v1/exports/weekly", &request_id, result)
}
