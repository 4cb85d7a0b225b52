use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use futures_util::StreamExt;
use serde::Serialize;
use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio::{sync::RwLock, time::Instant};
use tower_http::services::{ServeDir, ServeFile};
use url::Url;

use crate::api::{ApiErrorDetail, ApiErrorField, ApiResponse};
use crate::contact::{self, ContactSubmission, MailTemplateParams};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CONTENT_API_URL: &str = "http://localhost:8080/api/v1";
const DEFAULT_CONTENT_CACHE_TTL_SECONDS: u64 = 300;
const DEFAULT_CONTENT_CACHE_MAX_ENTRIES: usize = 128;
const DEFAULT_CONTENT_RESPONSE_MAX_BYTES: usize = 2 * 1024 * 1024;
const DEFAULT_CONTENT_REQUEST_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_CONTENT_CONNECT_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_MAIL_API_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const CONTENT_CACHE_TTL_SECONDS_BOUNDS: (u64, u64) = (1, 86_400);
const CONTENT_CACHE_MAX_ENTRIES_BOUNDS: (usize, usize) = (1, 10_000);
const CONTENT_RESPONSE_MAX_BYTES_BOUNDS: (usize, usize) = (1_024, 16 * 1024 * 1024);
const CONTENT_REQUEST_TIMEOUT_MS_BOUNDS: (u64, u64) = (100, 120_000);
const CONTENT_CONNECT_TIMEOUT_MS_BOUNDS: (u64, u64) = (100, 30_000);

const CONTENT_RESOURCES: [&str; 3] = ["projects", "tech-stacks", "experiences"];
const USER_AGENT: &str = "stackfolio-server/1.0";
const REQUEST_ID_HEADER: &str = "x-request-id";

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, PartialEq, Eq)]
enum LogLevel {
    Debug,
    Info,
    Warn,
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(level: LogLevel) -> u8 {
            match level {
                LogLevel::Debug => 0,
                LogLevel::Info => 1,
                LogLevel::Warn => 2,
            }
        }

        rank(*self).cmp(&rank(*other))
    }
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
        }
    }
}

#[derive(Clone)]
struct RuntimeConfig {
    port: u16,
    content_api_url: Url,
    cache_ttl_seconds: u64,
    cache_max_entries: usize,
    response_max_bytes: usize,
    request_timeout: Duration,
    connect_timeout: Duration,
    mail_api_url: Url,
    mail_service_id: Option<String>,
    mail_template_id: Option<String>,
    mail_public_key: Option<String>,
    log_level: LogLevel,
}

impl RuntimeConfig {
    fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let content_api_url =
            parse_env_http_url("CONTENT_API_URL").unwrap_or_else(default_content_api_url);
        let cache_ttl_seconds = parse_env_u64_with_bounds(
            "CONTENT_CACHE_TTL_SECONDS",
            DEFAULT_CONTENT_CACHE_TTL_SECONDS,
            CONTENT_CACHE_TTL_SECONDS_BOUNDS,
        );
        let cache_max_entries = parse_env_usize_with_bounds(
            "CONTENT_CACHE_MAX_ENTRIES",
            DEFAULT_CONTENT_CACHE_MAX_ENTRIES,
            CONTENT_CACHE_MAX_ENTRIES_BOUNDS,
        );
        let response_max_bytes = parse_env_usize_with_bounds(
            "CONTENT_RESPONSE_MAX_BYTES",
            DEFAULT_CONTENT_RESPONSE_MAX_BYTES,
            CONTENT_RESPONSE_MAX_BYTES_BOUNDS,
        );
        let request_timeout_ms = parse_env_u64_with_bounds(
            "CONTENT_REQUEST_TIMEOUT_MS",
            DEFAULT_CONTENT_REQUEST_TIMEOUT_MS,
            CONTENT_REQUEST_TIMEOUT_MS_BOUNDS,
        );
        let connect_timeout_ms = parse_env_u64_with_bounds(
            "CONTENT_CONNECT_TIMEOUT_MS",
            DEFAULT_CONTENT_CONNECT_TIMEOUT_MS,
            CONTENT_CONNECT_TIMEOUT_MS_BOUNDS,
        );
        let mail_api_url = parse_env_http_url("MAIL_API_URL").unwrap_or_else(default_mail_api_url);
        let mail_service_id = parse_env_non_empty_string("MAIL_SERVICE_ID");
        let mail_template_id = parse_env_non_empty_string("MAIL_TEMPLATE_ID");
        let mail_public_key = parse_env_non_empty_string("MAIL_PUBLIC_KEY");
        let log_level = parse_log_level("LOG_LEVEL", DEFAULT_LOG_LEVEL);

        Self {
            port,
            content_api_url,
            cache_ttl_seconds,
            cache_max_entries,
            response_max_bytes,
            request_timeout: Duration::from_millis(request_timeout_ms),
            connect_timeout: Duration::from_millis(connect_timeout_ms),
            mail_api_url,
            mail_service_id,
            mail_template_id,
            mail_public_key,
            log_level,
        }
    }

    fn mail_relay(&self) -> Option<MailRelaySettings> {
        Some(MailRelaySettings {
            api_url: self.mail_api_url.clone(),
            service_id: self.mail_service_id.clone()?,
            template_id: self.mail_template_id.clone()?,
            public_key: self.mail_public_key.clone()?,
        })
    }
}

fn default_content_api_url() -> Url {
    Url::parse(DEFAULT_CONTENT_API_URL).expect("default content API URL is valid")
}

fn default_mail_api_url() -> Url {
    Url::parse(DEFAULT_MAIL_API_URL).expect("default mail API URL is valid")
}

#[derive(Clone)]
struct MailRelaySettings {
    api_url: Url,
    service_id: String,
    template_id: String,
    public_key: String,
}

#[derive(Serialize)]
struct MailRelayPayload {
    service_id: String,
    template_id: String,
    user_id: String,
    template_params: MailTemplateParams,
}

#[derive(Clone)]
pub struct AppState {
    cache: Arc<RwLock<HashMap<String, CacheEntry>>>,
    http: reqwest::Client,
    config: RuntimeConfig,
}

#[derive(Clone)]
struct CacheEntry {
    created_at: Instant,
    expires_at: Instant,
    body: serde_json::Value,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = RuntimeConfig::from_env();
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(USER_AGENT)
        .build()?;

    let state = AppState {
        cache: Arc::new(RwLock::new(HashMap::new())),
        http,
        config: config.clone(),
    };

    let static_service = ServeDir::new("dist").not_found_service(ServeFile::new("dist/index.html"));

    let app = Router::new()
        .route("/api/v1/{resource}", get(get_content))
        .route("/api/contact", post(post_contact))
        .fallback_service(static_service)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    log_event(
        &config,
        LogLevel::Info,
        "server_started",
        serde_json::json!({ "port": config.port }),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

async fn get_content(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
) -> axum::response::Response {
    let request_started_at = Instant::now();
    let request_id = resolve_request_id(&headers);

    log_event(
        &state.config,
        LogLevel::Info,
        "content_request_start",
        serde_json::json!({
            "request_id": request_id.as_str(),
            "method": method.as_str(),
            "path": uri.path(),
        }),
    );

    if !is_known_resource(&resource) {
        log_event(
            &state.config,
            LogLevel::Info,
            "content_request_failed",
            serde_json::json!({
                "request_id": request_id.as_str(),
                "error_class": "unknown_resource",
                "resource": resource.as_str(),
                "duration_ms": request_started_at.elapsed().as_millis(),
            }),
        );
        return envelope_response(
            StatusCode::NOT_FOUND,
            ApiResponse::failure("unknown resource"),
            cache_control("no-store"),
            &request_id,
        );
    }

    let query_pairs = parse_query_pairs(raw_query.as_deref());
    let key = cache_key(&resource, &query_pairs);

    let cache_hit = read_from_cache(&state, &key).await;
    log_event(
        &state.config,
        LogLevel::Debug,
        "content_cache_decision",
        serde_json::json!({
            "request_id": request_id.as_str(),
            "resource": resource.as_str(),
            "memory_cache": if cache_hit.is_some() { "hit" } else { "miss" },
        }),
    );

    if let Some(body) = cache_hit {
        log_event(
            &state.config,
            LogLevel::Info,
            "content_request_complete",
            serde_json::json!({
                "request_id": request_id.as_str(),
                "status": StatusCode::OK.as_u16(),
                "duration_ms": request_started_at.elapsed().as_millis(),
                "cache": "memory_hit",
            }),
        );
        return value_response(
            StatusCode::OK,
            body,
            cache_control(&format!("public, max-age={}", state.config.cache_ttl_seconds)),
            &request_id,
        );
    }

    match fetch_upstream(&state, &resource, &query_pairs).await {
        Ok(body) => {
            let body = normalize_upstream_body(body);
            write_to_cache(&state, key, body.clone()).await;
            log_event(
                &state.config,
                LogLevel::Info,
                "content_request_complete",
                serde_json::json!({
                    "request_id": request_id.as_str(),
                    "status": StatusCode::OK.as_u16(),
                    "duration_ms": request_started_at.elapsed().as_millis(),
                    "cache": "memory_miss",
                }),
            );
            value_response(
                StatusCode::OK,
                body,
                cache_control(&format!("public, max-age={}", state.config.cache_ttl_seconds)),
                &request_id,
            )
        }
        Err(error_message) => {
            log_event(
                &state.config,
                LogLevel::Warn,
                "content_upstream_failed",
                serde_json::json!({
                    "request_id": request_id.as_str(),
                    "resource": resource.as_str(),
                    "error_class": "upstream_failed",
                    "message": error_message,
                    "duration_ms": request_started_at.elapsed().as_millis(),
                }),
            );
            envelope_response(
                StatusCode::BAD_GATEWAY,
                ApiResponse::failure(error_message),
                cache_control("no-store"),
                &request_id,
            )
        }
    }
}

async fn post_contact(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(submission): Json<ContactSubmission>,
) -> axum::response::Response {
    let request_started_at = Instant::now();
    let request_id = resolve_request_id(&headers);

    log_event(
        &state.config,
        LogLevel::Info,
        "contact_request_start",
        serde_json::json!({
            "request_id": request_id.as_str(),
            "method": method.as_str(),
            "path": uri.path(),
        }),
    );

    let validation_errors = contact::validate(&submission);
    if !validation_errors.is_empty() {
        log_event(
            &state.config,
            LogLevel::Info,
            "contact_request_failed",
            serde_json::json!({
                "request_id": request_id.as_str(),
                "error_class": "validation_failed",
                "fields": validation_errors
                    .iter()
                    .map(|(field, _)| field.as_str())
                    .collect::<Vec<_>>(),
                "duration_ms": request_started_at.elapsed().as_millis(),
            }),
        );
        return envelope_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            validation_failure_envelope(&validation_errors),
            cache_control("no-store"),
            &request_id,
        );
    }

    let Some(relay) = state.config.mail_relay() else {
        log_event(
            &state.config,
            LogLevel::Warn,
            "contact_request_failed",
            serde_json::json!({
                "request_id": request_id.as_str(),
                "error_class": "config_missing",
                "message": "mail delivery is not configured",
                "duration_ms": request_started_at.elapsed().as_millis(),
            }),
        );
        return envelope_response(
            StatusCode::SERVICE_UNAVAILABLE,
            ApiResponse::failure("mail delivery is not configured"),
            cache_control("no-store"),
            &request_id,
        );
    };

    let payload = MailRelayPayload {
        service_id: relay.service_id.clone(),
        template_id: relay.template_id.clone(),
        user_id: relay.public_key.clone(),
        template_params: MailTemplateParams::from_submission(
            &submission,
            now_unix_seconds().to_string(),
        ),
    };

    match relay_mail(&state, &relay.api_url, &payload).await {
        Ok(()) => {
            log_event(
                &state.config,
                LogLevel::Info,
                "contact_request_complete",
                serde_json::json!({
                    "request_id": request_id.as_str(),
                    "status": StatusCode::OK.as_u16(),
                    "duration_ms": request_started_at.elapsed().as_millis(),
                }),
            );
            envelope_response(
                StatusCode::OK,
                ApiResponse::succeeded("Message sent successfully!"),
                cache_control("no-store"),
                &request_id,
            )
        }
        Err(error_message) => {
            log_event(
                &state.config,
                LogLevel::Warn,
                "contact_relay_failed",
                serde_json::json!({
                    "request_id": request_id.as_str(),
                    "error_class": "mail_relay_failed",
                    "message": error_message,
                    "duration_ms": request_started_at.elapsed().as_millis(),
                }),
            );
            envelope_response(
                StatusCode::BAD_GATEWAY,
                ApiResponse::failure(error_message),
                cache_control("no-store"),
                &request_id,
            )
        }
    }
}

async fn relay_mail(
    state: &AppState,
    api_url: &Url,
    payload: &MailRelayPayload,
) -> Result<(), &'static str> {
    let response = state
        .http
        .post(api_url.clone())
        .json(payload)
        .send()
        .await
        .map_err(|_| "could not reach the mail provider")?;

    if !response.status().is_success() {
        return Err("mail provider rejected the message");
    }

    Ok(())
}

fn validation_failure_envelope(
    errors: &[(contact::ContactField, &'static str)],
) -> ApiResponse<serde_json::Value> {
    let details = errors
        .iter()
        .map(|(field, message)| format!("{}: {message}", field.as_str()))
        .collect::<Vec<_>>()
        .join("; ");

    ApiResponse {
        success: false,
        message: Some("Please fill in all required fields correctly".to_string()),
        data: None,
        pagination: None,
        error: Some(ApiErrorField::Structured(ApiErrorDetail {
            code: Some("validation_failed".to_string()),
            details: Some(details),
        })),
    }
}

fn is_known_resource(resource: &str) -> bool {
    CONTENT_RESOURCES.contains(&resource)
}

fn parse_query_pairs(raw_query: Option<&str>) -> Vec<(String, String)> {
    let Some(raw_query) = raw_query else {
        return Vec::new();
    };

    url::form_urlencoded::parse(raw_query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

fn cache_key(resource: &str, query_pairs: &[(String, String)]) -> String {
    let mut sorted = query_pairs.to_vec();
    sorted.sort();

    let query = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{resource}?{query}")
}

fn content_endpoint(base: &Url, resource: &str) -> Result<Url, &'static str> {
    Url::parse(&format!("{}/{resource}", base.as_str().trim_end_matches('/')))
        .map_err(|_| "invalid content API URL")
}

async fn fetch_upstream(
    state: &AppState,
    resource: &str,
    query_pairs: &[(String, String)],
) -> Result<serde_json::Value, &'static str> {
    let endpoint = content_endpoint(&state.config.content_api_url, resource)?;

    let response = state
        .http
        .get(endpoint)
        .query(query_pairs)
        .send()
        .await
        .map_err(|_| "could not reach the content API")?;

    if !response.status().is_success() {
        return Err("content API returned an error status");
    }

    let body = read_limited_body(response, state.config.response_max_bytes).await?;
    serde_json::from_str(&body).map_err(|_| "content API returned invalid JSON")
}

// Enveloped replies pass through untouched; anything else is wrapped as
// successful data so the client always sees one shape.
fn normalize_upstream_body(body: serde_json::Value) -> serde_json::Value {
    match &body {
        serde_json::Value::Object(map) if map.contains_key("success") => body,
        _ => serde_json::json!({ "success": true, "data": body }),
    }
}

async fn read_limited_body(
    response: reqwest::Response,
    max_response_bytes: usize,
) -> Result<String, &'static str> {
    let mut stream = response.bytes_stream();
    let mut body: Vec<u8> = Vec::with_capacity(8192);

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|_| "failed reading response body")?;

        if body.len() + chunk.len() > max_response_bytes {
            return Err("response body too large");
        }

        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&body).to_string())
}

async fn read_from_cache(state: &AppState, key: &str) -> Option<serde_json::Value> {
    let now = Instant::now();
    {
        let cache = state.cache.read().await;
        let entry = cache.get(key)?;

        if entry.expires_at > now {
            return Some(entry.body.clone());
        }
    }

    let mut cache = state.cache.write().await;
    purge_expired_entries(&mut cache, now);
    cache.remove(key);
    None
}

async fn write_to_cache(state: &AppState, key: String, body: serde_json::Value) {
    let now = Instant::now();
    let mut cache = state.cache.write().await;

    purge_expired_entries(&mut cache, now);

    if !cache.contains_key(&key) && cache.len() >= state.config.cache_max_entries {
        evict_oldest_entry(&mut cache);
    }

    cache.insert(
        key,
        CacheEntry {
            created_at: now,
            expires_at: now + Duration::from_secs(state.config.cache_ttl_seconds),
            body,
        },
    );
}

fn purge_expired_entries(cache: &mut HashMap<String, CacheEntry>, now: Instant) {
    cache.retain(|_, entry| entry.expires_at > now);
}

fn evict_oldest_entry(cache: &mut HashMap<String, CacheEntry>) {
    let Some(key_to_remove) = cache
        .iter()
        .min_by_key(|(_, entry)| entry.created_at)
        .map(|(key, _)| key.clone())
    else {
        return;
    };

    cache.remove(&key_to_remove);
}

fn envelope_response(
    status: StatusCode,
    payload: ApiResponse<serde_json::Value>,
    cache_control: HeaderValue,
    request_id: &str,
) -> axum::response::Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, cache_control);
    headers.insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));
    response_with_request_id(status, headers, Json(payload), request_id)
}

fn value_response(
    status: StatusCode,
    body: serde_json::Value,
    cache_control: HeaderValue,
    request_id: &str,
) -> axum::response::Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, cache_control);
    headers.insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));
    response_with_request_id(status, headers, Json(body), request_id)
}

fn response_with_request_id(
    status: StatusCode,
    mut headers: HeaderMap,
    payload: impl IntoResponse,
    request_id: &str,
) -> axum::response::Response {
    if let Ok(request_id_header) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, request_id_header);
    }
    (status, headers, payload).into_response()
}

fn cache_control(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static("no-store"))
}

fn parse_env_u64_with_bounds(name: &str, default: u64, bounds: (u64, u64)) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_env_usize_with_bounds(name: &str, default: usize, bounds: (usize, usize)) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_env_non_empty_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_env_http_url(name: &str) -> Option<Url> {
    let value = parse_env_non_empty_string(name)?;
    let parsed = Url::parse(&value).ok()?;

    if parsed.scheme() == "http" || parsed.scheme() == "https" {
        Some(parsed)
    } else {
        None
    }
}

fn parse_log_level(name: &str, default: LogLevel) -> LogLevel {
    match parse_env_non_empty_string(name)
        .unwrap_or_else(|| default.as_str().to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        "warn" => LogLevel::Warn,
        _ => default,
    }
}

fn log_event(config: &RuntimeConfig, level: LogLevel, event: &str, fields: serde_json::Value) {
    if level < config.log_level {
        return;
    }

    let mut payload = serde_json::Map::new();
    payload.insert(
        "ts".to_string(),
        serde_json::Value::Number(serde_json::Number::from(now_unix_seconds())),
    );
    payload.insert(
        "level".to_string(),
        serde_json::Value::String(level.as_str().to_string()),
    );
    payload.insert(
        "event".to_string(),
        serde_json::Value::String(event.to_string()),
    );

    if let serde_json::Value::Object(extra) = fields {
        for (key, value) in extra {
            payload.insert(key, value);
        }
    }

    println!("{}", serde_json::Value::Object(payload));
}

fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_secs())
        .unwrap_or(0)
}

fn now_unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or(0)
}

fn generate_request_id() -> String {
    let counter = REQUEST_ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed);
    format!("req-{}-{counter}", now_unix_millis())
}

fn resolve_request_id(headers: &HeaderMap) -> String {
    let value = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);

    value.unwrap_or_else(generate_request_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ContactField;

    fn test_runtime_config() -> RuntimeConfig {
        RuntimeConfig {
            port: DEFAULT_PORT,
            content_api_url: default_content_api_url(),
            cache_ttl_seconds: DEFAULT_CONTENT_CACHE_TTL_SECONDS,
            cache_max_entries: DEFAULT_CONTENT_CACHE_MAX_ENTRIES,
            response_max_bytes: DEFAULT_CONTENT_RESPONSE_MAX_BYTES,
            request_timeout: Duration::from_millis(DEFAULT_CONTENT_REQUEST_TIMEOUT_MS),
            connect_timeout: Duration::from_millis(DEFAULT_CONTENT_CONNECT_TIMEOUT_MS),
            mail_api_url: default_mail_api_url(),
            mail_service_id: None,
            mail_template_id: None,
            mail_public_key: None,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }

    fn test_state() -> AppState {
        AppState {
            cache: Arc::new(RwLock::new(HashMap::new())),
            http: reqwest::Client::new(),
            config: test_runtime_config(),
        }
    }

    #[test]
    fn only_the_three_content_resources_are_served() {
        assert!(is_known_resource("projects"));
        assert!(is_known_resource("tech-stacks"));
        assert!(is_known_resource("experiences"));
        assert!(!is_known_resource("users"));
        assert!(!is_known_resource(""));
    }

    #[test]
    fn cache_key_is_stable_across_query_order() {
        let forward = vec![
            ("page".to_string(), "2".to_string()),
            ("sort_by".to_string(), "title".to_string()),
        ];
        let reversed = vec![
            ("sort_by".to_string(), "title".to_string()),
            ("page".to_string(), "2".to_string()),
        ];

        assert_eq!(cache_key("projects", &forward), cache_key("projects", &reversed));
        assert_ne!(cache_key("projects", &forward), cache_key("experiences", &forward));
    }

    #[test]
    fn query_pairs_decode_url_encoding() {
        let pairs = parse_query_pairs(Some("category=Machine%20Learning&page=1"));
        assert_eq!(pairs[0], ("category".to_string(), "Machine Learning".to_string()));
        assert_eq!(parse_query_pairs(None), Vec::new());
    }

    #[test]
    fn content_endpoint_keeps_the_base_path() {
        let base = Url::parse("http://localhost:8080/api/v1").expect("valid URL");
        let endpoint = content_endpoint(&base, "projects").expect("endpoint should join");
        assert_eq!(endpoint.as_str(), "http://localhost:8080/api/v1/projects");

        let trailing = Url::parse("http://localhost:8080/api/v1/").expect("valid URL");
        let endpoint = content_endpoint(&trailing, "tech-stacks").expect("endpoint should join");
        assert_eq!(endpoint.as_str(), "http://localhost:8080/api/v1/tech-stacks");
    }

    #[test]
    fn enveloped_upstream_bodies_pass_through_unchanged() {
        let body = serde_json::json!({ "success": false, "message": "nope", "data": null });
        assert_eq!(normalize_upstream_body(body.clone()), body);
    }

    #[test]
    fn bare_upstream_bodies_are_wrapped_as_successful_data() {
        let body = serde_json::json!([{ "id": "p-1" }]);
        let normalized = normalize_upstream_body(body.clone());
        assert_eq!(normalized["success"], true);
        assert_eq!(normalized["data"], body);
    }

    #[test]
    fn validation_failure_envelope_lists_every_field() {
        let errors = vec![
            (ContactField::FirstName, "First name is required"),
            (ContactField::Email, "Email is invalid"),
        ];

        let envelope = validation_failure_envelope(&errors);
        assert!(!envelope.success);
        match envelope.error {
            Some(ApiErrorField::Structured(detail)) => {
                assert_eq!(detail.code.as_deref(), Some("validation_failed"));
                let details = detail.details.expect("details expected");
                assert!(details.contains("first_name"));
                assert!(details.contains("Email is invalid"));
            }
            other => panic!("expected structured error, got {other:?}"),
        }
    }

    #[test]
    fn mail_relay_requires_every_credential() {
        let mut config = test_runtime_config();
        assert!(config.mail_relay().is_none());

        config.mail_service_id = Some("service".to_string());
        config.mail_template_id = Some("template".to_string());
        assert!(config.mail_relay().is_none());

        config.mail_public_key = Some("key".to_string());
        let relay = config.mail_relay().expect("relay should be configured");
        assert_eq!(relay.service_id, "service");
    }

    #[tokio::test]
    async fn cache_overwrite_at_capacity_does_not_evict_oldest() {
        let state = test_state();
        let now = Instant::now();

        {
            let mut cache = state.cache.write().await;

            for index in 0..DEFAULT_CONTENT_CACHE_MAX_ENTRIES {
                let key = format!("projects?page={index}");
                cache.insert(
                    key,
                    CacheEntry {
                        created_at: now + Duration::from_secs(index as u64),
                        expires_at: now + Duration::from_secs(10_000),
                        body: serde_json::json!({ "success": true, "data": [] }),
                    },
                );
            }
        }

        write_to_cache(
            &state,
            "projects?page=10".to_string(),
            serde_json::json!({ "success": true, "data": ["updated"] }),
        )
        .await;

        let cache = state.cache.read().await;
        assert_eq!(cache.len(), DEFAULT_CONTENT_CACHE_MAX_ENTRIES);
        assert!(cache.contains_key("projects?page=0"));
        assert_eq!(
            cache
                .get("projects?page=10")
                .map(|entry| entry.body["data"][0].clone()),
            Some(serde_json::Value::String("updated".to_string()))
        );
    }

    #[tokio::test]
    async fn expired_entries_are_not_served() {
        let state = test_state();
        let now = Instant::now();

        {
            let mut cache = state.cache.write().await;
            cache.insert(
                "projects?".to_string(),
                CacheEntry {
                    created_at: now - Duration::from_secs(600),
                    expires_at: now - Duration::from_secs(1),
                    body: serde_json::json!({ "success": true, "data": [] }),
                },
            );
        }

        assert!(read_from_cache(&state, "projects?").await.is_none());
        assert!(state.cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn eviction_at_capacity_removes_the_oldest_entry() {
        let mut config = test_runtime_config();
        config.cache_max_entries = 2;
        let state = AppState {
            cache: Arc::new(RwLock::new(HashMap::new())),
            http: reqwest::Client::new(),
            config,
        };

        write_to_cache(&state, "a".to_string(), serde_json::json!({ "success": true })).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        write_to_cache(&state, "b".to_string(), serde_json::json!({ "success": true })).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        write_to_cache(&state, "c".to_string(), serde_json::json!({ "success": true })).await;

        let cache = state.cache.read().await;
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains_key("a"));
        assert!(cache.contains_key("c"));
    }
}
