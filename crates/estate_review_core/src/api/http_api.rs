//! HTTP implementation of the admin backend contract.
//!
//! # Responsibility
//! - Translate `AdminApi` calls into JSON-over-HTTP requests.
//! - Map transport failures and status codes into `ApiError`.
//!
//! # Invariants
//! - Every request carries a fresh `X-Request-Id`.
//! - Response bodies are only decoded for 2xx statuses.
//! - Tokens and request bodies are never logged.

use crate::api::admin_api::{AdminApi, ApiError, ApiResult};
use crate::api::wire::{
    self, ExcludePropertiesRequest, MergeBuildingsRequest, MergePropertiesRequest,
};
use crate::config::{ApiConfig, ConfigError};
use crate::model::building::{
    BuildingCandidate, BuildingId, BuildingMergeHistoryPage, BuildingMergeResult,
    BuildingSearchQuery, HistoryQuery, MergeHistoryId, RevertResult, Suggestion,
};
use crate::model::group::{DuplicateGroupPage, GroupQuery, PropertyId};
use crate::model::property::{ExclusionRecord, PropertyDetail, PropertyMergeResult};
use crate::model::task::TaskSnapshot;
use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Serialize;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Blocking HTTP client for the admin backend.
pub struct HttpAdminApi {
    client: Client,
    config: ApiConfig,
}

impl HttpAdminApi {
    /// Builds a client from validated configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|err| ConfigError::ClientBuild(err.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn get(&self, segments: &[&str], query: &[(&str, String)]) -> ApiResult<String> {
        let url = self.config.endpoint(segments);
        let path = url.path().to_string();
        let request = self.client.get(url).query(query);
        self.execute("GET", &path, request)
    }

    fn post<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> ApiResult<String> {
        let url = self.config.endpoint(segments);
        let path = url.path().to_string();
        let request = self.client.post(url).json(body);
        self.execute("POST", &path, request)
    }

    fn execute(&self, method: &str, path: &str, request: RequestBuilder) -> ApiResult<String> {
        let request_id = Uuid::new_v4();
        let mut request = request
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(token) = self.config.auth_token.as_deref() {
            request = request.bearer_auth(token);
        }

        debug!("event=api_request module=api method={method} path={path} request_id={request_id}");
        let response = request.send().map_err(|err| {
            let mapped = map_transport_error(&err);
            warn!(
                "event=api_request module=api status=error method={method} path={path} request_id={request_id} kind={}",
                error_kind(&mapped)
            );
            mapped
        })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| map_transport_error(&err))?;
        if status.is_success() {
            debug!(
                "event=api_response module=api status=ok method={method} path={path} request_id={request_id} http_status={}",
                status.as_u16()
            );
            return Ok(body);
        }

        let error = map_status_error(status, body.as_str());
        warn!(
            "event=api_response module=api status=error method={method} path={path} request_id={request_id} http_status={} kind={}",
            status.as_u16(),
            error_kind(&error)
        );
        Err(error)
    }
}

impl AdminApi for HttpAdminApi {
    fn list_duplicate_groups(&self, query: &GroupQuery) -> ApiResult<DuplicateGroupPage> {
        let body = self.get(&["api", "admin", "duplicate-groups"], &query.to_query_pairs())?;
        wire::decode_group_page(body.as_str())
    }

    fn get_property(&self, id: PropertyId) -> ApiResult<PropertyDetail> {
        let body = self.get(&["api", "admin", "properties", &id.to_string()], &[])?;
        wire::decode(body.as_str())
    }

    fn merge_properties(
        &self,
        primary: PropertyId,
        secondary: PropertyId,
    ) -> ApiResult<PropertyMergeResult> {
        let body = self.post(
            &["api", "admin", "merge-properties"],
            &MergePropertiesRequest {
                primary_property_id: primary,
                secondary_property_id: secondary,
            },
        )?;
        wire::decode(body.as_str())
    }

    fn exclude_properties(
        &self,
        first: PropertyId,
        second: PropertyId,
        reason: &str,
    ) -> ApiResult<ExclusionRecord> {
        let body = self.post(
            &["api", "admin", "exclude-properties"],
            &ExcludePropertiesRequest {
                property1_id: first,
                property2_id: second,
                reason,
            },
        )?;
        wire::decode(body.as_str())
    }

    fn search_buildings_for_merge(
        &self,
        query: &BuildingSearchQuery,
    ) -> ApiResult<Vec<BuildingCandidate>> {
        let body = self.get(
            &["api", "admin", "buildings", "search-for-merge"],
            &[("q", query.text.trim().to_string()), ("limit", query.limit.to_string())],
        )?;
        wire::decode_building_candidates(body.as_str())
    }

    fn building_name_suggestions(&self, prefix: &str) -> ApiResult<Vec<Suggestion>> {
        let body = self.get(
            &["api", "admin", "buildings", "suggestions"],
            &[("q", prefix.trim().to_string())],
        )?;
        wire::decode_suggestions(body.as_str())
    }

    fn merge_buildings(
        &self,
        primary: BuildingId,
        secondaries: &[BuildingId],
    ) -> ApiResult<BuildingMergeResult> {
        let body = self.post(
            &["api", "admin", "merge-buildings"],
            &MergeBuildingsRequest {
                primary_id: primary,
                secondary_ids: secondaries,
            },
        )?;
        wire::decode(body.as_str())
    }

    fn building_merge_history(&self, query: &HistoryQuery) -> ApiResult<BuildingMergeHistoryPage> {
        let body = self.get(
            &["api", "admin", "building-merge-history"],
            &[("limit", query.limit.to_string()), ("offset", query.offset.to_string())],
        )?;
        wire::decode(body.as_str())
    }

    fn revert_building_merge(&self, history_id: MergeHistoryId) -> ApiResult<RevertResult> {
        let body = self.post(
            &[
                "api",
                "admin",
                "building-merge-history",
                &history_id.to_string(),
                "revert",
            ],
            &serde_json::json!({}),
        )?;
        wire::decode(body.as_str())
    }

    fn get_task(&self, task_id: &str) -> ApiResult<TaskSnapshot> {
        let body = self.get(&["api", "admin", "scraping", "tasks", task_id], &[])?;
        wire::decode(body.as_str())
    }

    fn pause_task(&self, task_id: &str) -> ApiResult<()> {
        self.post(
            &["api", "admin", "scraping", "tasks", task_id, "pause"],
            &serde_json::json!({}),
        )
        .map(|_| ())
    }

    fn resume_task(&self, task_id: &str) -> ApiResult<()> {
        self.post(
            &["api", "admin", "scraping", "tasks", task_id, "resume"],
            &serde_json::json!({}),
        )
        .map(|_| ())
    }
}

fn map_transport_error(err: &reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

/// Maps a non-success status and its body into the error taxonomy.
pub(crate) fn map_status_error(status: StatusCode, body: &str) -> ApiError {
    if status == StatusCode::UNAUTHORIZED {
        return ApiError::SessionExpired;
    }
    if status.is_client_error() {
        return ApiError::Validation {
            status: status.as_u16(),
            detail: wire::error_detail(body),
        };
    }
    ApiError::Server {
        status: status.as_u16(),
        body: wire::error_detail(body),
    }
}

fn error_kind(error: &ApiError) -> &'static str {
    match error {
        ApiError::Network(_) => "network",
        ApiError::Timeout => "timeout",
        ApiError::SessionExpired => "session_expired",
        ApiError::Validation { .. } => "validation",
        ApiError::Server { .. } => "server",
        ApiError::Decode(_) => "decode",
    }
}
