use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 10;
pub const DEFAULT_SORT_FIELD: &str = "created_at";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Sorting {
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl Default for Sorting {
    fn default() -> Self {
        Self {
            sort_by: DEFAULT_SORT_FIELD.to_string(),
            sort_order: SortOrder::Desc,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

pub fn list_query_pairs(
    page: PageRequest,
    sorting: &Sorting,
    extra: &[(&str, String)],
) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("page".to_string(), page.page.to_string()),
        ("per_page".to_string(), page.per_page.to_string()),
        ("sort_by".to_string(), sorting.sort_by.clone()),
        ("sort_order".to_string(), sorting.sort_order.as_str().to_string()),
    ];

    for (key, value) in extra {
        pairs.push((key.to_string(), value.clone()));
    }

    pairs
}

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_next_page: Option<bool>,
}

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiErrorField {
    Structured(ApiErrorDetail),
    Text(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorField>,
}

impl<T> ApiResponse<T> {
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            message: Some(message.clone()),
            data: None,
            pagination: None,
            error: Some(ApiErrorField::Text(message)),
        }
    }

    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            pagination: None,
            error: None,
        }
    }
}

// Upstream payloads are looser than the envelope: `success` may be missing,
// pagination may hide under `metadata`, and errors come structured or as text.
#[derive(Debug, Deserialize)]
pub struct RawEnvelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
    #[serde(default)]
    pub error: Option<ApiErrorField>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMetadata {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl<T> RawEnvelope<T> {
    pub fn normalize(self) -> ApiResponse<T> {
        let pagination = self
            .pagination
            .or_else(|| self.metadata.and_then(|metadata| metadata.pagination));
        let success = self.success.unwrap_or(self.error.is_none());

        ApiResponse {
            success,
            message: self.message,
            data: self.data,
            pagination,
            error: self.error,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use client::ContentClient;

#[cfg(target_arch = "wasm32")]
mod client {
    use super::*;
    use crate::model::{ExperienceRecord, ProjectRecord, TechStackRecord};
    use gloo_net::http::Request;
    use js_sys::encode_uri_component;
    use serde::de::DeserializeOwned;

    pub const DEFAULT_API_BASE: &str = "/api/v1";

    pub struct ContentClient {
        base_url: String,
    }

    impl Default for ContentClient {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ContentClient {
        pub fn new() -> Self {
            Self {
                base_url: DEFAULT_API_BASE.to_string(),
            }
        }

        pub async fn projects(
            &self,
            page: PageRequest,
            sorting: &Sorting,
            category: Option<String>,
        ) -> ApiResponse<Vec<ProjectRecord>> {
            let extra: Vec<(&str, String)> = category
                .map(|value| vec![("category", value)])
                .unwrap_or_default();
            self.get_list("projects", page, sorting, &extra).await
        }

        pub async fn tech_stacks(
            &self,
            page: PageRequest,
            sorting: &Sorting,
        ) -> ApiResponse<Vec<TechStackRecord>> {
            self.get_list("tech-stacks", page, sorting, &[]).await
        }

        pub async fn experiences(
            &self,
            page: PageRequest,
            sorting: &Sorting,
        ) -> ApiResponse<Vec<ExperienceRecord>> {
            self.get_list("experiences", page, sorting, &[]).await
        }

        async fn get_list<T: DeserializeOwned>(
            &self,
            endpoint: &str,
            page: PageRequest,
            sorting: &Sorting,
            extra: &[(&str, String)],
        ) -> ApiResponse<Vec<T>> {
            let pairs = list_query_pairs(page, sorting, extra);
            let url = self.endpoint_url(endpoint, &pairs);
            fetch_envelope(&url).await
        }

        fn endpoint_url(&self, endpoint: &str, pairs: &[(String, String)]) -> String {
            let mut url = format!("{}/{endpoint}", self.base_url.trim_end_matches('/'));

            if !pairs.is_empty() {
                let query = pairs
                    .iter()
                    .map(|(key, value)| {
                        let encoded = encode_uri_component(value)
                            .as_string()
                            .unwrap_or_else(|| value.clone());
                        format!("{key}={encoded}")
                    })
                    .collect::<Vec<_>>()
                    .join("&");
                url.push('?');
                url.push_str(&query);
            }

            url
        }
    }

    async fn fetch_envelope<T: DeserializeOwned>(url: &str) -> ApiResponse<T> {
        let response = match Request::get(url).send().await {
            Ok(response) => response,
            Err(err) => return ApiResponse::failure(format!("request failed: {err}")),
        };

        match response.json::<RawEnvelope<T>>().await {
            Ok(raw) => raw.normalize(),
            Err(err) => ApiResponse::failure(format!("unreadable response: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_list_query_matches_the_api_defaults() {
        let pairs = list_query_pairs(PageRequest::default(), &Sorting::default(), &[]);

        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "1".to_string()),
                ("per_page".to_string(), "10".to_string()),
                ("sort_by".to_string(), "created_at".to_string()),
                ("sort_order".to_string(), "desc".to_string()),
            ]
        );
    }

    #[test]
    fn extra_filters_follow_the_standard_pairs() {
        let pairs = list_query_pairs(
            PageRequest { page: 3, per_page: 25 },
            &Sorting {
                sort_by: "title".to_string(),
                sort_order: SortOrder::Asc,
            },
            &[("category", "Web".to_string())],
        );

        assert_eq!(pairs[0], ("page".to_string(), "3".to_string()));
        assert_eq!(pairs[3], ("sort_order".to_string(), "asc".to_string()));
        assert_eq!(pairs[4], ("category".to_string(), "Web".to_string()));
    }

    #[test]
    fn missing_success_flag_defaults_from_the_error_field() {
        let raw: RawEnvelope<Vec<u32>> =
            serde_json::from_value(serde_json::json!({ "data": [1, 2, 3] }))
                .expect("envelope should deserialize");
        let normalized = raw.normalize();
        assert!(normalized.success);
        assert_eq!(normalized.data, Some(vec![1, 2, 3]));

        let raw: RawEnvelope<Vec<u32>> =
            serde_json::from_value(serde_json::json!({ "error": "boom" }))
                .expect("envelope should deserialize");
        let normalized = raw.normalize();
        assert!(!normalized.success);
        assert_eq!(normalized.error, Some(ApiErrorField::Text("boom".to_string())));
    }

    #[test]
    fn pagination_is_lifted_from_metadata_when_top_level_is_absent() {
        let raw: RawEnvelope<Vec<u32>> = serde_json::from_value(serde_json::json!({
            "success": true,
            "data": [],
            "metadata": { "pagination": { "total": 42, "page": 2 } }
        }))
        .expect("envelope should deserialize");

        let normalized = raw.normalize();
        let pagination = normalized.pagination.expect("pagination expected");
        assert_eq!(pagination.total, Some(42));
        assert_eq!(pagination.page, Some(2));
    }

    #[test]
    fn structured_errors_survive_normalization() {
        let raw: RawEnvelope<Vec<u32>> = serde_json::from_value(serde_json::json!({
            "success": false,
            "message": "not found",
            "error": { "code": "404", "details": "no such resource" }
        }))
        .expect("envelope should deserialize");

        let normalized = raw.normalize();
        assert!(!normalized.success);
        match normalized.error {
            Some(ApiErrorField::Structured(detail)) => {
                assert_eq!(detail.code.as_deref(), Some("404"));
            }
            other => panic!("expected structured error, got {other:?}"),
        }
    }

    #[test]
    fn failure_envelopes_carry_the_message_in_both_fields() {
        let failed = ApiResponse::<Vec<u32>>::failure("network unreachable");
        assert!(!failed.success);
        assert_eq!(failed.message.as_deref(), Some("network unreachable"));
        assert_eq!(failed.data, None);
        assert_eq!(
            failed.error,
            Some(ApiErrorField::Text("network unreachable".to_string()))
        );
    }
}
