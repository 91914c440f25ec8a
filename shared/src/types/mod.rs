//! Shared type definitions for the FileDeck client
//!
//! This module contains the wire types common to every backend endpoint:
//!
//! - The `{ success, message, data }` response envelope
//! - Page requests, list payloads and the pagination cursor
//! - The error taxonomy surfaced to callers

pub mod common;
pub mod error;

pub use common::{
    ApiResponse, PageEnvelope, PageRequest, PageResponse, PaginationInfo, DEFAULT_PAGE_LIMIT,
    FIRST_PAGE,
};
pub use error::CommonError;

pub type Result<T> = std::result::Result<T, CommonError>;

impl<T> ApiResponse<T> {
    /// Create a response the backend flagged as unsuccessful
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Fail if the backend flagged the response as unsuccessful, falling back
    /// to `default_message` when it gave no reason.
    pub fn ensure_success(self, default_message: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(CommonError::Rejected(
                self.message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| default_message.to_string()),
            ))
        }
    }

    /// Unwrap the payload of a successful response
    pub fn into_data(self) -> Result<T> {
        let response = self.ensure_success("Request failed")?;
        response
            .data
            .ok_or_else(|| CommonError::Decode("response has no data".to_string()))
    }
}

impl PageRequest {
    pub fn first(limit: u32) -> Self {
        Self {
            page: FIRST_PAGE,
            limit,
        }
    }

    pub fn with_page(self, page: u32) -> Self {
        Self { page, ..self }
    }
}

impl<T> PageEnvelope<T> {
    pub fn into_page(self) -> PageResponse<T> {
        match self {
            PageEnvelope::Unpaged(items) => PageResponse::last(items),
            PageEnvelope::Paged {
                items,
                pagination_info,
            } => PageResponse {
                items,
                next_page: pagination_info.and_then(|info| info.next_page),
            },
        }
    }
}

impl<T> PageResponse<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }

    pub fn with_next(items: Vec<T>, next_page: u32) -> Self {
        Self {
            items,
            next_page: Some(next_page),
        }
    }

    pub fn is_last_page(&self) -> bool {
        self.next_page.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_page_envelope_decoding() {
        let body = json!({
            "items": [1, 2, 3],
            "pagination_info": { "next_page": 2 }
        });
        let page = serde_json::from_value::<PageEnvelope<u32>>(body)
            .unwrap()
            .into_page();
        assert_eq!(page, PageResponse::with_next(vec![1, 2, 3], 2));
        assert!(!page.is_last_page());
    }

    #[test]
    fn test_page_envelope_missing_fields() {
        let page = serde_json::from_value::<PageEnvelope<u32>>(json!({}))
            .unwrap()
            .into_page();
        assert!(page.items.is_empty());
        assert!(page.is_last_page());

        let page = serde_json::from_value::<PageEnvelope<u32>>(json!({
            "items": [7],
            "pagination_info": { "next_page": null }
        }))
        .unwrap()
        .into_page();
        assert_eq!(page, PageResponse::last(vec![7]));
    }

    #[test]
    fn test_recent_files_alias() {
        let page = serde_json::from_value::<PageEnvelope<String>>(json!({
            "recentFiles": ["a.txt"]
        }))
        .unwrap()
        .into_page();
        assert_eq!(page.items, vec!["a.txt".to_string()]);
    }

    #[test]
    fn test_endpoint_specific_list_keys() {
        let files = serde_json::from_value::<PageEnvelope<u32>>(json!({
            "filesData": [1, 2],
            "pagination_info": { "next_page": 3 }
        }))
        .unwrap()
        .into_page();
        assert_eq!(files, PageResponse::with_next(vec![1, 2], 3));

        let users = serde_json::from_value::<PageEnvelope<u32>>(json!({
            "allUsers": [4],
            "pagination_info": { "next_page": null }
        }))
        .unwrap()
        .into_page();
        assert_eq!(users, PageResponse::last(vec![4]));
    }

    #[test]
    fn test_bare_array_is_last_page() {
        let page = serde_json::from_value::<PageEnvelope<String>>(json!(["p1", "p2"]))
            .unwrap()
            .into_page();
        assert_eq!(page, PageResponse::last(vec!["p1".to_string(), "p2".to_string()]));
        assert!(page.is_last_page());
    }

    #[test]
    fn test_api_response_success_defaults() {
        let response: ApiResponse<u32> = serde_json::from_value(json!({ "data": 5 })).unwrap();
        assert!(response.success);
        assert_eq!(response.into_data().unwrap(), 5);
    }

    #[test]
    fn test_api_response_rejected() {
        let response: ApiResponse<u32> =
            serde_json::from_value(json!({ "success": false, "message": "Email not found" }))
                .unwrap();
        let err = response.into_data().unwrap_err();
        assert_eq!(err.to_string(), "Request rejected: Email not found");

        let err = ApiResponse::<u32>::rejected("")
            .ensure_success("Failed to add user")
            .unwrap_err();
        assert_eq!(err.to_string(), "Request rejected: Failed to add user");
    }

    #[test]
    fn test_api_response_missing_data() {
        let response: ApiResponse<u32> = serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(matches!(response.into_data(), Err(CommonError::Decode(_))));
    }

    #[test]
    fn test_page_request() {
        let first = PageRequest::first(25);
        assert_eq!(first, PageRequest { page: 1, limit: 25 });
        assert_eq!(first.with_page(4), PageRequest { page: 4, limit: 25 });
    }
}
