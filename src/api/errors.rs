// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::fetch::FetchError;
use crate::normalize::NormalizeError;
use crate::providers::ProviderError;
use crate::store::StoreError;

/// Wire shape for every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    MissingImageUrl,
    InvalidRequest(String),
    /// The file's extension is outside the image allow-list
    UnsupportedType {
        extension: String,
    },
    Fetch(FetchError),
    Normalize(NormalizeError),
    Provider(ProviderError),
    QueryFailed(StoreError),
    SaveFailed(StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthorized => 401,
            ApiError::MissingImageUrl
            | ApiError::InvalidRequest(_)
            | ApiError::UnsupportedType { .. } => 400,
            ApiError::Fetch(_)
            | ApiError::Normalize(_)
            | ApiError::Provider(_)
            | ApiError::QueryFailed(_)
            | ApiError::SaveFailed(_) => 500,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let (error, details) = match self {
            ApiError::Unauthorized => ("Unauthorized".to_string(), None),
            ApiError::MissingImageUrl => ("Image URL is required".to_string(), None),
            ApiError::InvalidRequest(msg) => (msg.clone(), None),
            ApiError::UnsupportedType { extension } => (
                "Not an image".to_string(),
                Some(format!(
                    "File type \".{}\" is not supported. Only images can have alt text generated.",
                    extension
                )),
            ),
            ApiError::Fetch(e) => ("Failed to generate alt text".to_string(), Some(e.to_string())),
            ApiError::Normalize(e) => {
                ("Failed to generate alt text".to_string(), Some(e.to_string()))
            }
            ApiError::Provider(e) => {
                ("Failed to generate alt text".to_string(), Some(e.to_string()))
            }
            ApiError::QueryFailed(e) => {
                ("Failed to fetch images".to_string(), Some(e.to_string()))
            }
            ApiError::SaveFailed(e) => ("Failed to save alt text".to_string(), Some(e.to_string())),
        };
        ErrorResponse { error, details }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.to_response();
        match response.details {
            Some(details) => write!(f, "{}: {}", response.error, details),
            None => write!(f, "{}", response.error),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        ApiError::Fetch(e)
    }
}

impl From<NormalizeError> for ApiError {
    fn from(e: NormalizeError) -> Self {
        ApiError::Normalize(e)
    }
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        ApiError::Provider(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthorized.status_code(), 401);
        assert_eq!(ApiError::MissingImageUrl.status_code(), 400);
        assert_eq!(
            ApiError::UnsupportedType {
                extension: "pdf".to_string()
            }
            .status_code(),
            400
        );
        assert_eq!(
            ApiError::Normalize(NormalizeError::Decode("bad".to_string())).status_code(),
            500
        );
    }

    #[test]
    fn test_unsupported_type_names_extension() {
        let response = ApiError::UnsupportedType {
            extension: "pdf".to_string(),
        }
        .to_response();
        assert_eq!(response.error, "Not an image");
        assert!(response.details.unwrap().contains("\".pdf\""));
    }

    #[test]
    fn test_details_omitted_when_absent() {
        let json = serde_json::to_string(&ApiError::Unauthorized.to_response()).unwrap();
        assert_eq!(json, r#"{"error":"Unauthorized"}"#);
    }
}
