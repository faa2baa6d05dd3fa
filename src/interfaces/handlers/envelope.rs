use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

/// Serialized as `{}` when a response carries no metadata.
#[derive(Debug, Default, Serialize)]
pub struct EmptyMeta {}

/// Body of every successful response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T, M = EmptyMeta> {
    pub success: bool,
    pub message: String,
    pub data: T,
    pub meta: M,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            data,
            meta: EmptyMeta::default(),
        }
    }
}

impl<T: Serialize, M: Serialize> ApiResponse<T, M> {
    pub fn with_meta(message: impl Into<String>, data: T, meta: M) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            data,
            meta,
        }
    }

    pub fn respond(&self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_defaults_to_empty_object() {
        let body = serde_json::to_value(ApiResponse::new("ok", vec![1, 2])).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["meta"], serde_json::json!({}));
        assert_eq!(body["data"], serde_json::json!([1, 2]));
    }
}
