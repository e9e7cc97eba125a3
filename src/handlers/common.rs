use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use validator::Validate;

use crate::errors::ApiError;

const DEFAULT_PER_PAGE: u64 = 50;
const MAX_PER_PAGE: u64 = 500;

/// `?page=N&per_page=M` query parameters, 1-based.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PaginationParams {
    pub fn limit(&self) -> u64 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    pub fn offset(&self) -> u64 {
        (self.page.unwrap_or(1).max(1) - 1) * self.limit()
    }
}

/// Run validator-derived checks on a request DTO.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))
}

pub fn csv_attachment(filename: &str, bytes: Vec<u8>) -> Response {
    attachment(filename, "text/csv", bytes)
}

pub fn pdf_attachment(filename: &str, bytes: Vec<u8>) -> Response {
    attachment(filename, "application/pdf", bytes)
}

fn attachment(filename: &str, content_type: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_offsets() {
        let p = PaginationParams::default();
        assert_eq!(p.limit(), DEFAULT_PER_PAGE);
        assert_eq!(p.offset(), 0);

        let p = PaginationParams {
            page: Some(3),
            per_page: Some(20),
        };
        assert_eq!(p.limit(), 20);
        assert_eq!(p.offset(), 40);

        let p = PaginationParams {
            page: Some(0),
            per_page: Some(100_000),
        };
        assert_eq!(p.limit(), MAX_PER_PAGE);
        assert_eq!(p.offset(), 0);
    }
}
