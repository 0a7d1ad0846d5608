use crate::{ApiResponse, PaginatedResponse};
use axum::{http::StatusCode, Json};
use serde::Serialize;

/// 201 with the created resource in the standard envelope
pub fn created_response<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// 200 with the resource in the standard envelope
pub fn success_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

pub fn no_content_response() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub fn total_pages(total: u64, limit: u64) -> u64 {
    if total == 0 || limit == 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

/// Wraps one page of items with its paging metadata
pub fn paginated<T>(items: Vec<T>, total: u64, page: u64, limit: u64) -> PaginatedResponse<T> {
    PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages: total_pages(total, limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 20, 0)]
    #[test_case(1, 20, 1)]
    #[test_case(20, 20, 1)]
    #[test_case(21, 20, 2)]
    #[test_case(5, 0, 0)]
    fn counts_pages(total: u64, limit: u64, expected: u64) {
        assert_eq!(total_pages(total, limit), expected);
    }

    #[test]
    fn created_is_201() {
        let (status, Json(body)) = created_response("T-1");
        assert_eq!(status, StatusCode::CREATED);
        assert!(body.success);
    }
}
