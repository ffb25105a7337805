use axum::extract::{
    rejection::{PathRejection, QueryRejection},
    Path, Query,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::config::PaginationConfig;
use crate::error::ApiError;
use crate::services::PageRequest;

/// `page` / `per_page` query parameters shared by every list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageParams {
    pub fn resolve(&self, config: &PaginationConfig) -> Result<PageRequest, ApiError> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(ApiError::invalid_field("page", "must be at least 1"));
        }
        let per_page = self.per_page.unwrap_or(config.default_per_page);
        if per_page < 1 || per_page > config.max_per_page {
            return Err(ApiError::invalid_field(
                "per_page",
                format!("must be between 1 and {}", config.max_per_page),
            ));
        }
        Ok(PageRequest::new(page, per_page))
    }
}

/// Unwraps a query extractor, turning parse failures into a 400 envelope
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|e| ApiError::validation_error(e.body_text(), None))
}

pub fn path_uuid(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::bad_request("Invalid id: expected a UUID"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaginationConfig {
        PaginationConfig { default_per_page: 30, max_per_page: 200 }
    }

    #[test]
    fn defaults_apply() {
        let page = PageParams::default().resolve(&config()).unwrap();
        assert_eq!(page, PageRequest::new(1, 30));
    }

    #[test]
    fn bounds_are_enforced() {
        let zero_page = PageParams { page: Some(0), per_page: None };
        assert_eq!(zero_page.resolve(&config()).unwrap_err().status_code(), 400);

        let too_many = PageParams { page: None, per_page: Some(201) };
        assert_eq!(too_many.resolve(&config()).unwrap_err().error_code(), "VALIDATION_ERROR");

        let zero_size = PageParams { page: None, per_page: Some(0) };
        assert!(zero_size.resolve(&config()).is_err());

        let max = PageParams { page: Some(4), per_page: Some(200) };
        assert_eq!(max.resolve(&config()).unwrap(), PageRequest::new(4, 200));
    }
}
