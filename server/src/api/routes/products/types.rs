//! Product API request/response types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::types::{default_limit, default_page};
use crate::data::types::ProductRow;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub vintage: Option<i64>,
    pub region: Option<String>,
    pub grape_variety: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<ProductRow> for ProductDto {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            vintage: row.vintage,
            region: row.region,
            grape_variety: row.grape_variety,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub vintage: Option<i64>,
    #[validate(length(max = 100, message = "Region must be at most 100 characters"))]
    pub region: Option<String>,
    #[validate(length(max = 100, message = "Grape variety must be at most 100 characters"))]
    pub grape_variety: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub vintage: Option<i64>,
    #[validate(length(max = 100, message = "Region must be at most 100 characters"))]
    pub region: Option<String>,
    #[validate(length(max = 100, message = "Grape variety must be at most 100 characters"))]
    pub grape_variety: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListProductsQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 100, message = "Page must be between 1 and 100"))]
    pub page: u32,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 500, message = "Limit must be between 1 and 500"))]
    pub limit: u32,
    /// Substring filter on name
    pub name: Option<String>,
    /// Substring filter on region
    pub region: Option<String>,
    /// Exact vintage year
    pub vintage: Option<i64>,
}
