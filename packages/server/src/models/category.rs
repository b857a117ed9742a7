use serde::{Deserialize, Serialize};

use crate::entity::category;
use crate::error::AppError;

/// Request body for creating a category.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCategoryRequest {
    /// Unique category name.
    #[schema(example = "tech")]
    pub name: String,
}

pub fn validate_category_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 64 {
        return Err(AppError::Validation(
            "Category name must be 1-64 characters".into(),
        ));
    }
    Ok(name)
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "tech")]
    pub name: String,
}

impl From<category::Model> for CategoryResponse {
    fn from(c: category::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}
