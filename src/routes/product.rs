use axum::extract::{Query, State, rejection::QueryRejection};
use serde::Deserialize;

use super::PageQuery;
use super::crud::Resource;
use crate::AppState;
use crate::database::DynRepository;
use crate::database::models::{Product, ProductInput};
use crate::error::AppError;
use crate::result::{ApiResult, ErrorDetail, Meta, list_response};

pub struct Products;

impl Resource for Products {
    type Entity = Product;
    type Detail = Product;
    type Input = ProductInput;

    const NAME: &'static str = "Product";
    const PATH: &'static str = "/products";

    fn repository(state: &AppState) -> DynRepository<Product, Product, ProductInput> {
        state.products.clone()
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
    #[serde(flatten)]
    pub page: PageQuery,
}

#[axum::debug_handler]
pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<ApiResult<Vec<Product>>, AppError> {
    let Query(query) = query?;

    let name = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::InvalidInput {
            message: "Search name is required".into(),
            errors: vec![ErrorDetail::field("name", "name must not be empty")],
        })?;
    let page = query.page.to_page()?;

    let (items, total) = state.product_search.search_by_name(name, page).await?;
    Ok(list_response(
        "Products retrieved",
        items,
        Meta {
            page: page.page,
            limit: page.limit,
            total,
        },
    ))
}
