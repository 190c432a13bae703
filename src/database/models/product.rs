use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: i32,
    pub product_name: String,
    pub supplier_id: Option<i32>,
    pub category_id: Option<i32>,
    pub quantity_per_unit: Option<String>,
    pub unit_price: f64,
    pub units_in_stock: i32,
    pub units_on_order: i32,
    pub reorder_level: i32,
    pub discontinued: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 40, message = "product_name is required"))]
    pub product_name: String,
    pub supplier_id: Option<i32>,
    pub category_id: Option<i32>,
    pub quantity_per_unit: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "unit_price must not be negative"))]
    pub unit_price: f64,
    #[serde(default)]
    #[validate(range(min = 0, message = "units_in_stock must not be negative"))]
    pub units_in_stock: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "units_on_order must not be negative"))]
    pub units_on_order: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "reorder_level must not be negative"))]
    pub reorder_level: i32,
    #[serde(default)]
    pub discontinued: bool,
}
