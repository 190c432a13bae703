use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Order header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub order_id: i32,
    pub customer_id: Option<String>,
    pub employee_id: Option<i32>,
    pub order_date: Option<DateTime<Utc>>,
    pub required_date: Option<DateTime<Utc>>,
    pub shipped_date: Option<DateTime<Utc>>,
    pub ship_via: Option<i32>,
    pub freight: f64,
    pub ship_name: Option<String>,
    pub ship_address: Option<String>,
    pub ship_city: Option<String>,
    pub ship_region: Option<String>,
    pub ship_postal_code: Option<String>,
    pub ship_country: Option<String>,
}

/// Order line item, keyed by (order_id, product_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderDetail {
    pub order_id: i32,
    pub product_id: i32,
    pub unit_price: f64,
    pub quantity: i32,
    pub discount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderWithDetails {
    pub order: Order,
    pub details: Vec<OrderDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderDetailInput {
    #[validate(range(min = 1, message = "product_id must be a positive id"))]
    pub product_id: i32,
    #[validate(range(min = 0.0, message = "unit_price must not be negative"))]
    pub unit_price: f64,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0, message = "discount must be between 0 and 1"))]
    pub discount: f64,
}

/// Header fields plus the full set of line items.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct OrderInput {
    #[validate(length(max = 5, message = "customer_id is at most 5 characters"))]
    pub customer_id: Option<String>,
    pub employee_id: Option<i32>,
    pub order_date: Option<DateTime<Utc>>,
    pub required_date: Option<DateTime<Utc>>,
    pub shipped_date: Option<DateTime<Utc>>,
    pub ship_via: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "freight must not be negative"))]
    pub freight: f64,
    pub ship_name: Option<String>,
    pub ship_address: Option<String>,
    pub ship_city: Option<String>,
    pub ship_region: Option<String>,
    pub ship_postal_code: Option<String>,
    pub ship_country: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "at least one order detail is required"))]
    pub order_details: Vec<OrderDetailInput>,
}
