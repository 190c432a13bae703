//! HTTP handlers. Auth endpoints live in [`auth`]; every resource table goes
//! through the generic handlers in [`crud`].

use serde::Deserialize;

use crate::database::Page;
use crate::error::AppError;
use crate::result::ErrorDetail;

pub mod auth;
pub mod category;
pub mod crud;
pub mod employee;
pub mod order;
pub mod product;

pub const MAX_PAGE_LIMIT: i64 = 100;

/// Raw `page`/`limit` query values. Kept as strings so a bad number yields a
/// field error in the envelope instead of a bare rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn to_page(&self) -> Result<Page, AppError> {
        let defaults = Page::default();
        let mut errors = Vec::new();

        let page = match self.page.as_deref().map(str::trim) {
            None | Some("") => defaults.page,
            Some(raw) => match raw.parse::<i64>() {
                Ok(p) if p >= 1 => p,
                _ => {
                    errors.push(ErrorDetail::field("page", "page must be a positive integer"));
                    defaults.page
                }
            },
        };

        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => defaults.limit,
            Some(raw) => match raw.parse::<i64>() {
                Ok(l) if (1..=MAX_PAGE_LIMIT).contains(&l) => l,
                _ => {
                    errors.push(ErrorDetail::field(
                        "limit",
                        format!("limit must be an integer between 1 and {}", MAX_PAGE_LIMIT),
                    ));
                    defaults.limit
                }
            },
        };

        if errors.is_empty() && (page - 1).checked_mul(limit).is_none() {
            errors.push(ErrorDetail::field("page", "page is too large"));
        }

        if !errors.is_empty() {
            return Err(AppError::InvalidInput {
                message: "Invalid pagination parameters".into(),
                errors,
            });
        }
        Ok(Page { page, limit })
    }
}

/// Path ids are positive 32-bit integers.
pub fn parse_id(raw: &str) -> Result<i32, AppError> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::InvalidInput {
            message: "Invalid id".into(),
            errors: vec![ErrorDetail::field("id", "id must be a positive integer")],
        }),
    }
}
