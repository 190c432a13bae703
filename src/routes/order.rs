use validator::Validate;

use super::crud::Resource;
use crate::AppState;
use crate::database::DynRepository;
use crate::database::models::{Order, OrderInput, OrderWithDetails};
use crate::error::{AppError, validation_details};
use crate::result::ErrorDetail;

pub struct Orders;

impl Resource for Orders {
    type Entity = Order;
    type Detail = OrderWithDetails;
    type Input = OrderInput;

    const NAME: &'static str = "Order";
    const PATH: &'static str = "/orders";

    fn repository(state: &AppState) -> DynRepository<Order, OrderWithDetails, OrderInput> {
        state.orders.clone()
    }

    /// Header rules plus every line item, reported as `order_details[i].field`.
    fn check(input: &OrderInput) -> Result<(), AppError> {
        let mut errors = match input.validate() {
            Ok(()) => Vec::new(),
            Err(e) => validation_details(&e),
        };

        for (i, item) in input.order_details.iter().enumerate() {
            if let Err(e) = item.validate() {
                errors.extend(validation_details(&e).into_iter().map(|d| ErrorDetail {
                    field: d.field.map(|f| format!("order_details[{}].{}", i, f)),
                    message: d.message,
                }));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidInput {
                message: "Validation failed".into(),
                errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::OrderDetailInput;

    fn line(product_id: i32, quantity: i32) -> OrderDetailInput {
        OrderDetailInput {
            product_id,
            unit_price: 10.0,
            quantity,
            discount: 0.0,
        }
    }

    #[test]
    fn order_without_line_items_is_rejected() {
        let err = Orders::check(&OrderInput::default()).unwrap_err();
        match err {
            AppError::InvalidInput { errors, .. } => {
                assert_eq!(errors[0].field.as_deref(), Some("order_details"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bad_line_items_are_reported_by_index() {
        let input = OrderInput {
            order_details: vec![line(1, 2), line(2, 0)],
            ..Default::default()
        };
        match Orders::check(&input).unwrap_err() {
            AppError::InvalidInput { errors, .. } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(
                    errors[0].field.as_deref(),
                    Some("order_details[1].quantity")
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn valid_order_passes() {
        let input = OrderInput {
            order_details: vec![line(1, 2)],
            ..Default::default()
        };
        assert!(Orders::check(&input).is_ok());
    }
}
