//! Order and cart request DTOs.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::ordering::{NewOrder, OrderError, OrderStatus, PaymentMethod, RequestedLine};
use crate::domain::shared::{Money, ProductId, UserId};

/// One basket entry in a place-order request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RequestedLineDto {
    /// Product reference.
    pub product_id: i64,
    /// Requested units.
    pub quantity: i32,
}

/// Body of `POST /api/v1/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderDto {
    /// Delivery address.
    pub shipping_address: String,
    /// Payment method chosen at checkout.
    pub payment_method: PaymentMethod,
    /// Basket entries.
    pub products: Vec<RequestedLineDto>,
    /// Optional voucher amount; defaults to zero.
    #[serde(default)]
    pub voucher_discount: Option<Decimal>,
    /// Optional shipping fee; the configured business default applies when
    /// omitted.
    #[serde(default)]
    pub shipping_fee: Option<Decimal>,
}

impl PlaceOrderDto {
    /// Convert into a domain command for `user_id`, applying defaults.
    ///
    /// Shape validation beyond what typing already guarantees lives in the
    /// draft builder; this only fills defaults and maps identifiers.
    #[must_use]
    pub fn into_command(self, user_id: UserId, default_shipping_fee: Money) -> NewOrder {
        NewOrder {
            user_id,
            shipping_address: self.shipping_address,
            payment_method: self.payment_method,
            lines: self
                .products
                .into_iter()
                .map(|p| RequestedLine {
                    product_id: ProductId::new(p.product_id),
                    quantity: p.quantity,
                })
                .collect(),
            voucher_discount: self.voucher_discount.map_or(Money::ZERO, Money::new),
            shipping_fee: self.shipping_fee.map_or(default_shipping_fee, Money::new),
        }
    }
}

/// Body of `PUT /api/v1/orders/{order_id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusDto {
    /// Requested status.
    pub status: OrderStatus,
}

/// Body of `POST /api/v1/cart`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AddCartItemDto {
    /// Product to add.
    pub product_id: i64,
    /// Units to add; must be positive.
    pub quantity: i32,
}

impl AddCartItemDto {
    /// Validate the quantity.
    ///
    /// # Errors
    ///
    /// [`OrderError::Validation`] when `quantity` is not positive.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.quantity <= 0 {
            return Err(OrderError::Validation(
                "quantity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn into_command_applies_shipping_default() {
        let dto = PlaceOrderDto {
            shipping_address: "12 Elm Street".to_string(),
            payment_method: PaymentMethod::Cod,
            products: vec![RequestedLineDto {
                product_id: 1,
                quantity: 2,
            }],
            voucher_discount: None,
            shipping_fee: None,
        };

        let cmd = dto.into_command(UserId::new(5), Money::new(dec!(30000)));

        assert_eq!(cmd.shipping_fee.amount(), dec!(30000));
        assert!(cmd.voucher_discount.is_zero());
        assert_eq!(cmd.lines[0].product_id, ProductId::new(1));
    }

    #[test]
    fn into_command_keeps_explicit_fee_and_voucher() {
        let dto = PlaceOrderDto {
            shipping_address: "12 Elm Street".to_string(),
            payment_method: PaymentMethod::Online,
            products: vec![],
            voucher_discount: Some(dec!(500)),
            shipping_fee: Some(dec!(0)),
        };

        let cmd = dto.into_command(UserId::new(5), Money::new(dec!(30000)));

        assert!(cmd.shipping_fee.is_zero());
        assert_eq!(cmd.voucher_discount.amount(), dec!(500));
    }

    #[test]
    fn place_order_body_deserializes() {
        let body = serde_json::json!({
            "shipping_address": "12 Elm Street",
            "payment_method": "online",
            "products": [{"product_id": 3, "quantity": 1}],
            "shipping_fee": 25000
        });
        let dto: PlaceOrderDto = serde_json::from_value(body).unwrap();
        assert_eq!(dto.payment_method, PaymentMethod::Online);
        assert_eq!(dto.shipping_fee, Some(dec!(25000)));
        assert!(dto.voucher_discount.is_none());
    }

    #[test]
    fn add_cart_item_rejects_non_positive_quantity() {
        let dto = AddCartItemDto {
            product_id: 1,
            quantity: 0,
        };
        assert!(dto.validate().is_err());

        let dto = AddCartItemDto {
            product_id: 1,
            quantity: 2,
        };
        assert!(dto.validate().is_ok());
    }
}
