//! Boutique types: products, the cart, and orders.
//!
//! Prices are integer cents throughout; formatting to a display string
//! happens only at the edge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Render integer cents as "12.50".
pub fn format_price(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock.map(|s| s > 0).unwrap_or(true)
    }

    pub fn display_price(&self) -> String {
        format_price(self.price_cents)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub id: i64,
    pub product_id: i64,
    #[serde(default)]
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_cents(&self) -> i64 {
        self.items.iter().map(CartItem::line_total_cents).sum()
    }

    /// Quantity of a product across the cart, 0 when absent.
    pub fn quantity_of(&self, product_id: i64) -> u32 {
        self.items
            .iter()
            .filter(|item| item.product_id == product_id)
            .map(|item| item.quantity)
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "Pending"),
            OrderStatus::Paid => write!(f, "Paid"),
            OrderStatus::Shipped => write!(f, "Shipped"),
            OrderStatus::Delivered => write!(f, "Delivered"),
            OrderStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// Shipping details posted at checkout.
#[derive(Debug, Clone, Serialize)]
pub struct ShippingDetails {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, product_id: i64, price: i64, quantity: u32) -> CartItem {
        CartItem {
            id,
            product_id,
            name: format!("product-{}", product_id),
            unit_price_cents: price,
            quantity,
        }
    }

    #[test]
    fn cart_totals() {
        let cart = Cart {
            items: vec![item(1, 10, 1250, 2), item(2, 11, 499, 1)],
        };
        assert_eq!(cart.total_cents(), 2999);
        assert_eq!(cart.quantity_of(10), 2);
        assert_eq!(cart.quantity_of(99), 0);
        assert!(!cart.is_empty());
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(2999), "29.99");
        assert_eq!(format_price(500), "5.00");
        assert_eq!(format_price(5), "0.05");
    }

    #[test]
    fn parses_order() {
        let json = r#"{
            "id": 51,
            "status": "paid",
            "items": [
                {"id": 1, "product_id": 10, "name": "Rope toy", "unit_price_cents": 1250, "quantity": 2}
            ],
            "total_cents": 2500,
            "created_at": "2026-08-10T14:00:00Z"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].line_total_cents(), 2500);
    }

    #[test]
    fn product_stock_defaults_to_available() {
        let product: Product = serde_json::from_str(
            r#"{"id": 10, "name": "Rope toy", "price_cents": 1250}"#,
        )
        .unwrap();
        assert!(product.in_stock());
        assert_eq!(product.display_price(), "12.50");
    }
}
