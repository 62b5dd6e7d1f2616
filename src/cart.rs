//! Centralized cart state.
//!
//! One owner for the boutique cart: screens read a snapshot, mutations are
//! applied optimistically for instant feedback, and the server response (or
//! a re-fetch after a failure) reconciles local state back to server truth.

use std::sync::RwLock;

use anyhow::Result;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::models::{Cart, CartItem, Order, ShippingDetails};

pub struct CartService {
    api: ApiClient,
    state: RwLock<Cart>,
}

impl CartService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RwLock::new(Cart::default()),
        }
    }

    /// Snapshot of the current cart.
    pub fn cart(&self) -> Cart {
        self.state.read().unwrap().clone()
    }

    /// Fetch the server cart and replace local state with it.
    pub async fn sync(&self) -> Result<Cart> {
        let cart = self.api.fetch_cart().await?;
        *self.state.write().unwrap() = cart.clone();
        Ok(cart)
    }

    /// Add a product. The local cart is updated immediately; a pending line
    /// with no price stands in until the server answers with the real item.
    pub async fn add(&self, product_id: i64, quantity: u32) -> Result<Cart> {
        {
            let mut cart = self.state.write().unwrap();
            if let Some(item) = cart
                .items
                .iter_mut()
                .find(|item| item.product_id == product_id)
            {
                item.quantity += quantity;
            } else {
                cart.items.push(CartItem {
                    id: 0,
                    product_id,
                    name: String::new(),
                    unit_price_cents: 0,
                    quantity,
                });
            }
        }
        debug!(product_id, quantity, "Adding to cart");
        self.reconcile(self.api.add_cart_item(product_id, quantity).await)
            .await
    }

    /// Change a line's quantity; zero removes the line.
    pub async fn set_quantity(&self, item_id: i64, quantity: u32) -> Result<Cart> {
        if quantity == 0 {
            return self.remove(item_id).await;
        }
        {
            let mut cart = self.state.write().unwrap();
            if let Some(item) = cart.items.iter_mut().find(|item| item.id == item_id) {
                item.quantity = quantity;
            }
        }
        self.reconcile(self.api.update_cart_item(item_id, quantity).await)
            .await
    }

    pub async fn remove(&self, item_id: i64) -> Result<Cart> {
        {
            let mut cart = self.state.write().unwrap();
            cart.items.retain(|item| item.id != item_id);
        }
        self.reconcile(self.api.remove_cart_item(item_id).await)
            .await
    }

    /// Place the order; the cart is empty afterwards on both sides.
    pub async fn checkout(&self, shipping: &ShippingDetails) -> Result<Order> {
        let order = self.api.checkout(shipping).await?;
        *self.state.write().unwrap() = Cart::default();
        Ok(order)
    }

    /// On success the server's cart becomes local state. On failure local
    /// state is re-fetched so it reflects server truth again; the original
    /// error still reaches the caller.
    async fn reconcile(&self, result: Result<Cart>) -> Result<Cart> {
        match result {
            Ok(cart) => {
                *self.state.write().unwrap() = cart.clone();
                Ok(cart)
            }
            Err(err) => {
                warn!(error = %err, "Cart mutation failed, re-fetching server cart");
                match self.api.fetch_cart().await {
                    Ok(cart) => {
                        *self.state.write().unwrap() = cart;
                    }
                    Err(fetch_err) => {
                        warn!(error = %fetch_err, "Cart re-fetch failed, keeping local state");
                    }
                }
                Err(err)
            }
        }
    }
}
