//! Data models for marketplace entities.
//!
//! This module contains the data structures used to represent
//! backend data including:
//!
//! - `Animal`, `AnimalQuery`: the adoption catalog and its filters
//! - `AdoptionRequest`, `FosterRequest`: adoption and temporary-foster flows
//! - Boutique types: `Product`, `Cart`, `CartItem`, `Order`
//! - `UserProfile`: the logged-in account
//! - Content types: `BlogPost`, `FaqEntry`, `Event`

pub mod adoption;
pub mod animal;
pub mod content;
pub mod shop;
pub mod user;

pub use adoption::{
    AdoptionRequest, FosterRequest, NewAdoptionRequest, NewFosterRequest, RequestStatus,
};
pub use animal::{Animal, AnimalQuery, AnimalStatus};
pub use content::{BlogPost, Event, FaqEntry};
pub use shop::{format_price, Cart, CartItem, Order, OrderStatus, Product, ShippingDetails};
pub use user::{ProfileUpdate, UserProfile};
