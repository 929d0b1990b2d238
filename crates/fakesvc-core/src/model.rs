//! Entity models served by the fake backend.
//!
//! Entities are immutable once created. Ids are assigned by the store, never
//! by the client, so the creation payloads (`NewUser`, `NewOrder`) carry no id.

use serde::{Deserialize, Serialize};

/// Fixed status assigned to every order that clears the payment gateway.
pub const ORDER_STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    /// UNIX epoch seconds.
    pub created_at: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    /// Not checked against existing users.
    pub user_id: u64,
    pub product: String,
    pub amount: f64,
    pub status: String,
    /// UNIX epoch seconds.
    pub created_at: f64,
}

/// Creation payload for `POST /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Creation payload for `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub user_id: u64,
    pub product: String,
    pub amount: f64,
}

impl User {
    pub fn from_new(id: u64, new: NewUser, created_at: f64) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            created_at,
        }
    }
}

impl Order {
    /// Build a completed order. Only orders whose payment succeeded are ever built.
    pub fn completed(id: u64, new: NewOrder, created_at: f64) -> Self {
        Self {
            id,
            user_id: new.user_id,
            product: new.product,
            amount: new.amount,
            status: ORDER_STATUS_COMPLETED.to_string(),
            created_at,
        }
    }
}
