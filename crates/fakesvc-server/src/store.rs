//! In-memory entity store standing in for the database.
//!
//! Each entity list sits behind its own async mutex. Id assignment and append
//! happen under one guard, so ids stay `len + 1` and gap-free under parallel
//! writers.

use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::{Mutex, MutexGuard};

use fakesvc_core::model::{NewOrder, NewUser, Order, User};

/// Current time as UNIX epoch seconds.
pub fn now_epoch_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

#[derive(Default)]
pub struct EntityStore {
    users: Mutex<Vec<User>>,
    orders: Mutex<Vec<Order>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold the users list. Callers that must pair a read or write with a
    /// cache update keep this guard across both.
    pub async fn users(&self) -> MutexGuard<'_, Vec<User>> {
        self.users.lock().await
    }

    pub async fn orders(&self) -> MutexGuard<'_, Vec<Order>> {
        self.orders.lock().await
    }

    pub fn insert_user(users: &mut Vec<User>, new: NewUser) -> User {
        let id = users.len() as u64 + 1;
        let user = User::from_new(id, new, now_epoch_secs());
        users.push(user.clone());
        user
    }

    pub async fn insert_order(&self, new: NewOrder) -> Order {
        let mut orders = self.orders.lock().await;
        let id = orders.len() as u64 + 1;
        let order = Order::completed(id, new, now_epoch_secs());
        orders.push(order.clone());
        order
    }

    pub async fn find_user(&self, id: u64) -> Option<User> {
        self.users.lock().await.iter().find(|u| u.id == id).cloned()
    }

    pub async fn find_order(&self, id: u64) -> Option<Order> {
        self.orders.lock().await.iter().find(|o| o.id == id).cloned()
    }

    pub async fn user_count(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn order_count(&self) -> usize {
        self.orders.lock().await.len()
    }
}
