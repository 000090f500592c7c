//! Shared types for the checkout core
//!
//! Domain models, the cart, the pending-sale queue entry, error types
//! and small utilities used by both the core library and host frontends.

pub mod cart;
pub mod error;
pub mod models;
pub mod pending;
pub mod util;

// Re-exports
pub use cart::{Cart, CartLine, CartProduct};
pub use error::{CheckoutError, CheckoutResult};
pub use pending::PendingSale;
pub use serde::{Deserialize, Serialize};
