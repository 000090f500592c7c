//! Data models
//!
//! Shared between the checkout core and host frontends. Row types map
//! 1:1 to remote-store tables; all row IDs are server-assigned strings
//! (`id: Option<String>`, `None` before the first remote write).

pub mod cash_register;
pub mod customer;
pub mod discount;
pub mod product;
pub mod sale;

// Re-exports
pub use cash_register::*;
pub use customer::*;
pub use discount::*;
pub use product::*;
pub use sale::*;
