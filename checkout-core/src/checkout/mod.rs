//! Checkout orchestration

pub mod orchestrator;

pub use orchestrator::{CheckoutOrchestrator, SaleRequest};
