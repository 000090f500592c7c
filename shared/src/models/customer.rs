//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity (loyalty member)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<String>,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Loyalty points balance; sales earn floor(total / 10)
    pub loyalty_points: i64,
    /// Lifetime purchase total
    pub total_spent: f64,
    pub is_active: bool,
}
