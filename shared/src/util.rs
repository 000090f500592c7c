/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a client-side sale ID for the offline queue.
///
/// Prefixed with `local-` so it can never be confused with a
/// server-assigned row ID. UUIDv4 makes collisions across terminals
/// a non-issue, and a local ID is never reused once enqueued.
pub fn local_sale_id() -> String {
    format!("local-{}", uuid::Uuid::new_v4())
}

/// Whether an ID was generated client-side by [`local_sale_id`]
pub fn is_local_id(id: &str) -> bool {
    id.starts_with("local-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ids_are_unique_and_tagged() {
        let a = local_sale_id();
        let b = local_sale_id();
        assert_ne!(a, b);
        assert!(is_local_id(&a));
        assert!(!is_local_id("9f2c1b4e"));
    }
}
