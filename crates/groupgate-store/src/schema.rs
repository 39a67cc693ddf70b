//! Database schema definitions and column families.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary subscription records, keyed by big-endian member ID.
    pub const SUBSCRIPTIONS: &str = "subscriptions";

    /// Index: `subscription_ref` -> member ID bytes.
    pub const SUBSCRIPTIONS_BY_REF: &str = "subscriptions_by_ref";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::SUBSCRIPTIONS, cf::SUBSCRIPTIONS_BY_REF]
}
