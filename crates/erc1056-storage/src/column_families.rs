//! RocksDB column family definitions.

/// Controllers: identity → Address (absent means self-controlled)
pub const CF_OWNERS: &str = "owners";

/// Delegate grants: (identity, delegate_type, delegate) → valid_to
pub const CF_DELEGATES: &str = "delegates";

/// Change pointers: identity → ChangePointer
pub const CF_CHANGED: &str = "changed";

/// Emitted registry events: (identity, position) → LoggedEvent
pub const CF_EVENT_LOG: &str = "event_log";

/// Latest attribute state: (identity, name, keccak256(value)) → AttributeRecord
pub const CF_ATTRIBUTE_INDEX: &str = "attribute_index";

/// Host ledger metadata: key name → value
pub const CF_LEDGER: &str = "ledger";

/// Get all column family names
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        CF_OWNERS,
        CF_DELEGATES,
        CF_CHANGED,
        CF_EVENT_LOG,
        CF_ATTRIBUTE_INDEX,
        CF_LEDGER,
    ]
}
