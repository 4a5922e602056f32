// Adapters layer: concrete implementations for external systems (local disk, http).

pub mod http;
pub mod storage;
