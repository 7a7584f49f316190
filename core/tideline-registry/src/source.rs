use serde::{Deserialize, Serialize};

/// A custom response for the existence-probe endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResponse {
    /// HTTP status code to answer with.
    pub status: u16,
    /// JSON payload to answer with.
    pub body: serde_json::Value,
}

/// The capability an entity class registers with the resolver.
///
/// One implementation per entity class, registered once at startup. The
/// generic engine handles everything through `get` and `list`; only implement
/// `probe` when the class needs to substitute its own existence-probe
/// response for the default one.
pub trait EntitySource: Send + Sync {
    /// Looks up an entity's payload by object id. `None` when the object
    /// does not exist (including when it was deleted after being referenced).
    fn get(&self, object_id: &str) -> Option<serde_json::Value>;

    /// Enumerates all `(object_id, payload)` pairs of the class.
    fn list(&self) -> Vec<(String, serde_json::Value)>;

    /// Optional override of the existence-probe endpoint for this class.
    /// Default `None` keeps the generic behavior (200 when the object
    /// exists, 404 otherwise).
    fn probe(&self, object_id: &str) -> Option<ProbeResponse> {
        let _ = object_id;
        None
    }
}
