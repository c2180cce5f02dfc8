//! Per-user model preference store
//!
//! The authoritative record of which model requests from a given user should
//! use. The store is process-wide, in-memory state: preferences live for the
//! lifetime of the server and are never persisted. The map is guarded by a
//! mutex so it can be shared across concurrent request handlers without lost
//! updates.

use crate::error::{ChatRelayError, Result};
use crate::models::ModelId;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory mapping from user identifier to selected model
///
/// Each user has at most one preference at a time; `set` unconditionally
/// overwrites (last write wins). `get` for a user that has never called `set`
/// fails with [`ChatRelayError::PreferenceNotFound`] rather than substituting
/// a default, so the HTTP layer can surface a client-visible error.
///
/// # Examples
///
/// ```
/// use chatrelay::models::ModelId;
/// use chatrelay::preferences::ModelPreferenceStore;
///
/// let store = ModelPreferenceStore::new();
/// store.set("user-1", ModelId::Gpt4o).unwrap();
/// assert_eq!(store.get("user-1").unwrap(), ModelId::Gpt4o);
/// ```
#[derive(Debug, Default)]
pub struct ModelPreferenceStore {
    preferences: Mutex<HashMap<String, ModelId>>,
}

impl ModelPreferenceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the selected model for a user
    ///
    /// # Errors
    ///
    /// Returns [`ChatRelayError::PreferenceNotFound`] when no preference has
    /// ever been set for `uid`.
    pub fn get(&self, uid: &str) -> Result<ModelId> {
        let preferences = self
            .preferences
            .lock()
            .map_err(|_| ChatRelayError::Store("preference map lock poisoned".to_string()))?;

        preferences
            .get(uid)
            .copied()
            .ok_or_else(|| ChatRelayError::PreferenceNotFound(uid.to_string()).into())
    }

    /// Record the selected model for a user, overwriting any prior value
    pub fn set(&self, uid: impl Into<String>, model: ModelId) -> Result<()> {
        let uid = uid.into();
        let mut preferences = self
            .preferences
            .lock()
            .map_err(|_| ChatRelayError::Store("preference map lock poisoned".to_string()))?;

        tracing::info!("Model selection for user {} changed to: {}", uid, model);
        preferences.insert(uid, model);
        Ok(())
    }
}
