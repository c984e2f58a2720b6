use crate::database::key_value::KeyValueStore;
use crate::error::app_error::AppError;
use tracing::info;

pub const SESSION_IDENTITY_KEY: &str = "current_user";
pub const SELF_LABEL: &str = "Me";

/// The current user's identity string, mirrored to durable storage.
pub struct SessionIdentity {
    store: Box<dyn KeyValueStore>,
    current: String,
}

impl SessionIdentity {
    /// Reads the stored identity once; a missing key means the empty identity.
    pub fn load(store: Box<dyn KeyValueStore>) -> Result<Self, AppError> {
        let current = store.get(SESSION_IDENTITY_KEY)?.unwrap_or_default();
        Ok(SessionIdentity { store, current })
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Returns whether the identity changed. The store is written before the in-memory
    /// value so a failed write leaves both sides agreeing.
    pub fn set(&mut self, identity: &str) -> Result<bool, AppError> {
        if identity == self.current {
            return Ok(false);
        }

        self.store.set(SESSION_IDENTITY_KEY, identity)?;
        info!(previous = %self.current, current = %identity, "session identity changed");
        self.current = identity.to_string();
        Ok(true)
    }

    /// How a record's author is shown: "Me" for the current identity, otherwise verbatim.
    pub fn display_name<'a>(&self, created_by: &'a str) -> &'a str {
        if created_by == self.current { SELF_LABEL } else { created_by }
    }
}

impl std::fmt::Debug for SessionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIdentity").field("current", &self.current).finish_non_exhaustive()
    }
}
