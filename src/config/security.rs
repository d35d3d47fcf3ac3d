//! Security-related settings.

use serde::{Deserialize, Serialize};

use super::defaults::default_cors_origins;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SecurityConfig {
    /// Allowed CORS origins: `"*"` for permissive, otherwise a
    /// comma-separated list of origins.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cors_origins: default_cors_origins(),
        }
    }
}
