/*!
 * Resolver Configuration
 *
 * Chain limits and teardown policy for a resolver and its context.
 */

use serde::{Deserialize, Serialize};

use super::limits::{DEFAULT_MAX_CHAIN_DEPTH, MAX_CHAIN_DEPTH};
use crate::vfs::types::{VfsError, VfsResult};

/// Environment override for [`ResolverConfig::max_chain_depth`]
pub const ENV_MAX_CHAIN_DEPTH: &str = "LAYERED_VFS_MAX_CHAIN_DEPTH";

/// Environment override for [`ResolverConfig::warn_on_leaks`]
pub const ENV_WARN_ON_LEAKS: &str = "LAYERED_VFS_WARN_ON_LEAKS";

/// Configuration for chain resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Deepest chain the resolver opens (default: 32)
    pub max_chain_depth: usize,

    /// Log every chain still held when the context is torn down (default: true)
    pub warn_on_leaks: bool,
}

impl ResolverConfig {
    /// Create default configuration
    pub fn new() -> Self {
        Self {
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
            warn_on_leaks: true,
        }
    }

    /// Shallow chains only, for tests and untrusted input
    pub fn strict() -> Self {
        Self {
            max_chain_depth: 8,
            warn_on_leaks: true,
        }
    }

    /// Deepest chains construction allows, no leak warnings
    pub fn relaxed() -> Self {
        Self {
            max_chain_depth: MAX_CHAIN_DEPTH,
            warn_on_leaks: false,
        }
    }

    /// Default configuration with environment overrides applied
    pub fn from_env() -> VfsResult<Self> {
        let mut config = Self::new();

        if let Ok(value) = std::env::var(ENV_MAX_CHAIN_DEPTH) {
            config.max_chain_depth = value.trim().parse().map_err(|_| {
                VfsError::Config(format!("{ENV_MAX_CHAIN_DEPTH} must be a positive integer, got {value:?}"))
            })?;
        }

        if let Ok(value) = std::env::var(ENV_WARN_ON_LEAKS) {
            config.warn_on_leaks = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(VfsError::Config(format!(
                        "{ENV_WARN_ON_LEAKS} must be a boolean, got {value:?}"
                    )))
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration, filling missing fields with defaults
    pub fn from_json(json: &str) -> VfsResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> VfsResult<()> {
        if self.max_chain_depth == 0 || self.max_chain_depth > MAX_CHAIN_DEPTH {
            return Err(VfsError::Config(format!(
                "max_chain_depth must be within 1..={}, got {}",
                MAX_CHAIN_DEPTH, self.max_chain_depth
            )));
        }
        Ok(())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new()
    }
}
