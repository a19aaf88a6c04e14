/*!
 * Core Module
 * Resolver configuration and crate-wide limits
 */

pub mod config;
pub mod limits;

// Re-export for convenience
pub use config::ResolverConfig;
