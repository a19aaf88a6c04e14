/*!
 * System Limits and Constants
 *
 * Centralized location for chain, lookup and decoding limits.
 * Organized by domain for maintainability and discoverability.
 */

// =============================================================================
// PATH SPECIFICATION LIMITS
// =============================================================================

/// Hard upper bound on chain depth (root counts as 1)
/// Construction of a deeper chain fails regardless of resolver configuration
pub const MAX_CHAIN_DEPTH: usize = 64;

/// Default chain depth accepted by the resolver
pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 32;

/// Maximum length of a location attribute in bytes
pub const MAX_LOCATION_LENGTH: usize = 4096;

/// Seeds for the structural hash of path specifications
/// Fixed so identical chains hash identically for the whole process
pub const STRUCTURAL_HASH_SEEDS: [u64; 4] = [
    0x6c61_7965_7265_6476,
    0x6673_2d70_6174_6873,
    0x7065_632d_6861_7368,
    0x2d73_6565_642d_3031,
];

/// Structural hash contribution of the (absent) parent of a root node
pub const ROOT_PARENT_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

// =============================================================================
// STORE VOLUME LAYOUT
// =============================================================================

/// Location of the store volume root entry
pub const STORE_ROOT_LOCATION: &str = "/";

/// Prefix of store entry locations, followed by the 1-based store number
pub const STORE_LOCATION_PREFIX: &str = "/vss";

/// Prefix of store entry names
pub const STORE_NAME_PREFIX: &str = "vss";

/// Upper bound on stores accepted from a volume header
/// [SECURITY] Prevents a corrupt header from forcing huge allocations
pub const MAX_STORES_PER_VOLUME: u32 = 4096;

// =============================================================================
// STREAM DECODING
// =============================================================================

/// Chunk size used when reading a whole parent stream (64KB)
pub const STREAM_READ_CHUNK: usize = 64 * 1024;

/// Largest parent stream an encoded stream layer will decode (256MB)
/// [SECURITY] Encoded streams are decoded in memory
pub const MAX_ENCODED_STREAM_SIZE: u64 = 256 * 1024 * 1024;
