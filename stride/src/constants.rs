//! Stride performance constants.

/// Default number of micro-queues (stripes). Must be a power of two.
pub const DEFAULT_STRIPE_COUNT: u32 = 4;

/// Default number of cells in a stripe's initial ring. Must be a power of two.
pub const DEFAULT_INITIAL_RING_SIZE: u32 = 16;

/// Bounds the 32-bit sequence space across all geometrically-doubling rings
/// in a micro-queue's chain. log2((u32::MAX + 1) / stripe_count) - log2(initial_ring_size),
/// rounded up generously so legitimate configurations never exhaust it.
pub const DEFAULT_MAX_RING_CHAIN_LENGTH: u8 = 25;

/// Starting value of the global sequence counters. Exercising wrap-around
/// means setting this near `u32::MAX`.
pub const DEFAULT_START_INDEX: u32 = 0;
