//! Configuration for [`crate::queue::StripedQueue`].

use crate::constants::{
    DEFAULT_INITIAL_RING_SIZE,
    DEFAULT_MAX_RING_CHAIN_LENGTH,
    DEFAULT_START_INDEX,
    DEFAULT_STRIPE_COUNT,
};
use crate::error::{ Result, StrideError };

/// Configuration recognised at queue-construction time.
#[derive(Debug, Clone, Copy)]
pub struct QueueConfig {
    pub(crate) stripe_count: u32,
    pub(crate) initial_ring_size: u32,
    pub(crate) max_ring_chain_length: u8,
    pub(crate) start_index: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            stripe_count: DEFAULT_STRIPE_COUNT,
            initial_ring_size: DEFAULT_INITIAL_RING_SIZE,
            max_ring_chain_length: DEFAULT_MAX_RING_CHAIN_LENGTH,
            start_index: DEFAULT_START_INDEX,
        }
    }
}

impl QueueConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stripe_count(mut self, stripe_count: u32) -> Result<Self> {
        if stripe_count == 0 || !stripe_count.is_power_of_two() {
            return Err(StrideError::config("stripe count must be a non-zero power of 2"));
        }
        self.stripe_count = stripe_count;
        Ok(self)
    }

    pub fn with_initial_ring_size(mut self, size: u32) -> Result<Self> {
        if size < 2 || !size.is_power_of_two() {
            return Err(StrideError::config("initial ring size must be a power of 2, >= 2"));
        }
        self.initial_ring_size = size;
        Ok(self)
    }

    pub fn with_max_ring_chain_length(mut self, length: u8) -> Result<Self> {
        if length == 0 {
            return Err(StrideError::config("max ring chain length must be non-zero"));
        }
        self.max_ring_chain_length = length;
        Ok(self)
    }

    pub fn with_start_index(mut self, start_index: u32) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn stripe_count(&self) -> u32 {
        self.stripe_count
    }

    pub fn initial_ring_size(&self) -> u32 {
        self.initial_ring_size
    }
}
