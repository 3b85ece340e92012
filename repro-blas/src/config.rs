//! Tuning knobs for the fused kernels

use crate::quire::DEFAULT_CAPACITY;

/// Configuration for fused Level-2/Level-3 computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlasConfig {
    /// Edge length of the square output tiles used by blocked products
    pub block_size: usize,
    /// Carry bits reserved above the quire's product range
    pub capacity: u32,
    /// Report non-zero rounding residuals per output element
    pub trace: bool,
}

impl BlasConfig {
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            ..Self::default()
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

impl Default for BlasConfig {
    fn default() -> Self {
        Self {
            block_size: 64,
            capacity: DEFAULT_CAPACITY,
            trace: false,
        }
    }
}
