// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Generation counter for discarding superseded background results.

/// Result of a background task, tagged with the generation it was started in.
#[derive(Debug)]
pub struct Tagged<T> {
    pub generation: u64,
    pub value: T,
}

/// Monotonic counter; only results from the latest generation are current.
#[derive(Debug, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    /// Start a new generation, superseding every earlier one.
    pub fn begin(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.current
    }
}
