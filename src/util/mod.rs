// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Utility functions and helpers.

pub mod color;
pub mod generation;
pub mod geometry;
