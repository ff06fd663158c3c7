// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the guide viewer.

pub mod canvas;
pub mod header;
pub mod images;
pub mod step;
pub mod toolbar;
