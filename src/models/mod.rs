// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data models for guides and their markup.

pub mod edit;
pub mod guide;
pub mod history;
pub mod markers;
