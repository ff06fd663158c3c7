// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: the guide API, the image host, and guide files.

pub mod api;
pub mod media;
pub mod serialization;
pub mod upload;
