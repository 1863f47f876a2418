// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Kernel configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! kind = "strided_slice"
//! begin_dims = [0, 1, 0, 0]
//! end_dims = [0, 0, 0, 0]
//! stride_dims = [1, 1, 2, 2]
//! ```
//!
//! ```toml
//! kind = "gemm"
//! transpose_a = false
//! transpose_b = true
//! alpha = 1.0
//! beta = 0.0
//! ```

use crate::{KernelError, ShuffleBackend};
use std::path::Path;

/// Per-axis strided slice parameters.
///
/// An empty sequence means "default for every axis": begin 0, end at the
/// source extent, stride 1. An `end_dims` entry of 0 also means "to the
/// source extent".
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StridedSliceConfig {
    #[serde(default)]
    pub begin_dims: Vec<i64>,
    #[serde(default)]
    pub end_dims: Vec<i64>,
    #[serde(default)]
    pub stride_dims: Vec<i64>,
}

impl StridedSliceConfig {
    /// Builds a config from explicit per-axis sequences.
    pub fn new(begin_dims: Vec<i64>, end_dims: Vec<i64>, stride_dims: Vec<i64>) -> Self {
        Self {
            begin_dims,
            end_dims,
            stride_dims,
        }
    }
}

/// Channel shuffle parameters. The geometry comes entirely from the
/// source shapes; only the compute backend can be pinned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShuffleConfig {
    /// Forces a backend instead of selecting one by element type and layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<ShuffleBackend>,
}

/// GEMM parameters: `C ← beta·C + alpha·op(A)·op(B)`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GemmConfig {
    #[serde(default)]
    pub transpose_a: bool,
    #[serde(default)]
    pub transpose_b: bool,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default)]
    pub beta: f64,
}

fn default_alpha() -> f64 {
    1.0
}

impl Default for GemmConfig {
    fn default() -> Self {
        Self {
            transpose_a: false,
            transpose_b: false,
            alpha: default_alpha(),
            beta: 0.0,
        }
    }
}

/// A configuration for any of the kernels, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KernelConfig {
    StridedSlice(StridedSliceConfig),
    Shuffle(ShuffleConfig),
    Gemm(GemmConfig),
}

impl KernelConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, KernelError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KernelError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, KernelError> {
        toml::from_str(toml_str)
            .map_err(|e| KernelError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, KernelError> {
        toml::to_string_pretty(self)
            .map_err(|e| KernelError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// The `kind` tag of this configuration.
    pub fn kind(&self) -> &'static str {
        match self {
            KernelConfig::StridedSlice(_) => "strided_slice",
            KernelConfig::Shuffle(_) => "shuffle",
            KernelConfig::Gemm(_) => "gemm",
        }
    }
}
