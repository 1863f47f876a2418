// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for kernel planning.

/// Errors raised while resolving a kernel plan.
///
/// Every geometric or parameter problem is reported here, before any
/// buffer is touched. Compute never fails.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// Source ranks or extents do not fit the operation's geometry.
    #[error("shape mismatch in {op}: {detail}")]
    ShapeMismatch { op: &'static str, detail: String },

    /// A configuration parameter is outside its legal domain.
    #[error("invalid configuration for {op}: {detail}")]
    InvalidConfiguration { op: &'static str, detail: String },

    /// The source rank is outside the range the kernel supports.
    #[error("{op} supports rank 1..={max}, got rank {rank}")]
    UnsupportedRank {
        op: &'static str,
        rank: usize,
        max: usize,
    },

    /// Loading or serialising a configuration file failed.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Building a tensor or view failed.
    #[error("tensor error: {0}")]
    Tensor(#[from] tensor_core::TensorError),
}

impl KernelError {
    pub(crate) fn shape(op: &'static str, detail: impl Into<String>) -> Self {
        KernelError::ShapeMismatch {
            op,
            detail: detail.into(),
        }
    }

    pub(crate) fn invalid(op: &'static str, detail: impl Into<String>) -> Self {
        KernelError::InvalidConfiguration {
            op,
            detail: detail.into(),
        }
    }
}
