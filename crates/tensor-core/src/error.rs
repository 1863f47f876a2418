// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor construction.

use crate::DType;

/// Errors that can occur while building tensors or buffer views.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// The provided buffer length does not match the element count of the shape.
    #[error("buffer size mismatch: expected {expected} elements, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// A raw byte buffer cannot be reinterpreted as `count` elements of `dtype`.
    #[error("cannot read {count} {dtype} elements from {actual} bytes")]
    ByteLengthMismatch {
        dtype: DType,
        count: usize,
        actual: usize,
    },
}
