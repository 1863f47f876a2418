// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # kernels
//!
//! Shape-aware array transforms and dense matrix multiply for the
//! inference layers:
//!
//! - [`SlicePlan`] — strided slice of a rank 1–4 tensor.
//! - [`ShufflePlan`] — channel-pair shuffle of two tensors, for both
//!   channel-first and channel-last layouts.
//! - [`GemmPlan`] / [`gemm`] — `C ← beta·C + alpha·op(A)·op(B)` for all four
//!   transpose combinations.
//!
//! # Two-Phase Contract
//! Every kernel splits into a validating `resolve` and a non-validating
//! `compute`:
//!
//! ```text
//! (source shapes, format, config) ── resolve ──► Plan   (once per shape change)
//! Plan + source views + destination views ── compute ──► ()   (every forward pass)
//! ```
//!
//! All configuration errors surface from `resolve`, before any buffer is
//! touched. `compute` does not allocate, does not log and cannot fail.
//!
//! # Example
//! ```
//! use kernels::{SlicePlan, StridedSliceConfig};
//! use tensor_core::{Shape, Tensor, TensorFormat};
//!
//! let src = Tensor::from_vec(
//!     Shape::matrix(2, 4),
//!     TensorFormat::ChannelFirst,
//!     vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0],
//! )?;
//! let config = StridedSliceConfig::new(vec![0, 1], vec![0, 0], vec![1, 2]);
//! let plan = SlicePlan::resolve(src.shape(), src.format(), &config)?;
//!
//! let mut dst = Tensor::<f32>::zeros(plan.dst_shape().clone(), plan.format());
//! plan.compute(&src.view(), &mut dst.view_mut());
//! assert_eq!(dst.as_slice(), &[1.0, 3.0, 5.0, 7.0]);
//! # Ok::<(), kernels::KernelError>(())
//! ```

mod config;
mod error;
mod gemm;
mod shuffle;
mod simd;
mod slice;

pub use config::{GemmConfig, KernelConfig, ShuffleConfig, StridedSliceConfig};
pub use error::KernelError;
pub use gemm::{gemm, GemmPlan, GemmVariant, Transpose};
pub use shuffle::{ShuffleBackend, ShufflePlan};
pub use slice::{SlicePlan, MAX_SLICE_RANK};
