// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Shape, layout and buffer types shared by the inference kernels.
//!
//! This crate provides:
//! - [`Shape`] — per-axis extents and row-major strides.
//! - [`TensorFormat`] — channel-first (NCHW) or channel-last (NHWC) layout.
//! - [`DType`] / [`Element`] — the runtime tag and the Rust scalar types
//!   (f32, f64, i32, i8, u8) a tensor can hold.
//! - [`Tensor`] — an owned, contiguous tensor for callers and tests.
//! - [`TensorView`] / [`TensorViewMut`] — borrowed views over caller-owned
//!   buffers; this is what kernels read and write.
//!
//! # Design Goals
//! - Zero-copy views; kernels never allocate or free tensor storage.
//! - Source/destination aliasing is ruled out by the borrow checker.
//! - Clean error types via `thiserror`.

mod dtype;
mod error;
mod format;
mod shape;
mod tensor;

pub use dtype::{DType, Element};
pub use error::TensorError;
pub use format::TensorFormat;
pub use shape::Shape;
pub use tensor::{Tensor, TensorView, TensorViewMut};
