// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Strided slice: re-sample a rank 1–4 tensor at `begin + k * stride`
//! along every axis.

use crate::{KernelError, StridedSliceConfig};
use tensor_core::{Element, Shape, TensorFormat, TensorView, TensorViewMut};

/// Highest source rank the slice kernel accepts.
pub const MAX_SLICE_RANK: usize = 4;

const OP: &str = "strided_slice";

/// The resolved geometry of one strided slice.
///
/// Built once per source shape by [`SlicePlan::resolve`]; [`SlicePlan::compute`]
/// can then run any number of times on buffers of exactly that shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicePlan {
    format: TensorFormat,
    src_shape: Shape,
    dst_shape: Shape,
    begin: Vec<usize>,
    stride: Vec<usize>,
    src_strides: Vec<usize>,
    dst_strides: Vec<usize>,
}

impl SlicePlan {
    /// Validates `config` against `src` and computes the destination shape.
    ///
    /// # Errors
    /// - [`KernelError::UnsupportedRank`] if `src` is not rank 1..=4.
    /// - [`KernelError::ShapeMismatch`] if a non-empty begin/end/stride
    ///   sequence does not have one entry per source axis.
    /// - [`KernelError::InvalidConfiguration`] for a stride `<= 0`, a
    ///   negative begin/end, or an end past the source extent.
    pub fn resolve(
        src: &Shape,
        format: TensorFormat,
        config: &StridedSliceConfig,
    ) -> Result<Self, KernelError> {
        let rank = src.rank();
        if rank == 0 || rank > MAX_SLICE_RANK {
            return Err(KernelError::UnsupportedRank {
                op: OP,
                rank,
                max: MAX_SLICE_RANK,
            });
        }

        let begins = per_axis(&config.begin_dims, rank, "begin_dims")?;
        let ends = per_axis(&config.end_dims, rank, "end_dims")?;
        let strides = per_axis(&config.stride_dims, rank, "stride_dims")?;

        let mut begin = Vec::with_capacity(rank);
        let mut stride = Vec::with_capacity(rank);
        let mut dst_dims = Vec::with_capacity(rank);

        for (axis, &extent) in src.dims().iter().enumerate() {
            let s = strides.map_or(1, |v| v[axis]);
            if s <= 0 {
                return Err(KernelError::invalid(
                    OP,
                    format!("stride_dims[{axis}] = {s}; strides must be positive"),
                ));
            }
            let b = begins.map_or(0, |v| v[axis]);
            let e = ends.map_or(0, |v| v[axis]);
            if b < 0 || e < 0 {
                return Err(KernelError::invalid(
                    OP,
                    format!("axis {axis}: negative bounds ({b}, {e}) are not supported"),
                ));
            }

            let b = b as usize;
            let e = if e == 0 { extent } else { e as usize };
            if e > extent {
                return Err(KernelError::invalid(
                    OP,
                    format!("end_dims[{axis}] = {e} exceeds source extent {extent}"),
                ));
            }

            let s = s as usize;
            dst_dims.push(if b < e { (e - b).div_ceil(s) } else { 0 });
            begin.push(b);
            stride.push(s);
        }

        let dst_shape = Shape::new(dst_dims);
        tracing::debug!(
            "strided slice {src} -> {dst_shape} ({format}), begin {begin:?}, stride {stride:?}"
        );

        Ok(Self {
            format,
            src_strides: src.strides(),
            dst_strides: dst_shape.strides(),
            src_shape: src.clone(),
            dst_shape,
            begin,
            stride,
        })
    }

    /// The shape the source must have at compute time.
    pub fn src_shape(&self) -> &Shape {
        &self.src_shape
    }

    /// The shape of the destination buffer.
    pub fn dst_shape(&self) -> &Shape {
        &self.dst_shape
    }

    /// The destination keeps the source's memory format.
    pub fn format(&self) -> TensorFormat {
        self.format
    }

    /// Copies `src[begin + d * stride]` into `dst[d]` for every destination
    /// index `d`.
    ///
    /// Performs no validation: `src` must have [`Self::src_shape`] and `dst`
    /// must have [`Self::dst_shape`]. An empty destination is a no-op.
    pub fn compute<T: Element>(&self, src: &TensorView<'_, T>, dst: &mut TensorViewMut<'_, T>) {
        debug_assert_eq!(src.shape(), &self.src_shape);
        debug_assert_eq!(dst.shape(), &self.dst_shape);

        if self.dst_shape.num_elements() == 0 {
            return;
        }
        self.gather(0, src.as_slice(), dst.as_mut_slice());
    }

    /// One loop per axis; `src` and `dst` start at the current sub-block.
    fn gather<T: Copy>(&self, axis: usize, src: &[T], dst: &mut [T]) {
        let begin = self.begin[axis];
        let stride = self.stride[axis];
        let count = self.dst_shape.dims()[axis];

        if axis + 1 == self.begin.len() {
            let picked = src[begin..].iter().step_by(stride);
            for (d, s) in dst[..count].iter_mut().zip(picked) {
                *d = *s;
            }
            return;
        }

        let src_step = self.src_strides[axis];
        let dst_step = self.dst_strides[axis];
        for d in 0..count {
            let s = begin + d * stride;
            self.gather(axis + 1, &src[s * src_step..], &mut dst[d * dst_step..]);
        }
    }
}

fn per_axis<'a>(
    values: &'a [i64],
    rank: usize,
    name: &str,
) -> Result<Option<&'a [i64]>, KernelError> {
    if values.is_empty() {
        return Ok(None);
    }
    if values.len() != rank {
        return Err(KernelError::shape(
            OP,
            format!("{name} has {} entries but the source has rank {rank}", values.len()),
        ));
    }
    Ok(Some(values))
}
