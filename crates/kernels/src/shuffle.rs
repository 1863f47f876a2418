// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Channel shuffle: split the interleaved channel pairs of two sources
//! across two destinations.
//!
//! For sources with `C0` and `C1` channels (both even), pair `(2k, 2k + 1)`
//! of source 0 lands in channel `k` of destination 0 and destination 1
//! respectively; source 1's pairs follow at channel `C0 / 2`. Both
//! destinations have `(C0 + C1) / 2` channels.
//!
//! The two layouts need different loops: channel-last moves single
//! elements per spatial position, channel-first moves whole `H * W`
//! blocks per channel.

use crate::{simd, KernelError, ShuffleConfig};
use tensor_core::{DType, Element, Shape, TensorFormat, TensorView, TensorViewMut};

const OP: &str = "shuffle";

/// Which implementation runs a [`ShufflePlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShuffleBackend {
    /// Generic loops for every element type; the reference behaviour.
    Portable,
    /// SSE de-interleave for f32 channel-last tensors on x86_64.
    Simd,
}

impl ShuffleBackend {
    /// Picks the fastest backend for an element type and layout.
    pub fn select(dtype: DType, format: TensorFormat) -> Self {
        if simd::available() && dtype == DType::F32 && format == TensorFormat::ChannelLast {
            ShuffleBackend::Simd
        } else {
            ShuffleBackend::Portable
        }
    }

    /// Returns `true` if this backend can run `dtype` in this build.
    pub fn supports(self, dtype: DType) -> bool {
        match self {
            ShuffleBackend::Portable => true,
            ShuffleBackend::Simd => simd::available() && dtype == DType::F32,
        }
    }

    /// Lower-case label, matching the serialized config value.
    pub fn as_str(self) -> &'static str {
        match self {
            ShuffleBackend::Portable => "portable",
            ShuffleBackend::Simd => "simd",
        }
    }
}

/// The resolved geometry of one channel shuffle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShufflePlan {
    format: TensorFormat,
    backend: ShuffleBackend,
    batch: usize,
    spatial: usize,
    src_channels: [usize; 2],
    dst_channels: usize,
    src_shapes: [Shape; 2],
    dst_shape: Shape,
}

impl ShufflePlan {
    /// Validates the two source shapes and computes the shared destination shape.
    ///
    /// # Errors
    /// - [`KernelError::ShapeMismatch`] if either source is not rank 4, has a
    ///   zero extent, or the batch / spatial extents differ between sources.
    /// - [`KernelError::InvalidConfiguration`] if either channel count is odd.
    pub fn resolve(
        src0: &Shape,
        src1: &Shape,
        format: TensorFormat,
        dtype: DType,
        config: &ShuffleConfig,
    ) -> Result<Self, KernelError> {
        for (i, shape) in [src0, src1].into_iter().enumerate() {
            if shape.rank() != 4 {
                return Err(KernelError::shape(
                    OP,
                    format!("source {i} must be rank 4, got {shape}"),
                ));
            }
            if shape.num_elements() == 0 {
                return Err(KernelError::shape(
                    OP,
                    format!("source {i} has a zero extent: {shape}"),
                ));
            }
        }

        let (d0, d1) = (src0.dims(), src1.dims());
        if d0[0] != d1[0] {
            return Err(KernelError::shape(
                OP,
                format!("batch sizes differ: {src0} vs {src1}"),
            ));
        }
        let (h, w) = format.spatial_axes();
        if d0[h] != d1[h] || d0[w] != d1[w] {
            return Err(KernelError::shape(
                OP,
                format!("spatial extents differ ({format}): {src0} vs {src1}"),
            ));
        }

        let c = format.channel_axis(4);
        let src_channels = [d0[c], d1[c]];
        for (i, channels) in src_channels.into_iter().enumerate() {
            if channels % 2 != 0 {
                return Err(KernelError::invalid(
                    OP,
                    format!("source {i} has an odd channel count {channels}"),
                ));
            }
        }
        let dst_channels = (src_channels[0] + src_channels[1]) / 2;
        let dst_shape = src0.with_dim(c, dst_channels);

        let backend = match config.backend {
            None => ShuffleBackend::select(dtype, format),
            Some(b) if b.supports(dtype) => b,
            Some(b) => {
                tracing::warn!(
                    "shuffle backend '{}' cannot run {dtype} here; using portable",
                    b.as_str()
                );
                ShuffleBackend::Portable
            }
        };

        tracing::debug!(
            "shuffle {src0} + {src1} -> 2 x {dst_shape} ({format}, {dtype}, {})",
            backend.as_str()
        );

        Ok(Self {
            format,
            backend,
            batch: d0[0],
            spatial: d0[h] * d0[w],
            src_channels,
            dst_channels,
            src_shapes: [src0.clone(), src1.clone()],
            dst_shape,
        })
    }

    /// The shape of both destination buffers.
    pub fn dst_shape(&self) -> &Shape {
        &self.dst_shape
    }

    /// Memory format shared by the sources and destinations.
    pub fn format(&self) -> TensorFormat {
        self.format
    }

    /// The implementation selected at resolve time.
    pub fn backend(&self) -> ShuffleBackend {
        self.backend
    }

    /// Batch extent, shared by all four tensors.
    pub fn batch(&self) -> usize {
        self.batch
    }

    /// Number of spatial positions per image (`H * W`).
    pub fn spatial(&self) -> usize {
        self.spatial
    }

    /// Channel count of both destinations.
    pub fn dst_channels(&self) -> usize {
        self.dst_channels
    }

    /// Returns a copy of this plan that runs on `backend`.
    ///
    /// Returns `None` if `backend` cannot run `dtype` in this build.
    pub fn with_backend(&self, backend: ShuffleBackend, dtype: DType) -> Option<Self> {
        backend.supports(dtype).then(|| Self {
            backend,
            ..self.clone()
        })
    }

    /// Writes the shuffled channels of `src0` and `src1` into `dst0` / `dst1`.
    ///
    /// Performs no validation: the sources must have the shapes the plan
    /// was resolved with and both destinations must have [`Self::dst_shape`].
    pub fn compute<T: Element>(
        &self,
        src0: &TensorView<'_, T>,
        src1: &TensorView<'_, T>,
        dst0: &mut TensorViewMut<'_, T>,
        dst1: &mut TensorViewMut<'_, T>,
    ) {
        debug_assert_eq!(src0.shape(), &self.src_shapes[0]);
        debug_assert_eq!(src1.shape(), &self.src_shapes[1]);
        debug_assert_eq!(dst0.shape(), &self.dst_shape);
        debug_assert_eq!(dst1.shape(), &self.dst_shape);

        let (s0, s1) = (src0.as_slice(), src1.as_slice());
        let (d0, d1) = (dst0.as_mut_slice(), dst1.as_mut_slice());

        match (self.format, self.backend) {
            (TensorFormat::ChannelLast, ShuffleBackend::Simd) if T::DTYPE == DType::F32 => {
                // `Element` is sealed, so `DTYPE == F32` means `T` is `f32`.
                self.channel_last(
                    bytemuck::cast_slice::<T, f32>(s0),
                    bytemuck::cast_slice::<T, f32>(s1),
                    bytemuck::cast_slice_mut::<T, f32>(d0),
                    bytemuck::cast_slice_mut::<T, f32>(d1),
                    simd::deinterleave_f32,
                );
            }
            (TensorFormat::ChannelLast, _) => self.channel_last(s0, s1, d0, d1, deinterleave::<T>),
            (TensorFormat::ChannelFirst, _) => self.channel_first(s0, s1, d0, d1),
        }
    }

    fn channel_last<U: Copy>(
        &self,
        src0: &[U],
        src1: &[U],
        dst0: &mut [U],
        dst1: &mut [U],
        split: fn(&[U], &mut [U], &mut [U]),
    ) {
        let [c0, c1] = self.src_channels;
        let cd = self.dst_channels;
        let head = c0 / 2;

        let srcs = src0.chunks_exact(c0).zip(src1.chunks_exact(c1));
        let dsts = dst0.chunks_exact_mut(cd).zip(dst1.chunks_exact_mut(cd));
        for ((p0, p1), (q0, q1)) in srcs.zip(dsts) {
            let (q0_head, q0_tail) = q0.split_at_mut(head);
            let (q1_head, q1_tail) = q1.split_at_mut(head);
            split(p0, q0_head, q1_head);
            split(p1, q0_tail, q1_tail);
        }
    }

    fn channel_first<U: Copy>(&self, src0: &[U], src1: &[U], dst0: &mut [U], dst1: &mut [U]) {
        let [c0, c1] = self.src_channels;
        let sp = self.spatial;
        let image = self.dst_channels * sp;

        let srcs = src0.chunks_exact(c0 * sp).zip(src1.chunks_exact(c1 * sp));
        let dsts = dst0.chunks_exact_mut(image).zip(dst1.chunks_exact_mut(image));
        for ((b0, b1), (out0, out1)) in srcs.zip(dsts) {
            let pairs = b0.chunks_exact(2 * sp).chain(b1.chunks_exact(2 * sp));
            let planes = out0.chunks_exact_mut(sp).zip(out1.chunks_exact_mut(sp));
            for (pair, (even, odd)) in pairs.zip(planes) {
                let (a, b) = pair.split_at(sp);
                even.copy_from_slice(a);
                odd.copy_from_slice(b);
            }
        }
    }
}

/// Scalar pair split: `even[k] = src[2k]`, `odd[k] = src[2k + 1]`.
pub(crate) fn deinterleave<U: Copy>(src: &[U], even: &mut [U], odd: &mut [U]) {
    for (pair, (e, o)) in src.chunks_exact(2).zip(even.iter_mut().zip(odd.iter_mut())) {
        *e = pair[0];
        *o = pair[1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::Tensor;

    fn tensor(dims: [usize; 4], format: TensorFormat, data: Vec<f32>) -> Tensor<f32> {
        Tensor::from_vec(Shape::from(dims), format, data).unwrap()
    }

    fn shuffle(
        plan: &ShufflePlan,
        a: &Tensor<f32>,
        b: &Tensor<f32>,
    ) -> (Tensor<f32>, Tensor<f32>) {
        let mut d0 = Tensor::full(plan.dst_shape().clone(), plan.format(), f32::NAN);
        let mut d1 = Tensor::full(plan.dst_shape().clone(), plan.format(), f32::NAN);
        plan.compute(&a.view(), &b.view(), &mut d0.view_mut(), &mut d1.view_mut());
        (d0, d1)
    }

    fn resolve(a: &Tensor<f32>, b: &Tensor<f32>) -> Result<ShufflePlan, KernelError> {
        ShufflePlan::resolve(a.shape(), b.shape(), a.format(), DType::F32, &ShuffleConfig::default())
    }

    #[test]
    fn test_channel_last_pairs() {
        let f = TensorFormat::ChannelLast;
        let a = tensor([1, 1, 2, 4], f, vec![0.0, 1.0, 2.0, 3.0, 10.0, 11.0, 12.0, 13.0]);
        let b = tensor([1, 1, 2, 2], f, vec![100.0, 101.0, 110.0, 111.0]);
        let plan = resolve(&a, &b).unwrap();
        assert_eq!(plan.dst_shape().dims(), &[1, 1, 2, 3]);

        let (d0, d1) = shuffle(&plan, &a, &b);
        assert_eq!(d0.as_slice(), &[0.0, 2.0, 100.0, 10.0, 12.0, 110.0]);
        assert_eq!(d1.as_slice(), &[1.0, 3.0, 101.0, 11.0, 13.0, 111.0]);
    }

    #[test]
    fn test_channel_first_blocks() {
        let f = TensorFormat::ChannelFirst;
        let a = tensor([1, 4, 1, 2], f, (0..8).map(|i| i as f32).collect());
        let b = tensor([1, 2, 1, 2], f, vec![100.0, 101.0, 102.0, 103.0]);
        let plan = resolve(&a, &b).unwrap();
        assert_eq!(plan.dst_shape().dims(), &[1, 3, 1, 2]);
        assert_eq!(plan.backend(), ShuffleBackend::Portable);

        let (d0, d1) = shuffle(&plan, &a, &b);
        assert_eq!(d0.as_slice(), &[0.0, 1.0, 4.0, 5.0, 100.0, 101.0]);
        assert_eq!(d1.as_slice(), &[2.0, 3.0, 6.0, 7.0, 102.0, 103.0]);
    }

    #[test]
    fn test_batches_are_independent() {
        let f = TensorFormat::ChannelFirst;
        let a = tensor([2, 2, 1, 1], f, vec![1.0, 2.0, 3.0, 4.0]);
        let b = tensor([2, 2, 1, 1], f, vec![5.0, 6.0, 7.0, 8.0]);
        let plan = resolve(&a, &b).unwrap();
        let (d0, d1) = shuffle(&plan, &a, &b);
        assert_eq!(d0.as_slice(), &[1.0, 5.0, 3.0, 7.0]);
        assert_eq!(d1.as_slice(), &[2.0, 6.0, 4.0, 8.0]);
    }

    #[test]
    fn test_integer_elements_use_portable() {
        let f = TensorFormat::ChannelLast;
        let shape = Shape::from([1, 1, 1, 2]);
        let a = Tensor::from_vec(shape.clone(), f, vec![1i32, 2]).unwrap();
        let b = Tensor::from_vec(shape.clone(), f, vec![3i32, 4]).unwrap();
        let plan = ShufflePlan::resolve(&shape, &shape, f, DType::I32, &ShuffleConfig::default())
            .unwrap();
        assert_eq!(plan.backend(), ShuffleBackend::Portable);

        let mut d0 = Tensor::<i32>::zeros(plan.dst_shape().clone(), f);
        let mut d1 = Tensor::<i32>::zeros(plan.dst_shape().clone(), f);
        plan.compute(&a.view(), &b.view(), &mut d0.view_mut(), &mut d1.view_mut());
        assert_eq!(d0.as_slice(), &[1, 3]);
        assert_eq!(d1.as_slice(), &[2, 4]);
    }

    #[test]
    fn test_simd_matches_portable_bitwise() {
        let f = TensorFormat::ChannelLast;
        // 10 + 6 channels: 5 and 3 pairs, exercising the scalar tail.
        let a = tensor(
            [2, 3, 3, 10],
            f,
            (0..180u32)
                .map(|i| f32::from_bits(0x3f80_0000 ^ (i.wrapping_mul(2_654_435_761) >> 9)))
                .collect(),
        );
        let b = tensor([2, 3, 3, 6], f, (0..108).map(|i| -(i as f32) / 7.0).collect());
        let portable = ShufflePlan::resolve(
            a.shape(),
            b.shape(),
            f,
            DType::F32,
            &ShuffleConfig {
                backend: Some(ShuffleBackend::Portable),
            },
        )
        .unwrap();

        let Some(simd) = portable.with_backend(ShuffleBackend::Simd, DType::F32) else {
            return;
        };
        let (p0, p1) = shuffle(&portable, &a, &b);
        let (s0, s1) = shuffle(&simd, &a, &b);
        let bits = |t: &Tensor<f32>| t.as_slice().iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&p0), bits(&s0));
        assert_eq!(bits(&p1), bits(&s1));
    }

    #[test]
    fn test_backend_selection() {
        assert_eq!(
            ShuffleBackend::select(DType::F64, TensorFormat::ChannelLast),
            ShuffleBackend::Portable
        );
        assert_eq!(
            ShuffleBackend::select(DType::F32, TensorFormat::ChannelFirst),
            ShuffleBackend::Portable
        );
        let expected = if simd::available() {
            ShuffleBackend::Simd
        } else {
            ShuffleBackend::Portable
        };
        assert_eq!(ShuffleBackend::select(DType::F32, TensorFormat::ChannelLast), expected);
    }

    #[test]
    fn test_unsupported_forced_backend_falls_back() {
        let shape = Shape::from([1, 1, 1, 2]);
        let plan = ShufflePlan::resolve(
            &shape,
            &shape,
            TensorFormat::ChannelLast,
            DType::U8,
            &ShuffleConfig {
                backend: Some(ShuffleBackend::Simd),
            },
        )
        .unwrap();
        assert_eq!(plan.backend(), ShuffleBackend::Portable);
    }

    #[test]
    fn test_odd_channels_rejected() {
        let f = TensorFormat::ChannelFirst;
        let a = Shape::from([1, 3, 2, 2]);
        let b = Shape::from([1, 1, 2, 2]);
        let result = ShufflePlan::resolve(&a, &b, f, DType::F32, &ShuffleConfig::default());
        assert!(matches!(result, Err(KernelError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_batch_mismatch_rejected() {
        let f = TensorFormat::ChannelLast;
        let a = Shape::from([1, 2, 2, 4]);
        let b = Shape::from([2, 2, 2, 4]);
        let result = ShufflePlan::resolve(&a, &b, f, DType::F32, &ShuffleConfig::default());
        assert!(matches!(result, Err(KernelError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_spatial_mismatch_rejected() {
        let f = TensorFormat::ChannelLast;
        let a = Shape::from([1, 2, 2, 4]);
        let b = Shape::from([1, 2, 3, 4]);
        let result = ShufflePlan::resolve(&a, &b, f, DType::F32, &ShuffleConfig::default());
        assert!(matches!(result, Err(KernelError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_rank_rejected() {
        let a = Shape::from([2, 4, 4]);
        let result = ShufflePlan::resolve(&a, &a, TensorFormat::ChannelFirst, DType::F32, &ShuffleConfig::default());
        assert!(matches!(result, Err(KernelError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_zero_extent_rejected() {
        let a = Shape::from([1, 0, 2, 2]);
        let b = Shape::from([1, 2, 2, 2]);
        let result = ShufflePlan::resolve(&a, &b, TensorFormat::ChannelFirst, DType::F32, &ShuffleConfig::default());
        assert!(matches!(result, Err(KernelError::ShapeMismatch { .. })));
    }
}
