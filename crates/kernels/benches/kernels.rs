// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for the slice, shuffle and GEMM kernels.
//!
//! Set `RUST_LOG=kernels=debug` to see the resolved plans.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kernels::{
    GemmConfig, GemmPlan, ShuffleBackend, ShuffleConfig, ShufflePlan, SlicePlan,
    StridedSliceConfig,
};
use tensor_core::{DType, Shape, Tensor, TensorFormat};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn ramp(shape: Shape, format: TensorFormat) -> Tensor<f32> {
    let data = (0..shape.num_elements()).map(|i| (i % 251) as f32).collect();
    Tensor::from_vec(shape, format, data).unwrap()
}

fn bench_slice(c: &mut Criterion) {
    init_logging();
    let mut group = c.benchmark_group("strided_slice");
    let src = ramp(Shape::from([1, 64, 56, 56]), TensorFormat::ChannelFirst);
    let cases = [
        ("crop", StridedSliceConfig::new(vec![0, 0, 4, 4], vec![0, 0, 52, 52], vec![])),
        ("stride2", StridedSliceConfig::new(vec![], vec![], vec![1, 1, 2, 2])),
        ("channels", StridedSliceConfig::new(vec![0, 16, 0, 0], vec![0, 48, 0, 0], vec![])),
    ];
    for (name, config) in cases {
        let plan = SlicePlan::resolve(src.shape(), src.format(), &config).unwrap();
        let mut dst = Tensor::<f32>::zeros(plan.dst_shape().clone(), plan.format());
        group.throughput(Throughput::Elements(plan.dst_shape().num_elements() as u64));
        group.bench_function(name, |b| {
            b.iter(|| plan.compute(black_box(&src.view()), &mut dst.view_mut()))
        });
    }
    group.finish();
}

fn bench_shuffle(c: &mut Criterion) {
    let mut group = c.benchmark_group("shuffle");
    for format in [TensorFormat::ChannelFirst, TensorFormat::ChannelLast] {
        let (c0, c1) = (116, 116);
        let (s0, s1) = match format {
            TensorFormat::ChannelFirst => (Shape::from([1, c0, 28, 28]), Shape::from([1, c1, 28, 28])),
            TensorFormat::ChannelLast => (Shape::from([1, 28, 28, c0]), Shape::from([1, 28, 28, c1])),
        };
        let a = ramp(s0, format);
        let b = ramp(s1, format);

        for backend in [ShuffleBackend::Portable, ShuffleBackend::Simd] {
            let config = ShuffleConfig {
                backend: Some(backend),
            };
            let plan = ShufflePlan::resolve(a.shape(), b.shape(), format, DType::F32, &config).unwrap();
            // Channel-first moves whole blocks with either backend.
            let block_copy = format == TensorFormat::ChannelFirst && backend == ShuffleBackend::Simd;
            if plan.backend() != backend || block_copy {
                continue;
            }
            let mut d0 = Tensor::<f32>::zeros(plan.dst_shape().clone(), format);
            let mut d1 = Tensor::<f32>::zeros(plan.dst_shape().clone(), format);
            group.throughput(Throughput::Elements(2 * plan.dst_shape().num_elements() as u64));
            group.bench_function(BenchmarkId::new(format.as_str(), backend.as_str()), |bench| {
                bench.iter(|| {
                    plan.compute(
                        black_box(&a.view()),
                        black_box(&b.view()),
                        &mut d0.view_mut(),
                        &mut d1.view_mut(),
                    )
                })
            });
        }
    }
    group.finish();
}

fn bench_gemm(c: &mut Criterion) {
    let mut group = c.benchmark_group("gemm");
    let (m, n, k) = (64, 128, 256);
    for (ta, tb) in [(false, false), (false, true), (true, false), (true, true)] {
        let a_shape = if ta { Shape::matrix(k, m) } else { Shape::matrix(m, k) };
        let b_shape = if tb { Shape::matrix(n, k) } else { Shape::matrix(k, n) };
        let a = ramp(a_shape, TensorFormat::ChannelFirst);
        let b = ramp(b_shape, TensorFormat::ChannelFirst);
        let mut out = Tensor::<f32>::zeros(Shape::matrix(m, n), TensorFormat::ChannelFirst);
        let config = GemmConfig {
            transpose_a: ta,
            transpose_b: tb,
            ..Default::default()
        };
        let plan = GemmPlan::<f32>::resolve(a.shape(), b.shape(), out.shape(), &config).unwrap();

        group.throughput(Throughput::Elements((2 * m * n * k) as u64));
        group.bench_function(plan.variant().as_str(), |bench| {
            bench.iter(|| plan.compute(black_box(&a.view()), black_box(&b.view()), &mut out.view_mut()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_slice, bench_shuffle, bench_gemm);
criterion_main!(benches);
