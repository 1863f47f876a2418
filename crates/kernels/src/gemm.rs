// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Dense matrix multiply-accumulate: `C ← beta·C + alpha·op(A)·op(B)`.
//!
//! All operands are row-major. A transpose flag only changes how an operand
//! is indexed, never its storage. Each transpose combination has its own
//! loop nest:
//!
//! | variant | loops      | reads                         |
//! |---------|------------|-------------------------------|
//! | NN      | i, k, j    | `A[i,k]` broadcast, `B[k,·]` row |
//! | NT      | i, j, k    | dot of `A[i,·]` and `B[j,·]`   |
//! | TN      | i, k, j    | `A[k,i]` broadcast, `B[k,·]` row |
//! | TT      | i, j, k    | dot of `A[·,i]` and `B[·,j]`   |
//!
//! The accumulation order is fixed, so results are reproducible run to run.
//! In the dot forms alpha scales every product before it is summed.
//! Integer elements wrap on overflow in every build profile.

use crate::{GemmConfig, KernelError};
use std::ops::Range;
use tensor_core::{Element, Shape, TensorView, TensorViewMut};

const OP: &str = "gemm";

/// Whether an operand is read as stored or transposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transpose {
    No,
    Yes,
}

impl From<bool> for Transpose {
    fn from(transposed: bool) -> Self {
        if transposed {
            Transpose::Yes
        } else {
            Transpose::No
        }
    }
}

/// The four transpose combinations, fixed once per plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GemmVariant {
    NN,
    NT,
    TN,
    TT,
}

impl GemmVariant {
    /// Maps a pair of transpose flags to its loop nest.
    pub fn new(trans_a: Transpose, trans_b: Transpose) -> Self {
        match (trans_a, trans_b) {
            (Transpose::No, Transpose::No) => GemmVariant::NN,
            (Transpose::No, Transpose::Yes) => GemmVariant::NT,
            (Transpose::Yes, Transpose::No) => GemmVariant::TN,
            (Transpose::Yes, Transpose::Yes) => GemmVariant::TT,
        }
    }

    /// Lower-case label, as used in logs and bench ids.
    pub fn as_str(self) -> &'static str {
        match self {
            GemmVariant::NN => "nn",
            GemmVariant::NT => "nt",
            GemmVariant::TN => "tn",
            GemmVariant::TT => "tt",
        }
    }
}

/// Raw GEMM over row-major slices.
///
/// `a` holds `m * k` elements (`M×K`, or `K×M` when `trans_a` is `Yes`),
/// `b` holds `k * n` elements (`K×N`, or `N×K` when `trans_b` is `Yes`) and
/// `c` holds `m * n` elements. No validation beyond debug assertions.
#[allow(clippy::too_many_arguments)]
pub fn gemm<T: Element>(
    trans_a: Transpose,
    trans_b: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    b: &[T],
    beta: T,
    c: &mut [T],
) {
    let dims = GemmDims { m, n, k };
    run(GemmVariant::new(trans_a, trans_b), dims, alpha, beta, 0..m, a, b, c);
}

/// The resolved geometry and scalars of one GEMM call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GemmPlan<T: Element> {
    variant: GemmVariant,
    dims: GemmDims,
    alpha: T,
    beta: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GemmDims {
    m: usize,
    n: usize,
    k: usize,
}

impl<T: Element> GemmPlan<T> {
    /// Checks `A`, `B` and `C` against the transpose flags in `config`.
    ///
    /// # Errors
    /// - [`KernelError::ShapeMismatch`] if an operand is not a matrix, the
    ///   inner dimensions disagree, or `C` is not `M×N`.
    /// - [`KernelError::InvalidConfiguration`] if `alpha` or `beta` is not finite.
    pub fn resolve(a: &Shape, b: &Shape, c: &Shape, config: &GemmConfig) -> Result<Self, KernelError> {
        for (name, shape) in [("A", a), ("B", b), ("C", c)] {
            if shape.rank() != 2 {
                return Err(KernelError::shape(
                    OP,
                    format!("{name} must be a matrix, got {shape}"),
                ));
            }
        }
        for (name, v) in [("alpha", config.alpha), ("beta", config.beta)] {
            if !v.is_finite() {
                return Err(KernelError::invalid(OP, format!("{name} = {v} is not finite")));
            }
        }

        let variant = GemmVariant::new(config.transpose_a.into(), config.transpose_b.into());
        let (a, b) = (a.dims(), b.dims());
        let (m, k) = if config.transpose_a { (a[1], a[0]) } else { (a[0], a[1]) };
        let (kb, n) = if config.transpose_b { (b[1], b[0]) } else { (b[0], b[1]) };
        if k != kb {
            return Err(KernelError::shape(
                OP,
                format!("op(A) is {m}x{k} but op(B) is {kb}x{n}"),
            ));
        }
        if c.dims() != [m, n] {
            return Err(KernelError::shape(
                OP,
                format!("C must be {m}x{n}, got {c}"),
            ));
        }

        tracing::debug!(
            "gemm {} m={m} n={n} k={k} alpha={} beta={}",
            variant.as_str(),
            config.alpha,
            config.beta
        );

        Ok(Self {
            variant,
            dims: GemmDims { m, n, k },
            alpha: T::from_f64(config.alpha),
            beta: T::from_f64(config.beta),
        })
    }

    /// The loop nest this plan runs.
    pub fn variant(&self) -> GemmVariant {
        self.variant
    }

    /// Rows of `op(A)` and `C`.
    pub fn m(&self) -> usize {
        self.dims.m
    }

    /// Columns of `op(B)` and `C`.
    pub fn n(&self) -> usize {
        self.dims.n
    }

    /// Shared inner dimension.
    pub fn k(&self) -> usize {
        self.dims.k
    }

    /// Shape of `C`.
    pub fn output_shape(&self) -> Shape {
        Shape::matrix(self.dims.m, self.dims.n)
    }

    /// Runs the full product into `c`.
    pub fn compute(&self, a: &TensorView<'_, T>, b: &TensorView<'_, T>, c: &mut TensorViewMut<'_, T>) {
        debug_assert_eq!(c.shape().dims(), [self.dims.m, self.dims.n]);
        self.compute_rows(0..self.dims.m, a, b, c.as_mut_slice());
    }

    /// Computes only rows `rows` of `C` into `c_band`, which holds exactly
    /// those rows (`rows.len() * n` elements).
    ///
    /// Row bands are independent, so a caller can split `C` with
    /// `chunks_mut` and run bands on separate threads.
    pub fn compute_rows(
        &self,
        rows: Range<usize>,
        a: &TensorView<'_, T>,
        b: &TensorView<'_, T>,
        c_band: &mut [T],
    ) {
        debug_assert!(rows.end <= self.dims.m);
        debug_assert_eq!(c_band.len(), rows.len() * self.dims.n);
        run(
            self.variant,
            self.dims,
            self.alpha,
            self.beta,
            rows,
            a.as_slice(),
            b.as_slice(),
            c_band,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn run<T: Element>(
    variant: GemmVariant,
    dims: GemmDims,
    alpha: T,
    beta: T,
    rows: Range<usize>,
    a: &[T],
    b: &[T],
    c: &mut [T],
) {
    debug_assert_eq!(a.len(), dims.m * dims.k);
    debug_assert_eq!(b.len(), dims.k * dims.n);

    scale(beta, c);
    if dims.n == 0 || rows.is_empty() {
        return;
    }
    match variant {
        GemmVariant::NN => gemm_nn(dims, alpha, rows, a, b, c),
        GemmVariant::NT => gemm_nt(dims, alpha, rows, a, b, c),
        GemmVariant::TN => gemm_tn(dims, alpha, rows, a, b, c),
        GemmVariant::TT => gemm_tt(dims, alpha, rows, a, b, c),
    }
}

/// `beta == 0` overwrites with zeros so stale NaN/Inf values are discarded.
fn scale<T: Element>(beta: T, c: &mut [T]) {
    if beta == T::ZERO {
        c.fill(T::ZERO);
    } else if beta != T::ONE {
        for x in c.iter_mut() {
            *x = x.wrapping_mul(beta);
        }
    }
}

fn gemm_nn<T: Element>(d: GemmDims, alpha: T, rows: Range<usize>, a: &[T], b: &[T], c: &mut [T]) {
    for (i, c_row) in rows.zip(c.chunks_exact_mut(d.n)) {
        let a_row = &a[i * d.k..(i + 1) * d.k];
        for (p, &a_ip) in a_row.iter().enumerate() {
            let s = alpha.wrapping_mul(a_ip);
            let b_row = &b[p * d.n..(p + 1) * d.n];
            for (c_ij, &b_pj) in c_row.iter_mut().zip(b_row) {
                *c_ij = c_ij.wrapping_add(s.wrapping_mul(b_pj));
            }
        }
    }
}

fn gemm_nt<T: Element>(d: GemmDims, alpha: T, rows: Range<usize>, a: &[T], b: &[T], c: &mut [T]) {
    for (i, c_row) in rows.zip(c.chunks_exact_mut(d.n)) {
        let a_row = &a[i * d.k..(i + 1) * d.k];
        for (j, c_ij) in c_row.iter_mut().enumerate() {
            let b_row = &b[j * d.k..(j + 1) * d.k];
            let mut sum = T::ZERO;
            for (&x, &y) in a_row.iter().zip(b_row) {
                sum = sum.wrapping_add(alpha.wrapping_mul(x).wrapping_mul(y));
            }
            *c_ij = c_ij.wrapping_add(sum);
        }
    }
}

fn gemm_tn<T: Element>(d: GemmDims, alpha: T, rows: Range<usize>, a: &[T], b: &[T], c: &mut [T]) {
    for (i, c_row) in rows.zip(c.chunks_exact_mut(d.n)) {
        for p in 0..d.k {
            let s = alpha.wrapping_mul(a[p * d.m + i]);
            let b_row = &b[p * d.n..(p + 1) * d.n];
            for (c_ij, &b_pj) in c_row.iter_mut().zip(b_row) {
                *c_ij = c_ij.wrapping_add(s.wrapping_mul(b_pj));
            }
        }
    }
}

fn gemm_tt<T: Element>(d: GemmDims, alpha: T, rows: Range<usize>, a: &[T], b: &[T], c: &mut [T]) {
    for (i, c_row) in rows.zip(c.chunks_exact_mut(d.n)) {
        for (j, c_ij) in c_row.iter_mut().enumerate() {
            let b_row = &b[j * d.k..(j + 1) * d.k];
            let mut sum = T::ZERO;
            for (p, &y) in b_row.iter().enumerate() {
                sum = sum.wrapping_add(alpha.wrapping_mul(a[p * d.m + i]).wrapping_mul(y));
            }
            *c_ij = c_ij.wrapping_add(sum);
        }
    }
}
