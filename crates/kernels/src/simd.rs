// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Vectorised f32 kernels.
//!
//! On `x86_64` these use SSE, which is part of the baseline target, so no
//! runtime feature detection is needed. Other targets get the scalar loop.
//! Every routine here must produce bit-identical output to its portable
//! counterpart.

/// Returns `true` if this build has the vectorised f32 paths.
pub(crate) const fn available() -> bool {
    cfg!(target_arch = "x86_64")
}

/// Splits interleaved pairs: `even[k] = src[2k]`, `odd[k] = src[2k + 1]`.
///
/// Processes `min(even.len(), odd.len(), src.len() / 2)` pairs.
#[cfg(target_arch = "x86_64")]
pub(crate) fn deinterleave_f32(src: &[f32], even: &mut [f32], odd: &mut [f32]) {
    use std::arch::x86_64::{_mm_loadu_ps, _mm_shuffle_ps, _mm_storeu_ps};

    // _MM_SHUFFLE(2, 0, 2, 0) and _MM_SHUFFLE(3, 1, 3, 1).
    const EVENS: i32 = 0b10_00_10_00;
    const ODDS: i32 = 0b11_01_11_01;

    let pairs = even.len().min(odd.len()).min(src.len() / 2);
    let mut k = 0;
    while k + 4 <= pairs {
        // SAFETY: k + 4 <= pairs keeps the 8 reads inside `src` and the 4
        // writes inside `even` and `odd`; the unaligned load/store variants
        // are used.
        unsafe {
            let lo = _mm_loadu_ps(src.as_ptr().add(2 * k));
            let hi = _mm_loadu_ps(src.as_ptr().add(2 * k + 4));
            _mm_storeu_ps(even.as_mut_ptr().add(k), _mm_shuffle_ps::<EVENS>(lo, hi));
            _mm_storeu_ps(odd.as_mut_ptr().add(k), _mm_shuffle_ps::<ODDS>(lo, hi));
        }
        k += 4;
    }
    for j in k..pairs {
        even[j] = src[2 * j];
        odd[j] = src[2 * j + 1];
    }
}

#[cfg(not(target_arch = "x86_64"))]
pub(crate) fn deinterleave_f32(src: &[f32], even: &mut [f32], odd: &mut [f32]) {
    crate::shuffle::deinterleave(src, even, odd);
}
