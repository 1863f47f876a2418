// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Supported tensor element data types.

use std::fmt;
use std::num::Wrapping;

/// Enumerates the numeric types a [`crate::Tensor`] can hold.
///
/// Kernels use `DType` at plan time to pick between the portable loops and
/// an accelerated path for a specific element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    /// 32-bit IEEE 754 floating point.
    F32,
    /// 64-bit IEEE 754 floating point.
    F64,
    /// 32-bit signed integer.
    I32,
    /// 8-bit signed integer (for quantised tensors).
    I8,
    /// 8-bit unsigned integer.
    U8,
}

impl DType {
    /// Returns the size of a single element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            DType::F32 | DType::I32 => 4,
            DType::F64 => 8,
            DType::I8 | DType::U8 => 1,
        }
    }

    /// Returns a human-readable label for this data type.
    pub fn as_str(self) -> &'static str {
        match self {
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::I32 => "i32",
            DType::I8 => "i8",
            DType::U8 => "u8",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A Rust scalar type that can be stored in a tensor buffer.
///
/// The trait is sealed: `DTYPE` uniquely identifies the implementing type,
/// which lets kernels reinterpret a `&[T]` as the concrete scalar slice once
/// they have matched on it.
///
/// Arithmetic goes through [`Element::wrapping_add`] and
/// [`Element::wrapping_mul`]: IEEE operations for floats, two's-complement
/// wrap-around for integers, identical in debug and release builds.
pub trait Element:
    sealed::Sealed
    + Copy
    + PartialEq
    + fmt::Debug
    + Send
    + Sync
    + bytemuck::Pod
    + 'static
{
    /// The runtime tag for this type.
    const DTYPE: DType;
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;

    /// Converts a configuration scalar to this type (`as` semantics:
    /// truncating for integers, saturating at the type bounds).
    fn from_f64(v: f64) -> Self;

    /// `self + rhs`, wrapping on integer overflow.
    fn wrapping_add(self, rhs: Self) -> Self;

    /// `self * rhs`, wrapping on integer overflow.
    fn wrapping_mul(self, rhs: Self) -> Self;
}

macro_rules! impl_element {
    (float $ty:ty, $dtype:expr) => {
        impl sealed::Sealed for $ty {}

        impl Element for $ty {
            const DTYPE: DType = $dtype;
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $ty
            }

            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn wrapping_mul(self, rhs: Self) -> Self {
                self * rhs
            }
        }
    };
    (int $ty:ty, $dtype:expr) => {
        impl sealed::Sealed for $ty {}

        impl Element for $ty {
            const DTYPE: DType = $dtype;
            const ZERO: Self = 0;
            const ONE: Self = 1;

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $ty
            }

            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                (Wrapping(self) + Wrapping(rhs)).0
            }

            #[inline]
            fn wrapping_mul(self, rhs: Self) -> Self {
                (Wrapping(self) * Wrapping(rhs)).0
            }
        }
    };
}

impl_element!(float f32, DType::F32);
impl_element!(float f64, DType::F64);
impl_element!(int i32, DType::I32);
impl_element!(int i8, DType::I8);
impl_element!(int u8, DType::U8);
