// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Owned tensors and the borrowed views kernels operate on.

use crate::{DType, Element, Shape, TensorError, TensorFormat};

/// An owned, n-dimensional tensor stored in contiguous row-major memory.
///
/// Kernels never take ownership of tensor storage. Callers keep their
/// buffers in a `Tensor` (or any other contiguous container) and hand the
/// kernels a [`TensorView`] for inputs and a [`TensorViewMut`] for outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T: Element> {
    shape: Shape,
    format: TensorFormat,
    data: Vec<T>,
}

impl<T: Element> Tensor<T> {
    /// Creates a new tensor filled with zeros.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Shape, Tensor, TensorFormat};
    /// let t = Tensor::<f32>::zeros(Shape::matrix(2, 3), TensorFormat::ChannelFirst);
    /// assert_eq!(t.size_bytes(), 24); // 2 * 3 * 4 bytes
    /// ```
    pub fn zeros(shape: Shape, format: TensorFormat) -> Self {
        Self::full(shape, format, T::ZERO)
    }

    /// Creates a tensor with every element set to `value`.
    pub fn full(shape: Shape, format: TensorFormat, value: T) -> Self {
        let n = shape.num_elements();
        Self {
            shape,
            format,
            data: vec![value; n],
        }
    }

    /// Creates a tensor that takes ownership of `data`.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Shape, Tensor, TensorFormat};
    /// let t = Tensor::from_vec(Shape::vector(3), TensorFormat::ChannelFirst, vec![1.0f32, 2.0, 3.0]).unwrap();
    /// assert_eq!(t.as_slice(), &[1.0, 2.0, 3.0]);
    /// ```
    pub fn from_vec(shape: Shape, format: TensorFormat, data: Vec<T>) -> Result<Self, TensorError> {
        let expected = shape.num_elements();
        if data.len() != expected {
            return Err(TensorError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            shape,
            format,
            data,
        })
    }

    /// Creates a tensor by copying native-endian element bytes.
    ///
    /// The byte slice need not be aligned for `T`.
    pub fn from_bytes(shape: Shape, format: TensorFormat, bytes: &[u8]) -> Result<Self, TensorError> {
        let count = shape.num_elements();
        if bytes.len() != count * std::mem::size_of::<T>() {
            return Err(TensorError::ByteLengthMismatch {
                dtype: T::DTYPE,
                count,
                actual: bytes.len(),
            });
        }
        let data = bytemuck::pod_collect_to_vec::<u8, T>(bytes);
        Ok(Self {
            shape,
            format,
            data,
        })
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the tensor's memory format.
    pub fn format(&self) -> TensorFormat {
        self.format
    }

    /// Returns the tensor's data type.
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Returns the memory footprint of this tensor's elements in bytes.
    pub fn size_bytes(&self) -> usize {
        self.shape.size_bytes(T::DTYPE)
    }

    /// Returns the elements in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the elements mutably, in row-major order.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns the raw native-endian bytes of the elements.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Fills the tensor with a constant value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Returns an immutable view over this tensor.
    pub fn view(&self) -> TensorView<'_, T> {
        TensorView {
            shape: &self.shape,
            format: self.format,
            data: &self.data,
        }
    }

    /// Returns a mutable view over this tensor.
    pub fn view_mut(&mut self) -> TensorViewMut<'_, T> {
        TensorViewMut {
            shape: &self.shape,
            format: self.format,
            data: &mut self.data,
        }
    }

    /// Consumes the tensor and returns its element buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

/// A borrowed, read-only view over a caller-owned element buffer.
///
/// Views are zero-copy and tied to the lifetime of the source buffer,
/// enforced by the borrow checker.
#[derive(Debug, Clone, Copy)]
pub struct TensorView<'a, T: Element> {
    shape: &'a Shape,
    format: TensorFormat,
    data: &'a [T],
}

impl<'a, T: Element> TensorView<'a, T> {
    /// Wraps a caller-owned buffer.
    ///
    /// Returns an error if `data.len()` differs from `shape.num_elements()`.
    pub fn new(shape: &'a Shape, format: TensorFormat, data: &'a [T]) -> Result<Self, TensorError> {
        check_len(shape, data.len())?;
        Ok(Self {
            shape,
            format,
            data,
        })
    }

    /// Returns the shape of the viewed buffer.
    pub fn shape(&self) -> &'a Shape {
        self.shape
    }

    /// Returns the memory format of the viewed buffer.
    pub fn format(&self) -> TensorFormat {
        self.format
    }

    /// Returns the elements in row-major order.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }
}

/// A borrowed, writable view over a caller-owned element buffer.
///
/// Holding a `TensorViewMut` excludes every other borrow of the same
/// buffer, so a kernel's destination can never alias its sources.
#[derive(Debug)]
pub struct TensorViewMut<'a, T: Element> {
    shape: &'a Shape,
    format: TensorFormat,
    data: &'a mut [T],
}

impl<'a, T: Element> TensorViewMut<'a, T> {
    /// Wraps a caller-owned buffer for writing.
    ///
    /// Returns an error if `data.len()` differs from `shape.num_elements()`.
    pub fn new(
        shape: &'a Shape,
        format: TensorFormat,
        data: &'a mut [T],
    ) -> Result<Self, TensorError> {
        check_len(shape, data.len())?;
        Ok(Self {
            shape,
            format,
            data,
        })
    }

    /// Returns the shape of the viewed buffer.
    pub fn shape(&self) -> &'a Shape {
        self.shape
    }

    /// Returns the memory format of the viewed buffer.
    pub fn format(&self) -> TensorFormat {
        self.format
    }

    /// Returns the elements in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &*self.data
    }

    /// Returns the elements mutably, in row-major order.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.data
    }

    /// Reborrows as a read-only view.
    pub fn as_view(&self) -> TensorView<'_, T> {
        TensorView {
            shape: self.shape,
            format: self.format,
            data: &*self.data,
        }
    }
}

fn check_len(shape: &Shape, actual: usize) -> Result<(), TensorError> {
    let expected = shape.num_elements();
    if actual != expected {
        return Err(TensorError::BufferSizeMismatch { expected, actual });
    }
    Ok(())
}
