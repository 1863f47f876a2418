// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Memory layout tags for activation tensors.

use std::fmt;

/// Where the channel axis sits in a tensor's row-major layout.
///
/// For a rank-4 activation:
/// - `ChannelFirst` is `[N, C, H, W]`: each channel is a contiguous run of
///   `H * W` spatial values.
/// - `ChannelLast` is `[N, H, W, C]`: each spatial position holds a
///   contiguous run of `C` channel values.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TensorFormat {
    /// NCHW-style layout.
    #[default]
    ChannelFirst,
    /// NHWC-style layout.
    ChannelLast,
}

impl TensorFormat {
    /// Returns the channel axis for a tensor of the given rank.
    ///
    /// `rank` must be at least 2.
    pub fn channel_axis(self, rank: usize) -> usize {
        match self {
            TensorFormat::ChannelFirst => 1,
            TensorFormat::ChannelLast => rank - 1,
        }
    }

    /// Returns the two spatial axes of a rank-4 tensor.
    pub fn spatial_axes(self) -> (usize, usize) {
        match self {
            TensorFormat::ChannelFirst => (2, 3),
            TensorFormat::ChannelLast => (1, 2),
        }
    }

    /// Returns a short label (`"nchw"` / `"nhwc"`).
    pub fn as_str(self) -> &'static str {
        match self {
            TensorFormat::ChannelFirst => "nchw",
            TensorFormat::ChannelLast => "nhwc",
        }
    }
}

impl fmt::Display for TensorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
