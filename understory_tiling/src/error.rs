// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Errors reported by [`crate::ViewportController`].
///
/// All of them are protocol violations around the resize transaction.
/// Degenerate geometry is never an error; it falls back to whole-image
/// rendering instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TilingError {
    /// A geometry-affecting call arrived between `prepare_to_resize` and
    /// `recover_from_resizing`.
    #[error("a resize is in progress; call `recover_from_resizing` first")]
    ResizeInProgress,
    /// `prepare_to_resize` was called while already resizing.
    #[error("resize transactions cannot be nested")]
    AlreadyResizing,
    /// `recover_from_resizing` was called without a matching `prepare_to_resize`.
    #[error("no resize is in progress")]
    NotResizing,
}
