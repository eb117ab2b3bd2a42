// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors from media commands.

use thiserror::Error;

/// Why a media command could not run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum MediaError {
    /// No media element is mounted.
    #[error("media element is not mounted")]
    NotReady,
    /// The media's duration is unknown, zero, or not finite.
    #[error("media duration is not usable")]
    UnknownDuration,
}
