// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors and outcomes of drawing operations.

use thiserror::Error;

/// An error rejecting a drawing operation before any pixel was touched.
#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum Error {
    /// A pen, brush, path or option value that can't be rendered.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A coordinate that is not finite or too large to be rasterized precisely.
    #[error("coordinate {value} is outside of the representable range")]
    OutOfRange { value: f64 },
}

/// How a drawing operation that passed validation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Every covered row was composited.
    Finished,
    /// The operation observed a cancellation request. The first `rows` rows of the
    /// operation have been composited and remain in the target.
    Cancelled { rows: usize },
}

impl Completion {
    pub fn is_finished(&self) -> bool {
        matches!(self, Completion::Finished)
    }
}

pub(crate) fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidConfiguration(message.into())
}
