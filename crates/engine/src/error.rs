// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use abacus_storage::StorageError;
use thiserror::Error;

/// Failure of the synchronous submission path.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The text failed validation; surfaced to the caller as invalid input.
    #[error("invalid expression")]
    InvalidExpression,

    /// Decomposition failed after the expression row was written. The
    /// partial writes are rolled back before this is returned.
    #[error("failed to decompose expression: {0}")]
    Split(#[from] abacus_expr::ParseError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
