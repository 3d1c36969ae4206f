// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use abacus_core::ExprId;
use thiserror::Error;

/// Failure of a repository operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    /// Unknown id, or the row is not owned by the caller.
    #[error("expression {0} not found")]
    ExpressionNotFound(ExprId),
}
