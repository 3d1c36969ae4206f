// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Failure talking to the message broker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BusError {
    #[error("channel '{0}' is closed")]
    ChannelClosed(String),

    #[error("channel '{0}' already has a consumer")]
    ConsumerTaken(String),
}
