// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process broker backend.

use crate::error::BusError;
use crate::Bus;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::mpsc;

struct ChannelState {
    tx: mpsc::Sender<Vec<u8>>,
    rx: Option<mpsc::Receiver<Vec<u8>>>,
}

/// A broker that lives inside the orchestrator process.
///
/// Channels are created lazily on first publish or subscribe, so messages
/// published before the consumer attaches are buffered up to the channel
/// capacity. Publishing blocks while a channel is full, which is the
/// in-process analogue of waiting for a broker acknowledgement.
pub struct InMemoryBus {
    channels: Mutex<HashMap<String, ChannelState>>,
    capacity: usize,
}

impl InMemoryBus {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    fn sender(&self, channel: &str) -> mpsc::Sender<Vec<u8>> {
        let mut channels = self.channels.lock();
        channels
            .entry(channel.to_string())
            .or_insert_with(|| {
                let (tx, rx) = mpsc::channel(self.capacity);
                ChannelState { tx, rx: Some(rx) }
            })
            .tx
            .clone()
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bus for InMemoryBus {
    async fn publish(&self, channel: &str, payload: Vec<u8>) -> Result<(), BusError> {
        let tx = self.sender(channel);
        tx.send(payload)
            .await
            .map_err(|_| BusError::ChannelClosed(channel.to_string()))
    }

    async fn subscribe(&self, channel: &str) -> Result<mpsc::Receiver<Vec<u8>>, BusError> {
        let mut channels = self.channels.lock();
        let state = channels.entry(channel.to_string()).or_insert_with(|| {
            let (tx, rx) = mpsc::channel(self.capacity);
            ChannelState { tx, rx: Some(rx) }
        });
        state
            .rx
            .take()
            .ok_or_else(|| BusError::ConsumerTaken(channel.to_string()))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
