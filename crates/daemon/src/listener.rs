// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TCP listener: accepts connections and handles them without blocking the
//! orchestrator workers.
//!
//! Each connection opens with a `Hello { token }` handshake; the resolved
//! user id scopes every later request on that connection. `Ping` is the
//! only other request allowed before authentication.

use crate::auth::Authenticator;
use crate::handlers;
use abacus_core::{Clock, UserId};
use abacus_engine::Orchestrator;
use abacus_wire::{
    read_request, write_response, ProtocolError, Request, Response, StatusCode, PROTOCOL_VERSION,
};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Listener task for the RPC surface.
pub struct Listener<C: Clock> {
    orchestrator: Arc<Orchestrator<C>>,
    auth: Arc<dyn Authenticator>,
}

impl<C: Clock> Listener<C> {
    pub fn new(orchestrator: Arc<Orchestrator<C>>, auth: Arc<dyn Authenticator>) -> Self {
        Self { orchestrator, auth }
    }

    /// Accept connections until shutdown, spawning a task per connection.
    /// On shutdown the accept loop stops; in-flight connections finish
    /// their current request and close.
    pub async fn run(self: Arc<Self>, listener: TcpListener, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                result = listener.accept() => match result {
                    Ok((stream, addr)) => {
                        debug!(%addr, "connection accepted");
                        let this = Arc::clone(&self);
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            if let Err(err) = this.handle_connection(stream, shutdown).await {
                                log_connection_error(err);
                            }
                        });
                    }
                    Err(err) => error!(error = %err, "accept failed"),
                },
            }
        }
        debug!("listener stopped");
    }

    async fn handle_connection(
        &self,
        stream: TcpStream,
        shutdown: CancellationToken,
    ) -> Result<(), ProtocolError> {
        let (mut reader, mut writer) = stream.into_split();
        let mut owner: Option<UserId> = None;
        loop {
            let request = tokio::select! {
                _ = shutdown.cancelled() => return Ok(()),
                request = read_request(&mut reader) => match request {
                    Ok(request) => request,
                    Err(ProtocolError::ConnectionClosed) => return Ok(()),
                    Err(err) => return Err(err),
                },
            };
            debug!(request = ?request_name(&request), "request received");
            let response = self.dispatch(&mut owner, request).await;
            write_response(&mut writer, &response).await?;
        }
    }

    async fn dispatch(&self, owner: &mut Option<UserId>, request: Request) -> Response {
        match request {
            Request::Ping => Response::Pong,

            Request::Hello { version, token } => {
                match token.as_deref().and_then(|t| self.auth.authenticate(t)) {
                    Some(user) => {
                        debug!(user = %user, client_version = %version, "authenticated");
                        *owner = Some(user);
                        Response::Hello { version: PROTOCOL_VERSION.to_string() }
                    }
                    None => {
                        warn!("handshake with missing or unknown token");
                        Response::error(StatusCode::Unauthenticated, "invalid or missing token")
                    }
                }
            }

            request => match owner.clone() {
                Some(user) => self.handle_authenticated(user, request).await,
                None => Response::error(
                    StatusCode::Unauthenticated,
                    "authenticate with Hello first",
                ),
            },
        }
    }

    /// Run the handler on its own task so a panic is contained and mapped
    /// to `Internal` instead of tearing the connection task down.
    async fn handle_authenticated(&self, user: UserId, request: Request) -> Response {
        let orchestrator = Arc::clone(&self.orchestrator);
        let handler = tokio::spawn(async move { handlers::handle(orchestrator, user, request) });
        match handler.await {
            Ok(response) => response,
            Err(err) => {
                if err.is_panic() {
                    error!("request handler panicked");
                } else {
                    error!(error = %err, "request handler aborted");
                }
                Response::error(StatusCode::Internal, "internal error")
            }
        }
    }
}

fn request_name(request: &Request) -> &'static str {
    match request {
        Request::Ping => "Ping",
        Request::Hello { .. } => "Hello",
        Request::CreateExpression { .. } => "CreateExpression",
        Request::GetExpression { .. } => "GetExpression",
        Request::GetExpressions => "GetExpressions",
        Request::GetAgents => "GetAgents",
        Request::GetOperators => "GetOperators",
    }
}

fn log_connection_error(err: ProtocolError) {
    match err {
        ProtocolError::ConnectionClosed => debug!("client disconnected"),
        err => warn!(error = %err, "connection error"),
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
