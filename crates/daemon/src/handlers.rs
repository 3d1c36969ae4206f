// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request handlers: translate between the wire protocol and the core.

use abacus_core::{Clock, ExprId, UserId};
use abacus_engine::{Orchestrator, SubmitError};
use abacus_wire::{ExpressionDetail, OperatorEntry, Request, Response, StatusCode};
use std::sync::Arc;

/// Handle one authenticated request on behalf of `user`.
pub(crate) fn handle<C: Clock>(
    orchestrator: Arc<Orchestrator<C>>,
    user: UserId,
    request: Request,
) -> Response {
    match request {
        Request::CreateExpression { expression, idempotency_key } => {
            if expression.is_empty() {
                return Response::error(StatusCode::InvalidArgument, "expression is required");
            }
            if idempotency_key.is_empty() {
                return Response::error(
                    StatusCode::InvalidArgument,
                    "idempotency_key is required",
                );
            }
            match orchestrator.create_expression(&user, &expression, &idempotency_key) {
                Ok(expression_id) => Response::ExpressionCreated { expression_id },
                Err(SubmitError::InvalidExpression) => {
                    Response::error(StatusCode::InvalidArgument, "invalid expression")
                }
                Err(err) => {
                    tracing::error!(user = %user, error = %err, "expression creation failed");
                    Response::error(StatusCode::Internal, "failed to create expression")
                }
            }
        }

        Request::GetExpression { expression_id } => {
            if expression_id.is_empty() {
                return Response::error(StatusCode::InvalidArgument, "expression_id is required");
            }
            let id = ExprId::from_string(&expression_id);
            match orchestrator.get_expression(&user, &id) {
                Ok(row) => Response::Expression { expression: ExpressionDetail::from(&row) },
                Err(_) => Response::error(StatusCode::NotFound, "expression not found"),
            }
        }

        Request::GetExpressions => Response::Expressions {
            expressions: orchestrator
                .list_expressions(&user)
                .iter()
                .map(ExpressionDetail::from)
                .collect(),
        },

        Request::GetAgents => Response::Agents {
            agents: orchestrator.list_agents().iter().map(Into::into).collect(),
        },

        Request::GetOperators => Response::Operators {
            operators: orchestrator
                .operators()
                .into_iter()
                .map(|(op, timeout_ms)| OperatorEntry { op, timeout_ms })
                .collect(),
        },

        // Connection-level requests never reach this far
        Request::Ping | Request::Hello { .. } => {
            Response::error(StatusCode::Internal, "unexpected connection-level request")
        }
    }
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
