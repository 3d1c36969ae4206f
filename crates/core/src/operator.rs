// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four binary operators agents can evaluate.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A binary arithmetic operator.
///
/// Serialises as its symbol (`"+"`, `"-"`, `"*"`, `"/"`), which is also the
/// wire representation in task payloads and `GetOperators` responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
}

/// Evaluation failure an agent reports back as an error result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComputeError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is not a finite number")]
    NotFinite,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }

    /// Evaluate the operator the way a well-behaved agent does.
    ///
    /// Division by zero and non-finite results (overflow) are reported as
    /// errors rather than IEEE special values.
    pub fn apply(&self, a: f64, b: f64) -> Result<f64, ComputeError> {
        let value = match self {
            Operator::Add => a + b,
            Operator::Sub => a - b,
            Operator::Mul => a * b,
            Operator::Div => {
                if b == 0.0 {
                    return Err(ComputeError::DivisionByZero);
                }
                a / b
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ComputeError::NotFinite)
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
#[path = "operator_tests.rs"]
mod tests;
