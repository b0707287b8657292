use serde::{Deserialize, Serialize};

pub mod history;

/// Errors returned by the calculator operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,
}

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn sub(a: f64, b: f64) -> f64 {
    a - b
}

pub fn mul(a: f64, b: f64) -> f64 {
    a * b
}

/// Fails when the divisor is exactly zero.
pub fn div(a: f64, b: f64) -> Result<f64, CalcError> {
    if b == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    Ok(a / b)
}

// ─── Op ───────────────────────────────────────────────────────────────────────

/// The four history-logged operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    /// Parse a REPL/CLI token. Returns `None` for anything that is not one
    /// of the four operation names.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "add" => Some(Op::Add),
            "sub" => Some(Op::Sub),
            "mul" => Some(Op::Mul),
            "div" => Some(Op::Div),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::Div => "div",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
        }
    }

    /// Apply the operation. Only division can fail.
    pub fn apply(&self, a: f64, b: f64) -> Result<f64, CalcError> {
        match self {
            Op::Add => Ok(add(a, b)),
            Op::Sub => Ok(sub(a, b)),
            Op::Mul => Ok(mul(a, b)),
            Op::Div => div(a, b),
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
