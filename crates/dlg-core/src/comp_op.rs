use serde::{Deserialize, Serialize};

use crate::error::DlgError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompOp {
    EqualTo,
    NotEqualTo,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
}

impl CompOp {
    pub const ALL: [CompOp; 6] = [
        CompOp::EqualTo,
        CompOp::NotEqualTo,
        CompOp::LessThan,
        CompOp::LessThanOrEqualTo,
        CompOp::GreaterThan,
        CompOp::GreaterThanOrEqualTo,
    ];

    /// Parses the exporter's operator name. `function` only feeds the error.
    pub fn parse(raw: &str, function: &str) -> Result<Self, DlgError> {
        match raw {
            "EqualTo" => Ok(Self::EqualTo),
            "NotEqualTo" => Ok(Self::NotEqualTo),
            "LessThan" => Ok(Self::LessThan),
            "LessThanOrEqualTo" => Ok(Self::LessThanOrEqualTo),
            "GreaterThan" => Ok(Self::GreaterThan),
            "GreaterThanOrEqualTo" => Ok(Self::GreaterThanOrEqualTo),
            _ => Err(DlgError::malformed_call(
                function,
                format!("unknown comparison operator \"{}\"", raw),
            )),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::EqualTo => "EqualTo",
            Self::NotEqualTo => "NotEqualTo",
            Self::LessThan => "LessThan",
            Self::LessThanOrEqualTo => "LessThanOrEqualTo",
            Self::GreaterThan => "GreaterThan",
            Self::GreaterThanOrEqualTo => "GreaterThanOrEqualTo",
        }
    }

    pub fn math_symbol(self) -> &'static str {
        match self {
            Self::EqualTo => "==",
            Self::NotEqualTo => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqualTo => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqualTo => ">=",
        }
    }

    pub fn negated(self) -> Self {
        match self {
            Self::EqualTo => Self::NotEqualTo,
            Self::NotEqualTo => Self::EqualTo,
            Self::LessThan => Self::GreaterThanOrEqualTo,
            Self::LessThanOrEqualTo => Self::GreaterThan,
            Self::GreaterThan => Self::LessThanOrEqualTo,
            Self::GreaterThanOrEqualTo => Self::LessThan,
        }
    }
}
