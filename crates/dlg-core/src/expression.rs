use serde::{Deserialize, Serialize};

use crate::call::CallData;
use crate::error::DlgError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "And" => Some(Self::And),
            "Or" => Some(Self::Or),
            _ => None,
        }
    }

    fn joiner(self) -> &'static str {
        match self {
            Self::And => " && ",
            Self::Or => " || ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Expression {
    Call {
        call: CallData,
        negated: bool,
    },
    Combination {
        operator: LogicalOperator,
        operands: Vec<Expression>,
    },
}

impl Default for Expression {
    fn default() -> Self {
        Self::always()
    }
}

impl Expression {
    pub fn always() -> Self {
        Self::Combination {
            operator: LogicalOperator::And,
            operands: Vec::new(),
        }
    }

    pub fn call(call: CallData, negated: bool) -> Self {
        Self::Call { call, negated }
    }

    pub fn combination(operator: LogicalOperator, operands: Vec<Expression>) -> Self {
        Self::Combination { operator, operands }
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Self::Combination { operands, .. } if operands.is_empty())
    }

    /// Renders the tree; nested combinations of two or more operands are
    /// parenthesized, single operands are flattened.
    pub fn format(&self) -> Result<String, DlgError> {
        match self {
            Self::Call { call, negated } => call.format_condition(*negated),
            Self::Combination { operator, operands } => match operands.as_slice() {
                [] => Ok(String::new()),
                [single] => single.format(),
                _ => Ok(format!("({})", Self::join(*operator, operands)?)),
            },
        }
    }

    /// Renders a node's top-level guard without the outermost parentheses.
    pub fn format_guard(&self) -> Result<String, DlgError> {
        match self {
            Self::Combination { operator, operands } if operands.len() > 1 => {
                Self::join(*operator, operands)
            }
            Self::Combination { operands, .. } if operands.len() == 1 => {
                operands[0].format_guard()
            }
            _ => self.format(),
        }
    }

    fn join(operator: LogicalOperator, operands: &[Expression]) -> Result<String, DlgError> {
        let parts = operands
            .iter()
            .map(Expression::format)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(operator.joiner()))
    }
}
