use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::comp_op::CompOp;
use crate::error::DlgError;

const PATH_SUFFIXES: [&str; 2] = [".conversation", ".quest"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallData {
    pub function_name: String,
    pub arguments: Vec<String>,
}

impl CallData {
    pub fn new(function_name: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            function_name: function_name.into(),
            arguments,
        }
    }

    /// Builds a call from an exported signature such as
    /// `"Boolean IsGlobalValue(String, Operator, Int32)"`.
    pub fn from_signature(signature: &str, arguments: Vec<String>) -> Result<Self, DlgError> {
        let Some(end) = signature.find('(') else {
            return Err(DlgError::malformed_call(
                signature,
                "signature has no parameter list",
            ));
        };
        let head = signature[..end].trim_end();
        let begin = head.rfind(' ').map(|index| index + 1).unwrap_or(0);
        let function_name = head[begin..].trim();
        if function_name.is_empty() {
            return Err(DlgError::malformed_call(
                signature,
                "signature has no function name",
            ));
        }
        Ok(Self::new(function_name, arguments))
    }

    /// Renders the call as a guard, folding `negate` into the result.
    pub fn format_condition(&self, negate: bool) -> Result<String, DlgError> {
        let name = self.function_name.as_str();
        let mut negate_handled = false;

        let result = match name {
            "IsGlobalValue" => {
                let [variable, op, value] = self.expect_args::<3>()?;
                let mut op = CompOp::parse(op, name)?;
                if negate {
                    op = op.negated();
                    negate_handled = true;
                }

                let boolean_shortcut = variable.starts_with('b')
                    && matches!(op, CompOp::EqualTo | CompOp::NotEqualTo)
                    && matches!(value, "0" | "1");
                if boolean_shortcut {
                    if (value == "1") == (op == CompOp::EqualTo) {
                        variable.to_string()
                    } else {
                        format!("!{}", variable)
                    }
                } else {
                    format!("{} {} {}", variable, op.math_symbol(), value)
                }
            }
            "IsPlayerAttributeScoreValue" => {
                let [attribute, op, value] = self.expect_args::<3>()?;
                let op = CompOp::parse(op, name)?;
                format!("{} {} {}", attribute, op.math_symbol(), value)
            }
            "IsPlayerBackground" => {
                let [value] = self.expect_args::<1>()?;
                value.to_string()
            }
            "ReputationTagRankGreater" => {
                let [tag, axis, threshold] = self.expect_args::<3>()?;
                match axis {
                    "Positive" | "" => format!("Rep({} > {})", tag, threshold),
                    "Negative" => format!("Rep({} < -{})", tag, threshold),
                    _ => {
                        return Err(DlgError::InvalidAxis {
                            axis: axis.to_string(),
                        })
                    }
                }
            }
            "HasConversationNodeBeenPlayed" => {
                let [node_ref, flag] = self.expect_args::<2>()?;
                format!("NodePlayed({}, {})", filter_argument(node_ref), flag)
            }
            _ => self.format_function(),
        };

        if !negate || negate_handled {
            return Ok(result);
        }
        if result.contains('=') {
            Ok(format!("!({})", result))
        } else {
            Ok(format!("!{}", result))
        }
    }

    pub fn format_action(&self) -> Result<String, DlgError> {
        match self.function_name.as_str() {
            "SetGlobalValue" => {
                let [variable, value] = self.expect_args::<2>()?;
                Ok(format!("{} = {}", variable, value))
            }
            "IncrementGlobalValue" | "DispositionAddPoints" => {
                let [variable, value] = self.expect_args::<2>()?;
                Ok(format!("{} += {}", variable, value))
            }
            _ => Ok(self.format_function()),
        }
    }

    fn format_function(&self) -> String {
        let arguments = self
            .arguments
            .iter()
            .map(|argument| filter_argument(argument))
            .collect::<Vec<_>>();
        format!("{}({})", self.function_name, arguments.join(", "))
    }

    fn expect_args<const N: usize>(&self) -> Result<[&str; N], DlgError> {
        if self.arguments.len() != N {
            return Err(DlgError::arity(&self.function_name, N));
        }
        Ok(std::array::from_fn(|index| self.arguments[index].as_str()))
    }
}

/// Shortens noisy arguments: GUIDs keep their first group, asset paths keep
/// their bare tag.
pub fn filter_argument(argument: &str) -> String {
    let mut value = argument;
    if is_canonical_guid(value) {
        if let Some(index) = value.find('-') {
            value = &value[..index];
        }
    }

    for suffix in PATH_SUFFIXES {
        if let Some(stem) = strip_suffix_ignore_case(value, suffix) {
            value = match stem.rfind('/') {
                Some(index) => &stem[index + 1..],
                None => stem,
            };
        }
    }

    value.to_string()
}

fn is_canonical_guid(value: &str) -> bool {
    static GUID: OnceLock<Regex> = OnceLock::new();
    GUID.get_or_init(|| {
        Regex::new(
            r"^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}$",
        )
        .expect("guid regex must compile")
    })
    .is_match(value)
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let split = value.len().checked_sub(suffix.len())?;
    if !value.is_char_boundary(split) {
        return None;
    }
    let (stem, tail) = value.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(stem)
}
