use serde::{Deserialize, Serialize};

use crate::call::CallData;
use crate::error::DlgError;

/// An on-enter/exit/update action. Formatted for display, never executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptCall {
    pub data: CallData,
}

impl ScriptCall {
    pub fn new(data: CallData) -> Self {
        Self { data }
    }

    pub fn format(&self) -> Result<String, DlgError> {
        self.data.format_action()
    }
}

impl From<CallData> for ScriptCall {
    fn from(data: CallData) -> Self {
        Self::new(data)
    }
}
