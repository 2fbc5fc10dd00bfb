pub mod call;
pub mod comp_op;
pub mod conversation;
pub mod error;
pub mod expression;
pub mod flowchart;
pub mod script_call;
pub mod string_table;

pub use call::{filter_argument, CallData};
pub use comp_op::CompOp;
pub use conversation::Conversation;
pub use error::DlgError;
pub use expression::{Expression, LogicalOperator};
pub use flowchart::*;
pub use script_call::ScriptCall;
pub use string_table::{StringTable, StringTableEntry};
