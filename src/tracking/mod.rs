//! Call Tracking Module
//!
//! Stores values under generated keys while counting and logging each call,
//! so the call history can be replayed later.

mod cache;
mod history;
mod operation;
mod value;


// Re-export public types
pub use cache::{Cache, STORE_OPERATION};
pub use history::{Call, CallHistory};
pub use operation::{inputs_key, outputs_key, Counted, Logged, Operation, OperationExt};
pub use value::Value;
