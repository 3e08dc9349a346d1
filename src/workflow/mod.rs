//! The four-step podcast workflow.
//!
//! [`WorkflowStep`] and [`WorkflowState`] describe what the UI shows;
//! [`Workflow`] is the only way to change it.

pub mod machine;
pub mod state;

pub use machine::{TransitionError, Workflow};
pub use state::{WorkflowState, WorkflowStep};
