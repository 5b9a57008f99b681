//! Task records.

use serde::{Deserialize, Serialize};

/// A task assigned to a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: u32,
    pub task_type_id: u32,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub step: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_step: Option<u32>,
    /// Room the task starts in, when the collaborator could resolve it.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub location: Option<String>,
}

impl TaskRecord {
    pub fn new(task_id: u32, task_type_id: u32, completed: bool) -> Self {
        Self {
            task_id,
            task_type_id,
            completed,
            step: None,
            max_step: None,
            location: None,
        }
    }

    pub fn with_steps(mut self, step: u32, max_step: u32) -> Self {
        self.step = Some(step);
        self.max_step = Some(max_step);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}
