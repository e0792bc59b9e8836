//! Indexing task API on the overlord.

use std::thread;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::druid::DruidClient;
use super::error::{DruidError, DruidResult};
use super::transport::{Method, Transport};

/// Lifecycle state reported by the overlord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    Pending,
    Waiting,
    Running,
    Success,
    Failed,
    #[serde(other)]
    Unknown,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Success | TaskState::Failed)
    }
}

/// The `status` object of a task status response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub id: String,
    pub status: TaskState,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub error_msg: Option<String>,
}

impl<T: Transport> DruidClient<T> {
    /// Submit an indexing task and return its id.
    pub fn submit_task(&self, task: Value) -> DruidResult<String> {
        let response = self.executor().post(&self.settings().task_url(), task.clone())?;
        match response.get("task").and_then(Value::as_str) {
            Some(id) => {
                debug!(task_id = id, "submitted task");
                Ok(id.to_string())
            }
            None => Err(DruidError::engine(
                "MissingTaskId",
                format!("task submission response has no task id: {}", response),
                task,
            )),
        }
    }

    /// Current status of a task.
    pub fn task_status(&self, task_id: &str) -> DruidResult<TaskStatus> {
        let url = format!("{}/{}/status", self.settings().task_url(), task_id);
        let response = self.executor().get(&url, None)?;
        let status = response.get("status").cloned().unwrap_or(Value::Null);
        serde_json::from_value(status).map_err(|e| {
            DruidError::engine(
                "InvalidTaskStatus",
                format!("unexpected status response for task {}: {}", task_id, e),
                Value::Null,
            )
        })
    }

    /// Ask the overlord to stop a task.
    pub fn shutdown_task(&self, task_id: &str) -> DruidResult<()> {
        let url = format!("{}/{}/shutdown", self.settings().task_url(), task_id);
        self.executor().execute(Method::Post, &url, None)?;
        Ok(())
    }

    /// Poll until the task reaches a terminal state.
    ///
    /// Blocks the calling thread, sleeping `poll_interval` between polls.
    /// States the client does not know (such as `PAUSED`) count as not
    /// finished, so a task parked in one keeps polling. Pass `max_polls`
    /// to bound the wait; running out returns the last status seen.
    pub fn wait_for_task(
        &self,
        task_id: &str,
        poll_interval: Duration,
        max_polls: Option<u32>,
    ) -> DruidResult<TaskStatus> {
        let mut polls = 0u32;
        loop {
            let status = self.task_status(task_id)?;
            polls += 1;
            if status.status.is_terminal() {
                return Ok(status);
            }
            if max_polls.is_some_and(|max| polls >= max) {
                warn!(task_id, polls, state = ?status.status, "gave up waiting for task");
                return Ok(status);
            }
            debug!(task_id, state = ?status.status, "task not finished");
            if !poll_interval.is_zero() {
                thread::sleep(poll_interval);
            }
        }
    }
}
