use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

/// Job input, passed to the endpoint verbatim.
pub type JobInput = serde_json::Map<String, Value>;

/// Whatever the endpoint answers with. Only `status`, `error` and `id` are ever looked at.
pub type JobResult = Value;

/// Body of a job submission: `{"input": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    pub input: JobInput,
}

impl RunRequest {
    pub fn new(input: JobInput) -> Self {
        Self { input }
    }
}

impl From<JobInput> for RunRequest {
    fn from(input: JobInput) -> Self {
        Self::new(input)
    }
}

impl TryFrom<Value> for RunRequest {
    type Error = ClientError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut payload) = value else {
            return Err(ClientError::Configuration(
                "Payload must be a JSON object".to_string(),
            ));
        };

        match payload.remove("input") {
            Some(Value::Object(input)) => Ok(Self::new(input)),
            Some(_) => Err(ClientError::Configuration(
                "Payload `input` must be a JSON object".to_string(),
            )),
            None => Err(ClientError::Configuration(
                "Payload is missing the `input` field".to_string(),
            )),
        }
    }
}

/// Status reported by the endpoint in the `status` field of a job result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    InQueue,
    InProgress,
    Completed,
    Failed,
    Cancelled,
    TimedOut,
    Unknown(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::InQueue => "IN_QUEUE",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
            JobStatus::Cancelled => "CANCELLED",
            JobStatus::TimedOut => "TIMED_OUT",
            JobStatus::Unknown(status) => status,
        }
    }

    /// The job ended without producing an output.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            JobStatus::Failed | JobStatus::Cancelled | JobStatus::TimedOut
        )
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::InQueue | JobStatus::InProgress)
    }
}

impl From<&str> for JobStatus {
    fn from(status: &str) -> Self {
        match status {
            "IN_QUEUE" => JobStatus::InQueue,
            "IN_PROGRESS" => JobStatus::InProgress,
            "COMPLETED" => JobStatus::Completed,
            "FAILED" => JobStatus::Failed,
            "CANCELLED" => JobStatus::Cancelled,
            "TIMED_OUT" => JobStatus::TimedOut,
            other => JobStatus::Unknown(other.to_string()),
        }
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
