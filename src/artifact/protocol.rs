//! Line-delimited JSON protocol spoken between the grader and an artifact.
//!
//! One request per line on the artifact's stdin, one response per line on its
//! stdout.
use crate::grading::Failure;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Request sent to the artifact.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Describe,
    Call { name: String, args: Vec<Value> },
}

/// Response read back from the artifact.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Ok(Value),
    Error(RemoteError),
}

/// Error raised inside artifact code, as reported by the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteError {
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl From<RemoteError> for Failure {
    fn from(err: RemoteError) -> Self {
        Failure::new(err.kind, err.message).with_location(err.location)
    }
}

/// Payload of a successful `describe` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub functions: Vec<String>,
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
}
