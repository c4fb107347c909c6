//! Artifact loading: start a submission and expose it as a [`Namespace`].
//!
//! [`Namespace`]: crate::grading::Namespace
mod process;
pub mod protocol;

pub use process::{load_namespace, ArtifactCommand, KIND_ARTIFACT_EXITED, KIND_PROTOCOL};
pub use protocol::{Manifest, RemoteError, Request, Response};
