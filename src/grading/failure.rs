//! Structured failure detail captured when a case does not pass.
//!
//! Every way a case can go wrong (missing binding, artifact error, assertion
//! mismatch, panic in verification code) collapses into one `Failure` value so
//! reports treat them uniformly.
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, Location};
use std::sync::Once;

pub const KIND_ASSERTION: &str = "AssertionError";
pub const KIND_LOOKUP: &str = "LookupError";
pub const KIND_TYPE: &str = "TypeError";
pub const KIND_INTERNAL: &str = "InternalError";
pub const KIND_PANIC: &str = "Panic";
pub const KIND_DEADLINE: &str = "DeadlineExceeded";

/// Failure detail attached to a `mistake` judgement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Failure {
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Failure {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Assertion failure located at the caller (the verification routine).
    #[track_caller]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::new(KIND_ASSERTION, message).at(Location::caller())
    }

    pub fn lookup(message: impl Into<String>) -> Self {
        Self::new(KIND_LOOKUP, message)
    }

    #[track_caller]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(KIND_TYPE, message).at(Location::caller())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(KIND_INTERNAL, message)
    }

    pub fn at(mut self, location: &Location<'_>) -> Self {
        self.location = Some(format_location(location));
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Failure {}

fn format_location(location: &Location<'_>) -> String {
    format!(
        "{}:{}:{}",
        location.file(),
        location.line(),
        location.column()
    )
}

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static PANIC_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

static INSTALL_HOOK: Once = Once::new();

/// Run `body`, converting a panic into a `Panic` failure.
///
/// While `body` runs on this thread the default panic message is suppressed;
/// the panic location is recorded instead and attached to the failure.
pub(crate) fn catch_panic<T>(body: impl FnOnce() -> Result<T, Failure>) -> Result<T, Failure> {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURING.with(Cell::get) {
                let location = info.location().map(format_location);
                PANIC_LOCATION.with(|slot| *slot.borrow_mut() = location);
            } else {
                previous(info);
            }
        }));
    });

    let was_capturing = CAPTURING.with(|flag| flag.replace(true));
    let outcome = panic::catch_unwind(panic::AssertUnwindSafe(body));
    CAPTURING.with(|flag| flag.set(was_capturing));

    match outcome {
        Ok(result) => result,
        Err(payload) => {
            let location = PANIC_LOCATION.with(|slot| slot.borrow_mut().take());
            Err(Failure::new(KIND_PANIC, panic_message(payload.as_ref())).with_location(location))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertion_failure_points_at_caller() {
        let failure = Failure::assertion("2 != 3");
        let location = failure.location.expect("location recorded");
        assert!(location.starts_with(file!()), "unexpected location {location}");
        assert_eq!(failure.kind, KIND_ASSERTION);
    }

    #[test]
    fn catch_panic_converts_panic_into_failure() {
        let result: Result<(), Failure> = catch_panic(|| panic!("index out of range"));
        let failure = result.expect_err("panic should become failure");
        assert_eq!(failure.kind, KIND_PANIC);
        assert_eq!(failure.message, "index out of range");
        assert!(failure.location.is_some());
    }

    #[test]
    fn catch_panic_passes_through_results() {
        assert_eq!(catch_panic(|| Ok::<_, Failure>(7)), Ok(7));
        let err = catch_panic(|| Err::<(), _>(Failure::lookup("missing")));
        assert_eq!(err, Err(Failure::lookup("missing")));
    }

    #[test]
    fn failure_display_and_serialization_omit_empty_location() {
        let failure = Failure::new("ValueError", "bad input");
        assert_eq!(failure.to_string(), "ValueError: bad input");
        let json = serde_json::to_string(&failure).expect("serialize");
        assert_eq!(json, r#"{"kind":"ValueError","message":"bad input"}"#);
    }
}
