use std::time::Duration;

/// Engine-facing run options. Presentation settings live with the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunContext {
    /// Keep grading a group after its first mistake.
    pub force_grade_all: bool,
    /// Judge a case `mistake` when its routine finishes after this long.
    /// Nothing is interrupted; a routine that never returns still blocks the run.
    pub case_deadline: Option<Duration>,
}

impl RunContext {
    pub fn new(force_grade_all: bool) -> Self {
        Self {
            force_grade_all,
            case_deadline: None,
        }
    }

    pub fn with_case_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.case_deadline = deadline;
        self
    }
}
