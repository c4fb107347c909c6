//! Cases: a scenario bound to concrete data, and the judgement it earns.
use super::context::RunContext;
use super::failure::{catch_panic, Failure, KIND_DEADLINE};
use super::namespace::{Arg, Namespace};
use super::scenario::Scenario;
use super::source::SlotId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

/// Three-way outcome of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgement {
    Accepted,
    Mistake,
    Skipped,
}

impl Judgement {
    /// Return the stable string identifier used in JSON reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Judgement::Accepted => "accepted",
            Judgement::Mistake => "mistake",
            Judgement::Skipped => "skipped",
        }
    }
}

impl fmt::Display for Judgement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One data instantiation of a scenario.
#[derive(Debug, Clone)]
pub struct Case {
    scenario: Scenario,
    params: BTreeMap<SlotId, Value>,
}

impl Case {
    pub(crate) fn new(scenario: Scenario, params: BTreeMap<SlotId, Value>) -> Self {
        Self { scenario, params }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn param(&self, slot: SlotId) -> Option<&Value> {
        self.params.get(&slot)
    }

    /// Resolve every argument source and run the verification routine.
    ///
    /// Any failure, from resolution through a panic in the routine, yields a
    /// `mistake`; nothing escapes to the caller.
    pub fn execute(&self, ctx: &RunContext, namespace: &Namespace) -> CaseResult {
        let started = Instant::now();
        let outcome = catch_panic(|| {
            let args = self
                .scenario
                .sources()
                .iter()
                .map(|source| source.resolve(self, namespace))
                .collect::<Result<Vec<Arg>, Failure>>()?;
            self.scenario.routine().invoke(&args)
        });
        let elapsed = started.elapsed();

        let outcome = match (outcome, ctx.case_deadline) {
            (Ok(()), Some(deadline)) if elapsed > deadline => Err(Failure::new(
                KIND_DEADLINE,
                format!(
                    "{} took {} ms, over the {} ms case deadline",
                    self.scenario.name(),
                    elapsed.as_millis(),
                    deadline.as_millis()
                ),
            )),
            (outcome, _) => outcome,
        };

        match outcome {
            Ok(()) => CaseResult::accepted(),
            Err(failure) => CaseResult::mistake(failure),
        }
    }

    /// Result for a case that was never run.
    pub fn do_skip(&self) -> CaseResult {
        CaseResult::skipped()
    }
}

/// Judgement of one case, with failure detail for mistakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    judgement: Judgement,
    failure: Option<Failure>,
}

impl CaseResult {
    pub fn accepted() -> Self {
        Self {
            judgement: Judgement::Accepted,
            failure: None,
        }
    }

    pub fn mistake(failure: Failure) -> Self {
        Self {
            judgement: Judgement::Mistake,
            failure: Some(failure),
        }
    }

    pub fn skipped() -> Self {
        Self {
            judgement: Judgement::Skipped,
            failure: None,
        }
    }

    pub fn judgement(&self) -> Judgement {
        self.judgement
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn is_accepted(&self) -> bool {
        self.judgement == Judgement::Accepted
    }
}
