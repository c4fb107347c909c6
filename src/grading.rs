//! Test-execution engine.
//!
//! A [`Scenario`] pairs a verification routine with argument sources; binding
//! data yields a [`Case`]; cases form weighted [`Group`]s graded
//! all-or-nothing with a skip cascade; groups form a [`Suite`] whose result
//! serializes into the stable JSON report.
//!
//! Execution is single-threaded and strictly ordered: suite, then group, then
//! case. Every case sees the same artifact namespace, including any state
//! earlier cases left behind in it.
mod case;
mod context;
mod failure;
mod group;
mod namespace;
mod scenario;
mod source;
mod suite;

pub use case::{Case, CaseResult, Judgement};
pub use context::RunContext;
pub use failure::{
    Failure, KIND_ASSERTION, KIND_DEADLINE, KIND_INTERNAL, KIND_LOOKUP, KIND_PANIC, KIND_TYPE,
};
pub use group::{Group, GroupResult, GroupSummary};
pub use namespace::{Arg, Binding, Callable, Namespace};
pub use scenario::{
    CaseArityError, Parameter, ParameterKind, Routine, Scenario, ScenarioDefect,
    ScenarioDefinitionError,
};
pub use source::{module_item, param, ArgumentSource, ModuleItem, Param, SlotId};
pub use suite::{Suite, SuiteResult, SuiteSummary};
