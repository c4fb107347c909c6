//! Scenarios: verification routines paired with their argument sources.
//!
//! A scenario is declared once and stamps out many cases via [`Scenario::data`].
//! Arity mistakes in the test bank surface here, at definition time, never
//! while grading.
use super::case::Case;
use super::failure::Failure;
use super::namespace::Arg;
use super::source::{ArgumentSource, SlotId};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// How a routine parameter accepts its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Positional,
    Variadic,
}

/// Declared parameter of a verification routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
}

impl Parameter {
    pub fn positional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::Positional,
        }
    }

    pub fn variadic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::Variadic,
        }
    }
}

type RoutineBody = dyn Fn(&[Arg]) -> Result<(), Failure> + Send + Sync;

/// A named verification routine with an explicit parameter list.
pub struct Routine {
    name: String,
    parameters: Vec<Parameter>,
    body: Box<RoutineBody>,
}

impl Routine {
    /// Routine whose parameters are all plain positional.
    pub fn new<F>(name: impl Into<String>, parameters: &[&str], body: F) -> Self
    where
        F: Fn(&[Arg]) -> Result<(), Failure> + Send + Sync + 'static,
    {
        let parameters = parameters
            .iter()
            .map(|name| Parameter::positional(*name))
            .collect();
        Self::with_parameters(name, parameters, body)
    }

    pub fn with_parameters<F>(name: impl Into<String>, parameters: Vec<Parameter>, body: F) -> Self
    where
        F: Fn(&[Arg]) -> Result<(), Failure> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            parameters,
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub(crate) fn invoke(&self, args: &[Arg]) -> Result<(), Failure> {
        (self.body)(args)
    }
}

impl fmt::Debug for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Routine")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Why a scenario declaration was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioDefect {
    NotPositional { parameter: String },
    TooManyParameters { parameters: usize, sources: usize },
    TooFewParameters { parameters: usize, sources: usize },
}

/// Scenario declared with a routine that does not fit its argument sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioDefinitionError {
    pub routine: String,
    pub defect: ScenarioDefect,
}

impl fmt::Display for ScenarioDefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.defect {
            ScenarioDefect::NotPositional { parameter } => write!(
                f,
                "input arguments of wrapped routine {:?} must all be positional (parameter {:?} is not)",
                self.routine, parameter
            ),
            ScenarioDefect::TooManyParameters {
                parameters,
                sources,
            } => write!(
                f,
                "wrapped routine {:?} has too many input arguments ({parameters}) for {sources} argument sources",
                self.routine
            ),
            ScenarioDefect::TooFewParameters {
                parameters,
                sources,
            } => write!(
                f,
                "wrapped routine {:?} does not have enough input arguments ({parameters}) for {sources} argument sources",
                self.routine
            ),
        }
    }
}

impl std::error::Error for ScenarioDefinitionError {}

/// Case data whose length does not match the scenario's case-data slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseArityError {
    pub routine: String,
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for CaseArityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "test data for {:?} expected {} fields but instead found {}",
            self.routine, self.expected, self.actual
        )
    }
}

impl std::error::Error for CaseArityError {}

#[derive(Debug)]
struct ScenarioInner {
    routine: Routine,
    sources: Vec<Box<dyn ArgumentSource>>,
}

/// Shared handle to a validated scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    inner: Arc<ScenarioInner>,
}

impl Scenario {
    /// Validate `routine` against `sources` and build the scenario.
    pub fn create(
        routine: Routine,
        sources: Vec<Box<dyn ArgumentSource>>,
    ) -> Result<Self, ScenarioDefinitionError> {
        let fail = |defect| ScenarioDefinitionError {
            routine: routine.name.clone(),
            defect,
        };
        if let Some(parameter) = routine
            .parameters
            .iter()
            .find(|parameter| parameter.kind != ParameterKind::Positional)
        {
            return Err(fail(ScenarioDefect::NotPositional {
                parameter: parameter.name.clone(),
            }));
        }
        let parameters = routine.parameters.len();
        if parameters > sources.len() {
            return Err(fail(ScenarioDefect::TooManyParameters {
                parameters,
                sources: sources.len(),
            }));
        }
        if parameters < sources.len() {
            return Err(fail(ScenarioDefect::TooFewParameters {
                parameters,
                sources: sources.len(),
            }));
        }
        Ok(Self {
            inner: Arc::new(ScenarioInner { routine, sources }),
        })
    }

    pub fn name(&self) -> &str {
        self.inner.routine.name()
    }

    pub fn routine(&self) -> &Routine {
        &self.inner.routine
    }

    pub fn sources(&self) -> &[Box<dyn ArgumentSource>] {
        &self.inner.sources
    }

    /// Case-data slots in order of first appearance among the sources.
    pub fn slots(&self) -> Vec<SlotId> {
        let mut slots: Vec<SlotId> = Vec::new();
        for slot in self.inner.sources.iter().filter_map(|source| source.slot()) {
            if !slots.contains(&slot) {
                slots.push(slot);
            }
        }
        slots
    }

    /// Bind `values` to this scenario's slots, left to right, producing a case.
    pub fn data(&self, values: impl IntoIterator<Item = Value>) -> Result<Case, CaseArityError> {
        let values: Vec<Value> = values.into_iter().collect();
        let slots = self.slots();
        if values.len() != slots.len() {
            return Err(CaseArityError {
                routine: self.name().to_string(),
                expected: slots.len(),
                actual: values.len(),
            });
        }
        let params: BTreeMap<SlotId, Value> = slots.into_iter().zip(values).collect();
        Ok(Case::new(self.clone(), params))
    }
}
