//! Artifact namespace: the name-keyed bindings a submission exposes.
use super::failure::Failure;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Something the artifact exposes that verification code can invoke.
pub trait Callable {
    fn call(&self, args: &[Value]) -> Result<Value, Failure>;
}

impl<F> Callable for F
where
    F: Fn(&[Value]) -> Result<Value, Failure>,
{
    fn call(&self, args: &[Value]) -> Result<Value, Failure> {
        self(args)
    }
}

/// One named entry of the namespace.
#[derive(Clone)]
pub enum Binding {
    Value(Value),
    Function(Rc<dyn Callable>),
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Binding::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// A resolved positional argument handed to a verification routine.
pub type Arg = Binding;

impl Binding {
    /// Borrow the JSON value, failing with a `TypeError` for callables.
    #[track_caller]
    pub fn value(&self) -> Result<&Value, Failure> {
        match self {
            Binding::Value(value) => Ok(value),
            Binding::Function(_) => Err(Failure::type_error(
                "expected a value but found a callable",
            )),
        }
    }

    /// Invoke the callable, failing with a `TypeError` for plain values.
    #[track_caller]
    pub fn call(&self, args: &[Value]) -> Result<Value, Failure> {
        match self {
            Binding::Function(function) => function.call(args),
            Binding::Value(value) => Err(Failure::type_error(format!(
                "object {value} is not callable"
            ))),
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Binding::Function(_))
    }
}

/// Loaded artifact namespace shared by every case of a run.
///
/// The namespace itself is read-only during grading; artifact state lives
/// behind its callables and is observed by later cases.
#[derive(Debug, Default, Clone)]
pub struct Namespace {
    name: String,
    bindings: BTreeMap<String, Binding>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindings: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn insert_value(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.bindings.insert(name.into(), Binding::Value(value));
        self
    }

    pub fn insert_function<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: Fn(&[Value]) -> Result<Value, Failure> + 'static,
    {
        self.bindings
            .insert(name.into(), Binding::Function(Rc::new(function)));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, binding: Binding) -> &mut Self {
        self.bindings.insert(name.into(), binding);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Look up `name`, failing with a `LookupError` when it is not defined.
    pub fn lookup(&self, name: &str) -> Result<Binding, Failure> {
        self.bindings.get(name).cloned().ok_or_else(|| {
            Failure::lookup(format!(
                "namespace {:?} has no attribute {:?}",
                self.name, name
            ))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
