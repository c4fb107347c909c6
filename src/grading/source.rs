//! Argument sources: where each positional input of a verification routine
//! comes from.
use super::case::Case;
use super::failure::Failure;
use super::namespace::{Arg, Namespace};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static SLOT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Identity of a case-data slot, unique across every scenario of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(u64);

impl SlotId {
    fn mint() -> Self {
        SlotId(SLOT_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

/// Resolves one input value for a case.
///
/// Sources are resolved once per case execution, in declared order.
pub trait ArgumentSource: fmt::Debug + Send + Sync {
    fn resolve(&self, case: &Case, namespace: &Namespace) -> Result<Arg, Failure>;

    /// Case-data slot filled by this source, if it reads case data.
    fn slot(&self) -> Option<SlotId> {
        None
    }
}

/// Fetches a binding from the artifact namespace by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleItem {
    name: String,
}

impl ModuleItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ArgumentSource for ModuleItem {
    fn resolve(&self, _case: &Case, namespace: &Namespace) -> Result<Arg, Failure> {
        namespace.lookup(&self.name)
    }
}

/// Reads the value the owning case bound to this slot.
#[derive(Debug, PartialEq, Eq)]
pub struct Param {
    slot: SlotId,
}

impl Param {
    /// Mint a fresh slot. Every call yields a distinct identity.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            slot: SlotId::mint(),
        }
    }
}

impl ArgumentSource for Param {
    fn resolve(&self, case: &Case, _namespace: &Namespace) -> Result<Arg, Failure> {
        case.param(self.slot).cloned().map(Arg::Value).ok_or_else(|| {
            Failure::internal(format!(
                "case for {:?} has no value bound to {}",
                case.scenario().name(),
                self.slot
            ))
        })
    }

    fn slot(&self) -> Option<SlotId> {
        Some(self.slot)
    }
}

/// Boxed namespace lookup, for building scenario source lists.
pub fn module_item(name: impl Into<String>) -> Box<dyn ArgumentSource> {
    Box::new(ModuleItem::new(name))
}

/// Boxed fresh case-data slot, for building scenario source lists.
pub fn param() -> Box<dyn ArgumentSource> {
    Box::new(Param::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_mint_distinct_slots() {
        let first = Param::new();
        let second = Param::new();
        assert_ne!(first.slot(), second.slot());
        assert!(first.slot().is_some());
    }

    #[test]
    fn module_items_have_no_slot() {
        let item = ModuleItem::new("count_even");
        assert_eq!(item.slot(), None);
        assert_eq!(item.name(), "count_even");
    }
}
