//! Property-based tests for the cell stack laws
//!
//! The laws hold for every value the stack can carry, a cached `Null` or
//! `false` included, so the strategies generate across all leaf kinds.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;

use confstack_cells::{ConfigCell, MemoryCell, ReadCacheCell, StagingCell, Stageable, WriteCacheCell};

/// Strategy over the leaf values a configuration cell carries
fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 _\\-]{0,16}".prop_map(Value::String),
    ]
}

#[derive(Debug, Default)]
struct Probe {
    value: Value,
    gets: usize,
    sets: Vec<Value>,
}

#[derive(Clone, Default)]
struct ProbeCell(Rc<RefCell<Probe>>);

impl ProbeCell {
    fn holding(value: Value) -> Self {
        let probe = ProbeCell::default();
        probe.0.borrow_mut().value = value;
        probe
    }
}

impl ConfigCell for ProbeCell {
    fn get(&mut self) -> confstack_cells::Result<Value> {
        let mut probe = self.0.borrow_mut();
        probe.gets += 1;
        Ok(probe.value.clone())
    }

    fn set(&mut self, value: Value) -> confstack_cells::Result<Value> {
        let mut probe = self.0.borrow_mut();
        probe.sets.push(value.clone());
        probe.value = value.clone();
        Ok(value)
    }
}

proptest! {
    /// Property: a memory cell returns exactly what was put in
    #[test]
    fn prop_memory_cell_roundtrip(value in value_strategy()) {
        let mut cell = MemoryCell::new();
        prop_assert_eq!(cell.set(value.clone()).unwrap(), value.clone());
        prop_assert_eq!(cell.get().unwrap(), value);
    }

    /// Property: any number of reads delegates to the lower cell at most once
    #[test]
    fn prop_read_cache_reads_lower_once(value in value_strategy(), reads in 1usize..8) {
        let lower = ProbeCell::holding(value.clone());
        let mut cell = ReadCacheCell::new(lower.clone());

        for _ in 0..reads {
            prop_assert_eq!(cell.get().unwrap(), value.clone());
        }
        prop_assert_eq!(lower.0.borrow().gets, 1);
    }

    /// Property: N identical writes collapse into one lower write
    #[test]
    fn prop_write_cache_collapses_repeats(value in value_strategy(), repeats in 1usize..8) {
        let lower = ProbeCell::default();
        let mut cell = WriteCacheCell::new(lower.clone());

        for _ in 0..repeats {
            cell.set(value.clone()).unwrap();
        }
        prop_assert_eq!(lower.0.borrow().sets.clone(), vec![value]);
    }

    /// Property: differing consecutive writes all reach the lower cell
    #[test]
    fn prop_write_cache_passes_changes(a in value_strategy(), b in value_strategy()) {
        prop_assume!(a != b);
        let lower = ProbeCell::default();
        let mut cell = WriteCacheCell::new(lower.clone());

        cell.set(a.clone()).unwrap();
        cell.set(b.clone()).unwrap();
        prop_assert_eq!(lower.0.borrow().sets.clone(), vec![a, b]);
    }

    /// Property: staging a value equal to production never writes, staging
    /// a differing value writes it exactly once
    #[test]
    fn prop_staging_writes_iff_different(held in value_strategy(), staged in value_strategy()) {
        let production = ProbeCell::holding(held.clone());
        let mut cell = StagingCell::new(production.clone());

        cell.set(staged.clone()).unwrap();
        let committed = cell.commit().unwrap();

        if staged == held {
            prop_assert!(!committed);
            prop_assert!(production.0.borrow().sets.is_empty());
        } else {
            prop_assert!(committed);
            prop_assert_eq!(production.0.borrow().sets.clone(), vec![staged]);
        }
    }

    /// Property: reset always returns reads to production
    #[test]
    fn prop_reset_restores_production(held in value_strategy(), staged in value_strategy()) {
        let production = ProbeCell::holding(held.clone());
        let mut cell = StagingCell::new(production);

        cell.set(staged).unwrap();
        cell.reset();
        prop_assert_eq!(cell.get().unwrap(), held);
    }
}
