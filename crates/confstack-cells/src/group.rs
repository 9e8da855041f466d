//! Grouped commit with a single change notification
//!
//! Several staged cells usually belong to one backing file or registry
//! section. A [`CellGroup`] commits them in registration order and, when
//! any of them actually changed production, writes `Value::Null` once to a
//! configured notification path — the signal a sysconfig backend uses to
//! flush the touched file.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use confstack_store::{StorePath, ValueStore};

use crate::{error::Result, staging::Stageable};

/// Ordered collection of staged cells sharing one notification write.
///
/// Commit order is registration order. A member failure propagates
/// immediately: earlier members stay committed, later members and the
/// notification are not attempted. Nothing stops two members from
/// aliasing the same store path; that is the caller's choice.
pub struct CellGroup {
    members: Vec<Box<dyn Stageable>>,
    store: Arc<dyn ValueStore>,
    notify_path: StorePath,
}

impl CellGroup {
    /// Create an empty group notifying `notify_path` in `store`
    pub fn new(store: Arc<dyn ValueStore>, notify_path: impl Into<StorePath>) -> Self {
        Self {
            members: Vec::new(),
            store,
            notify_path: notify_path.into(),
        }
    }

    /// Append a staged cell; commits run in this order
    pub fn add(&mut self, member: impl Stageable + 'static) {
        self.members.push(Box::new(member));
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Stageable for CellGroup {
    /// Commit every member in order, then notify the store once if any of
    /// them changed production; returns whether any did
    fn commit(&mut self) -> Result<bool> {
        let mut changed = false;
        for member in &mut self.members {
            changed |= member.commit()?;
        }
        if changed {
            self.store.write(&self.notify_path, Value::Null)?;
            debug!("Group changed, notified store at {}", self.notify_path);
        }
        Ok(changed)
    }

    /// Reset every member; no notification
    fn reset(&mut self) {
        for member in &mut self.members {
            member.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CellError;
    use confstack_store::StoreError;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::RwLock;

    /// Store recording every write so tests can count notifications
    #[derive(Default)]
    struct RecordingStore {
        writes: RwLock<Vec<(StorePath, Value)>>,
    }

    impl RecordingStore {
        fn writes(&self) -> Vec<(StorePath, Value)> {
            self.writes.read().unwrap().clone()
        }
    }

    impl ValueStore for RecordingStore {
        fn read(&self, _path: &StorePath) -> confstack_store::StoreResult<Value> {
            Ok(Value::Null)
        }

        fn write(&self, path: &StorePath, value: Value) -> confstack_store::StoreResult<()> {
            self.writes.write().unwrap().push((path.clone(), value));
            Ok(())
        }
    }

    /// Scripted member reporting a fixed commit outcome
    #[derive(Clone, Default)]
    struct ScriptedMember {
        outcome: Option<bool>,
        commits: Rc<RefCell<usize>>,
        resets: Rc<RefCell<usize>>,
    }

    impl ScriptedMember {
        fn reporting(outcome: bool) -> Self {
            Self {
                outcome: Some(outcome),
                ..Self::default()
            }
        }

        fn failing() -> Self {
            Self::default()
        }
    }

    impl Stageable for ScriptedMember {
        fn commit(&mut self) -> Result<bool> {
            *self.commits.borrow_mut() += 1;
            match self.outcome {
                Some(outcome) => Ok(outcome),
                None => Err(CellError::Store(StoreError::Lock)),
            }
        }

        fn reset(&mut self) {
            *self.resets.borrow_mut() += 1;
        }
    }

    fn group_over(store: &Arc<RecordingStore>) -> CellGroup {
        CellGroup::new(Arc::clone(store) as Arc<dyn ValueStore>, ".network")
    }

    #[test]
    fn empty_group_commits_to_false_without_notifying() {
        let store = Arc::new(RecordingStore::default());
        let mut group = group_over(&store);

        assert!(group.is_empty());
        assert!(!group.commit().unwrap());
        assert!(store.writes().is_empty());
    }

    #[test]
    fn unchanged_members_mean_no_notification() {
        let store = Arc::new(RecordingStore::default());
        let mut group = group_over(&store);
        group.add(ScriptedMember::reporting(false));
        group.add(ScriptedMember::reporting(false));

        assert!(!group.commit().unwrap());
        assert!(store.writes().is_empty());
    }

    #[test]
    fn one_changed_member_triggers_exactly_one_notification() {
        let store = Arc::new(RecordingStore::default());
        let mut group = group_over(&store);
        group.add(ScriptedMember::reporting(true));
        group.add(ScriptedMember::reporting(false));

        assert!(group.commit().unwrap());
        assert_eq!(store.writes(), vec![(StorePath::new(".network"), Value::Null)]);
    }

    #[test]
    fn every_member_commits_even_after_a_change() {
        let store = Arc::new(RecordingStore::default());
        let mut group = group_over(&store);
        let first = ScriptedMember::reporting(true);
        let second = ScriptedMember::reporting(false);
        group.add(first.clone());
        group.add(second.clone());

        group.commit().unwrap();
        assert_eq!(*first.commits.borrow(), 1);
        assert_eq!(*second.commits.borrow(), 1);
    }

    #[test]
    fn a_member_error_aborts_later_members_and_the_notification() {
        let store = Arc::new(RecordingStore::default());
        let mut group = group_over(&store);
        let first = ScriptedMember::reporting(true);
        let last = ScriptedMember::reporting(true);
        group.add(first.clone());
        group.add(ScriptedMember::failing());
        group.add(last.clone());

        assert!(group.commit().is_err());
        assert_eq!(*first.commits.borrow(), 1);
        assert_eq!(*last.commits.borrow(), 0);
        assert!(store.writes().is_empty());
    }

    #[test]
    fn reset_forwards_to_members_without_notifying() {
        let store = Arc::new(RecordingStore::default());
        let mut group = group_over(&store);
        let first = ScriptedMember::reporting(true);
        let second = ScriptedMember::reporting(true);
        group.add(first.clone());
        group.add(second.clone());

        group.reset();
        assert_eq!(*first.resets.borrow(), 1);
        assert_eq!(*second.resets.borrow(), 1);
        assert!(store.writes().is_empty());
    }

    #[test]
    fn real_staged_cells_commit_in_registration_order() {
        let store = Arc::new(RecordingStore::default());
        let mut group = group_over(&store);

        let mut a = crate::staging::sysconfig_flag(
            Arc::clone(&store) as Arc<dyn ValueStore>,
            ".network.NETWORKING",
        );
        let mut b = crate::staging::sysconfig_flag(
            Arc::clone(&store) as Arc<dyn ValueStore>,
            ".network.IPV6",
        );
        use crate::cell::ConfigCell;
        a.set(json!(true)).unwrap();
        b.set(json!(false)).unwrap();
        group.add(a);
        group.add(b);

        assert!(group.commit().unwrap());
        assert_eq!(
            store.writes(),
            vec![
                (StorePath::new(".network.NETWORKING"), json!("yes")),
                (StorePath::new(".network.IPV6"), json!("no")),
                (StorePath::new(".network"), Value::Null),
            ]
        );
    }
}
