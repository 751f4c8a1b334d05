use std::rc::Rc;

/// Name predicate handed over by the search widget. `Rc` because the active
/// predicate is re-run when the source list is replaced; everything stays on
/// the UI thread.
pub type NamePredicate = Rc<dyn Fn(&str) -> bool>;

/// What a call to [`DeferredFilter::step`] accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No recomputation scheduled.
    Idle,
    /// A scan is in flight; call `step` again next frame.
    Pending,
    /// A new filtered list committed this call; selections may need pruning.
    Committed,
}

struct PendingScan {
    predicate: NamePredicate,
    cursor: usize,
    matched: Vec<usize>,
}

/// Filter stage shared by both pipelines. Owns the unfiltered list as the
/// source of truth and recomputes the filtered index list as interruptible,
/// lower-priority work: at most one scan is in flight, and submitting a new
/// predicate invalidates it before it commits (latest predicate wins).
pub struct DeferredFilter<T> {
    name_of: fn(&T) -> &str,
    items: Vec<T>,
    active: Option<NamePredicate>,
    filtered: Vec<usize>,
    pending: Option<PendingScan>,
}

impl<T> DeferredFilter<T> {
    pub fn new(name_of: fn(&T) -> &str) -> Self {
        Self {
            name_of,
            items: Vec::new(),
            active: None,
            filtered: Vec::new(),
            pending: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Indices into `items` that currently pass the committed predicate, in
    /// source order.
    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    pub fn get(&self, row: usize) -> Option<&T> {
        self.filtered.get(row).map(|&i| &self.items[i])
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace the source list. The filtered list is reset to the identity
    /// immediately (old indices would dangle) and the newest predicate is
    /// rescheduled over the new items: an in-flight scan's predicate
    /// supersedes the last committed one.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.filtered = (0..self.items.len()).collect();
        let predicate = self
            .pending
            .take()
            .map(|scan| scan.predicate)
            .or_else(|| self.active.clone());
        self.pending = predicate.map(|predicate| PendingScan {
            predicate,
            cursor: 0,
            matched: Vec::new(),
        });
    }

    /// Hand over a new predicate (or `None` when the search was cleared).
    /// Clearing commits the identity immediately; a predicate schedules a
    /// deferred scan, superseding any in-flight one. Returns `true` when the
    /// filtered list changed within this call.
    pub fn submit(&mut self, predicate: Option<NamePredicate>) -> bool {
        match predicate {
            None => {
                self.active = None;
                self.pending = None;
                self.filtered = (0..self.items.len()).collect();
                true
            }
            Some(predicate) => {
                self.pending = Some(PendingScan {
                    predicate,
                    cursor: 0,
                    matched: Vec::new(),
                });
                false
            }
        }
    }

    /// Advance the in-flight scan by at most `budget` items.
    pub fn step(&mut self, budget: usize) -> StepOutcome {
        let Some(mut scan) = self.pending.take() else {
            return StepOutcome::Idle;
        };

        let end = scan.cursor.saturating_add(budget).min(self.items.len());
        for i in scan.cursor..end {
            if (scan.predicate)((self.name_of)(&self.items[i])) {
                scan.matched.push(i);
            }
        }
        scan.cursor = end;

        if scan.cursor < self.items.len() {
            self.pending = Some(scan);
            return StepOutcome::Pending;
        }

        self.active = Some(scan.predicate);
        self.filtered = scan.matched;
        StepOutcome::Committed
    }

    /// Drive the scan to completion. Test/export helper; the GUI steps with a
    /// per-frame budget instead.
    pub fn run_to_completion(&mut self) -> StepOutcome {
        loop {
            match self.step(usize::MAX) {
                StepOutcome::Pending => continue,
                done => return done,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(filter: &DeferredFilter<String>) -> Vec<&str> {
        filter
            .filtered()
            .iter()
            .map(|&i| filter.items()[i].as_str())
            .collect()
    }

    fn contains(needle: &str) -> NamePredicate {
        let needle = needle.to_string();
        Rc::new(move |name: &str| name.contains(&needle))
    }

    fn filter_with(items: &[&str]) -> DeferredFilter<String> {
        let mut f = DeferredFilter::new(|s: &String| s.as_str());
        f.set_items(items.iter().map(|s| s.to_string()).collect());
        f
    }

    #[test]
    fn cleared_search_equals_unfiltered_list() {
        let mut f = filter_with(&["alpha", "beta", "gamma"]);
        f.submit(Some(contains("a")));
        f.run_to_completion();
        f.submit(None);
        assert_eq!(names(&f), vec!["alpha", "beta", "gamma"]);
        assert!(!f.is_pending());
    }

    #[test]
    fn scan_is_interruptible_and_commits_once_done() {
        let mut f = filter_with(&["aa", "ab", "bb", "ba"]);
        f.submit(Some(contains("a")));

        assert_eq!(f.step(2), StepOutcome::Pending);
        // Old committed list still served while the scan is in flight.
        assert_eq!(names(&f), vec!["aa", "ab", "bb", "ba"]);

        assert_eq!(f.step(2), StepOutcome::Committed);
        assert_eq!(names(&f), vec!["aa", "ab", "ba"]);
        assert_eq!(f.step(2), StepOutcome::Idle);
    }

    #[test]
    fn newer_predicate_supersedes_in_flight_scan() {
        let mut f = filter_with(&["aa", "ab", "bb", "ba"]);
        f.submit(Some(contains("a")));
        assert_eq!(f.step(1), StepOutcome::Pending);

        // A faster typist: only the newest predicate may commit.
        f.submit(Some(contains("bb")));
        assert_eq!(f.step(usize::MAX), StepOutcome::Committed);
        assert_eq!(names(&f), vec!["bb"]);
    }

    #[test]
    fn set_items_resets_then_reruns_active_predicate() {
        let mut f = filter_with(&["aa", "bb"]);
        f.submit(Some(contains("a")));
        f.run_to_completion();
        assert_eq!(names(&f), vec!["aa"]);

        f.set_items(vec!["ba".to_string(), "bb".to_string(), "ab".to_string()]);
        // Identity until the rescheduled scan commits.
        assert_eq!(names(&f), vec!["ba", "bb", "ab"]);
        assert!(f.is_pending());
        assert_eq!(f.run_to_completion(), StepOutcome::Committed);
        assert_eq!(names(&f), vec!["ba", "ab"]);
    }

    #[test]
    fn set_items_reschedules_an_in_flight_predicate_over_a_committed_one() {
        let mut f = filter_with(&["aa", "bb", "ab"]);
        f.submit(Some(contains("a")));
        f.run_to_completion();
        assert_eq!(names(&f), vec!["aa", "ab"]);

        // A newer query is still in flight when the source list is replaced;
        // it, not the committed one, must drive the rescheduled scan.
        f.submit(Some(contains("b")));
        f.set_items(vec!["aa".to_string(), "bb".to_string(), "ab".to_string()]);
        assert_eq!(f.run_to_completion(), StepOutcome::Committed);
        assert_eq!(names(&f), vec!["bb", "ab"]);
    }

    #[test]
    fn unbounded_step_after_a_partial_one_commits() {
        let mut f = filter_with(&["aa", "ab", "bb", "ba"]);
        f.submit(Some(contains("a")));
        assert_eq!(f.step(1), StepOutcome::Pending);

        // A giant budget must finish from a nonzero cursor, not wrap.
        assert_eq!(f.step(usize::MAX), StepOutcome::Committed);
        assert_eq!(names(&f), vec!["aa", "ab", "ba"]);
    }
}
