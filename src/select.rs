use indexmap::IndexSet;

/// How a field row was clicked, derived from keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickMode {
    Plain,
    Toggle,
    Range,
}

/// Multi-selection over the field list. Members are `display_name` keys;
/// insertion order is kept so a selected-fields export reads in click order.
/// The anchor is the row index (into the filtered list) of the last explicit
/// selection, used for range extension.
#[derive(Debug, Default)]
pub struct FieldSelection {
    selected: IndexSet<String>,
    anchor: Option<usize>,
}

impl FieldSelection {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// Selected names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Apply a click on filtered row `row`. `name_at` resolves a filtered row
    /// to its display name (only consulted for the rows a range spans).
    pub fn click(&mut self, row: usize, mode: ClickMode, name_at: impl Fn(usize) -> String) {
        match mode {
            ClickMode::Plain => self.plain_click(row, name_at(row)),
            ClickMode::Toggle => {
                let name = name_at(row);
                if !self.selected.shift_remove(&name) {
                    self.selected.insert(name);
                }
                self.anchor = Some(row);
            }
            ClickMode::Range => match self.anchor {
                // Without an anchor there is nothing to extend from.
                None => self.plain_click(row, name_at(row)),
                Some(anchor) => {
                    let (lo, hi) = if anchor <= row { (anchor, row) } else { (row, anchor) };
                    self.selected = (lo..=hi).map(&name_at).collect();
                    // The anchor stays put so further shift-clicks re-extend.
                }
            },
        }
    }

    fn plain_click(&mut self, row: usize, name: String) {
        // Clicking the sole selected row again keeps it selected; this guards
        // against losing a selection to a stray click.
        if self.selected.len() == 1 && self.selected.contains(&name) {
            return;
        }
        self.selected.clear();
        self.selected.insert(name);
        self.anchor = Some(row);
    }

    /// Drop members no longer present in the filtered list. `is_present`
    /// answers for display names; `row_count` is the new list length, used to
    /// drop an anchor that no longer addresses a row.
    pub fn prune(&mut self, row_count: usize, is_present: impl Fn(&str) -> bool) {
        self.selected.retain(|name| is_present(name));
        if self.anchor.is_some_and(|a| a >= row_count) {
            self.anchor = None;
        }
    }

    /// Selected entity or view changed: the selection context is gone.
    pub fn reset(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }
}
