use crate::engine::FieldRecord;
use crate::statics;
use std::fmt::Write as _;

/// A field prepared for display: carries the fixed-width lexical sort key and
/// the dotted name used as the unique filtering/selection key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayField {
    pub inner: FieldRecord,
    pub sort_key: String,
    pub display_name: String,
}

impl DisplayField {
    pub fn new(inner: FieldRecord) -> Self {
        let sort_key = sort_key_for(&inner.path);
        let display_name = inner.named_path.join(".");
        Self {
            inner,
            sort_key,
            display_name,
        }
    }

    /// Numeric path rendered for the optional "path" column.
    pub fn path_label(&self) -> String {
        let mut out = String::new();
        for (i, p) in self.inner.path.iter().enumerate() {
            if i > 0 {
                out.push('/');
            }
            write!(out, "{p}").ok();
        }
        out
    }
}

/// Each path element zero-padded to a fixed width and concatenated, so plain
/// lexical comparison of keys orders paths element-by-element numerically,
/// with a strict prefix sorting before its extensions.
pub fn sort_key_for(path: &[u32]) -> String {
    let mut key = String::with_capacity(path.len() * statics::SORT_KEY_PAD);
    for p in path {
        write!(key, "{p:0width$}", width = statics::SORT_KEY_PAD).ok();
    }
    key
}

/// Derive display records and sort them into the display order.
pub fn build_display_fields(records: Vec<FieldRecord>) -> Vec<DisplayField> {
    let mut fields: Vec<DisplayField> = records.into_iter().map(DisplayField::new).collect();
    fields.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
    fields
}
