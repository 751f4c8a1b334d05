/// The minimal contiguous row range to materialize for a scroll viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowWindow {
    /// First visible row.
    pub first: usize,
    /// One past the last visible row.
    pub last: usize,
    /// Height the scroll container must report for N rows.
    pub total_height: f32,
    row_height: f32,
}

impl RowWindow {
    /// Absolute vertical offset of a row inside the scroll container.
    pub fn offset_of(&self, row: usize) -> f32 {
        row as f32 * self.row_height
    }

    pub fn rows(&self) -> std::ops::Range<usize> {
        self.first..self.last
    }

    pub fn len(&self) -> usize {
        self.last - self.first
    }

    pub fn is_empty(&self) -> bool {
        self.first == self.last
    }
}

/// Map a scroll offset and viewport size onto the rows that can intersect the
/// viewport, assuming a fixed estimated row height. Cost is O(1); rendering
/// cost is then proportional to the visible row count, not the list length.
pub fn row_window(
    scroll_offset: f32,
    viewport_height: f32,
    row_count: usize,
    row_height: f32,
) -> RowWindow {
    let total_height = row_count as f32 * row_height;
    if row_count == 0 || row_height <= 0.0 || viewport_height <= 0.0 {
        return RowWindow {
            first: 0,
            last: 0,
            total_height,
            row_height,
        };
    }

    let offset = scroll_offset.max(0.0);
    let first = ((offset / row_height).floor() as usize).min(row_count);
    let last = (((offset + viewport_height) / row_height).ceil() as usize).min(row_count);

    RowWindow {
        first,
        last: last.max(first),
        total_height,
        row_height,
    }
}
