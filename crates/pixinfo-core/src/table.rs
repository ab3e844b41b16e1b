//! The results table shown to the user, with its progress counters.

use crate::output::render_table;
use crate::pipeline::ProgressSink;
use crate::types::ImageRecord;

/// Rows of the current run plus processed/total counters.
///
/// Starting a run clears whatever the previous run left behind.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    rows: Vec<ImageRecord>,
    processed: usize,
    total: usize,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ImageRecord] {
        &self.rows
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drop all rows and reset both counters.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.processed = 0;
        self.total = 0;
    }

    /// Render as an aligned text table.
    pub fn render(&self) -> String {
        render_table(&self.rows)
    }
}

impl ProgressSink for ResultTable {
    fn started(&mut self, total: usize) {
        self.clear();
        self.total = total;
    }

    fn record(&mut self, record: &ImageRecord, processed: usize, _total: usize) {
        self.rows.push(record.clone());
        self.processed = processed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(table: &mut ResultTable, names: &[&str]) {
        table.started(names.len());
        for (i, name) in names.iter().enumerate() {
            table.record(&ImageRecord::new(*name), i + 1, names.len());
        }
        table.completed(names.len());
    }

    #[test]
    fn test_run_fills_rows_and_counters() {
        let mut table = ResultTable::new();
        fill(&mut table, &["a.png", "b.png"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.processed(), 2);
        assert_eq!(table.total(), 2);
    }

    #[test]
    fn test_new_run_replaces_previous_rows() {
        let mut table = ResultTable::new();
        fill(&mut table, &["a.png", "b.png", "c.png"]);
        fill(&mut table, &["d.png"]);
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].name, "d.png");
        assert_eq!(table.total(), 1);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut table = ResultTable::new();
        fill(&mut table, &["a.png"]);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.processed(), 0);
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn test_clear_mid_run_resets_counters() {
        let mut table = ResultTable::new();
        table.started(5);
        table.record(&ImageRecord::new("a.png"), 1, 5);
        table.clear();
        assert!(table.is_empty());
        assert_eq!((table.processed(), table.total()), (0, 0));
    }
}
