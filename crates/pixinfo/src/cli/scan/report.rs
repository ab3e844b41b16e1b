//! Progress reporting: fans pipeline events out to a progress bar and any
//! number of attached sinks (results table, status line).

use indicatif::{ProgressBar, ProgressStyle};
use pixinfo_core::{ImageRecord, ProgressSink};

/// Forwards every event to its attached sinks and drives a progress bar.
#[derive(Default)]
pub struct Reporter<'a> {
    sinks: Vec<&'a mut dyn ProgressSink>,
    progress: Option<ProgressBar>,
    show_progress: bool,
}

impl<'a> Reporter<'a> {
    /// A reporter that shows a progress bar on stderr while a run is active.
    pub fn new() -> Self {
        Self {
            show_progress: true,
            ..Self::default()
        }
    }

    /// A reporter that only forwards events.
    pub fn quiet() -> Self {
        Self::default()
    }

    /// Attach another sink.
    pub fn with(mut self, sink: &'a mut dyn ProgressSink) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl ProgressSink for Reporter<'_> {
    fn started(&mut self, total: usize) {
        if self.show_progress {
            self.progress = Some(create_progress_bar(total as u64));
        }
        for sink in &mut self.sinks {
            sink.started(total);
        }
    }

    fn record(&mut self, record: &ImageRecord, processed: usize, total: usize) {
        if let Some(pb) = &self.progress {
            pb.set_message(record.name.clone());
            pb.set_position(processed as u64);
        }
        for sink in &mut self.sinks {
            sink.record(record, processed, total);
        }
    }

    fn completed(&mut self, total: usize) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
        for sink in &mut self.sinks {
            sink.completed(total);
        }
    }

    fn no_images(&mut self) {
        for sink in &mut self.sinks {
            sink.no_images();
        }
    }
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("##-"));
    }
    pb.set_message("starting...");
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixinfo_core::config::StatusConfig;
    use pixinfo_core::{ResultTable, StatusLine, StatusMessage};

    #[test]
    fn events_reach_every_sink() {
        let mut table = ResultTable::new();
        let mut status = StatusLine::new(&StatusConfig::default());
        {
            let mut reporter = Reporter::quiet().with(&mut table).with(&mut status);
            reporter.started(2);
            reporter.record(&ImageRecord::new("a.png"), 1, 2);
        }
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.total(), 2);
        assert_eq!(
            status.message(),
            StatusMessage::Progress {
                processed: 1,
                total: 2
            }
        );
    }

    #[test]
    fn no_images_is_forwarded() {
        let mut status = StatusLine::new(&StatusConfig::default());
        Reporter::quiet().with(&mut status).no_images();
        assert_eq!(status.message(), StatusMessage::NoImages);
    }
}
