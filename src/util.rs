//! Stage timing for the generation pipeline

use std::time::{Duration, Instant};

use log::Level;

/// Logs how long a pipeline stage ran once it goes out of scope
///
/// ```ignore
/// let _t = Timed::debug("Fortune sweep").items(sites.len());
/// // logs "Fortune sweep: 256 items in 1.234ms"
/// ```
pub struct Timed {
    stage: &'static str,
    level: Level,
    items: Option<usize>,
    start: Instant,
}

impl Timed {
    pub fn new(level: Level, stage: &'static str) -> Self {
        Self {
            stage,
            level,
            items: None,
            start: Instant::now(),
        }
    }

    #[inline]
    pub fn info(stage: &'static str) -> Self {
        Self::new(Level::Info, stage)
    }

    #[inline]
    pub fn debug(stage: &'static str) -> Self {
        Self::new(Level::Debug, stage)
    }

    /// Include the number of items the stage handled in the report
    pub fn items(mut self, count: usize) -> Self {
        self.items = Some(count);
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn report(&self) -> String {
        match self.items {
            Some(count) => format!("{}: {} items in {:.3?}", self.stage, count, self.elapsed()),
            None => format!("{} took {:.3?}", self.stage, self.elapsed()),
        }
    }
}

impl Drop for Timed {
    fn drop(&mut self) {
        if log::log_enabled!(self.level) {
            log::log!(self.level, "{}", self.report());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_names_stage_and_items() {
        let plain = Timed::info("Graph build");
        assert_eq!(plain.level, Level::Info);
        assert!(plain.report().starts_with("Graph build took "));

        let counted = Timed::debug("Fortune sweep").items(12);
        assert_eq!(counted.level, Level::Debug);
        assert!(counted.report().starts_with("Fortune sweep: 12 items in "));
    }

    #[test]
    fn test_elapsed_grows() {
        let t = Timed::new(Level::Trace, "Wait");
        let first = t.elapsed();
        std::thread::sleep(Duration::from_millis(2));
        assert!(t.elapsed() >= first + Duration::from_millis(2));
    }
}
