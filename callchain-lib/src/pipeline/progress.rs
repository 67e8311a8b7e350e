use std::cell::RefCell;
use tracing::trace;
use super::stage::Stage;

/// Sink for the progress line each stage emits when it starts
pub trait Progress {
    fn emit(&self, stage: Stage);
}

/// Prints progress lines to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutProgress;

impl Progress for StdoutProgress {
    fn emit(&self, stage: Stage) {
        trace!(%stage, "stage started");
        println!("{}", stage.message());
    }
}

/// Keeps emitted stages in memory
#[derive(Debug, Default)]
pub struct RecordingProgress {
    stages: RefCell<Vec<Stage>>,
}

impl RecordingProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stages(&self) -> Vec<Stage> {
        self.stages.borrow().clone()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<&'static str> {
        self.stages.borrow().iter().map(|s| s.message()).collect()
    }
}

impl Progress for RecordingProgress {
    fn emit(&self, stage: Stage) {
        self.stages.borrow_mut().push(stage);
    }
}

impl<P: Progress + ?Sized> Progress for &P {
    fn emit(&self, stage: Stage) {
        (**self).emit(stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_progress_keeps_order() {
        let progress = RecordingProgress::new();
        progress.emit(Stage::ProcessData);
        progress.emit(Stage::ValidateInput);
        assert_eq!(progress.stages(), vec![Stage::ProcessData, Stage::ValidateInput]);
        assert_eq!(progress.messages(), vec!["Processing data...", "Validating input..."]);
    }

    #[test]
    fn test_progress_through_reference() {
        let progress = RecordingProgress::new();
        let by_ref = &progress;
        by_ref.emit(Stage::TransformData);
        assert_eq!(progress.stages(), vec![Stage::TransformData]);
    }
}
