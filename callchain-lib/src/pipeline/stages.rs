use serde_json::{Map, Value};
use crate::error::PipelineError;
use super::clock::{Clock, SystemClock};
use super::progress::{Progress, StdoutProgress};
use super::record::{is_truthy, OutputRecord};
use super::stage::Stage;

/// The demo pipeline. Each method announces itself through `progress` before
/// doing its work; `transform_data` stamps records with `clock`.
#[derive(Debug, Clone, Default)]
pub struct DemoPipeline<C = SystemClock, P = StdoutProgress> {
    clock: C,
    progress: P,
}

impl DemoPipeline {
    /// Pipeline on the system clock that prints to stdout
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock, P: Progress> DemoPipeline<C, P> {
    #[must_use]
    pub fn with_parts(clock: C, progress: P) -> Self {
        DemoPipeline { clock, progress }
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    /// Entry point: validate, then transform.
    ///
    /// # Errors
    ///
    /// Only if `transform_data` fails, which validation rules out.
    pub fn process_data(&self, data: Option<&Value>) -> Result<Option<OutputRecord>, PipelineError> {
        self.progress.emit(Stage::ProcessData);
        match self.validate_input(data) {
            Some(valid) => self.transform_data(valid).map(Some),
            None => Ok(None),
        }
    }

    /// Returns the record unchanged when it passes the format checks
    pub fn validate_input<'a>(&self, data: Option<&'a Value>) -> Option<&'a Value> {
        self.progress.emit(Stage::ValidateInput);
        let data = data.filter(|d| is_truthy(d))?;
        if self.check_format(data) {
            Some(data)
        } else {
            None
        }
    }

    pub fn check_format(&self, data: &Value) -> bool {
        self.progress.emit(Stage::CheckFormat);
        match data.as_object() {
            Some(obj) => self.deep_validation(obj),
            None => false,
        }
    }

    pub fn deep_validation(&self, obj: &Map<String, Value>) -> bool {
        self.progress.emit(Stage::DeepValidation);
        obj.contains_key("id")
    }

    /// Builds the output record. Expects a validated record.
    ///
    /// # Errors
    ///
    /// `MissingKey("id")` when the record has no `"id"`.
    pub fn transform_data(&self, data: &Value) -> Result<OutputRecord, PipelineError> {
        self.progress.emit(Stage::TransformData);
        let id = data.get("id").cloned().ok_or(PipelineError::MissingKey("id"))?;
        Ok(OutputRecord {
            id,
            processed: true,
            timestamp: self.clock.now(),
        })
    }
}
