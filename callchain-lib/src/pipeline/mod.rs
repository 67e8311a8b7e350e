//! Five-stage demo pipeline with a fixed call chain:
//!
//! ```text
//! process_data
//! ├── validate_input
//! │   └── check_format
//! │       └── deep_validation
//! └── transform_data
//! ```
//!
//! Validation stages fail softly with `None`. Only `transform_data` can fail
//! hard, and only when called on a record that skipped validation.

mod call_graph;
mod clock;
mod progress;
mod record;
mod stage;
mod stages;

pub use call_graph::{declared_call_graph, STAGES_MODULE};
pub use clock::{Clock, FixedClock, SystemClock};
pub use progress::{Progress, RecordingProgress, StdoutProgress};
pub use record::{is_truthy, sample_record, OutputRecord};
pub use stage::Stage;
pub use stages::DemoPipeline;
