pub mod overlay;
pub mod selection;
pub mod step_gate;

pub use overlay::{OverlayMode, PageAnnotation, SegmentLegendEntry, SegmentOverlayResolver};
pub use selection::SelectionStore;
pub use step_gate::{PipelineStep, StepGateController, StepIndicator};
