// Editor panels for QuickImg.

pub mod controls;
pub mod options;
pub mod preview;

pub use controls::ControlsState;
pub use options::{OptionsDraft, OptionsError, OptionsOutcome};
pub use preview::PreviewTexture;
