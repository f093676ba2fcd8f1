pub mod collapse;
pub mod preview;
pub mod session;

pub use collapse::CollapseCoordinator;
pub use preview::{DragInput, PreviewController};
pub use session::{ActiveDrag, ActiveItem, DragOutcome, DragSession, IgnoreReason, Phase, Placement};
