pub mod carousel;
pub mod dive;
pub mod feedback;
pub mod gesture;
pub mod orientation;
pub mod session;
pub mod spring;
pub mod touch;

pub use feedback::{ClickSynth, Haptics};
pub use orientation::SensorStatus;
pub use session::InteractionSession;
pub use touch::{TouchInput, TouchState};
