mod canvas;
mod input;
mod loop_runner;
mod metrics;
mod scene;
mod text;

pub use canvas::{Canvas, Color};
pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig, PadButton, PadRect};
pub use metrics::LoopMetricsSnapshot;
pub use scene::{InputSnapshot, Scene};
