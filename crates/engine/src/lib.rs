pub mod app;

pub use app::{
    run_app, AppError, Canvas, Color, InputAction, InputSnapshot, LoopConfig,
    LoopMetricsSnapshot, PadButton, PadRect, Scene,
};
