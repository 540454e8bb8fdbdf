mod engine;
mod mode;
pub mod view;

pub use engine::TimerEngine;
pub use mode::Mode;
pub use view::TimerView;
