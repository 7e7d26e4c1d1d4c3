pub mod enums;
pub mod session;
pub mod settings;
pub mod task;
pub mod timer;
pub mod ui_state;

pub use enums::{TaskStatus, TimerMode, UiMode};
pub use session::SessionLogEntry;
pub use settings::Settings;
pub use task::{Task, TaskUpdate};
pub use timer::{TimerPhase, TimerState};
pub use ui_state::UiState;
