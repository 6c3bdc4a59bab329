pub mod alert;
pub mod messages;
pub mod task;

pub use alert::{Alert, AlertKind, ScreenId};
pub use task::Task;
