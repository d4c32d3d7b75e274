mod engine;
pub mod scheduler;
pub mod trigger;

pub use engine::NotificationEngine;
pub use scheduler::{NotificationScheduler, SchedulerHandle, SharedBoard, SharedEngine};
