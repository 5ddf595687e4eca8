//! Presentation helpers shared by front ends

pub mod assets;
pub mod dashboard;
pub mod mobile;

pub use assets::{AssetTable, SceneKey, resolve_scene};
pub use dashboard::{DashboardView, WarningLevel, state_label};
pub use mobile::{MobileView, NotificationExpired};
