pub mod binder;
pub mod cards;
pub mod dashboard;
pub mod easing;
pub mod engine;
pub mod format;
pub mod resolver;
pub mod scheduler;
pub mod store;
pub mod timeline;

pub use crate::domain::model::{DashboardSnapshot, DataMap, DomainRecord};
pub use crate::domain::ports::{Clock, ConfigProvider, DatasetSource, FrameScheduler, Presenter, Storage};
pub use crate::utils::error::Result;
