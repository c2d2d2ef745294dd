use crate::domain::model::DashboardSnapshot;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_source(&self) -> &str;
    fn default_domain(&self) -> &str;
    fn site(&self) -> Option<&str>;
    fn location(&self) -> Option<&str>;
    fn frame_interval_ms(&self) -> u64;
    fn output_path(&self) -> Option<&str>;
    fn output_format(&self) -> &str;
}

/// Where the dataset bytes come from (HTTP endpoint, local file, ...).
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;
    fn describe(&self) -> String;
}

/// Monotonic time since an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

/// One-shot callback receiving the frame timestamp.
pub type FrameCallback = Box<dyn FnOnce(Duration)>;

/// Display-refresh style scheduler: callbacks run once, on the next frame.
pub trait FrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameId;
    /// Returns `false` when the frame already ran or was never registered.
    fn cancel_frame(&self, id: FrameId) -> bool;
}

pub trait Presenter {
    fn present(&mut self, snapshot: &DashboardSnapshot) -> Result<()>;
    fn finish(&mut self, snapshot: &DashboardSnapshot) -> Result<()>;
}
