pub mod config;
pub mod logging;

pub mod control;
pub mod downloader;
pub mod error;
pub mod fetch_head;
pub mod progress;
pub mod segmenter;
pub mod session;
pub mod storage;
pub mod url_model;

pub use downloader::FetchOutcome;
pub use error::DownloadError;
pub use progress::{ProgressSink, ProgressStats, TransferProgress};
pub use session::{Session, SessionConfig, SessionState};
