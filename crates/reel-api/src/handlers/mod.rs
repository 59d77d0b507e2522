pub mod health;
pub mod video_stream;
pub mod video_upload;

pub use health::{health_check, method_not_allowed, not_found};
pub use video_stream::stream_video;
pub use video_upload::upload_video;
