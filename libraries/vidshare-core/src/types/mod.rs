//! Domain types for Vidshare

mod ids;
mod media;
mod user;
mod video;

pub use ids::{UserId, VideoId};
pub use media::MediaFile;
pub use user::User;
pub use video::{Video, VideoUpload};
