//! Database repositories.

pub mod category;
pub mod favorite;
pub mod like;
pub mod post;
pub mod post_media;
pub mod review;
pub mod user;

pub use category::CategoryRepository;
pub use favorite::FavoriteRepository;
pub use like::LikeRepository;
pub use post::PostRepository;
pub use post_media::{PostImageRepository, PostVideoRepository};
pub use review::ReviewRepository;
pub use user::UserRepository;
