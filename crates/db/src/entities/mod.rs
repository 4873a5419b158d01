//! Database entities.

pub mod category;
pub mod favorite;
pub mod like;
pub mod post;
pub mod post_image;
pub mod post_video;
pub mod review;
pub mod user;

pub use category::Entity as Category;
pub use favorite::Entity as Favorite;
pub use like::Entity as Like;
pub use post::Entity as Post;
pub use post_image::Entity as PostImage;
pub use post_video::Entity as PostVideo;
pub use review::Entity as Review;
pub use user::Entity as User;
