//! Business logic services.

#![allow(missing_docs)]

pub mod account;
pub mod category;
pub mod email;
pub mod favorite;
pub mod like;
pub mod notify;
pub mod post;
pub mod post_view;
pub mod review;

pub use account::{
    AccountService, ActivateInput, CompleteResetInput, LoginInput, RegisterInput,
    RequestResetInput,
};
pub use category::{CategoryService, CreateCategoryInput, UpdateCategoryInput};
pub use email::EmailService;
pub use favorite::{FavoriteService, ToggleOutcome};
pub use like::LikeService;
pub use notify::{NewPostNotify, NoOpNotifier, NotifyService};
pub use post::{CreatePostInput, PostQuery, PostService, UpdatePostInput};
pub use post_view::{
    AuthorView, MediaView, PostDetail, PostSummary, ReviewView, ViewerFlags, rating_average,
};
pub use review::{CreateReviewInput, ReviewService, UpdateReviewInput};
