//! Post read-model composition.
//!
//! Pure types and helpers for the derived fields attached to post
//! views: cover media, rating average, like count, and the viewer's
//! favorite/like state.

use reelboard_db::entities::{post, post_image, post_video, review, user};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

/// Post author as embedded in post views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    pub id: String,
    pub name: Option<String>,
}

impl From<user::Model> for AuthorView {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

/// A single image or video attachment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaView {
    pub id: String,
    pub url: String,
}

impl From<post_image::Model> for MediaView {
    fn from(image: post_image::Model) -> Self {
        Self {
            id: image.id,
            url: image.url,
        }
    }
}

impl From<post_video::Model> for MediaView {
    fn from(video: post_video::Model) -> Self {
        Self {
            id: video.id,
            url: video.url,
        }
    }
}

/// A review as embedded in post detail views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub rating: i16,
    pub created_at: DateTimeWithTimeZone,
}

impl From<review::Model> for ReviewView {
    fn from(review: review::Model) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            text: review.text,
            rating: review.rating,
            created_at: review.created_at,
        }
    }
}

/// Viewer-dependent flags, present only for authenticated requests.
#[derive(Debug, Clone, Copy)]
pub struct ViewerFlags {
    pub is_favorited: bool,
    pub is_liked: bool,
}

/// Post as rendered in list views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub text: String,
    pub category_slug: String,
    pub author: AuthorView,
    /// URL of the first image, empty when the post has none.
    pub cover_image: String,
    /// URL of the first video, empty when the post has none.
    pub cover_video: String,
    /// Absent (not null, not zero) when the post has no reviews.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_average: Option<f64>,
    pub likes_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
    pub created_at: DateTimeWithTimeZone,
}

impl PostSummary {
    /// Compose a summary from the fetched parts.
    #[must_use]
    pub fn compose(
        post: post::Model,
        author: user::Model,
        images: &[post_image::Model],
        videos: &[post_video::Model],
        ratings: &[i16],
        likes_count: u64,
        flags: Option<ViewerFlags>,
    ) -> Self {
        Self {
            id: post.id,
            title: post.title,
            text: post.text,
            category_slug: post.category_slug,
            author: author.into(),
            cover_image: cover_url(images.first().map(|i| i.url.as_str())),
            cover_video: cover_url(videos.first().map(|v| v.url.as_str())),
            rating_average: rating_average(ratings),
            likes_count,
            is_favorited: flags.map(|f| f.is_favorited),
            is_liked: flags.map(|f| f.is_liked),
            created_at: post.created_at,
        }
    }
}

/// Post as rendered in detail views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub id: String,
    pub title: String,
    pub text: String,
    pub category_slug: String,
    pub author: AuthorView,
    pub cover_image: String,
    pub cover_video: String,
    pub images: Vec<MediaView>,
    pub videos: Vec<MediaView>,
    pub reviews: Vec<ReviewView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_average: Option<f64>,
    pub likes_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl PostDetail {
    /// Compose a detail view from the fetched parts.
    #[must_use]
    pub fn compose(
        post: post::Model,
        author: user::Model,
        images: Vec<post_image::Model>,
        videos: Vec<post_video::Model>,
        reviews: Vec<review::Model>,
        likes_count: u64,
        flags: Option<ViewerFlags>,
    ) -> Self {
        let ratings: Vec<i16> = reviews.iter().map(|r| r.rating).collect();

        Self {
            id: post.id,
            title: post.title,
            text: post.text,
            category_slug: post.category_slug,
            author: author.into(),
            cover_image: cover_url(images.first().map(|i| i.url.as_str())),
            cover_video: cover_url(videos.first().map(|v| v.url.as_str())),
            images: images.into_iter().map(MediaView::from).collect(),
            videos: videos.into_iter().map(MediaView::from).collect(),
            reviews: reviews.into_iter().map(ReviewView::from).collect(),
            rating_average: rating_average(&ratings),
            likes_count,
            is_favorited: flags.map(|f| f.is_favorited),
            is_liked: flags.map(|f| f.is_liked),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Arithmetic mean of ratings rounded to one decimal place.
///
/// Returns `None` when there are no ratings so the field can be left
/// out of the representation entirely.
#[must_use]
pub fn rating_average(ratings: &[i16]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }

    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    let mean = sum as f64 / ratings.len() as f64;

    Some((mean * 10.0).round() / 10.0)
}

fn cover_url(url: Option<&str>) -> String {
    url.unwrap_or_default().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_rating_average_empty_is_none() {
        assert_eq!(rating_average(&[]), None);
    }

    #[test]
    fn test_rating_average_rounds_to_one_decimal() {
        assert_eq!(rating_average(&[5, 3, 4]), Some(4.0));
        assert_eq!(rating_average(&[5, 4]), Some(4.5));
        assert_eq!(rating_average(&[5, 5, 4]), Some(4.7));
        assert_eq!(rating_average(&[1]), Some(1.0));
    }

    fn test_post(id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: "u1".to_string(),
            category_slug: "drama".to_string(),
            title: "Title".to_string(),
            text: "Text".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_author() -> user::Model {
        user::Model {
            id: "u1".to_string(),
            email: "a@example.com".to_string(),
            name: Some("Author".to_string()),
            password_hash: "x".to_string(),
            token: None,
            is_active: true,
            is_admin: false,
            activation_code: String::new(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_summary_without_reviews_omits_average() {
        let summary =
            PostSummary::compose(test_post("p1"), test_author(), &[], &[], &[], 0, None);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("ratingAverage").is_none());
        assert!(json.get("isFavorited").is_none());
        assert!(json.get("isLiked").is_none());
        assert_eq!(json["coverImage"], "");
        assert_eq!(json["coverVideo"], "");
    }

    #[test]
    fn test_summary_with_viewer_flags() {
        let image = post_image::Model {
            id: "i1".to_string(),
            post_id: "p1".to_string(),
            url: "https://cdn.example.com/i1.jpg".to_string(),
        };

        let summary = PostSummary::compose(
            test_post("p1"),
            test_author(),
            &[image],
            &[],
            &[4, 5],
            3,
            Some(ViewerFlags {
                is_favorited: true,
                is_liked: false,
            }),
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["ratingAverage"], 4.5);
        assert_eq!(json["isFavorited"], true);
        assert_eq!(json["isLiked"], false);
        assert_eq!(json["likesCount"], 3);
        assert_eq!(json["coverImage"], "https://cdn.example.com/i1.jpg");
    }

    #[test]
    fn test_detail_keeps_media_order() {
        let images = vec![
            post_image::Model {
                id: "i1".to_string(),
                post_id: "p1".to_string(),
                url: "https://cdn.example.com/first.jpg".to_string(),
            },
            post_image::Model {
                id: "i2".to_string(),
                post_id: "p1".to_string(),
                url: "https://cdn.example.com/second.jpg".to_string(),
            },
        ];

        let detail = PostDetail::compose(
            test_post("p1"),
            test_author(),
            images,
            vec![],
            vec![],
            0,
            None,
        );

        assert_eq!(detail.cover_image, "https://cdn.example.com/first.jpg");
        assert_eq!(detail.images.len(), 2);
        assert!(detail.rating_average.is_none());
    }
}
