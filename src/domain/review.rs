//! Product reviews: one per (product, user), with mutually exclusive
//! like/dislike reactor sets, threaded replies, and derived statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductReview {
    pub review_id: String,
    pub product_id: String,
    pub user_uuid: String,
    pub comments: String,
    /// Always `liked_by.len()`; never incremented independently.
    pub likes: i32,
    /// Always `disliked_by.len()`.
    pub dislikes: i32,
    pub liked_by: Vec<String>,
    pub disliked_by: Vec<String>,
    /// Append-only; single replies are never edited or removed.
    pub replies: Vec<Reply>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub user_uuid: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Reaction state for one (review, user) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    None,
    Liked,
    Disliked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionError {
    /// `like` on an already-liked review.
    AlreadyLiked,
    /// `dislike` on an already-disliked review.
    AlreadyDisliked,
    /// `remove_reaction` with no reaction recorded.
    NoReaction,
}

impl ProductReview {
    pub fn reaction_of(&self, user_uuid: &str) -> Reaction {
        if self.liked_by.iter().any(|u| u == user_uuid) {
            Reaction::Liked
        } else if self.disliked_by.iter().any(|u| u == user_uuid) {
            Reaction::Disliked
        } else {
            Reaction::None
        }
    }

    /// NONE|DISLIKED -> LIKED. A previous dislike is withdrawn first, so a
    /// user is in at most one reactor set at any time.
    pub fn like(&mut self, user_uuid: &str) -> Result<(), ReactionError> {
        match self.reaction_of(user_uuid) {
            Reaction::Liked => return Err(ReactionError::AlreadyLiked),
            Reaction::Disliked => self.disliked_by.retain(|u| u != user_uuid),
            Reaction::None => {}
        }
        self.liked_by.push(user_uuid.to_string());
        self.sync_counts();
        Ok(())
    }

    /// NONE|LIKED -> DISLIKED.
    pub fn dislike(&mut self, user_uuid: &str) -> Result<(), ReactionError> {
        match self.reaction_of(user_uuid) {
            Reaction::Disliked => return Err(ReactionError::AlreadyDisliked),
            Reaction::Liked => self.liked_by.retain(|u| u != user_uuid),
            Reaction::None => {}
        }
        self.disliked_by.push(user_uuid.to_string());
        self.sync_counts();
        Ok(())
    }

    /// LIKED|DISLIKED -> NONE.
    pub fn remove_reaction(&mut self, user_uuid: &str) -> Result<(), ReactionError> {
        match self.reaction_of(user_uuid) {
            Reaction::None => return Err(ReactionError::NoReaction),
            Reaction::Liked => self.liked_by.retain(|u| u != user_uuid),
            Reaction::Disliked => self.disliked_by.retain(|u| u != user_uuid),
        }
        self.sync_counts();
        Ok(())
    }

    pub fn append_reply(&mut self, user_uuid: &str, comment: &str) {
        self.replies.push(Reply {
            user_uuid: user_uuid.to_string(),
            comment: comment.to_string(),
            created_at: Utc::now(),
        });
        self.updated_at = Utc::now();
    }

    /// Counters are derived from the sets after every transition; they cannot
    /// drift from the set contents.
    fn sync_counts(&mut self) {
        self.likes = self.liked_by.len() as i32;
        self.dislikes = self.disliked_by.len() as i32;
        self.updated_at = Utc::now();
    }
}

/// Sort orders accepted by the review listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewSort {
    #[default]
    Newest,
    Oldest,
    Likes,
    Dislikes,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewStats {
    pub total_reviews: usize,
    pub total_likes: i64,
    pub total_dislikes: i64,
    pub total_replies: usize,
    pub average_likes: f64,
    pub average_dislikes: f64,
    pub most_liked: Option<ProductReview>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Aggregate statistics over a product's reviews. On a tie for most-liked,
/// the first review encountered wins.
pub fn compute_stats(reviews: &[ProductReview]) -> ReviewStats {
    let total_reviews = reviews.len();
    let total_likes: i64 = reviews.iter().map(|r| r.likes as i64).sum();
    let total_dislikes: i64 = reviews.iter().map(|r| r.dislikes as i64).sum();
    let total_replies: usize = reviews.iter().map(|r| r.replies.len()).sum();
    let (average_likes, average_dislikes) = if total_reviews == 0 {
        (0.0, 0.0)
    } else {
        (
            round2(total_likes as f64 / total_reviews as f64),
            round2(total_dislikes as f64 / total_reviews as f64),
        )
    };
    let most_liked = reviews
        .iter()
        .fold(None::<&ProductReview>, |best, r| match best {
            Some(b) if r.likes > b.likes => Some(r),
            None => Some(r),
            keep => keep,
        })
        .cloned();
    ReviewStats {
        total_reviews,
        total_likes,
        total_dislikes,
        total_replies,
        average_likes,
        average_dislikes,
        most_liked,
    }
}
