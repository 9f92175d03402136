use serde::{Deserialize, Serialize};

use crate::error::MarketError;

/// A customer review. Reviews are only ever appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub date: String,
}

/// A review as submitted by a shopper.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    /// Display name; the reviewer's account name is used when absent.
    #[serde(default)]
    pub user_name: Option<String>,
    pub rating: i64,
    pub comment: String,
}

impl ReviewInput {
    /// Check the rating range and comment, producing the stored review.
    pub fn into_review(self, fallback_name: &str, date: String) -> Result<Review, MarketError> {
        let rating = u8::try_from(self.rating)
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or_else(|| MarketError::validation("Rating must be between 1 and 5"))?;

        let comment = self.comment.trim();
        if comment.is_empty() {
            return Err(MarketError::validation("Review comment is required"));
        }

        let user_name = self
            .user_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| fallback_name.to_string());

        Ok(Review {
            user_name,
            rating,
            comment: comment.to_string(),
            date,
        })
    }
}
