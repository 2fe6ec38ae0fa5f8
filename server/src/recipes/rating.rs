//! Comment validation and the derived recipe rating.

use crate::error::AppError;
use crate::models::Comment;

pub const MAX_COMMENT_CHARS: usize = 255;
pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Mean of the comment ratings rounded to one decimal, or 0 with no comments.
pub fn average_rating(comments: &[Comment]) -> f64 {
    if comments.is_empty() {
        return 0.0;
    }
    let total: u32 = comments.iter().map(|c| u32::from(c.rating)).sum();
    let mean = f64::from(total) / comments.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Returns the trimmed text and the rating as stored.
pub fn validate_comment(text: &str, rating: i64) -> Result<(String, u8), AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::validation("Comment cannot be empty"));
    }
    if text.chars().count() > MAX_COMMENT_CHARS {
        return Err(AppError::validation(
            "Comment must be 255 characters or less",
        ));
    }
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::validation("Rating must be between 1 and 5"));
    }
    // In range 1..=5, so the narrowing is lossless.
    Ok((text.to_string(), rating as u8))
}
