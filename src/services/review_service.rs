use serde::{Deserialize, Serialize};

use crate::models::review::{
    PhotoMeta, RatingCategory, ReviewDraft, ReviewSession, ReviewStatus, RATING_LABELS,
};

pub const MAX_RATING: u8 = 5;
pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_FEEDBACK_CHARS: usize = 2000;
pub const RECOMMENDED_FEEDBACK_CHARS: usize = 50;
pub const MAX_PHOTOS: usize = 10;
pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;
pub const ACCEPTED_PHOTO_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

#[derive(Debug, PartialEq)]
pub enum ReviewError {
    RatingOutOfRange(u8),
    TitleTooLong,
    FeedbackTooLong,
    Incomplete,
    AlreadySubmitted,
    SubmissionInProgress,
    PhotoNotFound(usize),
}

impl std::fmt::Display for ReviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewError::RatingOutOfRange(value) => {
                write!(f, "Rating must be between 0 and {}, got {}", MAX_RATING, value)
            }
            ReviewError::TitleTooLong => {
                write!(f, "Review title cannot exceed {} characters", MAX_TITLE_CHARS)
            }
            ReviewError::FeedbackTooLong => {
                write!(f, "Feedback cannot exceed {} characters", MAX_FEEDBACK_CHARS)
            }
            ReviewError::Incomplete => write!(
                f,
                "An overall rating, a title and written feedback are required before submitting"
            ),
            ReviewError::AlreadySubmitted => write!(f, "This review has already been submitted"),
            ReviewError::SubmissionInProgress => write!(f, "This review is being submitted"),
            ReviewError::PhotoNotFound(index) => write!(f, "No photo at position {}", index),
        }
    }
}

impl std::error::Error for ReviewError {}

/// Partial update of the rating widgets. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RatingsUpdate {
    pub overall: Option<u8>,
    pub categories: Vec<CategoryRating>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRating {
    pub category: RatingCategory,
    pub rating: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedbackUpdate {
    pub title: Option<String>,
    pub feedback: Option<String>,
    pub would_recommend: Option<bool>,
    pub trip_type: Option<String>,
    pub room_type: Option<String>,
    pub stay_duration: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChecklistItem {
    pub label: &'static str,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionChecklist {
    pub items: Vec<ChecklistItem>,
    pub completed_count: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhotoUploadReport {
    pub added: Vec<PhotoMeta>,
    pub errors: Vec<String>,
}

pub fn rating_label(rating: u8) -> Option<&'static str> {
    match rating {
        1..=MAX_RATING => Some(RATING_LABELS[(rating - 1) as usize]),
        _ => None,
    }
}

fn check_rating(rating: u8) -> Result<u8, ReviewError> {
    if rating > MAX_RATING {
        Err(ReviewError::RatingOutOfRange(rating))
    } else {
        Ok(rating)
    }
}

pub struct ReviewService;

impl ReviewService {
    pub fn is_complete(draft: &ReviewDraft) -> bool {
        draft.overall_rating > 0
            && !draft.title.trim().is_empty()
            && !draft.feedback.trim().is_empty()
    }

    /// Progress shown beside the form. The feedback item asks for more text
    /// than [`ReviewService::is_complete`] does.
    pub fn checklist(draft: &ReviewDraft) -> CompletionChecklist {
        let items = vec![
            ChecklistItem {
                label: "Overall rating",
                completed: draft.overall_rating > 0,
            },
            ChecklistItem {
                label: "Review title",
                completed: !draft.title.trim().is_empty(),
            },
            ChecklistItem {
                label: "Detailed feedback",
                completed: draft.feedback.trim().chars().count() >= RECOMMENDED_FEEDBACK_CHARS,
            },
            ChecklistItem {
                label: "Recommendation",
                completed: draft.would_recommend.is_some(),
            },
        ];
        let completed_count = items.iter().filter(|item| item.completed).count();
        let total = items.len();

        CompletionChecklist {
            items,
            completed_count,
            total,
        }
    }

    pub fn ensure_editable(session: &ReviewSession) -> Result<(), ReviewError> {
        match session.status {
            ReviewStatus::Draft => Ok(()),
            ReviewStatus::Submitting => Err(ReviewError::SubmissionInProgress),
            ReviewStatus::Submitted => Err(ReviewError::AlreadySubmitted),
        }
    }

    /// Applies every rating or none of them.
    pub fn apply_ratings(
        draft: &mut ReviewDraft,
        update: &RatingsUpdate,
    ) -> Result<(), ReviewError> {
        let overall = update.overall.map(check_rating).transpose()?;
        for item in &update.categories {
            check_rating(item.rating)?;
        }

        if let Some(overall) = overall {
            draft.overall_rating = overall;
        }
        for item in &update.categories {
            draft.category_ratings.insert(item.category, item.rating);
        }
        Ok(())
    }

    /// Applies the text fields. Over-long input is rejected and leaves the
    /// draft as it was.
    pub fn apply_feedback(
        draft: &mut ReviewDraft,
        update: FeedbackUpdate,
    ) -> Result<(), ReviewError> {
        if let Some(title) = &update.title {
            if title.chars().count() > MAX_TITLE_CHARS {
                return Err(ReviewError::TitleTooLong);
            }
        }
        if let Some(feedback) = &update.feedback {
            if feedback.chars().count() > MAX_FEEDBACK_CHARS {
                return Err(ReviewError::FeedbackTooLong);
            }
        }

        if let Some(title) = update.title {
            draft.title = title;
        }
        if let Some(feedback) = update.feedback {
            draft.feedback = feedback;
        }
        if update.would_recommend.is_some() {
            draft.would_recommend = update.would_recommend;
        }
        if let Some(trip_type) = update.trip_type {
            draft.trip_type = trip_type;
        }
        if let Some(room_type) = update.room_type {
            draft.room_type = room_type;
        }
        if let Some(stay_duration) = update.stay_duration {
            draft.stay_duration = stay_duration;
        }
        Ok(())
    }

    pub fn validate_photo(photo: &PhotoMeta) -> Result<(), String> {
        let content_type = photo.content_type.to_ascii_lowercase();
        if !ACCEPTED_PHOTO_TYPES.contains(&content_type.as_str()) {
            return Err(format!(
                "{}: Invalid file type. Please upload JPEG, PNG, or WebP images.",
                photo.name
            ));
        }
        if photo.size_bytes > MAX_PHOTO_BYTES {
            return Err(format!("{}: File size too large. Maximum size is 5MB.", photo.name));
        }
        Ok(())
    }

    /// Adds the valid photos until the draft holds [`MAX_PHOTOS`]; each
    /// rejected file gets its own message.
    pub fn add_photos(draft: &mut ReviewDraft, photos: Vec<PhotoMeta>) -> PhotoUploadReport {
        let mut report = PhotoUploadReport {
            added: Vec::new(),
            errors: Vec::new(),
        };

        for photo in photos {
            if let Err(message) = Self::validate_photo(&photo) {
                report.errors.push(message);
                continue;
            }
            if draft.photos.len() >= MAX_PHOTOS {
                report
                    .errors
                    .push(format!("{}: Maximum {} photos allowed.", photo.name, MAX_PHOTOS));
                continue;
            }
            draft.photos.push(photo.clone());
            report.added.push(photo);
        }

        report
    }

    pub fn remove_photo(draft: &mut ReviewDraft, index: usize) -> Result<PhotoMeta, ReviewError> {
        if index >= draft.photos.len() {
            return Err(ReviewError::PhotoNotFound(index));
        }
        Ok(draft.photos.remove(index))
    }

    /// Locks the draft for submission.
    pub fn begin_submit(session: &mut ReviewSession) -> Result<(), ReviewError> {
        Self::ensure_editable(session)?;
        if !Self::is_complete(&session.draft) {
            return Err(ReviewError::Incomplete);
        }
        session.status = ReviewStatus::Submitting;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(name: &str, content_type: &str, size_bytes: u64) -> PhotoMeta {
        PhotoMeta {
            name: name.to_string(),
            content_type: content_type.to_string(),
            size_bytes,
        }
    }

    fn complete_draft() -> ReviewDraft {
        ReviewDraft {
            overall_rating: 4,
            title: "Lovely stay".to_string(),
            feedback: "Great".to_string(),
            ..ReviewDraft::default()
        }
    }

    #[test]
    fn test_is_complete_requires_all_three() {
        assert!(ReviewService::is_complete(&complete_draft()));

        let mut draft = complete_draft();
        draft.overall_rating = 0;
        assert!(!ReviewService::is_complete(&draft));

        let mut draft = complete_draft();
        draft.title = "   ".to_string();
        assert!(!ReviewService::is_complete(&draft));

        let mut draft = complete_draft();
        draft.feedback = "\n\t".to_string();
        assert!(!ReviewService::is_complete(&draft));
    }

    #[test]
    fn test_short_feedback_completes_but_checklist_disagrees() {
        let draft = complete_draft();
        assert!(ReviewService::is_complete(&draft));

        let checklist = ReviewService::checklist(&draft);
        assert_eq!(checklist.total, 4);
        assert_eq!(checklist.completed_count, 2);
        assert!(!checklist.items[2].completed);
    }

    #[test]
    fn test_checklist_all_done() {
        let mut draft = complete_draft();
        draft.feedback = "x".repeat(RECOMMENDED_FEEDBACK_CHARS);
        draft.would_recommend = Some(false);
        assert_eq!(ReviewService::checklist(&draft).completed_count, 4);
    }

    #[test]
    fn test_apply_ratings_is_all_or_nothing() {
        let mut draft = ReviewDraft::default();
        let update = RatingsUpdate {
            overall: Some(5),
            categories: vec![CategoryRating {
                category: RatingCategory::Service,
                rating: 6,
            }],
        };
        assert_eq!(
            ReviewService::apply_ratings(&mut draft, &update),
            Err(ReviewError::RatingOutOfRange(6))
        );
        assert_eq!(draft.overall_rating, 0);

        let update = RatingsUpdate {
            overall: Some(5),
            categories: vec![CategoryRating {
                category: RatingCategory::Service,
                rating: 3,
            }],
        };
        ReviewService::apply_ratings(&mut draft, &update).unwrap();
        assert_eq!(draft.overall_rating, 5);
        assert_eq!(draft.category_ratings[&RatingCategory::Service], 3);
        assert_eq!(draft.category_ratings[&RatingCategory::Comfort], 0);
    }

    #[test]
    fn test_length_limits() {
        let mut draft = complete_draft();
        let update = FeedbackUpdate {
            title: Some("t".repeat(MAX_TITLE_CHARS + 1)),
            feedback: Some("new feedback".to_string()),
            ..FeedbackUpdate::default()
        };
        assert_eq!(
            ReviewService::apply_feedback(&mut draft, update),
            Err(ReviewError::TitleTooLong)
        );
        assert_eq!(draft.feedback, "Great");

        let update = FeedbackUpdate {
            feedback: Some("f".repeat(MAX_FEEDBACK_CHARS + 1)),
            ..FeedbackUpdate::default()
        };
        assert_eq!(
            ReviewService::apply_feedback(&mut draft, update),
            Err(ReviewError::FeedbackTooLong)
        );

        let update = FeedbackUpdate {
            title: Some("t".repeat(MAX_TITLE_CHARS)),
            would_recommend: Some(true),
            ..FeedbackUpdate::default()
        };
        ReviewService::apply_feedback(&mut draft, update).unwrap();
        assert_eq!(draft.title.len(), MAX_TITLE_CHARS);
        assert_eq!(draft.would_recommend, Some(true));
    }

    #[test]
    fn test_photo_validation() {
        let mut draft = ReviewDraft::default();
        let report = ReviewService::add_photos(
            &mut draft,
            vec![
                photo("pool.jpg", "image/jpeg", 1024),
                photo("notes.pdf", "application/pdf", 1024),
                photo("huge.png", "image/png", MAX_PHOTO_BYTES + 1),
                photo("lobby.webp", "image/webp", MAX_PHOTO_BYTES),
            ],
        );

        assert_eq!(report.added.len(), 2);
        assert_eq!(draft.photos.len(), 2);
        assert_eq!(
            report.errors,
            vec![
                "notes.pdf: Invalid file type. Please upload JPEG, PNG, or WebP images.".to_string(),
                "huge.png: File size too large. Maximum size is 5MB.".to_string(),
            ]
        );
    }

    #[test]
    fn test_photo_limit() {
        let mut draft = ReviewDraft::default();
        let photos = (0..12).map(|i| photo(&format!("{}.png", i), "image/png", 10)).collect();
        let report = ReviewService::add_photos(&mut draft, photos);
        assert_eq!(draft.photos.len(), MAX_PHOTOS);
        assert_eq!(report.errors.len(), 2);

        let removed = ReviewService::remove_photo(&mut draft, 0).unwrap();
        assert_eq!(removed.name, "0.png");
        assert_eq!(draft.photos.len(), MAX_PHOTOS - 1);
        assert_eq!(
            ReviewService::remove_photo(&mut draft, 42),
            Err(ReviewError::PhotoNotFound(42))
        );
    }

    #[test]
    fn test_begin_submit_gates() {
        let mut session = ReviewSession::new("SF-12345678".to_string(), 1, None);
        assert_eq!(ReviewService::begin_submit(&mut session), Err(ReviewError::Incomplete));
        assert_eq!(session.status, ReviewStatus::Draft);

        session.draft = complete_draft();
        ReviewService::begin_submit(&mut session).unwrap();
        assert_eq!(session.status, ReviewStatus::Submitting);
        assert_eq!(
            ReviewService::begin_submit(&mut session),
            Err(ReviewError::SubmissionInProgress)
        );

        session.status = ReviewStatus::Submitted;
        assert_eq!(ReviewService::ensure_editable(&session), Err(ReviewError::AlreadySubmitted));
    }

    #[test]
    fn test_rating_labels() {
        assert_eq!(rating_label(0), None);
        assert_eq!(rating_label(1), Some("Poor"));
        assert_eq!(rating_label(5), Some("Excellent"));
        assert_eq!(rating_label(6), None);
    }
}
