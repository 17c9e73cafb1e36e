//! Domain Entities
//!
//! A course is stored as one document: its content sections carry their
//! question threads, and its reviews carry their replies.

use auth::Principal;
use auth::domain::value_object::user_role::UserRole;
use chrono::{DateTime, Utc};
use kernel::id::{CourseId, NotificationId, OrderId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{NotificationStatus, Rating};

// ============================================================================
// Author
// ============================================================================

/// Snapshot of the principal who wrote a question, reply or review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&Principal> for Author {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id,
            name: principal.name.clone(),
            email: principal.email.to_string(),
            role: principal.role,
        }
    }
}

// ============================================================================
// Threads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub user: Author,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Reply {
    pub fn new(user: Author, body: impl Into<String>) -> Self {
        Self {
            user,
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    pub user: Author,
    pub question: String,
    #[serde(default)]
    pub question_replies: Vec<Reply>,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn new(user: Author, question: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            question: question.into(),
            question_replies: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub user: Author,
    pub rating: Rating,
    pub comment: String,
    #[serde(default)]
    pub comment_replies: Vec<Reply>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(user: Author, rating: Rating, comment: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            rating,
            comment: comment.into(),
            comment_replies: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Course
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub public_id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub title: String,
    pub url: String,
}

/// A single benefit or prerequisite line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Titled {
    pub title: String,
}

/// One video section of a course
///
/// `video_url`, `links`, `suggestion` and `questions` are the gated
/// fields; a preview leaves them empty and they are not serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseContent {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default)]
    pub video_section: String,
    #[serde(default)]
    pub video_length: u32,
    #[serde(default)]
    pub video_player: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
}

impl CourseContent {
    fn preview(&self) -> Self {
        Self {
            video_url: None,
            links: Vec::new(),
            suggestion: None,
            questions: Vec::new(),
            ..self.clone()
        }
    }

    pub fn find_question_mut(&mut self, question_id: &Uuid) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| &q.id == question_id)
    }
}

/// Editable fields of a content section
///
/// An `id` naming an existing section keeps that section's questions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDraft {
    pub id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub video_url: Option<String>,
    #[serde(default)]
    pub video_section: String,
    #[serde(default)]
    pub video_length: u32,
    #[serde(default)]
    pub video_player: String,
    #[serde(default)]
    pub links: Vec<Link>,
    pub suggestion: Option<String>,
}

/// Editable fields of a course, as sent by an admin
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub estimated_price: Option<f64>,
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub demo_url: String,
    #[serde(default)]
    pub benefits: Vec<Titled>,
    #[serde(default)]
    pub prerequisites: Vec<Titled>,
    #[serde(default)]
    pub course_data: Vec<ContentDraft>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub estimated_price: Option<f64>,
    pub thumbnail: Option<Thumbnail>,
    pub tags: String,
    pub level: String,
    pub demo_url: String,
    pub benefits: Vec<Titled>,
    pub prerequisites: Vec<Titled>,
    pub reviews: Vec<Review>,
    pub course_data: Vec<CourseContent>,
    pub ratings: f64,
    pub purchased: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn new(draft: CourseDraft) -> Self {
        let now = Utc::now();
        let mut course = Self {
            id: CourseId::new(),
            name: String::new(),
            description: String::new(),
            price: 0.0,
            estimated_price: None,
            thumbnail: None,
            tags: String::new(),
            level: String::new(),
            demo_url: String::new(),
            benefits: Vec::new(),
            prerequisites: Vec::new(),
            reviews: Vec::new(),
            course_data: Vec::new(),
            ratings: 0.0,
            purchased: 0,
            created_at: now,
            updated_at: now,
        };
        course.apply(draft);
        course
    }

    /// Replace every editable field; reviews, ratings and purchase count stay
    pub fn apply(&mut self, draft: CourseDraft) {
        let mut previous = std::mem::take(&mut self.course_data);

        self.course_data = draft
            .course_data
            .into_iter()
            .map(|section| {
                let kept = section
                    .id
                    .and_then(|id| previous.iter().position(|c| c.id == id))
                    .map(|index| previous.swap_remove(index));

                CourseContent {
                    id: kept.as_ref().map_or_else(Uuid::new_v4, |c| c.id),
                    title: section.title,
                    description: section.description,
                    video_url: section.video_url,
                    video_section: section.video_section,
                    video_length: section.video_length,
                    video_player: section.video_player,
                    links: section.links,
                    suggestion: section.suggestion,
                    questions: kept.map(|c| c.questions).unwrap_or_default(),
                }
            })
            .collect();

        self.name = draft.name;
        self.description = draft.description;
        self.price = draft.price;
        self.estimated_price = draft.estimated_price;
        self.thumbnail = draft.thumbnail;
        self.tags = draft.tags;
        self.level = draft.level;
        self.demo_url = draft.demo_url;
        self.benefits = draft.benefits;
        self.prerequisites = draft.prerequisites;
        self.touch();
    }

    /// Public view: gated content fields removed from every section
    pub fn preview(&self) -> Self {
        Self {
            course_data: self.course_data.iter().map(CourseContent::preview).collect(),
            ..self.clone()
        }
    }

    pub fn find_content_mut(&mut self, content_id: &Uuid) -> Option<&mut CourseContent> {
        self.course_data.iter_mut().find(|c| &c.id == content_id)
    }

    pub fn find_review_mut(&mut self, review_id: &Uuid) -> Option<&mut Review> {
        self.reviews.iter_mut().find(|r| &r.id == review_id)
    }

    /// Append a review and recompute the average rating
    pub fn add_review(&mut self, review: Review) {
        self.reviews.push(review);

        let total: u32 = self.reviews.iter().map(|r| u32::from(r.rating.value())).sum();
        self.ratings = f64::from(total) / self.reviews.len() as f64;
        self.touch();
    }

    pub fn record_purchase(&mut self) {
        self.purchased = self.purchased.saturating_add(1);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// ============================================================================
// Order
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub course_id: CourseId,
    pub user_id: UserId,
    #[serde(rename = "payment_info", skip_serializing_if = "Option::is_none")]
    pub payment_info: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        course_id: CourseId,
        user_id: UserId,
        payment_info: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: OrderId::new(),
            course_id,
            user_id,
            payment_info,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Notification
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: UserId, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            title: title.into(),
            message: message.into(),
            status: NotificationStatus::Unread,
            created_at: Utc::now(),
        }
    }
}
