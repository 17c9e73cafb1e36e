//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Course, CourseContent, Notification, Order};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddQuestionRequest {
    #[serde(default)]
    pub question: String,
    pub course_id: String,
    pub content_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAnswerRequest {
    #[serde(default)]
    pub answer: String,
    pub course_id: String,
    pub content_id: String,
    pub question_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddReviewRequest {
    #[serde(default)]
    pub review: String,
    pub rating: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewReplyRequest {
    #[serde(default)]
    pub comment: String,
    pub course_id: String,
    pub review_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub course_id: String,
    #[serde(rename = "payment_info")]
    pub payment_info: Option<serde_json::Value>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CourseResponse {
    pub course: Course,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoursesResponse {
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentResponse {
    pub content: Vec<CourseContent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub order: Order,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}
