//! Application Layer - Use cases
//!
//! Orchestrates domain logic and infrastructure.

pub mod cache;
pub mod course;
pub mod discussion;
pub mod notification;
pub mod order;

// Re-exports
pub use cache::{ALL_COURSES_KEY, ReadThroughCache};
pub use course::{
    CreateCourseUseCase, DeleteCourseUseCase, EditCourseUseCase, GetCourseContentUseCase,
    GetCourseUseCase, ListAllCoursesUseCase, ListCoursesUseCase,
};
pub use discussion::{
    AddAnswerInput, AddAnswerUseCase, AddQuestionInput, AddQuestionUseCase, AddReviewInput,
    AddReviewReplyInput, AddReviewReplyUseCase, AddReviewUseCase,
};
pub use notification::{ListNotificationsUseCase, MarkNotificationReadUseCase};
pub use order::{CreateOrderInput, CreateOrderUseCase, ListOrdersUseCase};
