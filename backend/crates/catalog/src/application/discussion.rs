//! Discussion Use Cases
//!
//! Questions and answers on content sections, reviews and review replies.
//! Each one rewrites the whole course document.

use std::sync::Arc;

use auth::Principal;
use kernel::error::app_error::AppError;
use kernel::id::CourseId;
use platform::mail::{Mailer, OutgoingMail};
use uuid::Uuid;

use crate::domain::entities::{Author, Course, Notification, Question, Reply, Review};
use crate::domain::repository::{CourseRepository, NotificationRepository};
use crate::domain::value_objects::Rating;
use crate::error::{CatalogError, CatalogResult};

pub(crate) fn parse_course_id(raw: &str) -> CatalogResult<CourseId> {
    Ok(raw.trim().parse::<CourseId>().map_err(AppError::from)?)
}

fn require_text(value: &str, message: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::Validation(message.to_string()));
    }
    Ok(())
}

async fn load_course<R>(repo: &R, course_id: &CourseId) -> CatalogResult<Course>
where
    R: CourseRepository,
{
    repo.find_by_id(course_id)
        .await?
        .ok_or(CatalogError::CourseNotFound)
}

// ============================================================================
// Questions
// ============================================================================

pub struct AddQuestionInput {
    pub question: String,
    pub course_id: String,
    pub content_id: String,
}

pub struct AddQuestionUseCase<R>
where
    R: CourseRepository + NotificationRepository,
{
    repo: Arc<R>,
}

impl<R> AddQuestionUseCase<R>
where
    R: CourseRepository + NotificationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        principal: &Principal,
        input: AddQuestionInput,
    ) -> CatalogResult<Course> {
        require_text(&input.question, "Please enter your question")?;

        let course_id = parse_course_id(&input.course_id)?;
        let mut course = load_course(self.repo.as_ref(), &course_id).await?;

        let content_id: Uuid = input
            .content_id
            .trim()
            .parse()
            .map_err(|_| CatalogError::InvalidContentId)?;
        let content = course
            .find_content_mut(&content_id)
            .ok_or(CatalogError::ContentNotFound)?;

        content
            .questions
            .push(Question::new(Author::from(principal), input.question));
        let title = content.title.clone();
        course.touch();

        CourseRepository::update(self.repo.as_ref(), &course).await?;

        NotificationRepository::create(
            self.repo.as_ref(),
            &Notification::new(
                principal.id,
                "New Question",
                format!("You have a new question in {title}"),
            ),
        )
        .await?;

        tracing::info!(course_id = %course.id, user_id = %principal.id, "Question added");
        Ok(course)
    }
}

// ============================================================================
// Answers
// ============================================================================

pub struct AddAnswerInput {
    pub answer: String,
    pub course_id: String,
    pub content_id: String,
    pub question_id: String,
}

/// Replying to your own question leaves a notification; replying to
/// someone else's mails the asker.
pub struct AddAnswerUseCase<R>
where
    R: CourseRepository + NotificationRepository,
{
    repo: Arc<R>,
    mailer: Mailer,
}

impl<R> AddAnswerUseCase<R>
where
    R: CourseRepository + NotificationRepository,
{
    pub fn new(repo: Arc<R>, mailer: Mailer) -> Self {
        Self { repo, mailer }
    }

    pub async fn execute(
        &self,
        principal: &Principal,
        input: AddAnswerInput,
    ) -> CatalogResult<Course> {
        require_text(&input.answer, "Please enter your answer")?;

        let course_id = parse_course_id(&input.course_id)?;
        let mut course = load_course(self.repo.as_ref(), &course_id).await?;

        let content_id: Uuid = input
            .content_id
            .trim()
            .parse()
            .map_err(|_| CatalogError::InvalidContentId)?;
        let question_id: Uuid = input
            .question_id
            .trim()
            .parse()
            .map_err(|_| CatalogError::InvalidQuestionId)?;

        let content = course
            .find_content_mut(&content_id)
            .ok_or(CatalogError::InvalidContentId)?;
        let title = content.title.clone();

        let question = content
            .find_question_mut(&question_id)
            .ok_or(CatalogError::InvalidQuestionId)?;
        question
            .question_replies
            .push(Reply::new(Author::from(principal), input.answer));
        let asker = question.user.clone();
        course.touch();

        CourseRepository::update(self.repo.as_ref(), &course).await?;

        if asker.id == principal.id {
            NotificationRepository::create(
                self.repo.as_ref(),
                &Notification::new(
                    principal.id,
                    "Question Reply",
                    format!("Your question in {title} has been replied to."),
                ),
            )
            .await?;
        } else {
            self.mailer
                .send(OutgoingMail::new(
                    asker.email.as_str(),
                    "Question Reply",
                    "question-reply",
                    serde_json::json!({ "name": asker.name, "title": title }),
                ))
                .await?;
        }

        Ok(course)
    }
}

// ============================================================================
// Reviews
// ============================================================================

pub struct AddReviewInput {
    pub review: String,
    pub rating: u8,
}

pub struct AddReviewUseCase<R>
where
    R: CourseRepository,
{
    repo: Arc<R>,
}

impl<R> AddReviewUseCase<R>
where
    R: CourseRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        principal: &Principal,
        course_id: &CourseId,
        input: AddReviewInput,
    ) -> CatalogResult<Course> {
        if !principal.owns_course(course_id) {
            return Err(CatalogError::NotEligible);
        }

        let rating = Rating::new(input.rating)?;
        let mut course = load_course(self.repo.as_ref(), course_id).await?;

        course.add_review(Review::new(Author::from(principal), rating, input.review));
        self.repo.update(&course).await?;

        tracing::info!(
            course_id = %course.id,
            user_id = %principal.id,
            ratings = course.ratings,
            "Review added"
        );
        Ok(course)
    }
}

pub struct AddReviewReplyInput {
    pub comment: String,
    pub course_id: String,
    pub review_id: String,
}

pub struct AddReviewReplyUseCase<R>
where
    R: CourseRepository,
{
    repo: Arc<R>,
}

impl<R> AddReviewReplyUseCase<R>
where
    R: CourseRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        principal: &Principal,
        input: AddReviewReplyInput,
    ) -> CatalogResult<Course> {
        require_text(&input.comment, "Please enter your reply")?;

        let course_id = parse_course_id(&input.course_id)?;
        let mut course = load_course(self.repo.as_ref(), &course_id).await?;

        let review_id: Uuid = input
            .review_id
            .trim()
            .parse()
            .map_err(|_| CatalogError::ReviewNotFound)?;
        let review = course
            .find_review_mut(&review_id)
            .ok_or(CatalogError::ReviewNotFound)?;

        review
            .comment_replies
            .push(Reply::new(Author::from(principal), input.comment));
        course.touch();

        self.repo.update(&course).await?;
        Ok(course)
    }
}
