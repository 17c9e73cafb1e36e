//! Course Use Cases
//!
//! Public reads go through the read-through cache and only ever see
//! previews. Edits do not touch the cache; deletion drops the per-id entry.

use std::sync::Arc;

use auth::Principal;
use kernel::id::CourseId;

use crate::application::cache::{ALL_COURSES_KEY, ReadThroughCache};
use crate::domain::entities::{Course, CourseContent, CourseDraft};
use crate::domain::repository::CourseRepository;
use crate::error::{CatalogError, CatalogResult};

fn validate_draft(draft: &CourseDraft) -> CatalogResult<()> {
    if draft.name.trim().is_empty() {
        return Err(CatalogError::Validation(
            "Please enter the course name".to_string(),
        ));
    }
    if !draft.price.is_finite() || draft.price < 0.0 {
        return Err(CatalogError::Validation(
            "Price must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Admin: create / edit / list / delete
// ============================================================================

pub struct CreateCourseUseCase<R>
where
    R: CourseRepository,
{
    repo: Arc<R>,
}

impl<R> CreateCourseUseCase<R>
where
    R: CourseRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, draft: CourseDraft) -> CatalogResult<Course> {
        validate_draft(&draft)?;

        let course = Course::new(draft);
        self.repo.create(&course).await?;

        tracing::info!(course_id = %course.id, "Course created");
        Ok(course)
    }
}

pub struct EditCourseUseCase<R>
where
    R: CourseRepository,
{
    repo: Arc<R>,
}

impl<R> EditCourseUseCase<R>
where
    R: CourseRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, course_id: &CourseId, draft: CourseDraft) -> CatalogResult<Course> {
        validate_draft(&draft)?;

        let mut course = self
            .repo
            .find_by_id(course_id)
            .await?
            .ok_or(CatalogError::CourseNotFound)?;

        course.apply(draft);
        self.repo.update(&course).await?;

        tracing::info!(course_id = %course.id, "Course edited");
        Ok(course)
    }
}

/// Every course with full content, newest first, never cached
pub struct ListAllCoursesUseCase<R>
where
    R: CourseRepository,
{
    repo: Arc<R>,
}

impl<R> ListAllCoursesUseCase<R>
where
    R: CourseRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> CatalogResult<Vec<Course>> {
        self.repo.list_newest_first().await
    }
}

pub struct DeleteCourseUseCase<R>
where
    R: CourseRepository,
{
    repo: Arc<R>,
    cache: ReadThroughCache,
}

impl<R> DeleteCourseUseCase<R>
where
    R: CourseRepository,
{
    pub fn new(repo: Arc<R>, cache: ReadThroughCache) -> Self {
        Self { repo, cache }
    }

    pub async fn execute(&self, course_id: &CourseId) -> CatalogResult<()> {
        if !self.repo.delete(course_id).await? {
            return Err(CatalogError::CourseNotFound);
        }

        // The durable delete already happened; a stale entry is tolerated
        if let Err(e) = self.cache.invalidate(&course_id.to_string()).await {
            tracing::warn!(course_id = %course_id, error = %e, "Cache invalidation failed");
        }

        tracing::info!(course_id = %course_id, "Course deleted");
        Ok(())
    }
}

// ============================================================================
// Public: cached previews
// ============================================================================

pub struct GetCourseUseCase<R>
where
    R: CourseRepository,
{
    repo: Arc<R>,
    cache: ReadThroughCache,
}

impl<R> GetCourseUseCase<R>
where
    R: CourseRepository,
{
    pub fn new(repo: Arc<R>, cache: ReadThroughCache) -> Self {
        Self { repo, cache }
    }

    pub async fn execute(&self, course_id: &CourseId) -> CatalogResult<Course> {
        self.cache
            .get_or_load(&course_id.to_string(), || async {
                self.repo
                    .find_by_id(course_id)
                    .await?
                    .map(|course| course.preview())
                    .ok_or(CatalogError::CourseNotFound)
            })
            .await
    }
}

pub struct ListCoursesUseCase<R>
where
    R: CourseRepository,
{
    repo: Arc<R>,
    cache: ReadThroughCache,
}

impl<R> ListCoursesUseCase<R>
where
    R: CourseRepository,
{
    pub fn new(repo: Arc<R>, cache: ReadThroughCache) -> Self {
        Self { repo, cache }
    }

    pub async fn execute(&self) -> CatalogResult<Vec<Course>> {
        self.cache
            .get_or_load(ALL_COURSES_KEY, || async {
                let courses = self.repo.list().await?;
                Ok::<_, CatalogError>(courses.iter().map(Course::preview).collect())
            })
            .await
    }
}

// ============================================================================
// Purchased content
// ============================================================================

pub struct GetCourseContentUseCase<R>
where
    R: CourseRepository,
{
    repo: Arc<R>,
}

impl<R> GetCourseContentUseCase<R>
where
    R: CourseRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Entitlement comes from the session record, not the user table
    pub async fn execute(
        &self,
        principal: &Principal,
        course_id: &CourseId,
    ) -> CatalogResult<Vec<CourseContent>> {
        if !principal.owns_course(course_id) {
            return Err(CatalogError::NotEligible);
        }

        let course = self
            .repo
            .find_by_id(course_id)
            .await?
            .ok_or(CatalogError::CourseNotFound)?;

        Ok(course.course_data)
    }
}
