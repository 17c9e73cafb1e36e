//! User Entity
//!
//! The account as kept in the durable store, password hash included.

use chrono::{DateTime, Utc};
use kernel::id::CourseId;
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{
    email::Email, user_id::UserId, user_password::UserPassword, user_role::UserRole,
};

/// Profile picture reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub public_id: String,
    pub url: String,
}

/// Entitlement to a purchased course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRef {
    pub course_id: CourseId,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    /// Absent for accounts created through social sign-in
    pub password: Option<UserPassword>,
    pub avatar: Option<Avatar>,
    pub role: UserRole,
    pub is_verified: bool,
    pub courses: Vec<CourseRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: Email, password: Option<UserPassword>) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::new(),
            name: name.into(),
            email,
            password,
            avatar: None,
            role: UserRole::default(),
            is_verified: false,
            courses: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn owns_course(&self, course_id: &CourseId) -> bool {
        self.courses.iter().any(|c| &c.course_id == course_id)
    }

    /// Returns `false` when the course was already owned
    pub fn grant_course(&mut self, course_id: CourseId) -> bool {
        if self.owns_course(&course_id) {
            return false;
        }
        self.courses.push(CourseRef { course_id });
        self.touch();
        true
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.touch();
    }

    pub fn set_password(&mut self, password: UserPassword) {
        self.password = Some(password);
        self.touch();
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new("Ada", Email::new("ada@example.com").unwrap(), None)
    }

    #[test]
    fn test_new_user_defaults() {
        let user = user();
        assert_eq!(user.role, UserRole::User);
        assert!(!user.is_verified);
        assert!(user.courses.is_empty());
        assert!(user.password.is_none());
    }

    #[test]
    fn test_grant_course_once() {
        let mut user = user();
        let course = CourseId::new();

        assert!(user.grant_course(course));
        assert!(!user.grant_course(course));
        assert!(user.owns_course(&course));
        assert_eq!(user.courses.len(), 1);
    }
}
