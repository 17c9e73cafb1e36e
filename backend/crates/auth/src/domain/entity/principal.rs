//! Principal
//!
//! Snapshot of a user stored as the session record and attached to each
//! authenticated request. Never carries the password hash.

use chrono::{DateTime, Utc};
use kernel::id::CourseId;
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::{Avatar, CourseRef, User};
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub avatar: Option<Avatar>,
    pub role: UserRole,
    pub is_verified: bool,
    pub courses: Vec<CourseRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Principal {
    pub fn owns_course(&self, course_id: &CourseId) -> bool {
        self.courses.iter().any(|c| &c.course_id == course_id)
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            role: user.role,
            is_verified: user.is_verified,
            courses: user.courses.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::{RawPassword, UserPassword};

    #[test]
    fn test_principal_omits_password() {
        let raw = RawPassword::new("secret123".to_string()).unwrap();
        let user = User::new(
            "Ada",
            Email::new("ada@example.com").unwrap(),
            Some(UserPassword::from_raw(&raw).unwrap()),
        );

        let json = serde_json::to_value(Principal::from(&user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["role"], "user");
        assert_eq!(json["isVerified"], false);
    }

    #[test]
    fn test_owns_course() {
        let mut user = User::new("Ada", Email::new("ada@example.com").unwrap(), None);
        let course = CourseId::new();
        user.grant_course(course);

        let principal = Principal::from(&user);
        assert!(principal.owns_course(&course));
        assert!(!principal.owns_course(&CourseId::new()));
    }
}
