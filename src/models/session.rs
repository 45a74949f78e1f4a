use std::fmt;
use std::str::FromStr;

use crate::models::project::Group;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Teacher,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown role '{0}'. Expected 'student' or 'teacher'")]
pub struct RoleParseError(String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "Student"),
            Role::Teacher => write!(f, "Teacher"),
        }
    }
}

/// The signed-in user. Nothing here is checked against any credential
/// store; logging in is role self-assignment. The session lives for one
/// invocation and is never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    /// Present exactly when `role` is `Student`
    pub group: Option<Group>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LoginError {
    #[error("Please enter your name.")]
    MissingName,

    #[error("Please enter your email.")]
    MissingEmail,

    #[error("Please enter your password.")]
    MissingPassword,

    #[error("Please select a group.")]
    MissingGroup,
}

impl Session {
    /// Validate the login fields and build a session. Only non-emptiness
    /// is checked, in field order, and students must name a group. The
    /// first missing field wins.
    pub fn login(
        role: Role,
        name: &str,
        email: &str,
        password: &str,
        group: Option<Group>,
    ) -> Result<Session, LoginError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LoginError::MissingName);
        }

        let email = email.trim();
        if email.is_empty() {
            return Err(LoginError::MissingEmail);
        }

        let password = password.trim();
        if password.is_empty() {
            return Err(LoginError::MissingPassword);
        }

        if role == Role::Student && group.is_none() {
            return Err(LoginError::MissingGroup);
        }

        Ok(Session {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
            group: match role {
                Role::Student => group,
                Role::Teacher => None,
            },
        })
    }

    /// Role checks are computed once here and handed to the rendering
    /// layer, instead of re-testing the role at every call site.
    pub fn capabilities(&self) -> Capabilities {
        let teacher = self.role == Role::Teacher;
        Capabilities {
            can_create_project: teacher,
            can_add_milestone: teacher,
            can_grade: teacher,
            can_submit_work: !teacher,
        }
    }
}

/// What the signed-in user may do. Advisory only: the document store
/// itself never checks roles.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub can_create_project: bool,
    pub can_add_milestone: bool,
    pub can_grade: bool,
    pub can_submit_work: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_reports_first_missing_field() {
        let result = Session::login(Role::Student, "", "", "", None);
        assert_eq!(result.unwrap_err(), LoginError::MissingName);

        let result = Session::login(Role::Student, "Priya", "  ", "", None);
        assert_eq!(result.unwrap_err(), LoginError::MissingEmail);

        let result = Session::login(Role::Student, "Priya", "priya@uni.edu", "\t", None);
        assert_eq!(result.unwrap_err(), LoginError::MissingPassword);
    }

    #[test]
    fn test_student_login_requires_group() {
        let result = Session::login(Role::Student, "Priya", "priya@uni.edu", "pw", None);
        assert_eq!(result.unwrap_err(), LoginError::MissingGroup);

        let session =
            Session::login(Role::Student, "Priya", "priya@uni.edu", "pw", Some(Group::A)).unwrap();
        assert_eq!(session.group, Some(Group::A));
    }

    #[test]
    fn test_teacher_login_drops_group() {
        let session =
            Session::login(Role::Teacher, "Dr. Rao", "rao@uni.edu", "pw", Some(Group::B)).unwrap();
        assert_eq!(session.group, None);
    }

    #[test]
    fn test_login_trims_fields() {
        let session =
            Session::login(Role::Teacher, "  Dr. Rao ", " rao@uni.edu ", " pw ", None).unwrap();
        assert_eq!(session.name, "Dr. Rao");
        assert_eq!(session.email, "rao@uni.edu");
        assert_eq!(session.password, "pw");
    }

    #[test]
    fn test_capabilities_follow_role() {
        let teacher = Session::login(Role::Teacher, "Dr. Rao", "rao@uni.edu", "pw", None).unwrap();
        let caps = teacher.capabilities();
        assert!(caps.can_create_project);
        assert!(caps.can_add_milestone);
        assert!(caps.can_grade);
        assert!(!caps.can_submit_work);

        let student =
            Session::login(Role::Student, "Priya", "priya@uni.edu", "pw", Some(Group::A)).unwrap();
        let caps = student.capabilities();
        assert!(!caps.can_create_project);
        assert!(!caps.can_add_milestone);
        assert!(!caps.can_grade);
        assert!(caps.can_submit_work);
    }
}
