use jiff::civil::Date;

use crate::models::{
    document::Document,
    project::Project,
    session::{Role, Session},
};

/// The role-scoped project list: teachers see every project in document
/// order, students see exactly their group's projects in document order.
pub fn visible_projects<'a>(document: &'a Document, session: &Session) -> Vec<&'a Project> {
    match session.role {
        Role::Teacher => document.projects.iter().collect(),
        Role::Student => document
            .projects
            .iter()
            .filter(|p| Some(p.group) == session.group)
            .collect(),
    }
}

/// Signed whole days between today and the deadline. Negative once the
/// deadline has passed.
pub fn days_remaining(project: &Project, today: Date) -> i64 {
    (project.deadline - today).get_days() as i64
}

/// Display label for a deadline. Advisory only, never stored.
pub fn deadline_label(project: &Project, today: Date) -> String {
    let days = days_remaining(project, today);
    if days < 0 {
        String::from("Past deadline")
    } else {
        format!("{} days left", days)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct AggregateStats {
    pub count: usize,
    /// Rounded mean progress over the given projects, 0 when there are none
    pub average_progress: u8,
    pub submitted_count: usize,
}

pub fn aggregate_stats(projects: &[&Project]) -> AggregateStats {
    let count = projects.len();
    let average_progress = if count == 0 {
        0
    } else {
        let total: u32 = projects.iter().map(|p| u32::from(p.progress)).sum();
        (total as f64 / count as f64).round() as u8
    };
    let submitted_count = projects
        .iter()
        .filter(|p| p.submission.submitted_at.is_some())
        .count();

    AggregateStats {
        count,
        average_progress,
        submitted_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::Group;

    fn student_session(group: Group) -> Session {
        Session::login(Role::Student, "Priya", "priya@uni.edu", "pw", Some(group)).unwrap()
    }

    fn teacher_session() -> Session {
        Session::login(Role::Teacher, "Dr. Rao", "rao@uni.edu", "pw", None).unwrap()
    }

    #[test]
    fn test_teacher_sees_all_projects_in_document_order() {
        let document = Document::default();
        let visible = visible_projects(&document, &teacher_session());

        let ids: Vec<&str> = visible.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn test_student_sees_exactly_their_group() {
        let document = Document::default();

        let visible = visible_projects(&document, &student_session(Group::A));
        let ids: Vec<&str> = visible.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1"]);

        let visible = visible_projects(&document, &student_session(Group::C));
        assert!(visible.is_empty());
    }

    #[test]
    fn test_student_order_follows_document_order() {
        let mut document = Document::default();
        document.projects[1].group = Group::A;
        let mut third = document.projects[0].clone();
        third.id = String::from("p3");
        document.projects.push(third);

        let visible = visible_projects(&document, &student_session(Group::A));
        let ids: Vec<&str> = visible.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn test_deadline_label() {
        let document = Document::default();
        let p1 = document.project("p1").unwrap();

        assert_eq!(
            deadline_label(p1, Date::constant(2025, 12, 15)),
            "5 days left"
        );
        assert_eq!(
            deadline_label(p1, Date::constant(2025, 12, 20)),
            "0 days left"
        );
        assert_eq!(
            deadline_label(p1, Date::constant(2025, 12, 21)),
            "Past deadline"
        );
    }

    #[test]
    fn test_aggregate_stats() {
        let document = Document::default();
        let projects: Vec<&Project> = document.projects.iter().collect();

        let stats = aggregate_stats(&projects);
        assert_eq!(stats.count, 2);
        // round((45 + 20) / 2) = 33
        assert_eq!(stats.average_progress, 33);
        assert_eq!(stats.submitted_count, 0);
    }

    #[test]
    fn test_aggregate_stats_over_nothing() {
        let stats = aggregate_stats(&[]);
        assert_eq!(
            stats,
            AggregateStats {
                count: 0,
                average_progress: 0,
                submitted_count: 0,
            }
        );
    }

    #[test]
    fn test_submitted_count_follows_submitted_at() {
        let mut document = Document::default();
        document.projects[0].submission.submitted_at = Some(jiff::Timestamp::now());

        let projects: Vec<&Project> = document.projects.iter().collect();
        assert_eq!(aggregate_stats(&projects).submitted_count, 1);
    }
}
