use jiff::civil::Date;
use thiserror::Error;

use crate::{
    models::{
        document::DocumentStore,
        project::{Milestone, id_token},
    },
    storage::Storage,
};

#[derive(Debug, Error, PartialEq)]
pub enum AddMilestoneError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Milestone title must not be empty")]
    EmptyTitle,
}

pub struct AddMilestoneParameters {
    pub project_id: String,
    pub title: String,
    pub due_date: Date,
}

pub fn add_milestone(
    store: &mut DocumentStore<impl Storage>,
    parameters: AddMilestoneParameters,
) -> Result<Milestone, AddMilestoneError> {
    // 1. Validate the title
    let title = parameters.title.trim();
    if title.is_empty() {
        return Err(AddMilestoneError::EmptyTitle);
    }

    // 2. Confirm the target project exists
    if store.document().project(&parameters.project_id).is_none() {
        return Err(AddMilestoneError::ProjectNotFound(parameters.project_id));
    }

    // 3. Append the open milestone
    let milestone = Milestone {
        id: id_token("m"),
        title: title.to_string(),
        due_date: parameters.due_date,
        completed: false,
    };

    let appended = milestone.clone();
    store.update_project(&parameters.project_id, |mut project| {
        project.milestones.push(appended);
        project
    });

    Ok(milestone)
}

#[derive(Debug, Error, PartialEq)]
pub enum ToggleMilestoneError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Milestone '{0}' not found")]
    MilestoneNotFound(String),
}

pub struct ToggleMilestoneParameters {
    pub project_id: String,
    pub milestone_id: String,
}

pub fn toggle_milestone(
    store: &mut DocumentStore<impl Storage>,
    parameters: ToggleMilestoneParameters,
) -> Result<Milestone, ToggleMilestoneError> {
    // 1. Confirm both the project and the milestone exist
    let project = store
        .document()
        .project(&parameters.project_id)
        .ok_or_else(|| ToggleMilestoneError::ProjectNotFound(parameters.project_id.clone()))?;

    if project.milestone(&parameters.milestone_id).is_none() {
        return Err(ToggleMilestoneError::MilestoneNotFound(
            parameters.milestone_id,
        ));
    }

    // 2. Flip the flag. Milestones never feed into progress.
    let milestone_id = parameters.milestone_id;
    store.update_project(&parameters.project_id, |mut project| {
        if let Some(milestone) = project.milestones.iter_mut().find(|m| m.id == milestone_id) {
            milestone.completed = !milestone.completed;
        }
        project
    });

    let updated = store
        .document()
        .project(&parameters.project_id)
        .and_then(|p| p.milestone(&milestone_id))
        .cloned();
    match updated {
        Some(milestone) => Ok(milestone),
        None => Err(ToggleMilestoneError::MilestoneNotFound(milestone_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::MemoryStorage;

    fn fresh_store() -> DocumentStore<MemoryStorage> {
        DocumentStore::open(MemoryStorage)
    }

    #[test]
    fn test_add_milestone_appends_open() {
        let mut store = fresh_store();

        let milestone = add_milestone(
            &mut store,
            AddMilestoneParameters {
                project_id: String::from("p2"),
                title: String::from(" Field Trial "),
                due_date: Date::constant(2025, 12, 10),
            },
        )
        .unwrap();

        assert!(milestone.id.starts_with("m_"));
        assert_eq!(milestone.title, "Field Trial");
        assert!(!milestone.completed);

        let project = store.document().project("p2").unwrap();
        assert_eq!(project.milestones.len(), 2);
        assert_eq!(project.milestones[1], milestone);
    }

    #[test]
    fn test_add_milestone_rejects_blank_title_and_unknown_project() {
        let mut store = fresh_store();

        let result = add_milestone(
            &mut store,
            AddMilestoneParameters {
                project_id: String::from("p1"),
                title: String::from("\t"),
                due_date: Date::constant(2025, 12, 10),
            },
        );
        assert_eq!(result.unwrap_err(), AddMilestoneError::EmptyTitle);

        let result = add_milestone(
            &mut store,
            AddMilestoneParameters {
                project_id: String::from("p9"),
                title: String::from("Field Trial"),
                due_date: Date::constant(2025, 12, 10),
            },
        );
        assert_eq!(
            result.unwrap_err(),
            AddMilestoneError::ProjectNotFound(String::from("p9"))
        );
    }

    #[test]
    fn test_toggle_milestone_flips_without_touching_progress() {
        let mut store = fresh_store();
        let before = store.document().project("p1").unwrap().progress;

        let milestone = toggle_milestone(
            &mut store,
            ToggleMilestoneParameters {
                project_id: String::from("p1"),
                milestone_id: String::from("m2"),
            },
        )
        .unwrap();
        assert!(milestone.completed);

        let project = store.document().project("p1").unwrap();
        assert_eq!(project.progress, before);

        let milestone = toggle_milestone(
            &mut store,
            ToggleMilestoneParameters {
                project_id: String::from("p1"),
                milestone_id: String::from("m2"),
            },
        )
        .unwrap();
        assert!(!milestone.completed);
    }

    #[test]
    fn test_toggle_milestone_reports_missing_ids() {
        let mut store = fresh_store();

        let result = toggle_milestone(
            &mut store,
            ToggleMilestoneParameters {
                project_id: String::from("p9"),
                milestone_id: String::from("m1"),
            },
        );
        assert_eq!(
            result.unwrap_err(),
            ToggleMilestoneError::ProjectNotFound(String::from("p9"))
        );

        let result = toggle_milestone(
            &mut store,
            ToggleMilestoneParameters {
                project_id: String::from("p1"),
                milestone_id: String::from("m9"),
            },
        );
        assert_eq!(
            result.unwrap_err(),
            ToggleMilestoneError::MilestoneNotFound(String::from("m9"))
        );
    }
}
