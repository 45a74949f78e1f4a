use thiserror::Error;

use crate::{
    models::{
        document::DocumentStore,
        project::{Task, id_token},
    },
    storage::Storage,
};

#[derive(Debug, Error, PartialEq)]
pub enum AddTaskError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Task text must not be empty")]
    EmptyText,
}

pub struct AddTaskParameters {
    pub project_id: String,
    pub text: String,
    pub owner: Option<String>,
}

pub fn add_task(
    store: &mut DocumentStore<impl Storage>,
    parameters: AddTaskParameters,
) -> Result<Task, AddTaskError> {
    // 1. Validate the task text
    let text = parameters.text.trim();
    if text.is_empty() {
        return Err(AddTaskError::EmptyText);
    }

    // 2. Confirm the target project exists
    if store.document().project(&parameters.project_id).is_none() {
        return Err(AddTaskError::ProjectNotFound(parameters.project_id));
    }

    // 3. Build the task; a blank owner falls back to the placeholder
    let owner = parameters
        .owner
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .unwrap_or_else(|| String::from("Unassigned"));

    let task = Task {
        id: id_token("t"),
        text: text.to_string(),
        owner,
        done: false,
    };

    // 4. Append to the project's task list and refresh its progress
    let appended = task.clone();
    store.update_project(&parameters.project_id, |mut project| {
        project.tasks.push(appended);
        project.recompute_progress();
        project
    });

    Ok(task)
}

#[derive(Debug, Error, PartialEq)]
pub enum ToggleTaskError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Task '{0}' not found")]
    TaskNotFound(String),
}

pub struct ToggleTaskParameters {
    pub project_id: String,
    pub task_id: String,
}

pub fn toggle_task(
    store: &mut DocumentStore<impl Storage>,
    parameters: ToggleTaskParameters,
) -> Result<Task, ToggleTaskError> {
    // 1. Confirm both the project and the task exist
    let project = store
        .document()
        .project(&parameters.project_id)
        .ok_or_else(|| ToggleTaskError::ProjectNotFound(parameters.project_id.clone()))?;

    if project.task(&parameters.task_id).is_none() {
        return Err(ToggleTaskError::TaskNotFound(parameters.task_id));
    }

    // 2. Flip the flag and refresh the project's progress
    let task_id = parameters.task_id;
    store.update_project(&parameters.project_id, |mut project| {
        if let Some(task) = project.tasks.iter_mut().find(|t| t.id == task_id) {
            task.done = !task.done;
        }
        project.recompute_progress();
        project
    });

    // 3. Return the updated task
    let updated = store
        .document()
        .project(&parameters.project_id)
        .and_then(|p| p.task(&task_id))
        .cloned();
    match updated {
        Some(task) => Ok(task),
        None => Err(ToggleTaskError::TaskNotFound(task_id)),
    }
}
