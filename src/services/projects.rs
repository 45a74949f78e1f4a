use jiff::civil::Date;
use thiserror::Error;

use crate::{
    models::{
        document::DocumentStore,
        project::{Group, Project, id_token},
    },
    storage::Storage,
};

#[derive(Debug, Error, PartialEq)]
pub enum CreateProjectError {
    #[error("Project title must not be empty")]
    EmptyTitle,

    #[error("Project description must not be empty")]
    EmptyDescription,
}

pub struct CreateProjectParameters {
    pub title: String,
    pub description: String,
    pub group: Group,
    pub deadline: Date,
}

pub fn create_project(
    store: &mut DocumentStore<impl Storage>,
    parameters: CreateProjectParameters,
) -> Result<Project, CreateProjectError> {
    // 1. Validate the free-text fields
    let title = parameters.title.trim();
    if title.is_empty() {
        return Err(CreateProjectError::EmptyTitle);
    }

    let description = parameters.description.trim();
    if description.is_empty() {
        return Err(CreateProjectError::EmptyDescription);
    }

    // 2. Build the project with fresh defaults
    let project = Project::new(
        id_token("p"),
        title.to_string(),
        description.to_string(),
        parameters.group,
        parameters.deadline,
    );

    // 3. Append to the document and persist
    store.create_project(project.clone());

    Ok(project)
}
