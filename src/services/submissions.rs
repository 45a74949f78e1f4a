use std::{thread, time::Duration};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    models::{
        document::DocumentStore,
        project::{Project, Status},
    },
    storage::Storage,
};

/// Fixed pause before a submission is committed, mirroring the upload
/// round-trip the tool fakes.
pub const SUBMIT_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Error, PartialEq)]
pub enum SubmitWorkError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Submission link must not be empty")]
    EmptyLink,
}

pub struct SubmitWorkParameters {
    pub project_id: String,
    pub link: String,
    pub note: String,
}

pub fn submit_work(
    store: &mut DocumentStore<impl Storage>,
    parameters: SubmitWorkParameters,
) -> Result<Project, SubmitWorkError> {
    // 1. Validate the link
    let link = parameters.link.trim().to_string();
    if link.is_empty() {
        return Err(SubmitWorkError::EmptyLink);
    }

    // 2. Confirm the target project exists before sleeping
    if store.document().project(&parameters.project_id).is_none() {
        return Err(SubmitWorkError::ProjectNotFound(parameters.project_id));
    }

    // 3. Simulated upload
    thread::sleep(SUBMIT_DELAY);

    // 4. Stamp the submission. Resubmitting overwrites link, note and
    //    timestamp but leaves any existing evaluation in place.
    let note = parameters.note.trim().to_string();
    store.update_project(&parameters.project_id, |mut project| {
        project.status = Status::Submitted;
        project.submission.link = link;
        project.submission.note = note;
        project.submission.submitted_at = Some(Timestamp::now());
        project
    });

    let updated = store.document().project(&parameters.project_id).cloned();
    match updated {
        Some(project) => Ok(project),
        None => Err(SubmitWorkError::ProjectNotFound(parameters.project_id)),
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RecordEvaluationError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Project '{0}' has no submission to evaluate")]
    NotSubmitted(String),

    #[error("Marks must be between 0 and 100, got {0}")]
    MarksOutOfRange(u8),
}

pub struct RecordEvaluationParameters {
    pub project_id: String,
    pub marks: u8,
    pub remark: String,
}

pub fn record_evaluation(
    store: &mut DocumentStore<impl Storage>,
    parameters: RecordEvaluationParameters,
) -> Result<Project, RecordEvaluationError> {
    // 1. Range-check the marks
    if parameters.marks > 100 {
        return Err(RecordEvaluationError::MarksOutOfRange(parameters.marks));
    }

    // 2. Only submitted projects can be evaluated
    let project = store
        .document()
        .project(&parameters.project_id)
        .ok_or_else(|| RecordEvaluationError::ProjectNotFound(parameters.project_id.clone()))?;

    if project.submission.submitted_at.is_none() {
        return Err(RecordEvaluationError::NotSubmitted(parameters.project_id));
    }

    // 3. Record marks and remark. Status stays as the student left it.
    let marks = parameters.marks;
    let remark = parameters.remark.trim().to_string();
    store.update_project(&parameters.project_id, |mut project| {
        project.submission.marks = Some(marks);
        project.submission.remark = if remark.is_empty() {
            None
        } else {
            Some(remark)
        };
        project
    });

    let updated = store.document().project(&parameters.project_id).cloned();
    match updated {
        Some(project) => Ok(project),
        None => Err(RecordEvaluationError::ProjectNotFound(
            parameters.project_id,
        )),
    }
}
