use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Fixed student cohorts a project can be assigned to
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    #[default]
    #[serde(rename = "Group A")]
    A,
    #[serde(rename = "Group B")]
    B,
    #[serde(rename = "Group C")]
    C,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown group '{0}'. Expected one of: Group A, Group B, Group C")]
pub struct GroupParseError(String);

impl FromStr for Group {
    type Err = GroupParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "group a" | "a" => Ok(Group::A),
            "group b" | "b" => Ok(Group::B),
            "group c" | "c" => Ok(Group::C),
            _ => Err(GroupParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::A => write!(f, "Group A"),
            Group::B => write!(f, "Group B"),
            Group::C => write!(f, "Group C"),
        }
    }
}

/// Health of a project. Only the submit-work operation moves a project to
/// `Submitted`; the other two are teacher-assigned and never derived from
/// progress.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    #[default]
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "At Risk")]
    AtRisk,
    Submitted,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::OnTrack => write!(f, "On Track"),
            Status::AtRisk => write!(f, "At Risk"),
            Status::Submitted => write!(f, "Submitted"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Task {
    /// Stable identifier, unique within the project
    pub id: String,
    /// What needs to be done
    pub text: String,
    /// Student responsible for this task
    pub owner: String,
    /// Completion flag; drives the project progress ratio
    pub done: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Stable identifier, unique within the project
    pub id: String,
    /// Name of the checkpoint
    pub title: String,
    /// Calendar date the checkpoint is due
    pub due_date: Date,
    /// Completion flag; independent of task progress
    pub completed: bool,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Link to the submitted work; empty until the first submit
    pub link: String,
    /// Free-text note accompanying the submission
    pub note: String,
    /// Set on the first successful submit and never cleared afterwards;
    /// re-submission overwrites it with the newer instant
    pub submitted_at: Option<Timestamp>,
    /// Teacher-awarded marks out of 100
    pub marks: Option<u8>,
    /// Teacher's written remark
    pub remark: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
    /// Stable identifier, unique across the document, assigned at creation
    pub id: String,
    /// Title of the project
    pub title: String,
    /// Description of the project
    pub description: String,
    /// Cohort this project belongs to
    pub group: Group,
    /// Final deadline
    pub deadline: Date,
    /// Current health of the project
    pub status: Status,
    /// Percentage of completed tasks, 0..=100
    pub progress: u8,
    /// Dated checkpoints
    pub milestones: Vec<Milestone>,
    /// Work items
    pub tasks: Vec<Task>,
    /// Student submission plus teacher evaluation
    pub submission: Submission,
}

impl Project {
    pub fn new(
        id: String,
        title: String,
        description: String,
        group: Group,
        deadline: Date,
    ) -> Self {
        Self {
            id,
            title,
            description,
            group,
            deadline,
            status: Status::OnTrack,
            progress: 0,
            milestones: vec![],
            tasks: vec![],
            submission: Submission::default(),
        }
    }

    /// Recompute `progress` from the done/total task ratio. A project with
    /// no tasks keeps whatever progress it already had.
    pub fn recompute_progress(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let done = self.tasks.iter().filter(|t| t.done).count();
        self.progress = ((done as f64 / self.tasks.len() as f64) * 100.0).round() as u8;
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn milestone(&self, milestone_id: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == milestone_id)
    }
}

/// Time-based identifier token, e.g. `p_1766217600000`
pub fn id_token(prefix: &str) -> String {
    format!("{}_{}", prefix, Timestamp::now().as_millisecond())
}
