use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::models::project::{Group, Milestone, Project, Status, Submission, Task};
use crate::storage::Storage;

/// The entire persisted application state: every project, in a stable
/// order. Mutations never edit a project in place; they build a fresh
/// document with the affected project replaced.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub projects: Vec<Project>,
}

impl Default for Document {
    /// The built-in document used on first run and whenever the persisted
    /// blob is missing or malformed: two seeded example projects.
    fn default() -> Self {
        Self {
            projects: vec![
                Project {
                    id: String::from("p1"),
                    title: String::from("AI Attendance System"),
                    description: String::from(
                        "Build a face-recognition based attendance system for labs.",
                    ),
                    group: Group::A,
                    deadline: Date::constant(2025, 12, 20),
                    status: Status::OnTrack,
                    progress: 45,
                    milestones: vec![
                        Milestone {
                            id: String::from("m1"),
                            title: String::from("Requirement Analysis"),
                            due_date: Date::constant(2025, 11, 30),
                            completed: true,
                        },
                        Milestone {
                            id: String::from("m2"),
                            title: String::from("Model Training"),
                            due_date: Date::constant(2025, 12, 10),
                            completed: false,
                        },
                    ],
                    tasks: vec![
                        Task {
                            id: String::from("t1"),
                            text: String::from("Collect sample face dataset"),
                            owner: String::from("Vipul"),
                            done: true,
                        },
                        Task {
                            id: String::from("t2"),
                            text: String::from("Design database schema"),
                            owner: String::from("Aman"),
                            done: false,
                        },
                        Task {
                            id: String::from("t3"),
                            text: String::from("Build React dashboard UI"),
                            owner: String::from("Priya"),
                            done: false,
                        },
                    ],
                    submission: Submission::default(),
                },
                Project {
                    id: String::from("p2"),
                    title: String::from("Smart Farming Dashboard"),
                    description: String::from(
                        "IoT + ML dashboard to monitor soil, weather, and crop health.",
                    ),
                    group: Group::B,
                    deadline: Date::constant(2025, 12, 25),
                    status: Status::AtRisk,
                    progress: 20,
                    milestones: vec![Milestone {
                        id: String::from("m1"),
                        title: String::from("Sensor Research"),
                        due_date: Date::constant(2025, 12, 5),
                        completed: false,
                    }],
                    tasks: vec![
                        Task {
                            id: String::from("t1"),
                            text: String::from("Finalize tech stack"),
                            owner: String::from("Arjun"),
                            done: false,
                        },
                        Task {
                            id: String::from("t2"),
                            text: String::from("Create wireframes"),
                            owner: String::from("Neha"),
                            done: false,
                        },
                    ],
                    submission: Submission::default(),
                },
            ],
        }
    }
}

impl Document {
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// New document with the project matching `id` replaced by
    /// `transform(project)`; every other project is carried over untouched.
    /// Returns `None` when no project matches.
    pub fn with_project_updated(
        &self,
        id: &str,
        transform: impl FnOnce(Project) -> Project,
    ) -> Option<Document> {
        let index = self.projects.iter().position(|p| p.id == id)?;
        let mut projects = self.projects.clone();
        let updated = transform(projects[index].clone());
        projects[index] = updated;
        Some(Document { projects })
    }

    /// New document with `project` appended at the end of the sequence.
    /// The caller supplies the unique id and the default submission.
    pub fn with_project_added(&self, project: Project) -> Document {
        let mut projects = self.projects.clone();
        projects.push(project);
        Document { projects }
    }
}

/// Owns the single in-memory document and its storage handle. The two
/// mutation primitives are the only way the document changes; each
/// successful one persists the fresh snapshot.
pub struct DocumentStore<S: Storage> {
    document: Document,
    storage: S,
}

impl<S: Storage> DocumentStore<S> {
    /// Rehydrate from storage. Loading never fails: an absent or malformed
    /// blob degrades to the built-in default document.
    pub fn open(storage: S) -> Self {
        let document = storage.load();
        Self { document, storage }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Apply a pure transform to the project matching `id`. Returns whether
    /// a project matched; an unknown id leaves the document untouched and
    /// skips the save.
    pub fn update_project(&mut self, id: &str, transform: impl FnOnce(Project) -> Project) -> bool {
        match self.document.with_project_updated(id, transform) {
            Some(next) => {
                self.document = next;
                self.persist();
                true
            }
            None => false,
        }
    }

    pub fn create_project(&mut self, project: Project) {
        self.document = self.document.with_project_added(project);
        self.persist();
    }

    /// Best-effort write. The in-memory document stays authoritative for
    /// the rest of the session even when the underlying storage is
    /// unavailable.
    fn persist(&self) {
        let _ = self.storage.save(&self.document);
    }
}
