use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jiff::civil::Date;

use crate::{
    models::{
        document::DocumentStore,
        project::Group,
        session::{LoginError, Role, Session},
    },
    services::{
        milestones::{
            AddMilestoneError, AddMilestoneParameters, ToggleMilestoneError,
            ToggleMilestoneParameters, add_milestone, toggle_milestone,
        },
        projects::{CreateProjectError, CreateProjectParameters, create_project},
        submissions::{
            RecordEvaluationError, RecordEvaluationParameters, SubmitWorkError,
            SubmitWorkParameters, record_evaluation, submit_work,
        },
        tasks::{
            AddTaskError, AddTaskParameters, ToggleTaskError, ToggleTaskParameters, add_task,
            toggle_task,
        },
    },
    storage::{Storage, json::JsonFileStorage},
};

mod models;
mod services;
mod storage;
mod ui;
mod views;

#[derive(Parser)]
#[command(
    name = "projectsphere",
    about = "A group project tracker for classrooms, in your terminal"
)]
struct Cli {
    /// Sign in as 'student' or 'teacher'
    #[arg(long)]
    role: Role,

    /// Your display name
    #[arg(long, default_value = "")]
    name: String,

    /// Your email address
    #[arg(long, default_value = "")]
    email: String,

    /// Your password (never checked against anything, never stored)
    #[arg(long, default_value = "")]
    password: String,

    /// Your group (students only, e.g. "Group A")
    #[arg(long)]
    group: Option<Group>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the projects visible to you
    List,

    /// Show a single project in full
    View {
        /// Project id (e.g. "p1")
        project_id: String,
    },

    /// Aggregate numbers over the projects visible to you
    Stats,

    /// Create a new project (teachers only)
    New {
        /// Project title
        title: String,

        /// Short description of the project
        #[arg(short, long)]
        description: String,

        /// Owning group (e.g. "Group A")
        #[arg(short, long)]
        group: Group,

        /// Hard deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Date,
    },

    /// Manage tasks on a project
    #[command(subcommand)]
    Task(TaskCommands),

    /// Manage milestones on a project
    #[command(subcommand)]
    Milestone(MilestoneCommands),

    /// Hand in work for a project (students only)
    Submit {
        /// Project id (e.g. "p1")
        project_id: String,

        /// Link to the submitted work
        #[arg(short, long)]
        link: String,

        /// Note for the teacher
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// Record marks and a remark for a submission (teachers only)
    Grade {
        /// Project id (e.g. "p1")
        project_id: String,

        /// Marks out of 100
        #[arg(short, long)]
        marks: u8,

        /// Remark for the group
        #[arg(short, long, default_value = "")]
        remark: String,
    },
}

#[derive(Debug, Subcommand)]
enum TaskCommands {
    /// Add a task to a project
    Add {
        /// Project id (e.g. "p1")
        project_id: String,

        /// What needs to be done
        text: String,

        /// Team member responsible for the task
        #[arg(short, long)]
        owner: Option<String>,
    },

    /// Flip a task between done and not done
    Toggle {
        /// Project id (e.g. "p1")
        project_id: String,

        /// Task id (e.g. "t1")
        task_id: String,
    },
}

#[derive(Debug, Subcommand)]
enum MilestoneCommands {
    /// Add a milestone to a project (teachers only)
    Add {
        /// Project id (e.g. "p1")
        project_id: String,

        /// Milestone title
        title: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Date,
    },

    /// Flip a milestone between completed and open
    Toggle {
        /// Project id (e.g. "p1")
        project_id: String,

        /// Milestone id (e.g. "m1")
        milestone_id: String,
    },
}

/// Visibility is the same rule everywhere: a project the session cannot
/// see does not exist for it, mutations included.
fn ensure_visible(store: &DocumentStore<impl Storage>, session: &Session, project_id: &str) {
    let visible = views::visible_projects(store.document(), session);
    if !visible.iter().any(|p| p.id == project_id) {
        eprintln!("Error: Project '{}' not found", project_id);
        std::process::exit(1);
    }
}

fn main() {
    let cli = Cli::parse();

    // Sign in. The first missing field decides the message.
    let session = match Session::login(cli.role, &cli.name, &cli.email, &cli.password, cli.group) {
        Ok(session) => session,
        Err(LoginError::MissingGroup) => {
            eprintln!("Please select a group.");
            eprintln!("\nStudents must sign in with --group (e.g. --group 'Group A')");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let capabilities = session.capabilities();

    // Initialize storage
    let storage_path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("projectsphere")
        .join("store.json");

    // Create parent directory if it doesn't exist
    if let Some(parent) = storage_path.parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|e| {
            eprintln!("Error: Failed to create data directory: {}", e);
            std::process::exit(1);
        });
    }

    let mut store = DocumentStore::open(JsonFileStorage::new(storage_path));
    let today = jiff::Zoned::now().date();

    match cli.command {
        Some(Commands::List) | None => {
            let visible = views::visible_projects(store.document(), &session);

            if visible.is_empty() {
                println!("No projects to show");
            } else {
                let header = match session.group {
                    Some(group) => group.to_string(),
                    None => String::from("All projects"),
                };
                ui::render_view_header(&header, visible.len());
                for project in &visible {
                    ui::render_project_line(project, today);
                }
                println!();
            }
        }
        Some(Commands::View { project_id }) => {
            ensure_visible(&store, &session, &project_id);

            // ensure_visible already exited on a miss
            if let Some(project) = store.document().project(&project_id) {
                ui::render_project_detail(project, today);
            }
        }
        Some(Commands::Stats) => {
            let visible = views::visible_projects(store.document(), &session);
            let stats = views::aggregate_stats(&visible);

            let header = match session.group {
                Some(group) => format!("{} overview", group),
                None => String::from("Class overview"),
            };
            ui::render_stats(&header, &stats);
        }
        Some(Commands::New {
            title,
            description,
            group,
            deadline,
        }) => {
            if !capabilities.can_create_project {
                eprintln!("Error: Only teachers can create projects");
                std::process::exit(1);
            }

            let params = CreateProjectParameters {
                title,
                description,
                group,
                deadline,
            };

            match create_project(&mut store, params) {
                Ok(project) => {
                    println!("✓ Project created: {}", project.title);
                    println!("  {} · {} · due {}", project.id, project.group, project.deadline);
                }
                Err(CreateProjectError::EmptyTitle) => {
                    eprintln!("Error: Project title must not be empty");
                    std::process::exit(1);
                }
                Err(CreateProjectError::EmptyDescription) => {
                    eprintln!("Error: Project description must not be empty");
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Task(TaskCommands::Add {
            project_id,
            text,
            owner,
        })) => {
            ensure_visible(&store, &session, &project_id);

            let params = AddTaskParameters {
                project_id,
                text,
                owner,
            };

            match add_task(&mut store, params) {
                Ok(task) => {
                    println!("✓ Task added: {}", task.text);
                    println!("  {} · {}", task.id, task.owner);
                }
                Err(AddTaskError::EmptyText) => {
                    eprintln!("Error: Task text must not be empty");
                    std::process::exit(1);
                }
                Err(AddTaskError::ProjectNotFound(id)) => {
                    eprintln!("Error: Project '{}' not found", id);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Task(TaskCommands::Toggle {
            project_id,
            task_id,
        })) => {
            ensure_visible(&store, &session, &project_id);

            let params = ToggleTaskParameters {
                project_id: project_id.clone(),
                task_id,
            };

            match toggle_task(&mut store, params) {
                Ok(task) => {
                    let state = if task.done { "done" } else { "not done" };
                    println!("✓ Task {}: {}", state, task.text);
                    if let Some(project) = store.document().project(&project_id) {
                        println!("  Progress: {}", ui::progress_bar(project.progress));
                    }
                }
                Err(ToggleTaskError::ProjectNotFound(id)) => {
                    eprintln!("Error: Project '{}' not found", id);
                    std::process::exit(1);
                }
                Err(ToggleTaskError::TaskNotFound(id)) => {
                    eprintln!("Error: Task '{}' not found", id);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Milestone(MilestoneCommands::Add {
            project_id,
            title,
            due,
        })) => {
            if !capabilities.can_add_milestone {
                eprintln!("Error: Only teachers can add milestones");
                std::process::exit(1);
            }
            ensure_visible(&store, &session, &project_id);

            let params = AddMilestoneParameters {
                project_id,
                title,
                due_date: due,
            };

            match add_milestone(&mut store, params) {
                Ok(milestone) => {
                    println!("✓ Milestone added: {}", milestone.title);
                    println!("  {} · due {}", milestone.id, milestone.due_date);
                }
                Err(AddMilestoneError::EmptyTitle) => {
                    eprintln!("Error: Milestone title must not be empty");
                    std::process::exit(1);
                }
                Err(AddMilestoneError::ProjectNotFound(id)) => {
                    eprintln!("Error: Project '{}' not found", id);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Milestone(MilestoneCommands::Toggle {
            project_id,
            milestone_id,
        })) => {
            ensure_visible(&store, &session, &project_id);

            let params = ToggleMilestoneParameters {
                project_id,
                milestone_id,
            };

            match toggle_milestone(&mut store, params) {
                Ok(milestone) => {
                    let state = if milestone.completed {
                        "completed"
                    } else {
                        "reopened"
                    };
                    println!("✓ Milestone {}: {}", state, milestone.title);
                }
                Err(ToggleMilestoneError::ProjectNotFound(id)) => {
                    eprintln!("Error: Project '{}' not found", id);
                    std::process::exit(1);
                }
                Err(ToggleMilestoneError::MilestoneNotFound(id)) => {
                    eprintln!("Error: Milestone '{}' not found", id);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Submit {
            project_id,
            link,
            note,
        }) => {
            if !capabilities.can_submit_work {
                eprintln!("Error: Only students can submit work");
                std::process::exit(1);
            }
            ensure_visible(&store, &session, &project_id);

            let params = SubmitWorkParameters {
                project_id,
                link,
                note,
            };

            println!("Submitting...");
            match submit_work(&mut store, params) {
                Ok(project) => {
                    println!("✓ Work submitted: {}", project.submission.link);
                    println!("  Status: {}", project.status);
                }
                Err(SubmitWorkError::EmptyLink) => {
                    eprintln!("Error: Submission link must not be empty");
                    std::process::exit(1);
                }
                Err(SubmitWorkError::ProjectNotFound(id)) => {
                    eprintln!("Error: Project '{}' not found", id);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Grade {
            project_id,
            marks,
            remark,
        }) => {
            if !capabilities.can_grade {
                eprintln!("Error: Only teachers can grade submissions");
                std::process::exit(1);
            }
            ensure_visible(&store, &session, &project_id);

            let params = RecordEvaluationParameters {
                project_id,
                marks,
                remark,
            };

            match record_evaluation(&mut store, params) {
                Ok(project) => {
                    println!("✓ Graded: {}", project.title);
                    if let Some(marks) = project.submission.marks {
                        println!("  Marks: {}/100", marks);
                    }
                    if let Some(remark) = &project.submission.remark {
                        println!("  Remark: {}", remark);
                    }
                }
                Err(RecordEvaluationError::MarksOutOfRange(marks)) => {
                    eprintln!("Error: Marks must be between 0 and 100, got {}", marks);
                    std::process::exit(1);
                }
                Err(RecordEvaluationError::NotSubmitted(id)) => {
                    eprintln!("Error: Project '{}' has no submission to evaluate", id);
                    std::process::exit(1);
                }
                Err(RecordEvaluationError::ProjectNotFound(id)) => {
                    eprintln!("Error: Project '{}' not found", id);
                    std::process::exit(1);
                }
            }
        }
    }
}
