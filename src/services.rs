pub mod milestones;
pub mod projects;
pub mod submissions;
pub mod tasks;
