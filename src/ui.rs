use colored::*;
use jiff::civil::Date;

use crate::{
    models::project::{Project, Status},
    views::{self, AggregateStats},
};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Status tag colored the way the dashboard shows it
pub fn status_tag(status: Status) -> ColoredString {
    match status {
        Status::OnTrack => "On Track".green(),
        Status::AtRisk => "At Risk".yellow(),
        Status::Submitted => "Submitted".blue(),
    }
}

/// Fixed-width progress bar, e.g. `[██████░░░░░░░░░░░░░░] 30%`
pub fn progress_bar(progress: u8) -> String {
    let width = 20usize;
    let filled = (usize::from(progress) * width) / 100;
    format!(
        "[{}{}] {:>3}%",
        "█".repeat(filled),
        "░".repeat(width - filled),
        progress
    )
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize) {
    let project_word = if count == 1 { "project" } else { "projects" };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, project_word);
}

/// Render a section header (e.g., "Milestones", "Tasks")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

/// Render a single project line with id, title, status tag and the
/// deadline countdown right-aligned when the terminal is wide enough.
pub fn render_project_line(project: &Project, today: Date) {
    let terminal_width = get_terminal_width();

    let left_section = format!(
        "  {}  {}  {}",
        format!("{:>4}", project.id).dimmed(),
        project.title.bold(),
        status_tag(project.status)
    );
    let left_visible_len = format!(
        "  {}  {}  {}",
        format!("{:>4}", project.id),
        project.title,
        project.status
    )
    .chars()
    .count();

    let right_section = format!(
        "{}  ·  {}  ·  {}",
        project.group,
        progress_bar(project.progress),
        views::deadline_label(project, today)
    );
    let right_visible_len = right_section.chars().count();

    let total_content = left_visible_len + right_visible_len;
    if total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!(
            "{}{}{}",
            left_section,
            " ".repeat(padding),
            right_section.dimmed()
        );
    } else {
        println!("{}", left_section);
        println!("      {}", right_section.dimmed());
    }
}

/// Render the full detail card for a single project
pub fn render_project_detail(project: &Project, today: Date) {
    println!(
        "\n  {}  {}  {}",
        project.title.cyan().bold(),
        status_tag(project.status),
        format!("({})", project.group).dimmed()
    );
    println!("  {}", project.description.dimmed());
    println!(
        "\n  {}  {}",
        progress_bar(project.progress),
        views::deadline_label(project, today).dimmed()
    );

    if !project.milestones.is_empty() {
        render_section_header("Milestones");
        for milestone in &project.milestones {
            let glyph = if milestone.completed {
                "✓".dimmed()
            } else {
                "○".normal()
            };
            println!(
                "  {}  {}  {}  {}",
                format!("{:>4}", milestone.id).dimmed(),
                glyph,
                milestone.title,
                format!("due {}", milestone.due_date).dimmed()
            );
        }
    }

    if !project.tasks.is_empty() {
        render_section_header("Tasks");
        for task in &project.tasks {
            let glyph = if task.done { "✓".dimmed() } else { "○".normal() };
            let line = format!("  {}  {}  {}", format!("{:>4}", task.id).dimmed(), glyph, task.text);
            if task.done {
                println!("{}  {}", line.dimmed(), task.owner.dimmed());
            } else {
                println!("{}  {}", line, task.owner.dimmed());
            }
        }
    }

    render_submission(project);
    println!();
}

/// Render the submission block, or a placeholder when nothing has been
/// handed in yet.
fn render_submission(project: &Project) {
    render_section_header("Submission");

    let Some(submitted_at) = project.submission.submitted_at else {
        println!("  {}", "Not submitted yet".dimmed());
        return;
    };

    println!("  Link: {}", project.submission.link.blue());
    if !project.submission.note.is_empty() {
        println!("  Note: {}", project.submission.note);
    }
    println!(
        "  Submitted: {}",
        submitted_at.strftime("%Y-%m-%d %H:%M UTC")
    );

    match project.submission.marks {
        Some(marks) => {
            println!("  Marks: {}", format!("{}/100", marks).green().bold());
            if let Some(remark) = &project.submission.remark {
                println!("  Remark: {}", remark);
            }
        }
        None => println!("  {}", "Not graded yet".dimmed()),
    }
}

/// Render the aggregate dashboard numbers for a set of projects
pub fn render_stats(title: &str, stats: &AggregateStats) {
    render_view_header(title, stats.count);
    println!(
        "  {} {}",
        "Average progress:".dimmed(),
        progress_bar(stats.average_progress)
    );
    println!(
        "  {} {} of {}",
        "Submitted:".dimmed(),
        stats.submitted_count,
        stats.count
    );
    println!();
}
