//! Renders the tracker state as a terminal screen.

use std::fmt::Write;

use console::{style, StyledObject};

use jobtrack::client::{StatusFilter, TrackerState};
use jobtrack::JobStatus;

pub const EMPTY_LIST: &str = "No jobs found. Add one above!";

pub const HELP: &str = "\
Commands:
  company <text>      set the draft company
  role <text>         set the draft role
  status <Status>     set the draft status
  notes <text>        set the draft notes
  add                 add the draft as a new job
  filter <All|Status> show only one status
  set <row> <Status>  change the status of a row
  delete <row>        delete a row
  refresh             reload from the server
  help                show this help
  quit                exit";

fn status_style<D>(status: JobStatus, value: D) -> StyledObject<D> {
    let styled = style(value);
    match status {
        JobStatus::Applied => styled.blue(),
        JobStatus::Interview => styled.yellow(),
        JobStatus::Offer => styled.green(),
        JobStatus::Rejected => styled.red(),
    }
}

/// Builds the whole screen. Pure function of `state`.
pub fn render(state: &TrackerState) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", style("Job Application Tracker").bold());
    render_counts(&mut out, state);
    out.push('\n');
    render_draft(&mut out, state);
    render_filters(&mut out, state);
    out.push('\n');
    render_rows(&mut out, state);

    if let Some(error) = state.error() {
        let _ = writeln!(out, "\n{} {}", style("error:").red().bold(), style(error).red());
    } else if let Some(notice) = state.notice() {
        let _ = writeln!(out, "\n{}", style(notice).dim());
    }

    out
}

fn render_counts(out: &mut String, state: &TrackerState) {
    let counts = state.counts();
    let mut tiles = vec![format!("{} {}", style("Total").bold(), counts.total)];
    for (status, n) in counts.iter() {
        tiles.push(format!("{} {}", status_style(status, status.as_str()), n));
    }
    let _ = writeln!(out, "{}", tiles.join("  |  "));
}

fn render_draft(out: &mut String, state: &TrackerState) {
    let draft = state.draft();
    let field = |value: &str| {
        if value.is_empty() {
            style("-".to_string()).dim()
        } else {
            style(value.to_string())
        }
    };

    let add = if draft.is_submittable() {
        style("[add]").green().bold()
    } else {
        style("[add: company and role required]").dim()
    };

    let _ = writeln!(
        out,
        "New: company {}  role {}  status {}  notes {}  {}",
        field(&draft.company),
        field(&draft.role),
        status_style(draft.status, draft.status.as_str()),
        field(&draft.notes),
        add
    );
}

fn render_filters(out: &mut String, state: &TrackerState) {
    let active = state.active_filter();
    let options: Vec<String> = StatusFilter::OPTIONS
        .iter()
        .map(|filter| {
            if *filter == active {
                style(format!("[{}]", filter.label())).bold().reverse().to_string()
            } else {
                format!(" {} ", filter.label())
            }
        })
        .collect();
    let _ = writeln!(out, "Filter: {}", options.join(" "));
}

fn render_rows(out: &mut String, state: &TrackerState) {
    let visible = state.visible_records();
    if visible.is_empty() {
        let _ = writeln!(out, "{}", style(EMPTY_LIST).dim());
        return;
    }

    for (i, job) in visible.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {} - {}  {}  {}",
            i + 1,
            style(&job.company).bold(),
            job.role,
            status_style(job.status, job.status.as_str()),
            style(job.applied_date.format("%Y-%m-%d")).dim()
        );
        if !job.notes.is_empty() {
            let _ = writeln!(out, "     {}", style(&job.notes).italic());
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use jobtrack::client::{DraftField, ListResponse};
    use jobtrack::Job;

    use super::*;

    fn job(id: &str, company: &str, status: JobStatus, notes: &str) -> Job {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        Job {
            id: id.to_string(),
            company: company.to_string(),
            role: "Engineer".to_string(),
            status,
            applied_date: at,
            notes: notes.to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    fn state_with(jobs: Vec<Job>) -> TrackerState {
        console::set_colors_enabled(false);
        let mut state = TrackerState::new();
        let ticket = state.begin_request();
        state.apply_snapshot(ticket, ListResponse::from(jobs));
        state
    }

    #[test]
    fn test_empty_list_message() {
        let screen = render(&state_with(vec![]));
        assert!(screen.contains(EMPTY_LIST));
        assert!(screen.contains("Total 0"));
        assert!(screen.contains("[All]"));
    }

    #[test]
    fn test_rows_are_numbered_within_filter() {
        let mut state = state_with(vec![
            job("3", "Initech", JobStatus::Offer, ""),
            job("2", "Globex", JobStatus::Applied, "referral"),
            job("1", "Acme", JobStatus::Applied, ""),
        ]);
        state.set_filter(StatusFilter::Only(JobStatus::Applied));

        let screen = render(&state);
        assert!(screen.contains("  1. Globex - Engineer  Applied  2026-03-14"));
        assert!(screen.contains("referral"));
        assert!(screen.contains("  2. Acme - Engineer"));
        assert!(!screen.contains("Initech"));
        // Counts still cover the whole snapshot.
        assert!(screen.contains("Total 3"));
        assert!(screen.contains("Applied 2"));
        assert!(screen.contains("[Applied]"));
    }

    #[test]
    fn test_add_control_disabled_until_required_fields() {
        let mut state = state_with(vec![]);
        state.edit_draft(DraftField::Company, "Acme").unwrap();
        assert!(render(&state).contains("[add: company and role required]"));

        state.edit_draft(DraftField::Role, "Engineer").unwrap();
        let screen = render(&state);
        assert!(screen.contains("company Acme  role Engineer"));
        assert!(screen.contains("[add]"));
    }

    #[test]
    fn test_error_shown_over_notice() {
        let mut state = state_with(vec![]);
        state.set_notice("Job deleted");
        assert!(render(&state).contains("Job deleted"));

        state.set_error("Company and Role are required!");
        let screen = render(&state);
        assert!(screen.contains("error: Company and Role are required!"));
        assert!(!screen.contains("Job deleted"));
    }
}
