use crate::analyze::{
    BoardOverview, CrossTeamDependency, DependencyChain, MembersAnalyzed, TeamsAnalyzed,
};
use crate::model::{Notification, Result};
use markdown_builder::Markdown;
use markdown_table::{Heading, HeadingAlignment, MarkdownTable};
use std::fs;

pub trait MarkdownReport {
    fn report_render(&self, notifications: &[Notification]) -> Result<String>;
    fn report_create(&self, notifications: &[Notification], path: &str) -> Result<()>;
}

impl MarkdownReport for BoardOverview {
    fn report_render(&self, notifications: &[Notification]) -> Result<String> {
        let mut doc = Markdown::new();

        doc.header1("Team Board");
        doc.add_sprint(self);
        doc.add_teams(&self.teams)?;
        doc.add_members(&self.members)?;
        doc.add_dependencies(&self.cross_team_dependencies)?;
        doc.add_chains(&self.dependency_chains);
        doc.add_notifications(notifications)?;

        Ok(doc.render())
    }

    fn report_create(&self, notifications: &[Notification], path: &str) -> Result<()> {
        let rendered = self.report_render(notifications)?;
        fs::write(path, rendered)?;
        log::info!("Report written to {}", path);
        Ok(())
    }
}

trait MarkdownExt {
    fn add_sprint(&mut self, overview: &BoardOverview);
    fn add_teams(&mut self, teams: &TeamsAnalyzed) -> Result<()>;
    fn add_members(&mut self, members: &MembersAnalyzed) -> Result<()>;
    fn add_dependencies(&mut self, dependencies: &[CrossTeamDependency]) -> Result<()>;
    fn add_chains(&mut self, chains: &[DependencyChain]);
    fn add_notifications(&mut self, notifications: &[Notification]) -> Result<()>;
    fn add_table(&mut self, headings: &[&str], rows: Vec<Vec<String>>) -> Result<()>;
}

impl MarkdownExt for Markdown {
    fn add_sprint(&mut self, overview: &BoardOverview) {
        let (Some(sprint), Some(progress)) = (&overview.active_sprint, &overview.sprint_progress)
        else {
            self.header2("No active sprint");
            return;
        };
        self.header2(format!(
            "Sprint {} ({} - {})",
            sprint.display_name(),
            sprint.start.format("%d.%m.%Y"),
            sprint.end.format("%d.%m.%Y"),
        ));
        self.paragraph(format!(
            "**{:.0}%** complete: {} of {} issues done, {} in progress, {} blocked",
            progress.completion_rate,
            progress.completed_issues,
            progress.total_issues,
            progress.in_progress_issues,
            progress.blocked_issues,
        ));
    }

    fn add_teams(&mut self, teams: &TeamsAnalyzed) -> Result<()> {
        self.header2("Teams");
        let rows = teams
            .iter()
            .map(|(team, stats)| {
                vec![
                    format!("**{}**", team.name),
                    stats.member_count.to_string(),
                    stats.total_issues.to_string(),
                    stats.completed_issues.to_string(),
                    stats.blocked_issues.to_string(),
                    format!("{:.1}%", stats.capacity_utilization),
                    stats.capacity_status.to_string(),
                    team.health.to_string(),
                ]
            })
            .collect::<Vec<_>>();
        self.add_table(
            &["Team", "Members", "Issues", "Done", "Blocked", "Utilization", "Capacity", "Health"],
            rows,
        )
    }

    fn add_members(&mut self, members: &MembersAnalyzed) -> Result<()> {
        self.header2("Members");
        let rows = members
            .iter()
            .map(|(member, stats)| {
                vec![
                    format!("**{}**", member.name),
                    format!("*{}*", member.role),
                    format!("{}/{}", stats.completed_issues, stats.assigned_issues),
                    format!("{:.1}%", stats.utilization_rate),
                    format!("{:.0}", stats.performance_score),
                    stats.capacity_status.to_string(),
                ]
            })
            .collect::<Vec<_>>();
        self.add_table(
            &["Member", "Role", "Done", "Utilization", "Score", "Capacity"],
            rows,
        )
    }

    fn add_dependencies(&mut self, dependencies: &[CrossTeamDependency]) -> Result<()> {
        self.header2("Cross-team dependencies");
        let rows = dependencies
            .iter()
            .map(|d| {
                vec![
                    format!("{} ({})", d.from_issue_id, d.from_team_name),
                    format!("{} ({})", d.to_issue_id, d.to_team_name),
                    d.risk.to_string(),
                    d.status.to_string(),
                ]
            })
            .collect::<Vec<_>>();
        self.add_table(&["Issue", "Waits on", "Risk", "Status"], rows)
    }

    fn add_chains(&mut self, chains: &[DependencyChain]) {
        self.header2("Dependency chains");
        if chains.is_empty() {
            self.paragraph("*None*");
            return;
        }
        for chain in chains {
            let marker = if chain.critical_path { " **critical path**" } else { "" };
            self.paragraph(format!(
                "{}{} ({})",
                chain.issue_ids.join(" -> "),
                marker,
                chain.team_names.join(", ")
            ));
        }
    }

    fn add_notifications(&mut self, notifications: &[Notification]) -> Result<()> {
        self.header2("Notifications");
        let rows = notifications
            .iter()
            .map(|n| {
                let title = if n.is_unread() {
                    format!("**{}**", n.title)
                } else {
                    n.title.clone()
                };
                vec![
                    n.kind.to_string(),
                    n.priority.to_string(),
                    title,
                    n.message.clone(),
                    n.created_at.format("%d.%m.%Y %H:%M").to_string(),
                ]
            })
            .collect::<Vec<_>>();
        self.add_table(&["Type", "Priority", "Title", "Message", "Created"], rows)
    }

    fn add_table(&mut self, headings: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if rows.is_empty() {
            self.paragraph("*None*");
            return Ok(());
        }
        let header = headings
            .iter()
            .enumerate()
            .map(|(index, h)| {
                let alignment = if index == 0 {
                    None
                } else {
                    Some(HeadingAlignment::Center)
                };
                Heading::new(h.to_string(), alignment)
            })
            .collect::<Vec<_>>();
        let mut md_table = MarkdownTable::new(rows);
        md_table.with_headings(header);
        let Ok(table) = md_table.as_markdown() else {
            return Err("Failed to render markdown table".into());
        };
        self.paragraph(table);
        Ok(())
    }
}
