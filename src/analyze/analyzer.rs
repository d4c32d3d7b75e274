use crate::analyze::dependency::{build_dependency_chains, find_cross_team_dependencies};
use crate::analyze::{
    BoardOverview, CapacityStatus, MemberStats, MembersAnalyzed, SprintProgress, TeamStats,
    TeamsAnalyzed,
};
use crate::model::{team_members, Board, Issue, IssueStatus, Team, TeamMember};

pub trait Analyzer {
    fn analyze(&self) -> BoardOverview;
}

impl Analyzer for Board {
    fn analyze(&self) -> BoardOverview {
        let active_sprint = self.active_sprint().cloned();
        let active_sprint_id = active_sprint.as_ref().map(|s| s.id.as_str());

        let teams: TeamsAnalyzed = self
            .teams
            .iter()
            .map(|team| {
                let stats = compute_team_stats(team, &self.members, &self.issues, active_sprint_id);
                (team.clone(), stats)
            })
            .collect();
        let members: MembersAnalyzed = self
            .members
            .iter()
            .map(|member| (member.clone(), compute_member_stats(member, &self.issues)))
            .collect();
        let sprint_progress = active_sprint_id.map(|id| {
            let issues = self.issues_in_sprint(id);
            sprint_progress(&issues)
        });

        BoardOverview {
            active_sprint,
            sprint_progress,
            teams,
            members,
            cross_team_dependencies: find_cross_team_dependencies(&self.issues, &self.teams),
            dependency_chains: build_dependency_chains(&self.issues, &self.teams),
        }
    }
}

trait BoardExtension {
    fn issues_in_sprint<'a>(&'a self, sprint_id: &str) -> Vec<&'a Issue>;
}

impl BoardExtension for Board {
    fn issues_in_sprint<'a>(&'a self, sprint_id: &str) -> Vec<&'a Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.sprint_id.as_deref() == Some(sprint_id))
            .collect()
    }
}

pub fn compute_board_overview(board: &Board) -> BoardOverview {
    board.analyze()
}

/// Stats for one team. Without an active sprint every issue of the team counts.
pub fn compute_team_stats(
    team: &Team,
    members: &[TeamMember],
    issues: &[Issue],
    active_sprint_id: Option<&str>,
) -> TeamStats {
    let team_issues = issues
        .iter()
        .filter(|issue| issue.team_id.as_deref() == Some(team.id.as_str()))
        .filter(|issue| match active_sprint_id {
            Some(sprint_id) => issue.sprint_id.as_deref() == Some(sprint_id),
            None => true,
        })
        .collect::<Vec<_>>();
    let progress = sprint_progress(&team_issues);

    let members = team_members(team, members);
    let (total_capacity, total_workload) = capacity_totals(&members);
    let capacity_utilization = percentage(total_workload, total_capacity);

    TeamStats {
        member_count: members.len(),
        total_issues: progress.total_issues,
        completed_issues: progress.completed_issues,
        in_progress_issues: progress.in_progress_issues,
        blocked_issues: progress.blocked_issues,
        completion_rate: progress.completion_rate,
        total_capacity,
        total_workload,
        capacity_utilization,
        capacity_status: classify_capacity(capacity_utilization),
    }
}

pub fn compute_member_stats(member: &TeamMember, issues: &[Issue]) -> MemberStats {
    let assigned = issues
        .iter()
        .filter(|issue| is_assigned_to(issue, member))
        .collect::<Vec<_>>();
    let completed_issues = assigned.iter().filter(|i| i.is_done()).count();
    let in_progress_issues = assigned
        .iter()
        .filter(|i| i.status == IssueStatus::InProgress)
        .count();

    let completion_rate = percentage(completed_issues as f64, assigned.len() as f64);
    let utilization_rate = member.utilization();
    let performance_score =
        (completion_rate * 0.6 + utilization_rate.min(100.0) * 0.4).min(100.0);

    MemberStats {
        assigned_issues: assigned.len(),
        completed_issues,
        in_progress_issues,
        completion_rate,
        utilization_rate,
        performance_score,
        capacity_status: classify_capacity(utilization_rate),
    }
}

/// Aggregate workload over aggregate capacity of the team's members.
pub fn team_utilization(team: &Team, members: &[TeamMember]) -> f64 {
    let (capacity, workload) = capacity_totals(&team_members(team, members));
    percentage(workload, capacity)
}

fn capacity_totals(members: &[&TeamMember]) -> (f64, f64) {
    members.iter().fold((0.0, 0.0), |(capacity, workload), m| {
        (capacity + m.capacity, workload + m.current_workload)
    })
}

/// Lower bound of each band is inclusive.
pub fn classify_capacity(utilization_rate: f64) -> CapacityStatus {
    if utilization_rate >= 100.0 {
        CapacityStatus::Overloaded
    } else if utilization_rate >= 85.0 {
        CapacityStatus::AtCapacity
    } else if utilization_rate >= 60.0 {
        CapacityStatus::Optimal
    } else {
        CapacityStatus::Underutilized
    }
}

/// `part / whole * 100`, or 0 when `whole` is not positive.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 0.0;
    }
    part / whole * 100.0
}

fn is_assigned_to(issue: &Issue, member: &TeamMember) -> bool {
    match &issue.assignee_id {
        Some(id) => *id == member.id,
        None => issue.assignee == member.name,
    }
}

fn sprint_progress(issues: &[&Issue]) -> SprintProgress {
    let completed_issues = issues.iter().filter(|i| i.is_done()).count();
    SprintProgress {
        total_issues: issues.len(),
        completed_issues,
        in_progress_issues: issues
            .iter()
            .filter(|i| i.status == IssueStatus::InProgress)
            .count(),
        blocked_issues: issues
            .iter()
            .filter(|i| i.status == IssueStatus::Blocked || i.is_blocked())
            .count(),
        completion_rate: percentage(completed_issues as f64, issues.len() as f64),
    }
}
