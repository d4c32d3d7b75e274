use crate::model::{Sprint, Team, TeamMember};
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum CapacityStatus {
    Overloaded,
    AtCapacity,
    Optimal,
    Underutilized,
}

impl fmt::Display for CapacityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Overloaded => "Overloaded",
            Self::AtCapacity => "At Capacity",
            Self::Optimal => "Optimal",
            Self::Underutilized => "Underutilized",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamStats {
    pub member_count: usize,
    pub total_issues: usize,
    pub completed_issues: usize,
    pub in_progress_issues: usize,
    pub blocked_issues: usize,
    pub completion_rate: f64,
    pub total_capacity: f64,
    pub total_workload: f64,
    pub capacity_utilization: f64,
    pub capacity_status: CapacityStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberStats {
    pub assigned_issues: usize,
    pub completed_issues: usize,
    pub in_progress_issues: usize,
    pub completion_rate: f64,
    pub utilization_rate: f64,
    pub performance_score: f64,
    pub capacity_status: CapacityStatus,
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum DependencyRisk {
    High,
    Medium,
    Low,
}

impl fmt::Display for DependencyRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum DependencyStatus {
    Completed,
    Blocked,
    InProgress,
    Pending,
}

impl fmt::Display for DependencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Completed => "completed",
            Self::Blocked => "blocked",
            Self::InProgress => "in_progress",
            Self::Pending => "pending",
        };
        f.write_str(s)
    }
}

/// `from_issue` waits on `to_issue`, which belongs to another team.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTeamDependency {
    pub from_issue_id: String,
    pub to_issue_id: String,
    pub from_team_id: Option<String>,
    pub to_team_id: Option<String>,
    pub from_team_name: String,
    pub to_team_name: String,
    pub risk: DependencyRisk,
    pub status: DependencyStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DependencyChain {
    pub id: String,
    /// Dependent first, each following issue is the first dependency of the previous one.
    pub issue_ids: Vec<String>,
    pub team_ids: Vec<String>,
    pub team_names: Vec<String>,
    pub critical_path: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SprintProgress {
    pub total_issues: usize,
    pub completed_issues: usize,
    pub in_progress_issues: usize,
    pub blocked_issues: usize,
    pub completion_rate: f64,
}

pub type TeamsAnalyzed = Vec<(Team, TeamStats)>;
pub type MembersAnalyzed = Vec<(TeamMember, MemberStats)>;

#[derive(Debug, Clone)]
pub struct BoardOverview {
    pub active_sprint: Option<Sprint>,
    pub sprint_progress: Option<SprintProgress>,
    pub teams: TeamsAnalyzed,
    pub members: MembersAnalyzed,
    pub cross_team_dependencies: Vec<CrossTeamDependency>,
    pub dependency_chains: Vec<DependencyChain>,
}

impl BoardOverview {
    pub fn overloaded_members(&self) -> Vec<&TeamMember> {
        self.members
            .iter()
            .filter(|(_, stats)| stats.capacity_status == CapacityStatus::Overloaded)
            .map(|(member, _)| member)
            .collect()
    }
}
