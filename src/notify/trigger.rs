use crate::analyze::dependency::team_name;
use crate::analyze::{has_cross_team_dependency, team_utilization};
use crate::model::{
    Board, EntityKind, Issue, IssueStatus, NotificationKind, NotificationPriority, RelatedEntity,
};
use itertools::Itertools;

/// Teams above this utilization (strictly) raise a capacity notification.
pub const CAPACITY_THRESHOLD: f64 = 90.0;

/// A condition found on the board, before it becomes a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub kind: NotificationKind,
    pub related: RelatedEntity,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
    pub recipients: Vec<String>,
}

pub trait Trigger {
    fn kind(&self) -> NotificationKind;
    fn detect(&self, board: &Board) -> Vec<Detection>;
}

pub struct BlockerTrigger;
pub struct CapacityTrigger;
pub struct CrossTeamTrigger;
pub struct WeeklyDigestTrigger;

/// Triggers run on every scan, in this order.
pub fn scan_triggers() -> Vec<Box<dyn Trigger + Send + Sync>> {
    vec![
        Box::new(BlockerTrigger),
        Box::new(CapacityTrigger),
        Box::new(CrossTeamTrigger),
    ]
}

impl Trigger for BlockerTrigger {
    fn kind(&self) -> NotificationKind {
        NotificationKind::Blocker
    }

    fn detect(&self, board: &Board) -> Vec<Detection> {
        board
            .issues
            .iter()
            .filter_map(|issue| {
                let reason = issue.blocked_reason()?;
                let assignee = board.assignee(issue).map(|m| m.id.clone());
                let lead = team_lead(board, issue.team_id.as_deref());
                Some(Detection {
                    kind: self.kind(),
                    related: RelatedEntity::new(&issue.id, EntityKind::Issue),
                    title: format!("Blocked: {}", issue.title),
                    message: format!("{} is blocked: {}", issue.id, reason),
                    priority: NotificationPriority::High,
                    recipients: recipients([assignee, lead]),
                })
            })
            .collect()
    }
}

impl Trigger for CapacityTrigger {
    fn kind(&self) -> NotificationKind {
        NotificationKind::Capacity
    }

    fn detect(&self, board: &Board) -> Vec<Detection> {
        board
            .teams
            .iter()
            .filter_map(|team| {
                let utilization = team_utilization(team, &board.members);
                if utilization <= CAPACITY_THRESHOLD {
                    return None;
                }
                let priority = if utilization >= 100.0 {
                    NotificationPriority::High
                } else {
                    NotificationPriority::Medium
                };
                Some(Detection {
                    kind: self.kind(),
                    related: RelatedEntity::new(&team.id, EntityKind::Team),
                    title: format!("{} is over capacity", team.name),
                    message: format!("Team utilization is at {:.1}%", utilization),
                    priority,
                    recipients: recipients([team.lead_id.clone()]),
                })
            })
            .collect()
    }
}

impl Trigger for CrossTeamTrigger {
    fn kind(&self) -> NotificationKind {
        NotificationKind::CrossTeam
    }

    fn detect(&self, board: &Board) -> Vec<Detection> {
        board
            .issues
            .iter()
            .filter(|issue| has_cross_team_dependency(issue, &board.issues))
            .map(|issue| {
                let other_teams = foreign_dependency_teams(board, issue);
                let mut leads = vec![team_lead(board, issue.team_id.as_deref())];
                leads.extend(
                    other_teams
                        .iter()
                        .map(|team_id| team_lead(board, team_id.as_deref())),
                );
                let team_names = other_teams
                    .iter()
                    .map(|team_id| team_name(&board.teams, team_id.as_deref()))
                    .join(", ");
                Detection {
                    kind: self.kind(),
                    related: RelatedEntity::new(&issue.id, EntityKind::Issue),
                    title: format!("Cross-team dependency: {}", issue.title),
                    message: format!(
                        "{} ({}) depends on work owned by {}",
                        issue.id,
                        team_name(&board.teams, issue.team_id.as_deref()),
                        team_names
                    ),
                    priority: NotificationPriority::Medium,
                    recipients: recipients(leads),
                }
            })
            .collect()
    }
}

impl Trigger for WeeklyDigestTrigger {
    fn kind(&self) -> NotificationKind {
        NotificationKind::WeeklyDigest
    }

    fn detect(&self, board: &Board) -> Vec<Detection> {
        let Some(sprint) = board.active_sprint() else {
            return vec![];
        };
        let issues = board
            .issues
            .iter()
            .filter(|i| i.sprint_id.as_deref() == Some(sprint.id.as_str()))
            .collect::<Vec<_>>();
        let done = issues.iter().filter(|i| i.is_done()).count();
        let in_progress = issues
            .iter()
            .filter(|i| i.status == IssueStatus::InProgress)
            .count();
        let blocked = issues.iter().filter(|i| i.is_blocked()).count();
        vec![Detection {
            kind: self.kind(),
            related: RelatedEntity::new(&sprint.id, EntityKind::Sprint),
            title: format!("Weekly digest: {}", sprint.display_name()),
            message: format!(
                "{done} done, {in_progress} in progress, {blocked} blocked out of {} issues",
                issues.len()
            ),
            priority: NotificationPriority::Low,
            recipients: recipients(board.teams.iter().map(|t| t.lead_id.clone())),
        }]
    }
}

fn team_lead(board: &Board, team_id: Option<&str>) -> Option<String> {
    team_id
        .and_then(|id| board.team(id))
        .and_then(|team| team.lead_id.clone())
}

fn foreign_dependency_teams(board: &Board, issue: &Issue) -> Vec<Option<String>> {
    issue
        .dependencies
        .iter()
        .filter_map(|id| board.issue(id))
        .filter(|dependency| dependency.team_id != issue.team_id)
        .map(|dependency| dependency.team_id.clone())
        .unique()
        .collect()
}

fn recipients(ids: impl IntoIterator<Item = Option<String>>) -> Vec<String> {
    ids.into_iter().flatten().unique().collect()
}
