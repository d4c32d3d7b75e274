use crate::model::sprint::active_sprint;
use crate::model::{Issue, Sprint, Team, TeamMember};

/// Entity collections owned by the application. Replaced wholesale, never patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    pub issues: Vec<Issue>,
    pub sprints: Vec<Sprint>,
    pub teams: Vec<Team>,
    pub members: Vec<TeamMember>,
}

impl Board {
    pub fn new(
        issues: Vec<Issue>,
        sprints: Vec<Sprint>,
        teams: Vec<Team>,
        members: Vec<TeamMember>,
    ) -> Self {
        Self {
            issues,
            sprints,
            teams,
            members,
        }
    }

    pub fn issue(&self, id: &str) -> Option<&Issue> {
        self.issues.iter().find(|i| i.id == id)
    }

    pub fn team(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn member(&self, id: &str) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn team_members<'a>(&'a self, team: &Team) -> Vec<&'a TeamMember> {
        team_members(team, &self.members)
    }

    pub fn active_sprint(&self) -> Option<&Sprint> {
        active_sprint(&self.sprints)
    }

    /// Resolves an issue's assignee, preferring the member id over the display name.
    pub fn assignee(&self, issue: &Issue) -> Option<&TeamMember> {
        match &issue.assignee_id {
            Some(id) => self.member(id),
            None => self.members.iter().find(|m| m.name == issue.assignee),
        }
    }
}

pub fn team_members<'a>(team: &Team, members: &'a [TeamMember]) -> Vec<&'a TeamMember> {
    members.iter().filter(|m| team.has_member(&m.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IssueStatus;
    use chrono::Utc;

    #[test]
    fn assignee_prefers_member_id() {
        let members = vec![
            TeamMember::new("m-1", "Sam", "Engineer", 40.0, 10.0),
            TeamMember::new("m-2", "Sam", "Designer", 40.0, 10.0),
        ];
        let board = Board::new(vec![], vec![], vec![], members);

        let mut issue = Issue::new("A", "a", IssueStatus::Todo, "Sam", Utc::now());
        assert_eq!(board.assignee(&issue).map(|m| m.id.as_str()), Some("m-1"));

        issue.assignee_id = Some("m-2".to_string());
        assert_eq!(board.assignee(&issue).map(|m| m.id.as_str()), Some("m-2"));

        issue.assignee_id = Some("m-9".to_string());
        assert!(board.assignee(&issue).is_none());
    }

    #[test]
    fn team_members_skips_unknown_ids() {
        let team = Team::new("t", "T", Some("m-1"), vec!["m-1", "ghost"]);
        let members = vec![
            TeamMember::new("m-1", "A", "R", 40.0, 0.0),
            TeamMember::new("m-2", "B", "R", 40.0, 0.0),
        ];
        let found = team_members(&team, &members);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "m-1");
    }
}
