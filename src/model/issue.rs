use crate::model::parse::{
    entries, optional_f64, optional_str, optional_utc, required_str, required_utc, str_array,
};
use crate::model::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::str::FromStr;

/// Technical priority, `P0` is the most urgent.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct Priority(u8);

impl Priority {
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Result<Self> {
        if level > Self::MAX {
            return Err(format!("Priority out of range: P{level}").into());
        }
        Ok(Self(level))
    }

    pub fn level(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum IssueStatus {
    Todo,
    InProgress,
    InReview,
    Done,
    Blocked,
}

impl FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Todo" | "To Do" => Ok(Self::Todo),
            "In Progress" => Ok(Self::InProgress),
            "In Review" => Ok(Self::InReview),
            "Done" => Ok(Self::Done),
            "Blocked" => Ok(Self::Blocked),
            other => Err(format!("Unknown issue status: {other}")),
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Todo => "Todo",
            Self::InProgress => "In Progress",
            Self::InReview => "In Review",
            Self::Done => "Done",
            Self::Blocked => "Blocked",
        };
        f.write_str(s)
    }
}

/// Qualitative severity, independent of [`Priority`].
#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
pub enum BusinessImpact {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl FromStr for BusinessImpact {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Critical" => Ok(Self::Critical),
            "High" => Ok(Self::High),
            "Medium" => Ok(Self::Medium),
            "Low" => Ok(Self::Low),
            other => Err(format!("Unknown business impact: {other}")),
        }
    }
}

impl fmt::Display for BusinessImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        };
        f.write_str(s)
    }
}

/// Reason and time an issue got blocked. Both exist together or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Blocker {
    pub reason: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: IssueStatus,
    pub assignee: String,
    pub assignee_id: Option<String>,
    pub sprint_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub business_impact: BusinessImpact,
    pub stakeholders: Vec<String>,
    pub dependencies: Vec<String>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub team_id: Option<String>,
    pub tags: Vec<String>,
    pub blocked: Option<Blocker>,
}

// Create
impl Issue {
    pub fn from_config(path: &str) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path)?;
        Self::parse(&json_str)
    }

    pub fn new(
        id: impl ToString,
        title: impl ToString,
        status: IssueStatus,
        assignee: impl ToString,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            priority: Priority(2),
            status,
            assignee: assignee.to_string(),
            assignee_id: None,
            sprint_id: None,
            created_at,
            updated_at: created_at,
            business_impact: BusinessImpact::default(),
            stakeholders: vec![],
            dependencies: vec![],
            estimated_hours: None,
            actual_hours: None,
            team_id: None,
            tags: vec![],
            blocked: None,
        }
    }
}

// Mutation
impl Issue {
    pub fn block(&self, reason: impl ToString, at: DateTime<Utc>) -> Self {
        let mut issue = self.clone();
        issue.blocked = blocker_reason(reason.to_string()).map(|reason| Blocker { reason, at });
        issue.updated_at = at;
        issue
    }

    pub fn unblock(&self, at: DateTime<Utc>) -> Self {
        let mut issue = self.clone();
        issue.blocked = None;
        issue.updated_at = at;
        issue
    }

    pub fn with_status(&self, status: IssueStatus, at: DateTime<Utc>) -> Self {
        let mut issue = self.clone();
        issue.status = status;
        issue.updated_at = at;
        issue
    }

    pub fn blocked_reason(&self) -> Option<&str> {
        self.blocked.as_ref().map(|b| b.reason.as_str())
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.is_some()
    }

    pub fn is_done(&self) -> bool {
        self.status == IssueStatus::Done
    }
}

/// A reason made only of whitespace does not block.
fn blocker_reason(reason: String) -> Option<String> {
    if reason.trim().is_empty() {
        return None;
    }
    Some(reason)
}

/// Replaces the issue with the same id, leaving the input untouched.
pub fn replace_issue(issues: &[Issue], issue: Issue) -> Vec<Issue> {
    issues
        .iter()
        .map(|existing| {
            if existing.id == issue.id {
                issue.clone()
            } else {
                existing.clone()
            }
        })
        .collect()
}

// Parser
impl Issue {
    pub fn parse(json_str: &str) -> Result<Vec<Self>> {
        let mut result = Vec::new();
        for (id, details) in entries(json_str)? {
            let issue = Self::parse_one(id, &details)
                .map_err(|e| format!("Issue parse error: {e}"))?;
            result.push(issue);
        }
        Ok(result)
    }

    fn parse_one(id: String, details: &Value) -> Result<Self> {
        let title = required_str(details, "title")?;
        let status = required_str(details, "status")?.parse::<IssueStatus>()?;
        let priority = parse_priority(&details["priority"])?;
        let assignee = required_str(details, "assignee")?;
        let created_at = required_utc(details, "createdAt")?;
        let updated_at = optional_utc(details, "updatedAt")?.unwrap_or(created_at);
        let business_impact = match details["businessImpact"].as_str() {
            Some(impact) => impact.parse::<BusinessImpact>()?,
            None => BusinessImpact::default(),
        };
        let blocked = match optional_str(details, "blockedReason").and_then(blocker_reason) {
            Some(reason) => {
                let Some(at) = optional_utc(details, "blockedAt")? else {
                    return Err(format!("Not found 'blockedAt' field for blocked issue {id}").into());
                };
                Some(Blocker { reason, at })
            }
            None => None,
        };

        let mut issue = Self::new(id, title, status, assignee, created_at);
        issue.description = details["description"].as_str().unwrap_or("").to_string();
        issue.priority = priority;
        issue.assignee_id = optional_str(details, "assigneeId");
        issue.sprint_id = optional_str(details, "sprintId");
        issue.updated_at = updated_at;
        issue.business_impact = business_impact;
        issue.stakeholders = str_array(details, "stakeholders");
        issue.dependencies = str_array(details, "dependencies");
        issue.estimated_hours = optional_f64(details, "estimatedHours");
        issue.actual_hours = optional_f64(details, "actualHours");
        issue.team_id = optional_str(details, "teamId");
        issue.tags = str_array(details, "tags");
        issue.blocked = blocked;
        Ok(issue)
    }
}

fn parse_priority(value: &Value) -> Result<Priority> {
    if let Some(level) = value.as_u64() {
        return Priority::new(u8::try_from(level).unwrap_or(u8::MAX));
    }
    let Some(label) = value.as_str() else {
        return Err("Not found 'priority' field".into());
    };
    let Ok(level) = label.trim_start_matches(['P', 'p']).parse::<u8>() else {
        return Err(format!("Not a valid priority: {label}").into());
    };
    Priority::new(level)
}
