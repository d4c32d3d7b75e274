use crate::model::parse::{entries, required_datetime, required_str};
use crate::model::Result;
use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::fs;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum SprintStatus {
    Planned,
    Active,
    Completed,
}

impl SprintStatus {
    /// Sprints only move forward one step: Planned -> Active -> Completed.
    pub fn can_transition_to(&self, next: SprintStatus) -> bool {
        matches!(
            (self, next),
            (Self::Planned, Self::Active) | (Self::Active, Self::Completed)
        )
    }
}

impl FromStr for SprintStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "planned" => Ok(Self::Planned),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(format!("Unknown sprint status: {other}")),
        }
    }
}

impl fmt::Display for SprintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Planned => "Planned",
            Self::Active => "Active",
            Self::Completed => "Completed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Sprint {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub status: SprintStatus,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

// Create
impl Sprint {
    pub fn from_config(path: &str) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path)?;
        Self::parse(&json_str)
    }

    pub fn new(
        id: impl ToString,
        number: u32,
        title: impl ToString,
        status: SprintStatus,
        start: &DateTime<FixedOffset>,
        end: &DateTime<FixedOffset>,
    ) -> Sprint {
        Self {
            id: id.to_string(),
            number,
            title: title.to_string(),
            status,
            start: *start,
            end: *end,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} - {}", self.number, self.title)
    }
}

// Lifecycle
impl Sprint {
    pub fn transition(&self, next: SprintStatus) -> Result<Sprint> {
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "Sprint {} cannot move from {} to {}",
                self.display_name(),
                self.status,
                next
            )
            .into());
        }
        let mut sprint = self.clone();
        sprint.status = next;
        Ok(sprint)
    }
}

pub fn active_sprint(sprints: &[Sprint]) -> Option<&Sprint> {
    sprints.iter().find(|s| s.status == SprintStatus::Active)
}

/// Activates a planned sprint, completing whichever sprint is currently active.
pub fn start_sprint(sprints: &[Sprint], id: &str) -> Result<Vec<Sprint>> {
    let Some(target) = sprints.iter().find(|s| s.id == id) else {
        return Err(format!("Sprint not found: {id}").into());
    };
    let started = target.transition(SprintStatus::Active)?;
    sprints
        .iter()
        .map(|sprint| {
            if sprint.id == started.id {
                Ok(started.clone())
            } else if sprint.status == SprintStatus::Active {
                sprint.transition(SprintStatus::Completed)
            } else {
                Ok(sprint.clone())
            }
        })
        .collect()
}

// Parser
impl Sprint {
    pub fn parse(json_str: &str) -> Result<Vec<Self>> {
        let mut result = Vec::new();
        for (id, details) in entries(json_str)? {
            let Some(number) = details["number"].as_u64() else {
                return Err("Not found 'number' field".into());
            };
            let title = required_str(&details, "title")?;
            let status = required_str(&details, "status")?.parse::<SprintStatus>()?;
            let start = required_datetime(&details, "start")?;
            let end = required_datetime(&details, "end")?;
            if end < start {
                return Err(format!("Sprint {id} ends before it starts").into());
            }
            let number = u32::try_from(number)?;
            let new = Self::new(id, number, title, status, &start, &end);
            result.push(new);
        }
        Ok(result)
    }
}
