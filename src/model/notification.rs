use crate::model::parse::{entries, optional_utc, required_str, required_utc, str_array};
use crate::model::Result;
use chrono::{DateTime, Utc};
use std::fmt;
use std::fs;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum NotificationKind {
    Blocker,
    Capacity,
    CrossTeam,
    WeeklyDigest,
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "blocker" => Ok(Self::Blocker),
            "capacity" => Ok(Self::Capacity),
            "cross_team" => Ok(Self::CrossTeam),
            "weekly_digest" => Ok(Self::WeeklyDigest),
            other => Err(format!("Unknown notification type: {other}")),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Blocker => "blocker",
            Self::Capacity => "capacity",
            Self::CrossTeam => "cross_team",
            Self::WeeklyDigest => "weekly_digest",
        };
        f.write_str(s)
    }
}

/// Dismissed notifications are removed from the list, so there is no variant for them.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum NotificationStatus {
    Unread,
    Read,
}

impl FromStr for NotificationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "unread" => Ok(Self::Unread),
            "read" => Ok(Self::Read),
            other => Err(format!("Unknown notification status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum NotificationPriority {
    High,
    Medium,
    Low,
}

impl FromStr for NotificationPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("Unknown notification priority: {other}")),
        }
    }
}

impl fmt::Display for NotificationPriority {
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
pub enum EntityKind {
    Issue,
    Team,
    Sprint,
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "issue" => Ok(Self::Issue),
            "team" => Ok(Self::Team),
            "sprint" => Ok(Self::Sprint),
            other => Err(format!("Unknown entity type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct RelatedEntity {
    pub id: String,
    pub kind: EntityKind,
}

impl RelatedEntity {
    pub fn new(id: impl ToString, kind: EntityKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
    pub status: NotificationStatus,
    pub recipients: Vec<String>,
    pub related: Option<RelatedEntity>,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

// Create
impl Notification {
    pub fn from_config(path: &str) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path)?;
        Self::parse(&json_str)
    }

    pub fn new(
        id: impl ToString,
        kind: NotificationKind,
        title: impl ToString,
        message: impl ToString,
        priority: NotificationPriority,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title: title.to_string(),
            message: message.to_string(),
            priority,
            status: NotificationStatus::Unread,
            recipients: vec![],
            related: None,
            created_at,
            read_at: None,
        }
    }

    pub fn related_to(mut self, related: RelatedEntity) -> Self {
        self.related = Some(related);
        self
    }

    pub fn with_recipients(mut self, recipients: Vec<String>) -> Self {
        self.recipients = recipients;
        self
    }

    /// Deduplication key: one held notification per kind and related entity.
    pub fn key(&self) -> (NotificationKind, Option<&str>) {
        (self.kind, self.related.as_ref().map(|r| r.id.as_str()))
    }

    pub fn is_unread(&self) -> bool {
        self.status == NotificationStatus::Unread
    }
}

// Parser
impl Notification {
    pub fn parse(json_str: &str) -> Result<Vec<Self>> {
        let mut result = Vec::new();
        for (id, details) in entries(json_str)? {
            let kind = required_str(&details, "type")?.parse::<NotificationKind>()?;
            let title = required_str(&details, "title")?;
            let message = details["message"].as_str().unwrap_or("");
            let priority = match details["priority"].as_str() {
                Some(priority) => priority.parse::<NotificationPriority>()?,
                None => NotificationPriority::Medium,
            };
            let created_at = required_utc(&details, "createdAt")?;

            let mut new = Self::new(id, kind, title, message, priority, created_at)
                .with_recipients(str_array(&details, "recipients"));
            new.status = required_str(&details, "status")?.parse::<NotificationStatus>()?;
            new.read_at = optional_utc(&details, "readAt")?;
            if let Some(related_id) = details["relatedEntityId"].as_str() {
                let kind = required_str(&details, "relatedEntityType")?.parse::<EntityKind>()?;
                new.related = Some(RelatedEntity::new(related_id, kind));
            }
            result.push(new);
        }
        Ok(result)
    }
}
