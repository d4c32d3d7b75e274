use crate::model::parse::{entries, optional_str, required_str, str_array};
use crate::model::Result;
use std::fmt;
use std::fs;
use std::str::FromStr;

/// Health flag set by hand on the team page, never derived.
#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
pub enum TeamHealth {
    #[default]
    Healthy,
    AtRisk,
    Blocked,
}

impl FromStr for TeamHealth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "healthy" => Ok(Self::Healthy),
            "at_risk" => Ok(Self::AtRisk),
            "blocked" => Ok(Self::Blocked),
            other => Err(format!("Unknown team health: {other}")),
        }
    }
}

impl fmt::Display for TeamHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Healthy => "healthy",
            Self::AtRisk => "at_risk",
            Self::Blocked => "blocked",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub color: String,
    pub lead_id: Option<String>,
    pub member_ids: Vec<String>,
    pub health: TeamHealth,
}

// Create
impl Team {
    pub fn from_config(path: &str) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path)?;
        Self::parse(&json_str)
    }

    pub fn new(
        id: impl ToString,
        name: impl ToString,
        lead_id: Option<impl ToString>,
        member_ids: Vec<impl ToString>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: String::from("#64748b"),
            lead_id: lead_id.map(|l| l.to_string()),
            member_ids: member_ids.iter().map(|m| m.to_string()).collect(),
            health: TeamHealth::default(),
        }
    }

    pub fn has_member(&self, member_id: &str) -> bool {
        self.member_ids.iter().any(|m| m == member_id)
    }
}

// Parser
impl Team {
    pub fn parse(json_str: &str) -> Result<Vec<Self>> {
        let mut result = Vec::new();
        for (id, details) in entries(json_str)? {
            let name = required_str(&details, "name")?;
            let health = match details["health"].as_str() {
                Some(health) => health.parse::<TeamHealth>()?,
                None => TeamHealth::default(),
            };
            let mut new = Self::new(
                id,
                name,
                optional_str(&details, "leadId"),
                str_array(&details, "memberIds"),
            );
            if let Some(color) = optional_str(&details, "color") {
                new.color = color;
            }
            new.health = health;
            result.push(new);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_teams() {
        let json = r##"{
            "team-1": { "name": "Platform", "color": "#2563eb", "leadId": "m-1",
                        "memberIds": ["m-1", "m-2"], "health": "at_risk" },
            "team-2": { "name": "Mobile", "memberIds": [] }
        }"##;
        let teams = Team::parse(json).unwrap();

        assert_eq!(teams[0].name, "Platform");
        assert_eq!(teams[0].health, TeamHealth::AtRisk);
        assert!(teams[0].has_member("m-2"));
        assert_eq!(teams[1].lead_id, None);
        assert_eq!(teams[1].health, TeamHealth::Healthy);
    }

    #[test]
    fn rejects_team_without_name() {
        let err = Team::parse(r#"{ "team-1": { "memberIds": [] } }"#).unwrap_err();
        assert_eq!(err.to_string(), "Not found 'name' field");
    }
}
