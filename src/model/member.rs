use crate::model::parse::{entries, required_f64, required_str};
use crate::model::Result;
use serde_json::Value;
use std::fs;

#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub name: String,
    pub level: u8,
}

impl Skill {
    pub fn new(name: impl ToString, level: u8) -> Result<Self> {
        if !(1..=5).contains(&level) {
            return Err(format!("Skill level must be 1-5, got {level}").into());
        }
        Ok(Self {
            name: name.to_string(),
            level,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub skills: Vec<Skill>,
    /// Hours available per sprint.
    pub capacity: f64,
    /// Hours currently assigned.
    pub current_workload: f64,
}

// Create
impl TeamMember {
    pub fn from_config(path: &str) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path)?;
        Self::parse(&json_str)
    }

    pub fn new(
        id: impl ToString,
        name: impl ToString,
        role: impl ToString,
        capacity: f64,
        current_workload: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            skills: vec![],
            capacity,
            current_workload,
        }
    }

    /// Workload as a percentage of capacity. Not capped at 100.
    pub fn utilization(&self) -> f64 {
        if self.capacity <= 0.0 {
            return 0.0;
        }
        self.current_workload / self.capacity * 100.0
    }
}

// Parser
impl TeamMember {
    pub fn parse(json_str: &str) -> Result<Vec<Self>> {
        let mut result = Vec::new();
        for (id, details) in entries(json_str)? {
            let name = required_str(&details, "name")?;
            let role = required_str(&details, "role")?;
            let capacity = required_f64(&details, "capacity")?;
            let workload = required_f64(&details, "currentWorkload")?;
            if capacity < 0.0 || workload < 0.0 {
                return Err(format!("Negative hours for member {id}").into());
            }
            let mut new = Self::new(id, name, role, capacity, workload);
            new.skills = parse_skills(&details["skills"])?;
            result.push(new);
        }
        Ok(result)
    }
}

fn parse_skills(value: &Value) -> Result<Vec<Skill>> {
    let Some(items) = value.as_array() else {
        return Ok(vec![]);
    };
    items
        .iter()
        .map(|item| -> Result<Skill> {
            let name = required_str(item, "name")?;
            let Some(level) = item["level"].as_u64() else {
                return Err("Not found 'level' field".into());
            };
            Skill::new(name, u8::try_from(level).unwrap_or(u8::MAX))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_members_with_skills() {
        let json = r#"{
            "m-1": { "name": "Alice", "role": "Engineer", "capacity": 40, "currentWorkload": 38,
                     "skills": [{ "name": "rust", "level": 5 }, { "name": "sql", "level": 3 }] },
            "m-2": { "name": "Bob", "role": "Designer", "capacity": 32, "currentWorkload": 0 }
        }"#;
        let members = TeamMember::parse(json).unwrap();

        assert_eq!(members[0].skills.len(), 2);
        assert_eq!(members[0].skills[0], Skill::new("rust", 5).unwrap());
        assert!(members[1].skills.is_empty());
    }

    #[test]
    fn rejects_skill_level_out_of_range() {
        assert!(Skill::new("rust", 0).is_err());
        assert!(Skill::new("rust", 6).is_err());
        let json = r#"{ "m-1": { "name": "A", "role": "R", "capacity": 1, "currentWorkload": 1,
                        "skills": [{ "name": "go", "level": 9 }] } }"#;
        assert!(TeamMember::parse(json).is_err());
    }

    #[test]
    fn utilization_is_unbounded_and_zero_safe() {
        assert_eq!(TeamMember::new("m", "M", "R", 40.0, 50.0).utilization(), 125.0);
        assert_eq!(TeamMember::new("m", "M", "R", 0.0, 10.0).utilization(), 0.0);
    }
}
