use crate::analyze::{CrossTeamDependency, DependencyChain, DependencyRisk, DependencyStatus};
use crate::model::{BusinessImpact, Issue, IssueStatus, Team};
use itertools::Itertools;
use std::collections::{HashMap, HashSet};

const UNKNOWN_TEAM: &str = "Unknown";

/// Every dependency link that crosses a team boundary. Dangling ids are skipped.
pub fn find_cross_team_dependencies(issues: &[Issue], teams: &[Team]) -> Vec<CrossTeamDependency> {
    let by_id = index_issues(issues);
    let mut result = vec![];
    for issue in issues.iter().filter(|i| !i.dependencies.is_empty()) {
        for dependency_id in &issue.dependencies {
            let Some(dependency) = by_id.get(dependency_id.as_str()) else {
                log::trace!("{} depends on unknown issue {}", issue.id, dependency_id);
                continue;
            };
            if dependency.team_id == issue.team_id {
                continue;
            }
            result.push(CrossTeamDependency {
                from_issue_id: issue.id.clone(),
                to_issue_id: dependency.id.clone(),
                from_team_id: issue.team_id.clone(),
                to_team_id: dependency.team_id.clone(),
                from_team_name: team_name(teams, issue.team_id.as_deref()),
                to_team_name: team_name(teams, dependency.team_id.as_deref()),
                risk: dependency_risk(dependency),
                status: dependency_status(dependency),
            });
        }
    }
    result
}

/// Linear chains built by following only the first dependency of each issue.
///
/// Issues are visited in input order and every issue that ends up in a chain is
/// not used as a chain start again. A chain is kept when it holds at least two
/// issues owned by at least two known teams.
pub fn build_dependency_chains(issues: &[Issue], teams: &[Team]) -> Vec<DependencyChain> {
    let by_id = index_issues(issues);
    let mut processed: HashSet<&str> = HashSet::new();
    let mut chains = vec![];

    for issue in issues {
        if issue.dependencies.is_empty() || processed.contains(issue.id.as_str()) {
            continue;
        }
        processed.insert(issue.id.as_str());

        let mut chain: Vec<&Issue> = vec![issue];
        let mut current = issue;
        while let Some(next_id) = current.dependencies.first() {
            let Some(next) = by_id.get(next_id.as_str()).copied() else {
                break;
            };
            if chain.iter().any(|c| c.id == next.id) {
                break;
            }
            processed.insert(next.id.as_str());
            chain.push(next);
            current = next;
        }

        let team_ids = chain
            .iter()
            .filter_map(|i| i.team_id.clone())
            .unique()
            .collect::<Vec<_>>();
        if chain.len() < 2 || team_ids.len() < 2 {
            continue;
        }

        chains.push(DependencyChain {
            id: format!("chain-{}", issue.id),
            issue_ids: chain.iter().map(|i| i.id.clone()).collect(),
            team_names: team_ids
                .iter()
                .map(|id| team_name(teams, Some(id.as_str())))
                .collect(),
            team_ids,
            critical_path: chain
                .iter()
                .any(|i| i.business_impact == BusinessImpact::Critical),
        });
    }
    chains
}

/// Risk carried by the issue being waited on.
pub fn dependency_risk(dependency: &Issue) -> DependencyRisk {
    if dependency.is_blocked() {
        return DependencyRisk::High;
    }
    match dependency.business_impact {
        BusinessImpact::Critical => DependencyRisk::High,
        BusinessImpact::High => DependencyRisk::Medium,
        _ => DependencyRisk::Low,
    }
}

pub fn dependency_status(dependency: &Issue) -> DependencyStatus {
    if dependency.is_done() {
        DependencyStatus::Completed
    } else if dependency.is_blocked() {
        DependencyStatus::Blocked
    } else if dependency.status == IssueStatus::InProgress {
        DependencyStatus::InProgress
    } else {
        DependencyStatus::Pending
    }
}

/// True when at least one dependency resolves to an issue owned by another team.
pub fn has_cross_team_dependency(issue: &Issue, issues: &[Issue]) -> bool {
    issue.dependencies.iter().any(|dependency_id| {
        issues
            .iter()
            .find(|i| i.id == *dependency_id)
            .is_some_and(|dependency| dependency.team_id != issue.team_id)
    })
}

fn index_issues(issues: &[Issue]) -> HashMap<&str, &Issue> {
    let mut by_id = HashMap::with_capacity(issues.len());
    for issue in issues {
        // first one wins, matching a linear lookup
        by_id.entry(issue.id.as_str()).or_insert(issue);
    }
    by_id
}

pub(crate) fn team_name(teams: &[Team], team_id: Option<&str>) -> String {
    team_id
        .and_then(|id| teams.iter().find(|t| t.id == id))
        .map(|t| t.name.clone())
        .unwrap_or_else(|| UNKNOWN_TEAM.to_string())
}
