pub mod analyzer;
pub mod dependency;
mod model;

pub use analyzer::{
    classify_capacity, compute_board_overview, compute_member_stats, compute_team_stats,
    percentage, team_utilization, Analyzer,
};
pub use dependency::{
    build_dependency_chains, dependency_risk, dependency_status, find_cross_team_dependencies,
    has_cross_team_dependency,
};
pub use model::*;
