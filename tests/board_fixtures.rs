use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::fs;
use team_board_metrics::analyze::{
    Analyzer, CapacityStatus, DependencyRisk, DependencyStatus,
};
use team_board_metrics::model::{
    start_sprint, Board, Issue, Notification, NotificationKind, NotificationStatus, Sprint,
    SprintStatus, Team, TeamMember,
};
use team_board_metrics::notify::NotificationEngine;
use team_board_metrics::report::MarkdownReport;

fn fixture(name: &str) -> String {
    format!("{}/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn load_board() -> Board {
    Board::new(
        Issue::from_config(&fixture("issues.json")).expect("load issues"),
        Sprint::from_config(&fixture("sprints.json")).expect("load sprints"),
        Team::from_config(&fixture("teams.json")).expect("load teams"),
        TeamMember::from_config(&fixture("members.json")).expect("load members"),
    )
}

#[test]
fn fixtures_load_in_file_order() {
    let board = load_board();

    assert_eq!(board.issues.len(), 7);
    assert_eq!(board.issues[0].id, "TSK-001");
    assert_eq!(board.teams.len(), 3);
    assert_eq!(board.members.len(), 5);
    assert_eq!(board.active_sprint().map(|s| s.display_name()), Some("2 - Authentication".to_string()));
}

#[test]
fn overview_matches_fixture_board() {
    let overview = load_board().analyze();

    let progress = overview.sprint_progress.as_ref().expect("active sprint progress");
    assert_eq!(progress.total_issues, 6);
    assert_eq!(progress.completed_issues, 1);
    assert_eq!(progress.in_progress_issues, 2);
    assert_eq!(progress.blocked_issues, 1);

    let (platform, platform_stats) = &overview.teams[0];
    assert_eq!(platform.name, "Platform");
    assert_eq!(platform_stats.total_issues, 2);
    assert!((platform_stats.capacity_utilization - 97.5).abs() < 1e-9);
    assert_eq!(platform_stats.capacity_status, CapacityStatus::AtCapacity);

    let (eve, eve_stats) = &overview.members[4];
    assert_eq!(eve.name, "Eve Novak");
    assert_eq!(eve_stats.assigned_issues, 2);

    let overloaded = overview
        .overloaded_members()
        .iter()
        .map(|m| m.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(overloaded, vec!["m-2"]);

    let dependencies = overview
        .cross_team_dependencies
        .iter()
        .map(|d| (d.from_issue_id.as_str(), d.to_issue_id.as_str(), d.risk, d.status))
        .collect::<Vec<_>>();
    assert_eq!(
        dependencies,
        vec![
            ("TSK-001", "TSK-003", DependencyRisk::High, DependencyStatus::InProgress),
            ("TSK-003", "TSK-006", DependencyRisk::High, DependencyStatus::Blocked),
            ("TSK-004", "TSK-001", DependencyRisk::Medium, DependencyStatus::InProgress),
        ]
    );

    let chains = overview
        .dependency_chains
        .iter()
        .map(|c| (c.issue_ids.join(">"), c.critical_path))
        .collect::<Vec<_>>();
    assert_eq!(
        chains,
        vec![
            ("TSK-001>TSK-003>TSK-006".to_string(), true),
            ("TSK-004>TSK-001>TSK-003>TSK-006".to_string(), true),
        ]
    );
}

#[test]
fn seeded_notifications_suppress_known_blocker() {
    let board = load_board();
    let seeded = Notification::from_config(&fixture("notifications.json")).expect("load notifications");
    let mut engine = NotificationEngine::new(seeded);
    let now = Utc.with_ymd_and_hms(2024, 2, 22, 12, 0, 0).unwrap();

    assert_eq!(engine.scan(&board, now), 4);
    assert_eq!(engine.by_kind(NotificationKind::Blocker).len(), 1);
    assert_eq!(engine.by_kind(NotificationKind::Capacity).len(), 1);
    assert_eq!(engine.by_kind(NotificationKind::CrossTeam).len(), 3);
    assert_eq!(engine.notifications().last().map(|n| n.id.as_str()), Some("notif-seed-1"));
    assert_eq!(engine.notifications().last().map(|n| n.status), Some(NotificationStatus::Read));
    assert_eq!(engine.unread_count(), 4);

    assert_eq!(engine.scan(&board, now), 0);
    engine.mark_all_as_read(now);
    assert_eq!(engine.unread_count(), 0);
}

#[test]
fn starting_next_sprint_moves_team_stats() {
    let mut board = load_board();
    board.sprints = start_sprint(&board.sprints, "s-3").expect("start sprint");

    assert_eq!(
        board.sprints.iter().map(|s| s.status).collect::<Vec<_>>(),
        vec![SprintStatus::Completed, SprintStatus::Completed, SprintStatus::Active]
    );
    let overview = board.analyze();
    assert_eq!(overview.teams[0].1.total_issues, 1);
}

#[test]
fn report_is_written_for_fixture_board() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("dashboard.md").to_string_lossy().to_string();
    let board = load_board();
    let mut engine = NotificationEngine::default();
    engine.scan(&board, Utc::now());

    board
        .analyze()
        .report_create(engine.notifications(), &path)
        .expect("write report");

    let report = fs::read_to_string(&path).expect("read report");
    assert!(report.contains("Sprint 2 - Authentication"));
    assert!(report.contains("TSK-001 -> TSK-003 -> TSK-006 **critical path**"));
    assert!(report.contains("Waiting for API spec"));
}

#[test]
fn missing_fixture_file_is_an_error() {
    assert!(Issue::from_config(&fixture("nope.json")).is_err());
}
