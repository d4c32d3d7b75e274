use crate::model::{Board, Notification, NotificationKind, NotificationStatus};
use crate::notify::trigger::{scan_triggers, Detection, Trigger, WeeklyDigestTrigger};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Holds the notification list and folds newly detected conditions into it.
///
/// At most one notification is held per `(kind, related entity)` pair. Dismissing
/// removes the entry, so the same condition can be raised again by a later scan.
#[derive(Debug, Clone, Default)]
pub struct NotificationEngine {
    notifications: Vec<Notification>,
    sequence: u64,
}

impl NotificationEngine {
    pub fn new(initial: Vec<Notification>) -> Self {
        Self {
            notifications: initial,
            sequence: 0,
        }
    }

    /// Most recent first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| n.is_unread()).count()
    }

    pub fn by_kind(&self, kind: NotificationKind) -> Vec<&Notification> {
        self.notifications.iter().filter(|n| n.kind == kind).collect()
    }

    /// Runs blocker, capacity and cross-team detection. Returns how many were added.
    pub fn scan(&mut self, board: &Board, now: DateTime<Utc>) -> usize {
        let detections = scan_triggers()
            .iter()
            .flat_map(|trigger| trigger.detect(board))
            .collect::<Vec<_>>();
        let added = self.merge(detections, now);
        if added > 0 {
            log::info!("Notification scan raised {} new notification(s)", added);
        } else {
            log::debug!("Notification scan found nothing new");
        }
        added
    }

    /// Raises the digest for the active sprint, once per sprint while it is held.
    pub fn push_weekly_digest(&mut self, board: &Board, now: DateTime<Utc>) -> bool {
        self.merge(WeeklyDigestTrigger.detect(board), now) > 0
    }

    pub fn mark_as_read(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        let Some(notification) = self.find_mut(id) else {
            return false;
        };
        notification.status = NotificationStatus::Read;
        notification.read_at = Some(now);
        true
    }

    pub fn mark_as_unread(&mut self, id: &str) -> bool {
        let Some(notification) = self.find_mut(id) else {
            return false;
        };
        notification.status = NotificationStatus::Unread;
        notification.read_at = None;
        true
    }

    /// Removes the notification. There is no dismissed state to come back from.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let Some(index) = self.notifications.iter().position(|n| n.id == id) else {
            return false;
        };
        self.notifications.remove(index);
        true
    }

    /// Marks every unread notification read with the same timestamp.
    pub fn mark_all_as_read(&mut self, now: DateTime<Utc>) -> usize {
        let mut changed = 0;
        for notification in self.notifications.iter_mut().filter(|n| n.is_unread()) {
            notification.status = NotificationStatus::Read;
            notification.read_at = Some(now);
            changed += 1;
        }
        changed
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Notification> {
        self.notifications.iter_mut().find(|n| n.id == id)
    }

    fn merge(&mut self, detections: Vec<Detection>, now: DateTime<Utc>) -> usize {
        let mut held: HashSet<(NotificationKind, Option<String>)> = self
            .notifications
            .iter()
            .map(|n| {
                let (kind, related_id) = n.key();
                (kind, related_id.map(String::from))
            })
            .collect();

        let mut fresh = vec![];
        for detection in detections {
            if !held.insert((detection.kind, Some(detection.related.id.clone()))) {
                continue;
            }
            let notification = self.build(detection, now);
            log::debug!(
                "New {} notification {} for {:?}",
                notification.kind,
                notification.id,
                notification.related.as_ref().map(|r| &r.id)
            );
            fresh.push(notification);
        }

        let added = fresh.len();
        if added > 0 {
            fresh.append(&mut self.notifications);
            self.notifications = fresh;
        }
        added
    }

    fn build(&mut self, detection: Detection, now: DateTime<Utc>) -> Notification {
        self.sequence += 1;
        let id = format!("notif-{}-{}", now.timestamp_millis(), self.sequence);
        Notification::new(
            id,
            detection.kind,
            detection.title,
            detection.message,
            detection.priority,
            now,
        )
        .related_to(detection.related)
        .with_recipients(detection.recipients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        EntityKind, Issue, IssueStatus, NotificationPriority, RelatedEntity, Sprint, SprintStatus,
        Team, TeamMember,
    };
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn board() -> Board {
        let mut api = Issue::new("TSK-006", "API contract", IssueStatus::Blocked, "Bob", now())
            .block("Waiting for API spec", now());
        api.team_id = Some("team-2".to_string());
        let mut login = Issue::new("TSK-001", "Login page", IssueStatus::Todo, "Alice", now());
        login.team_id = Some("team-1".to_string());
        login.dependencies = vec!["TSK-006".to_string()];

        Board::new(
            vec![login, api],
            vec![],
            vec![
                Team::new("team-1", "Platform", Some("m-1"), vec!["m-1", "m-2"]),
                Team::new("team-2", "Mobile", Some("m-3"), vec!["m-3"]),
            ],
            vec![
                TeamMember::new("m-1", "Alice", "Lead", 40.0, 38.0),
                TeamMember::new("m-2", "Bob", "Engineer", 40.0, 40.0),
                TeamMember::new("m-3", "Carol", "Lead", 40.0, 10.0),
            ],
        )
    }

    fn keys(engine: &NotificationEngine) -> Vec<(NotificationKind, String)> {
        engine
            .notifications()
            .iter()
            .map(|n| (n.kind, n.related.as_ref().unwrap().id.clone()))
            .collect()
    }

    #[test]
    fn scan_raises_each_condition_once() {
        let board = board();
        let mut engine = NotificationEngine::default();

        assert_eq!(engine.scan(&board, now()), 3);
        assert_eq!(
            keys(&engine),
            vec![
                (NotificationKind::Blocker, "TSK-006".to_string()),
                (NotificationKind::Capacity, "team-1".to_string()),
                (NotificationKind::CrossTeam, "TSK-001".to_string()),
            ]
        );
        assert_eq!(engine.unread_count(), 3);

        assert_eq!(engine.scan(&board, now() + Duration::seconds(30)), 0);
        assert_eq!(engine.scan(&board, now() + Duration::seconds(60)), 0);
        assert_eq!(engine.notifications().len(), 3);
    }

    #[test]
    fn blocked_issue_scenario() {
        let mut board = board();
        board.teams.clear();
        board.issues[0].dependencies.clear();
        let mut engine = NotificationEngine::default();

        assert_eq!(engine.scan(&board, now()), 1);
        let blocker = &engine.notifications()[0];
        assert_eq!(blocker.kind, NotificationKind::Blocker);
        assert_eq!(
            blocker.related,
            Some(RelatedEntity::new("TSK-006", EntityKind::Issue))
        );
        assert!(blocker.is_unread());
        assert_eq!(blocker.priority, NotificationPriority::High);
        assert_eq!(blocker.created_at, now());
    }

    #[test]
    fn existing_read_notification_suppresses_duplicate() {
        let board = board();
        let mut engine = NotificationEngine::default();
        engine.scan(&board, now());
        let id = engine.by_kind(NotificationKind::Blocker)[0].id.clone();
        assert!(engine.mark_as_read(&id, now()));

        assert_eq!(engine.scan(&board, now()), 0);
        assert_eq!(engine.by_kind(NotificationKind::Blocker).len(), 1);
    }

    #[test]
    fn new_notifications_are_prepended() {
        let mut board = board();
        let mut engine = NotificationEngine::default();
        engine.scan(&board, now());

        let mut extra = Issue::new("TSK-007", "Payments", IssueStatus::Todo, "Carol", now());
        extra = extra.block("Vendor outage", now());
        board.issues.push(extra);

        assert_eq!(engine.scan(&board, now() + Duration::seconds(30)), 1);
        assert_eq!(
            engine.notifications()[0].related.as_ref().unwrap().id,
            "TSK-007"
        );
        assert_eq!(engine.notifications().len(), 4);
    }

    #[test]
    fn dismissed_condition_is_raised_again() {
        let board = board();
        let mut engine = NotificationEngine::default();
        engine.scan(&board, now());
        let id = engine.by_kind(NotificationKind::Capacity)[0].id.clone();

        assert!(engine.dismiss(&id));
        assert_eq!(engine.notifications().len(), 2);
        assert!(!engine.dismiss(&id));
        assert_eq!(engine.notifications().len(), 2);

        assert_eq!(engine.scan(&board, now()), 1);
        assert_ne!(engine.by_kind(NotificationKind::Capacity)[0].id, id);
    }

    #[test]
    fn read_unread_round_trip() {
        let board = board();
        let mut engine = NotificationEngine::default();
        engine.scan(&board, now());
        let id = engine.notifications()[1].id.clone();

        assert!(engine.mark_as_read(&id, now()));
        assert_eq!(engine.notifications()[1].status, NotificationStatus::Read);
        assert_eq!(engine.notifications()[1].read_at, Some(now()));
        assert_eq!(engine.unread_count(), 2);

        assert!(engine.mark_as_unread(&id));
        assert_eq!(engine.notifications()[1].status, NotificationStatus::Unread);
        assert_eq!(engine.notifications()[1].read_at, None);

        assert!(!engine.mark_as_read("missing", now()));
        assert!(!engine.mark_as_unread("missing"));
    }

    #[test]
    fn mark_all_as_read_leaves_nothing_unread() {
        let board = board();
        let mut engine = NotificationEngine::default();
        engine.scan(&board, now());
        let earlier = now() - Duration::hours(1);
        let first = engine.notifications()[0].id.clone();
        engine.mark_as_read(&first, earlier);

        let later = now() + Duration::minutes(5);
        assert_eq!(engine.mark_all_as_read(later), 2);
        assert_eq!(engine.unread_count(), 0);
        assert_eq!(engine.notifications()[0].read_at, Some(earlier));
        assert!(engine.notifications()[1..]
            .iter()
            .all(|n| n.read_at == Some(later)));
    }

    #[test]
    fn initial_notifications_are_respected() {
        let board = board();
        let held = Notification::new(
            "n-1",
            NotificationKind::Blocker,
            "Blocked",
            "",
            NotificationPriority::High,
            now(),
        )
        .related_to(RelatedEntity::new("TSK-006", EntityKind::Issue));
        let mut engine = NotificationEngine::new(vec![held]);

        assert_eq!(engine.scan(&board, now()), 2);
        assert_eq!(engine.by_kind(NotificationKind::Blocker).len(), 1);
        assert_eq!(engine.notifications().last().unwrap().id, "n-1");
    }

    #[test]
    fn unrelated_notification_does_not_suppress_detections() {
        let board = board();
        let general = Notification::new(
            "n-1",
            NotificationKind::Blocker,
            "Blocked work",
            "",
            NotificationPriority::High,
            now(),
        );
        let mut engine = NotificationEngine::new(vec![general]);

        assert_eq!(engine.scan(&board, now()), 3);
        assert_eq!(engine.by_kind(NotificationKind::Blocker).len(), 2);
        let held = engine
            .notifications()
            .iter()
            .map(|n| n.key())
            .collect::<HashSet<_>>();
        assert_eq!(held.len(), engine.notifications().len());
    }

    #[test]
    fn weekly_digest_once_per_sprint() {
        let mut board = board();
        let start = now().fixed_offset();
        let end = (now() + Duration::days(14)).fixed_offset();
        board.sprints = vec![Sprint::new("s-2", 2, "Auth", SprintStatus::Active, &start, &end)];
        let mut engine = NotificationEngine::default();

        assert!(engine.push_weekly_digest(&board, now()));
        assert!(!engine.push_weekly_digest(&board, now()));
        assert_eq!(engine.by_kind(NotificationKind::WeeklyDigest).len(), 1);

        board.sprints.clear();
        let mut empty = NotificationEngine::default();
        assert!(!empty.push_weekly_digest(&board, now()));
    }

    #[test]
    fn ids_are_unique_within_one_scan() {
        let board = board();
        let mut engine = NotificationEngine::default();
        engine.scan(&board, now());
        let ids = engine
            .notifications()
            .iter()
            .map(|n| n.id.clone())
            .collect::<HashSet<_>>();
        assert_eq!(ids.len(), 3);
    }
}
