mod board;
mod issue;
mod member;
mod notification;
mod parse;
mod result;
mod sprint;
mod team;

pub use board::{team_members, Board};
pub use issue::{replace_issue, Blocker, BusinessImpact, Issue, IssueStatus, Priority};
pub use member::{Skill, TeamMember};
pub use notification::{
    EntityKind, Notification, NotificationKind, NotificationPriority, NotificationStatus,
    RelatedEntity,
};
pub use result::Result;
pub use sprint::{active_sprint, start_sprint, Sprint, SprintStatus};
pub use team::{Team, TeamHealth};
