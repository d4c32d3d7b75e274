mod utils;

use crate::utils::{FileProgress, MultiProgressNew};
use chrono::Utc;
use clap::Parser;
use env_logger::Env;
use indicatif::{MultiProgress, ProgressBar};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use team_board_metrics::analyze::Analyzer;
use team_board_metrics::model::{
    start_sprint, Board, Issue, Notification, Result, Sprint, SprintStatus, Team, TeamMember,
};
use team_board_metrics::notify::scheduler::DEFAULT_PERIOD;
use team_board_metrics::notify::{
    NotificationEngine, NotificationScheduler, SharedBoard, SharedEngine,
};
use team_board_metrics::report::MarkdownReport;
use tokio::sync::Mutex;

#[derive(Parser, Debug, Clone)]
struct Args {
    #[arg(long = "issues", default_value = "issues.json")]
    issues_path: String,
    #[arg(long = "sprints", default_value = "sprints.json")]
    sprints_path: String,
    #[arg(long = "teams", default_value = "teams.json")]
    teams_path: String,
    #[arg(long = "members", default_value = "members.json")]
    members_path: String,
    /// Notifications already held, e.g. read or unread ones from a previous run
    #[arg(long = "notifications")]
    notifications_path: Option<String>,
    #[arg(long = "report", default_value = "dashboard.md")]
    report_path: String,
    #[arg(long = "interval_secs", default_value_t = DEFAULT_PERIOD.as_secs())]
    interval_secs: u64,
    /// Keep scanning and rewriting the report until interrupted
    #[arg(long)]
    watch: bool,
    /// Also raise the weekly digest for the active sprint
    #[arg(long)]
    digest: bool,
    /// Activate this sprint before analysis, completing the current one
    #[arg(long = "start_sprint")]
    start_sprint: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<()> {
    let (board, notifications) = parse_configs(args).await?;
    let board: SharedBoard = Arc::new(Mutex::new(board));
    let engine: SharedEngine = Arc::new(Mutex::new(NotificationEngine::new(notifications)));

    if !args.watch {
        {
            let board = board.lock().await;
            let mut engine = engine.lock().await;
            engine.scan(&board, Utc::now());
            if args.digest {
                engine.push_weekly_digest(&board, Utc::now());
            }
        }
        return write_report(&board, &engine, &args.report_path).await;
    }

    // scans belong to the scheduler; this loop only reloads fixtures and writes the report
    let period = Duration::from_secs(args.interval_secs.max(1));
    let handle = NotificationScheduler::start(board.clone(), engine.clone(), period);
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period / 2, period);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                match load_board(args) {
                    Ok(fresh) => *board.lock().await = fresh,
                    Err(e) => log::warn!("Keeping previous board, reload failed: {}", e),
                }
                if args.digest {
                    let board = board.lock().await;
                    engine.lock().await.push_weekly_digest(&board, Utc::now());
                }
                write_report(&board, &engine, &args.report_path).await?;
            }
        }
    }
    handle.stop().await;
    write_report(&board, &engine, &args.report_path).await
}

async fn write_report(board: &SharedBoard, engine: &SharedEngine, path: &str) -> Result<()> {
    let overview = board.lock().await.analyze();
    let engine = engine.lock().await;
    log::info!(
        "{} notification(s), {} unread",
        engine.notifications().len(),
        engine.unread_count()
    );
    overview.report_create(engine.notifications(), path)
}

async fn parse_configs(args: &Args) -> Result<(Board, Vec<Notification>)> {
    async fn parse_config<T, F>(path: &str, pb: &ProgressBar, parser: F) -> Result<Vec<T>>
    where
        F: FnOnce(&str) -> Result<Vec<T>>,
    {
        pb.reading(path);
        match parser(path) {
            Ok(vec) => {
                pb.loaded(path, vec.len());
                Ok(vec)
            }
            Err(e) => {
                pb.failed(path);
                Err(format!("{}: {}", path, e).into())
            }
        }
    }

    let multi_progress = MultiProgress::default();
    let spinner = || multi_progress.add_spinner();
    let (issues_pb, sprints_pb, teams_pb, members_pb) = (spinner(), spinner(), spinner(), spinner());

    let (issues, sprints, teams, members) = futures::join!(
        parse_config(&args.issues_path, &issues_pb, Issue::from_config),
        parse_config(&args.sprints_path, &sprints_pb, Sprint::from_config),
        parse_config(&args.teams_path, &teams_pb, Team::from_config),
        parse_config(&args.members_path, &members_pb, TeamMember::from_config),
    );
    let notifications = match &args.notifications_path {
        Some(path) => {
            let pb = spinner();
            parse_config(path, &pb, Notification::from_config).await?
        }
        None => vec![],
    };

    let sprints = apply_sprint_start(args, sprints?)?;
    Ok((Board::new(issues?, sprints, teams?, members?), notifications))
}

fn load_board(args: &Args) -> Result<Board> {
    let sprints = Sprint::from_config(&args.sprints_path)?;
    Ok(Board::new(
        Issue::from_config(&args.issues_path)?,
        apply_sprint_start(args, sprints)?,
        Team::from_config(&args.teams_path)?,
        TeamMember::from_config(&args.members_path)?,
    ))
}

fn apply_sprint_start(args: &Args, sprints: Vec<Sprint>) -> Result<Vec<Sprint>> {
    let Some(id) = &args.start_sprint else {
        return Ok(sprints);
    };
    if sprints.iter().any(|s| s.id == *id && s.status == SprintStatus::Active) {
        return Ok(sprints);
    }
    let started = start_sprint(&sprints, id)?;
    log::info!("Sprint {} started", id);
    Ok(started)
}
