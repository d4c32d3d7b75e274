use crate::model::Board;
use crate::notify::NotificationEngine;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub type SharedBoard = Arc<Mutex<Board>>;
pub type SharedEngine = Arc<Mutex<NotificationEngine>>;

pub const DEFAULT_PERIOD: Duration = Duration::from_secs(30);

/// Periodic notification scan owned by whoever holds the returned handle.
pub struct NotificationScheduler;

impl NotificationScheduler {
    /// Spawns the scan loop. The first scan runs immediately.
    pub fn start(board: SharedBoard, engine: SharedEngine, period: Duration) -> SchedulerHandle {
        let token = CancellationToken::new();
        let task = tokio::spawn(run(
            board.clone(),
            engine.clone(),
            period,
            token.clone(),
        ));
        log::info!("Notification scheduler started (every {:?})", period);
        SchedulerHandle {
            board,
            engine,
            token,
            task,
        }
    }
}

pub struct SchedulerHandle {
    board: SharedBoard,
    engine: SharedEngine,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Scans outside the regular period.
    pub async fn scan_now(&self) -> usize {
        scan(&self.board, &self.engine).await
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancels the loop and waits for it. A scan in progress completes first.
    pub async fn stop(self) {
        self.token.cancel();
        if let Err(e) = self.task.await {
            log::warn!("Notification scheduler ended abnormally: {}", e);
        }
        log::info!("Notification scheduler stopped");
    }
}

async fn run(board: SharedBoard, engine: SharedEngine, period: Duration, token: CancellationToken) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                scan(&board, &engine).await;
            }
        }
    }
}

async fn scan(board: &SharedBoard, engine: &SharedEngine) -> usize {
    // board lock first, then engine, everywhere
    let board = board.lock().await;
    let mut engine = engine.lock().await;
    engine.scan(&board, Utc::now())
}
