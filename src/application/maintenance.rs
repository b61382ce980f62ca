//! Periodic sweeper for time-based state.
//!
//! Each pass releases expired live-group unit locks, cancels short-stay
//! reservations whose payment hold lapsed and expires subscriptions past
//! their period. Every step is a single statement in the database adapters,
//! so a pass is cheap and safe to run from several instances.
//!
//! ## Graceful Shutdown
//!
//! The loop listens on a watch channel and runs one final pass before
//! returning.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::{ReservationRepository, SubscriptionRepository, UnitHoldRepository};

/// Rows touched by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub locks_released: u64,
    pub holds_expired: u64,
    pub subscriptions_expired: u64,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.locks_released == 0 && self.holds_expired == 0 && self.subscriptions_expired == 0
    }
}

pub struct MaintenanceSweeper {
    units: Arc<dyn UnitHoldRepository>,
    reservations: Arc<dyn ReservationRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    interval: Duration,
}

impl MaintenanceSweeper {
    pub fn new(
        units: Arc<dyn UnitHoldRepository>,
        reservations: Arc<dyn ReservationRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        interval: Duration,
    ) -> Self {
        Self {
            units,
            reservations,
            subscriptions,
            interval,
        }
    }

    /// Sweeps every `interval` until `shutdown` flips to true.
    ///
    /// A failed pass is logged and retried on the next tick.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        self.logged_pass().await;
                        tracing::info!("Maintenance sweeper stopped");
                        return;
                    }
                }
                _ = interval.tick() => {
                    self.logged_pass().await;
                }
            }
        }
    }

    async fn logged_pass(&self) {
        match self.poll_once(Timestamp::now()).await {
            Ok(report) if report.is_empty() => {}
            Ok(report) => tracing::info!(
                locks_released = report.locks_released,
                holds_expired = report.holds_expired,
                subscriptions_expired = report.subscriptions_expired,
                "Maintenance sweep"
            ),
            Err(e) => tracing::warn!(error = %e, "Maintenance sweep failed"),
        }
    }

    /// Runs exactly one pass.
    pub async fn poll_once(&self, now: Timestamp) -> Result<SweepReport, DomainError> {
        Ok(SweepReport {
            locks_released: self.units.release_expired_locks(now).await?,
            holds_expired: self.reservations.expire_stale_holds(now).await?,
            subscriptions_expired: self.subscriptions.expire_lapsed(now).await?,
        })
    }
}
