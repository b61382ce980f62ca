//! MyLiveGroupHandler - The caller's live holds and bookings.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::live_group::{LiveBooking, Unit};
use crate::ports::UnitHoldRepository;

#[derive(Debug, Clone)]
pub struct MyLiveGroupQuery {
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct MyLiveGroup {
    pub holds: Vec<Unit>,
    pub bookings: Vec<LiveBooking>,
}

pub struct MyLiveGroupHandler {
    units: Arc<dyn UnitHoldRepository>,
}

impl MyLiveGroupHandler {
    pub fn new(units: Arc<dyn UnitHoldRepository>) -> Self {
        Self { units }
    }

    pub async fn handle(&self, query: MyLiveGroupQuery) -> Result<MyLiveGroup, DomainError> {
        let holds = self.units.holds_for_user(&query.user_id, Timestamp::now()).await?;
        let bookings = self.units.bookings_for_user(&query.user_id).await?;
        Ok(MyLiveGroup { holds, bookings })
    }
}
