use async_trait::async_trait;

use crate::domain::foundation::{
    DomainError, ErrorCode, LiveBookingId, ProjectId, Timestamp, UnitId, UserId,
};
use crate::domain::live_group::{
    DesiredTower, Hierarchy, LiveBooking, LiveBookingStatus, LiveGroupError, LockPolicy, Project,
    ProjectProgress, SyncPlan, TowerWithUnits, Unit, UnitStatus,
};
use crate::ports::{ProjectRepository, SyncPlanner, UnitHoldRepository};

use super::{InMemoryStore, Tables};

fn project_not_found(id: &ProjectId) -> DomainError {
    DomainError::not_found(ErrorCode::ProjectNotFound, "Project", id)
}

fn unit_not_found(id: &UnitId) -> DomainError {
    DomainError::not_found(ErrorCode::UnitNotFound, "Unit", id)
}

impl Tables {
    fn hierarchy(&self, id: &ProjectId) -> Result<Hierarchy, DomainError> {
        let project = self.projects.get(id).ok_or_else(|| project_not_found(id))?;
        let mut towers: Vec<TowerWithUnits> = self
            .towers
            .values()
            .filter(|t| &t.project_id == id)
            .map(|tower| {
                let mut units: Vec<Unit> = self
                    .units
                    .values()
                    .filter(|u| u.tower_id == tower.id)
                    .cloned()
                    .collect();
                units.sort_by_key(|u| u.position);
                TowerWithUnits {
                    tower: tower.clone(),
                    units,
                }
            })
            .collect();
        towers.sort_by_key(|t| t.tower.position);
        Ok(Hierarchy {
            project_id: *id,
            version: project.version,
            towers,
        })
    }

    fn apply_plan(&mut self, plan: &SyncPlan) {
        let mut removed: Vec<UnitId> = plan.unit_deletes.clone();
        for id in &plan.tower_deletes {
            self.towers.remove(id);
            removed.extend(self.units.values().filter(|u| &u.tower_id == id).map(|u| u.id));
        }
        for id in &removed {
            self.units.remove(id);
        }
        for booking in self.live_bookings.values_mut() {
            if booking.unit_id.is_some_and(|u| removed.contains(&u)) {
                booking.unit_id = None;
            }
        }
        for tower in plan.tower_inserts.iter().chain(&plan.tower_updates) {
            self.towers.insert(tower.id, tower.clone());
        }
        for unit in plan.unit_inserts.iter().chain(&plan.unit_updates) {
            self.units.insert(unit.id, unit.clone());
        }
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn create(&self, project: &Project) -> Result<(), DomainError> {
        self.tables().projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project) -> Result<(), DomainError> {
        let mut t = self.tables();
        match t.projects.get_mut(&project.id) {
            Some(existing) => {
                *existing = project.clone();
                Ok(())
            }
            None => Err(project_not_found(&project.id)),
        }
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        Ok(self.tables().projects.get(id).cloned())
    }

    async fn list_public(&self) -> Result<Vec<Project>, DomainError> {
        let t = self.tables();
        let mut projects: Vec<Project> = t
            .projects
            .values()
            .filter(|p| p.status.is_public())
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn list_all(&self) -> Result<Vec<Project>, DomainError> {
        let mut projects: Vec<Project> = self.tables().projects.values().cloned().collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn load_hierarchy(&self, id: &ProjectId) -> Result<Hierarchy, DomainError> {
        self.tables().hierarchy(id)
    }

    async fn progress(&self, project: &Project, now: Timestamp) -> Result<ProjectProgress, DomainError> {
        let t = self.tables();
        let units: Vec<&Unit> = t.units.values().filter(|u| u.project_id == project.id).collect();
        let available = units
            .iter()
            .filter(|u| u.effective_status(now) == UnitStatus::Available)
            .count();
        let booked = units.iter().filter(|u| u.status == UnitStatus::Booked).count();
        Ok(ProjectProgress::new(
            units.len() as i64,
            available as i64,
            booked as i64,
            project.details.group_target,
        ))
    }

    async fn sync_hierarchy(
        &self,
        id: &ProjectId,
        expected_version: i64,
        desired: &[DesiredTower],
        planner: SyncPlanner<'_>,
    ) -> Result<(i64, SyncPlan), DomainError> {
        let mut t = self.tables();
        let current = t.hierarchy(id)?;
        if current.version != expected_version {
            return Err(LiveGroupError::VersionConflict {
                expected: expected_version,
                actual: current.version,
            }
            .into());
        }

        let plan = planner(&current)?;
        t.apply_plan(&plan);

        let version = current.version + 1;
        if let Some(project) = t.projects.get_mut(id) {
            project.version = version;
            project.updated_at = Timestamp::now();
        }
        tracing::debug!(project_id = %id, towers = desired.len(), version, "Hierarchy synced");
        Ok((version, plan))
    }

    async fn delete(&self, id: &ProjectId) -> Result<bool, DomainError> {
        let mut t = self.tables();
        if !t.projects.contains_key(id) {
            return Ok(false);
        }
        if t.live_bookings
            .values()
            .any(|b| &b.project_id == id && b.status == LiveBookingStatus::Confirmed)
        {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Project has confirmed bookings and cannot be deleted",
            ));
        }
        t.live_bookings.retain(|_, b| &b.project_id != id);
        t.units.retain(|_, u| &u.project_id != id);
        t.towers.retain(|_, tw| &tw.project_id != id);
        t.projects.remove(id);
        Ok(true)
    }
}

#[async_trait]
impl UnitHoldRepository for InMemoryStore {
    async fn find_unit(&self, id: &UnitId) -> Result<Option<Unit>, DomainError> {
        Ok(self.tables().units.get(id).cloned())
    }

    async fn lock_unit(
        &self,
        id: &UnitId,
        user: UserId,
        policy: LockPolicy,
        now: Timestamp,
    ) -> Result<Unit, DomainError> {
        let mut t = self.tables();
        let mut unit = t.units.get(id).cloned().ok_or_else(|| unit_not_found(id))?;
        let project_status = t
            .projects
            .get(&unit.project_id)
            .map(|p| p.status)
            .ok_or_else(|| project_not_found(&unit.project_id))?;
        let held_elsewhere = t
            .units
            .values()
            .filter(|u| u.project_id == unit.project_id && &u.id != id)
            .filter(|u| u.is_held_by(&user, now))
            .count() as u32;

        unit.acquire_lock(user, project_status, held_elsewhere, &policy, now)?;
        t.units.insert(unit.id, unit.clone());
        Ok(unit)
    }

    async fn release_unit(&self, id: &UnitId, user: &UserId, now: Timestamp) -> Result<Unit, DomainError> {
        let mut t = self.tables();
        let unit = t.units.get_mut(id).ok_or_else(|| unit_not_found(id))?;
        unit.release_lock(user, now)?;
        Ok(unit.clone())
    }

    async fn book_unit(
        &self,
        id: &UnitId,
        user: UserId,
        payment_reference: Option<String>,
        now: Timestamp,
    ) -> Result<LiveBooking, DomainError> {
        let mut t = self.tables();
        let mut unit = t.units.get(id).cloned().ok_or_else(|| unit_not_found(id))?;
        let project = t
            .projects
            .get(&unit.project_id)
            .cloned()
            .ok_or_else(|| project_not_found(&unit.project_id))?;

        unit.book(user, project.status, now)?;
        let booking = LiveBooking::confirmed(
            &unit,
            user,
            project.group_price(unit.price),
            project.details.token_amount,
            payment_reference,
            now,
        );
        t.units.insert(unit.id, unit);
        t.live_bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn release_expired_locks(&self, now: Timestamp) -> Result<u64, DomainError> {
        let mut t = self.tables();
        let mut released = 0;
        for unit in t.units.values_mut() {
            if unit.status == UnitStatus::Locked && !unit.has_live_lock(now) {
                unit.clear_lock();
                released += 1;
            }
        }
        Ok(released)
    }

    async fn holds_for_user(&self, user: &UserId, now: Timestamp) -> Result<Vec<Unit>, DomainError> {
        let t = self.tables();
        let mut held: Vec<Unit> = t
            .units
            .values()
            .filter(|u| u.is_held_by(user, now))
            .cloned()
            .collect();
        held.sort_by_key(|u| u.lock_expires_at);
        Ok(held)
    }

    async fn bookings_for_user(&self, user: &UserId) -> Result<Vec<LiveBooking>, DomainError> {
        let t = self.tables();
        let mut found: Vec<LiveBooking> = t
            .live_bookings
            .values()
            .filter(|b| &b.user_id == user)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn bookings_for_project(&self, project: &ProjectId) -> Result<Vec<LiveBooking>, DomainError> {
        let t = self.tables();
        let mut found: Vec<LiveBooking> = t
            .live_bookings
            .values()
            .filter(|b| &b.project_id == project)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn cancel_booking(&self, id: &LiveBookingId, now: Timestamp) -> Result<LiveBooking, DomainError> {
        let mut t = self.tables();
        let booking = t
            .live_bookings
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(ErrorCode::NotFound, "Live booking", id))?;
        if booking.status != LiveBookingStatus::Confirmed {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Booking is already cancelled",
            ));
        }
        booking.status = LiveBookingStatus::Cancelled;
        booking.cancelled_at = Some(now);
        let booking = booking.clone();
        if let Some(unit) = booking.unit_id.and_then(|id| t.units.get_mut(&id)) {
            unit.unbook();
        }
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::live_group::{
        plan_sync, sample_project_input, DesiredUnit, ProjectStatus,
    };

    async fn live_project(store: &InMemoryStore, units: usize) -> (Project, Vec<UnitId>) {
        let mut project = Project::create(sample_project_input().validate().unwrap());
        project.change_status(ProjectStatus::Live).unwrap();
        ProjectRepository::create(store, &project).await.unwrap();

        let desired = vec![DesiredTower {
            id: None,
            name: "Tower A".into(),
            total_floors: 10,
            units: (0..units)
                .map(|i| DesiredUnit {
                    id: None,
                    unit_number: format!("A-{}", 101 + i),
                    floor: 1,
                    unit_type: "2BHK".into(),
                    carpet_area_sqft: 850,
                    price: 6_000_000,
                    blocked: false,
                })
                .collect(),
        }];
        let now = Timestamp::now();
        let planned = desired.clone();
        store
            .sync_hierarchy(
                &project.id,
                project.version,
                &desired,
                Box::new(move |current| plan_sync(current, &planned, now)),
            )
            .await
            .unwrap();
        let hierarchy = store.load_hierarchy(&project.id).await.unwrap();
        let ids = hierarchy.towers[0].units.iter().map(|u| u.id).collect();
        (project, ids)
    }

    #[tokio::test]
    async fn second_buyer_cannot_lock_held_unit() {
        let store = InMemoryStore::new();
        let (_, units) = live_project(&store, 1).await;
        let now = Timestamp::now();

        store
            .lock_unit(&units[0], UserId::new(), LockPolicy::default(), now)
            .await
            .unwrap();
        let err = store
            .lock_unit(&units[0], UserId::new(), LockPolicy::default(), now)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnitUnavailable);
    }

    #[tokio::test]
    async fn lock_limit_applies_per_project() {
        let store = InMemoryStore::new();
        let (_, units) = live_project(&store, 2).await;
        let buyer = UserId::new();
        let now = Timestamp::now();

        store.lock_unit(&units[0], buyer, LockPolicy::default(), now).await.unwrap();
        let err = store
            .lock_unit(&units[1], buyer, LockPolicy::default(), now)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::LockLimitReached);
    }

    #[tokio::test]
    async fn booking_uses_group_price_and_updates_progress() {
        let store = InMemoryStore::new();
        let (project, units) = live_project(&store, 2).await;
        let buyer = UserId::new();
        let now = Timestamp::now();

        store.lock_unit(&units[0], buyer, LockPolicy::default(), now).await.unwrap();
        let booking = store.book_unit(&units[0], buyer, None, now).await.unwrap();

        assert_eq!(booking.amount, project.group_price(6_000_000));
        let progress = store.progress(&project, now).await.unwrap();
        assert_eq!(progress.booked_units, 1);
        assert_eq!(progress.available_units, 1);
    }

    #[tokio::test]
    async fn cancelled_booking_outlives_its_deleted_unit() {
        let store = InMemoryStore::new();
        let (project, units) = live_project(&store, 2).await;
        let buyer = UserId::new();
        let now = Timestamp::now();
        store.lock_unit(&units[0], buyer, LockPolicy::default(), now).await.unwrap();
        let booking = store.book_unit(&units[0], buyer, None, now).await.unwrap();
        store.cancel_booking(&booking.id, now).await.unwrap();

        let current = store.load_hierarchy(&project.id).await.unwrap();
        let mut desired: Vec<DesiredTower> = current
            .towers
            .iter()
            .map(|t| DesiredTower {
                id: Some(t.tower.id),
                name: t.tower.name.clone(),
                total_floors: t.tower.total_floors,
                units: t
                    .units
                    .iter()
                    .map(|u| DesiredUnit {
                        id: Some(u.id),
                        unit_number: u.unit_number.clone(),
                        floor: u.floor,
                        unit_type: u.unit_type.clone(),
                        carpet_area_sqft: u.carpet_area_sqft,
                        price: u.price,
                        blocked: false,
                    })
                    .collect(),
            })
            .collect();
        desired[0].units.retain(|u| u.id != Some(units[0]));
        let planned = desired.clone();
        store
            .sync_hierarchy(
                &project.id,
                current.version,
                &desired,
                Box::new(move |current| plan_sync(current, &planned, now)),
            )
            .await
            .unwrap();

        assert!(store.find_unit(&units[0]).await.unwrap().is_none());
        let history = store.bookings_for_project(&project.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, booking.id);
        assert_eq!(history[0].unit_id, None);
        assert_eq!(history[0].status, LiveBookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn expired_locks_are_swept() {
        let store = InMemoryStore::new();
        let (_, units) = live_project(&store, 1).await;
        let earlier = Timestamp::now().plus_minutes(-30);

        store
            .lock_unit(&units[0], UserId::new(), LockPolicy::default(), earlier)
            .await
            .unwrap();
        assert_eq!(store.release_expired_locks(Timestamp::now()).await.unwrap(), 1);
        let unit = store.find_unit(&units[0]).await.unwrap().unwrap();
        assert_eq!(unit.status, UnitStatus::Available);
    }

    #[tokio::test]
    async fn stale_version_is_rejected() {
        let store = InMemoryStore::new();
        let (project, _) = live_project(&store, 1).await;

        let err = store
            .sync_hierarchy(
                &project.id,
                project.version,
                &[],
                Box::new(|_| Ok(SyncPlan::default())),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VersionConflict);
    }

    #[tokio::test]
    async fn project_with_confirmed_booking_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let (project, units) = live_project(&store, 1).await;
        let buyer = UserId::new();
        let now = Timestamp::now();
        store.lock_unit(&units[0], buyer, LockPolicy::default(), now).await.unwrap();
        let booking = store.book_unit(&units[0], buyer, None, now).await.unwrap();

        let err = ProjectRepository::delete(&store, &project.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        store.cancel_booking(&booking.id, now).await.unwrap();
        assert!(ProjectRepository::delete(&store, &project.id).await.unwrap());
    }
}
