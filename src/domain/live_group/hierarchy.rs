//! Tower/unit hierarchy and the bulk sync planner.
//!
//! Admins edit a project's whole tree at once. The planner compares the
//! desired tree with the current one and produces the inserts, updates and
//! deletes to apply, refusing any change that would touch a booked unit or a
//! unit under a live hold.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::foundation::validation::MAX_AMOUNT;
use crate::domain::foundation::{ProjectId, Timestamp, TowerId, UnitId};

use super::{LiveGroupError, Unit, UnitStatus};

pub const MAX_TOWER_FLOORS: i32 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tower {
    pub id: TowerId,
    pub project_id: ProjectId,
    pub name: String,
    pub total_floors: i32,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TowerWithUnits {
    #[serde(flatten)]
    pub tower: Tower,
    pub units: Vec<Unit>,
}

/// Current persisted tree of a project.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hierarchy {
    pub project_id: ProjectId,
    pub version: i64,
    pub towers: Vec<TowerWithUnits>,
}

/// Desired tower as submitted by an admin. `id: None` creates a new tower.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredTower {
    pub id: Option<TowerId>,
    pub name: String,
    pub total_floors: i32,
    pub units: Vec<DesiredUnit>,
}

/// Desired unit. `id: None` creates a new unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredUnit {
    pub id: Option<UnitId>,
    pub unit_number: String,
    pub floor: i32,
    pub unit_type: String,
    pub carpet_area_sqft: i64,
    pub price: i64,
    pub blocked: bool,
}

/// Row-level changes produced by [`plan_sync`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub tower_inserts: Vec<Tower>,
    pub tower_updates: Vec<Tower>,
    pub tower_deletes: Vec<TowerId>,
    pub unit_inserts: Vec<Unit>,
    pub unit_updates: Vec<Unit>,
    pub unit_deletes: Vec<UnitId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncCounts {
    pub towers_created: usize,
    pub towers_updated: usize,
    pub towers_deleted: usize,
    pub units_created: usize,
    pub units_updated: usize,
    pub units_deleted: usize,
}

impl SyncPlan {
    pub fn counts(&self) -> SyncCounts {
        SyncCounts {
            towers_created: self.tower_inserts.len(),
            towers_updated: self.tower_updates.len(),
            towers_deleted: self.tower_deletes.len(),
            units_created: self.unit_inserts.len(),
            units_updated: self.unit_updates.len(),
            units_deleted: self.unit_deletes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts() == SyncCounts::default()
    }
}

/// Result of an applied sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub version: i64,
    pub changes: SyncCounts,
}

/// Structural checks that need no database state.
pub fn validate_desired(towers: &[DesiredTower]) -> Result<(), LiveGroupError> {
    let mut tower_names = HashSet::new();
    let mut tower_ids = HashSet::new();
    let mut unit_ids = HashSet::new();

    for tower in towers {
        let name = tower.name.trim();
        if name.is_empty() || name.chars().count() > 100 {
            return Err(LiveGroupError::invalid("tower name must be 1-100 characters"));
        }
        if !tower_names.insert(name.to_lowercase()) {
            return Err(LiveGroupError::invalid(format!("duplicate tower name '{}'", name)));
        }
        if let Some(id) = tower.id {
            if !tower_ids.insert(id) {
                return Err(LiveGroupError::invalid(format!("tower {} listed twice", id)));
            }
        }
        if tower.total_floors < 1 || tower.total_floors > MAX_TOWER_FLOORS {
            return Err(LiveGroupError::invalid(format!(
                "tower '{}' must have 1-{} floors",
                name, MAX_TOWER_FLOORS
            )));
        }

        let mut numbers = HashSet::new();
        for unit in &tower.units {
            let number = unit.unit_number.trim();
            if number.is_empty() || number.chars().count() > 20 {
                return Err(LiveGroupError::invalid("unit number must be 1-20 characters"));
            }
            if !numbers.insert(number.to_lowercase()) {
                return Err(LiveGroupError::invalid(format!(
                    "duplicate unit number '{}' in tower '{}'",
                    number, name
                )));
            }
            if let Some(id) = unit.id {
                if !unit_ids.insert(id) {
                    return Err(LiveGroupError::invalid(format!("unit {} listed twice", id)));
                }
            }
            if unit.floor < 0 || unit.floor > tower.total_floors {
                return Err(LiveGroupError::invalid(format!(
                    "unit '{}' floor {} is outside 0-{}",
                    number, unit.floor, tower.total_floors
                )));
            }
            if unit.unit_type.trim().is_empty() {
                return Err(LiveGroupError::invalid(format!("unit '{}' needs a type", number)));
            }
            if unit.carpet_area_sqft <= 0 || unit.price <= 0 {
                return Err(LiveGroupError::invalid(format!(
                    "unit '{}' needs a positive area and price",
                    number
                )));
            }
            if unit.price > MAX_AMOUNT {
                return Err(LiveGroupError::invalid(format!(
                    "unit '{}' price exceeds {}",
                    number, MAX_AMOUNT
                )));
            }
        }
    }
    Ok(())
}

/// Diffs `current` against `desired`.
///
/// Fails with `InvalidHierarchy` when an id does not belong where it is used
/// and with `ProtectedUnits` (listing every offending unit) when the change
/// would delete, block or reprice a booked or held unit.
pub fn plan_sync(
    current: &Hierarchy,
    desired: &[DesiredTower],
    now: Timestamp,
) -> Result<SyncPlan, LiveGroupError> {
    validate_desired(desired)?;

    let current_towers: HashMap<TowerId, &TowerWithUnits> =
        current.towers.iter().map(|t| (t.tower.id, t)).collect();
    let current_units: HashMap<UnitId, &Unit> = current
        .towers
        .iter()
        .flat_map(|t| t.units.iter())
        .map(|u| (u.id, u))
        .collect();

    let mut plan = SyncPlan::default();
    let mut protected: Vec<UnitId> = Vec::new();
    let mut kept_towers = HashSet::new();
    let mut kept_units = HashSet::new();

    for (tower_pos, wanted) in desired.iter().enumerate() {
        let tower = match wanted.id {
            Some(id) => {
                let existing = current_towers.get(&id).ok_or_else(|| {
                    LiveGroupError::invalid(format!("tower {} does not belong to this project", id))
                })?;
                kept_towers.insert(id);
                let updated = Tower {
                    name: wanted.name.trim().to_string(),
                    total_floors: wanted.total_floors,
                    position: tower_pos as i32,
                    ..existing.tower.clone()
                };
                if updated != existing.tower {
                    plan.tower_updates.push(updated.clone());
                }
                updated
            }
            None => {
                let created = Tower {
                    id: TowerId::new(),
                    project_id: current.project_id,
                    name: wanted.name.trim().to_string(),
                    total_floors: wanted.total_floors,
                    position: tower_pos as i32,
                };
                plan.tower_inserts.push(created.clone());
                created
            }
        };

        for (unit_pos, unit) in wanted.units.iter().enumerate() {
            match unit.id {
                Some(id) => {
                    let existing = current_units
                        .get(&id)
                        .filter(|u| wanted.id == Some(u.tower_id))
                        .ok_or_else(|| {
                            LiveGroupError::invalid(format!(
                                "unit {} does not belong to tower '{}'",
                                id, tower.name
                            ))
                        })?;
                    kept_units.insert(id);
                    let (updated, touches_protected) =
                        apply_unit_change(existing, unit, unit_pos as i32, now);
                    if touches_protected {
                        protected.push(id);
                    } else if &updated != *existing {
                        plan.unit_updates.push(updated);
                    }
                }
                None => plan.unit_inserts.push(Unit {
                    id: UnitId::new(),
                    project_id: current.project_id,
                    tower_id: tower.id,
                    unit_number: unit.unit_number.trim().to_string(),
                    floor: unit.floor,
                    unit_type: unit.unit_type.trim().to_string(),
                    carpet_area_sqft: unit.carpet_area_sqft,
                    price: unit.price,
                    status: if unit.blocked {
                        UnitStatus::Blocked
                    } else {
                        UnitStatus::Available
                    },
                    locked_by: None,
                    lock_expires_at: None,
                    booked_by: None,
                    booked_at: None,
                    position: unit_pos as i32,
                }),
            }
        }
    }

    for existing in current.towers.iter().flat_map(|t| t.units.iter()) {
        if kept_units.contains(&existing.id) {
            continue;
        }
        if existing.is_protected(now) {
            protected.push(existing.id);
        } else {
            plan.unit_deletes.push(existing.id);
        }
    }
    for existing in &current.towers {
        if !kept_towers.contains(&existing.tower.id) {
            plan.tower_deletes.push(existing.tower.id);
        }
    }

    if !protected.is_empty() {
        protected.sort();
        return Err(LiveGroupError::ProtectedUnits(protected));
    }
    Ok(plan)
}

/// Returns the updated unit and whether the change touches a protected unit.
fn apply_unit_change(existing: &Unit, wanted: &DesiredUnit, position: i32, now: Timestamp) -> (Unit, bool) {
    let mut updated = existing.clone();
    updated.unit_number = wanted.unit_number.trim().to_string();
    updated.floor = wanted.floor;
    updated.unit_type = wanted.unit_type.trim().to_string();
    updated.carpet_area_sqft = wanted.carpet_area_sqft;
    updated.price = wanted.price;
    updated.position = position;

    if existing.is_protected(now) {
        let commercial_change = updated.unit_number != existing.unit_number
            || updated.unit_type != existing.unit_type
            || updated.carpet_area_sqft != existing.carpet_area_sqft
            || updated.price != existing.price;
        return (updated, commercial_change || wanted.blocked);
    }

    match (wanted.blocked, existing.status) {
        (true, UnitStatus::Blocked) => {}
        (true, _) => {
            updated.clear_lock();
            updated.status = UnitStatus::Blocked;
        }
        (false, UnitStatus::Blocked) => updated.status = UnitStatus::Available,
        (false, UnitStatus::Locked) => updated.clear_lock(),
        (false, _) => {}
    }
    (updated, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use proptest::prelude::*;

    fn unit(tower: &Tower, number: &str, position: i32) -> Unit {
        Unit {
            id: UnitId::new(),
            project_id: tower.project_id,
            tower_id: tower.id,
            unit_number: number.into(),
            floor: 1,
            unit_type: "2BHK".into(),
            carpet_area_sqft: 900,
            price: 5_000_000,
            status: UnitStatus::Available,
            locked_by: None,
            lock_expires_at: None,
            booked_by: None,
            booked_at: None,
            position,
        }
    }

    fn hierarchy() -> Hierarchy {
        let project_id = ProjectId::new();
        let tower = Tower {
            id: TowerId::new(),
            project_id,
            name: "A".into(),
            total_floors: 10,
            position: 0,
        };
        let units = vec![unit(&tower, "A-101", 0), unit(&tower, "A-102", 1)];
        Hierarchy {
            project_id,
            version: 3,
            towers: vec![TowerWithUnits { tower, units }],
        }
    }

    fn desired_from(h: &Hierarchy) -> Vec<DesiredTower> {
        h.towers
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
                        blocked: u.status == UnitStatus::Blocked,
                    })
                    .collect(),
            })
            .collect()
    }

    fn book(u: &mut Unit) {
        u.status = UnitStatus::Booked;
        u.booked_by = Some(UserId::new());
        u.booked_at = Some(Timestamp::now());
    }

    #[test]
    fn unchanged_tree_produces_empty_plan() {
        let h = hierarchy();
        let plan = plan_sync(&h, &desired_from(&h), Timestamp::now()).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn new_tower_and_units_are_inserted() {
        let h = hierarchy();
        let mut desired = desired_from(&h);
        desired.push(DesiredTower {
            id: None,
            name: "B".into(),
            total_floors: 5,
            units: vec![DesiredUnit {
                id: None,
                unit_number: "B-001".into(),
                floor: 0,
                unit_type: "Shop".into(),
                carpet_area_sqft: 300,
                price: 2_000_000,
                blocked: true,
            }],
        });
        let plan = plan_sync(&h, &desired, Timestamp::now()).unwrap();
        assert_eq!(plan.tower_inserts.len(), 1);
        assert_eq!(plan.unit_inserts.len(), 1);
        assert_eq!(plan.unit_inserts[0].tower_id, plan.tower_inserts[0].id);
        assert_eq!(plan.unit_inserts[0].status, UnitStatus::Blocked);
    }

    #[test]
    fn removed_units_are_deleted() {
        let h = hierarchy();
        let mut desired = desired_from(&h);
        desired[0].units.pop();
        let plan = plan_sync(&h, &desired, Timestamp::now()).unwrap();
        assert_eq!(plan.unit_deletes, vec![h.towers[0].units[1].id]);
    }

    #[test]
    fn deleting_booked_unit_is_refused() {
        let mut h = hierarchy();
        book(&mut h.towers[0].units[1]);
        let mut desired = desired_from(&h);
        desired[0].units.pop();
        let err = plan_sync(&h, &desired, Timestamp::now()).unwrap_err();
        assert_eq!(err, LiveGroupError::ProtectedUnits(vec![h.towers[0].units[1].id]));
    }

    #[test]
    fn deleting_tower_with_held_unit_is_refused() {
        let mut h = hierarchy();
        let now = Timestamp::now();
        let held = &mut h.towers[0].units[0];
        held.status = UnitStatus::Locked;
        held.locked_by = Some(UserId::new());
        held.lock_expires_at = Some(now.plus_minutes(5));
        let err = plan_sync(&h, &[], now).unwrap_err();
        assert_eq!(err, LiveGroupError::ProtectedUnits(vec![h.towers[0].units[0].id]));
    }

    #[test]
    fn expired_hold_does_not_protect() {
        let mut h = hierarchy();
        let now = Timestamp::now();
        let held = &mut h.towers[0].units[0];
        held.status = UnitStatus::Locked;
        held.locked_by = Some(UserId::new());
        held.lock_expires_at = Some(now.plus_minutes(-1));
        let plan = plan_sync(&h, &[], now).unwrap();
        assert_eq!(plan.tower_deletes.len(), 1);
        assert_eq!(plan.unit_deletes.len(), 2);
    }

    #[test]
    fn repricing_booked_unit_is_refused_but_floor_move_is_not() {
        let mut h = hierarchy();
        book(&mut h.towers[0].units[0]);
        let mut desired = desired_from(&h);
        desired[0].units[0].floor = 2;
        let plan = plan_sync(&h, &desired, Timestamp::now()).unwrap();
        assert_eq!(plan.unit_updates.len(), 1);
        assert_eq!(plan.unit_updates[0].status, UnitStatus::Booked);

        desired[0].units[0].price += 1;
        assert!(matches!(
            plan_sync(&h, &desired, Timestamp::now()),
            Err(LiveGroupError::ProtectedUnits(_))
        ));
    }

    #[test]
    fn blocking_and_unblocking_available_units() {
        let h = hierarchy();
        let mut desired = desired_from(&h);
        desired[0].units[0].blocked = true;
        let plan = plan_sync(&h, &desired, Timestamp::now()).unwrap();
        assert_eq!(plan.unit_updates[0].status, UnitStatus::Blocked);

        let mut blocked = h.clone();
        blocked.towers[0].units[0].status = UnitStatus::Blocked;
        let plan = plan_sync(&blocked, &desired_from(&h), Timestamp::now()).unwrap();
        assert_eq!(plan.unit_updates[0].status, UnitStatus::Available);
    }

    #[test]
    fn unit_cannot_move_between_towers() {
        let h = hierarchy();
        let mut desired = desired_from(&h);
        let moved = desired[0].units.pop().unwrap();
        desired.push(DesiredTower {
            id: None,
            name: "B".into(),
            total_floors: 5,
            units: vec![moved],
        });
        assert!(matches!(
            plan_sync(&h, &desired, Timestamp::now()),
            Err(LiveGroupError::InvalidHierarchy(_))
        ));
    }

    #[test]
    fn foreign_tower_id_is_rejected() {
        let h = hierarchy();
        let mut desired = desired_from(&h);
        desired[0].id = Some(TowerId::new());
        assert!(matches!(
            plan_sync(&h, &desired, Timestamp::now()),
            Err(LiveGroupError::InvalidHierarchy(_))
        ));
    }

    #[test]
    fn unit_price_is_capped() {
        let h = hierarchy();
        let mut desired = desired_from(&h);
        desired[0].units[0].price = MAX_AMOUNT;
        assert!(validate_desired(&desired).is_ok());
        desired[0].units[0].price = i64::MAX / 10;
        assert!(matches!(
            validate_desired(&desired),
            Err(LiveGroupError::InvalidHierarchy(_))
        ));
    }

    #[test]
    fn duplicate_numbers_and_bad_floors_fail_validation() {
        let h = hierarchy();
        let mut desired = desired_from(&h);
        desired[0].units[1].unit_number = "a-101".into();
        assert!(validate_desired(&desired).is_err());

        let mut desired = desired_from(&h);
        desired[0].units[0].floor = 11;
        assert!(validate_desired(&desired).is_err());

        let mut desired = desired_from(&h);
        desired[0].total_floors = 0;
        assert!(validate_desired(&desired).is_err());
    }

    proptest! {
        #[test]
        fn booked_units_survive_any_accepted_plan(drop_mask in proptest::collection::vec(any::<bool>(), 2), booked_idx in 0usize..2) {
            let mut h = hierarchy();
            book(&mut h.towers[0].units[booked_idx]);
            let booked_id = h.towers[0].units[booked_idx].id;
            let mut desired = desired_from(&h);
            let mut i = 0;
            desired[0].units.retain(|_| { let keep = !drop_mask[i]; i += 1; keep });
            if let Ok(plan) = plan_sync(&h, &desired, Timestamp::now()) {
                prop_assert!(!plan.unit_deletes.contains(&booked_id));
                prop_assert!(plan.unit_updates.iter().all(|u| u.id != booked_id || u.status == UnitStatus::Booked));
            }
        }
    }
}
