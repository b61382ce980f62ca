//! HTTP DTOs for live grouping.
//!
//! Units are always rendered with their effective status so an expired hold
//! reads as available, and the holder is only revealed to the holder.

use serde::{Deserialize, Serialize};

use crate::application::handlers::live_group::{MyLiveGroup, ProjectCard, ProjectView};
use crate::domain::foundation::{ProjectId, Timestamp, TowerId, UnitId, UserId};
use crate::domain::live_group::{
    group_price, DesiredTower, DesiredUnit, LiveBooking, Project, ProjectInput, ProjectProgress,
    ProjectStatus, TowerWithUnits, Unit, UnitStatus,
};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRequest {
    pub name: String,
    pub developer: String,
    pub city: String,
    pub address: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub group_target: i32,
    #[serde(default)]
    pub group_discount_pct: i32,
    #[serde(default)]
    pub token_amount: i64,
}

impl From<ProjectRequest> for ProjectInput {
    fn from(r: ProjectRequest) -> Self {
        Self {
            name: r.name,
            developer: r.developer,
            city: r.city,
            address: r.address,
            description: r.description,
            amenities: r.amenities,
            images: r.images,
            group_target: r.group_target,
            group_discount_pct: r.group_discount_pct,
            token_amount: r.token_amount,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectStatusRequest {
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookUnitRequest {
    #[serde(default)]
    pub payment_reference: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HierarchyRequest {
    pub expected_version: i64,
    pub towers: Vec<TowerRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TowerRequest {
    #[serde(default)]
    pub id: Option<TowerId>,
    pub name: String,
    pub total_floors: i32,
    #[serde(default)]
    pub units: Vec<UnitRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnitRequest {
    #[serde(default)]
    pub id: Option<UnitId>,
    pub unit_number: String,
    pub floor: i32,
    pub unit_type: String,
    pub carpet_area_sqft: i64,
    pub price: i64,
    #[serde(default)]
    pub blocked: bool,
}

impl From<TowerRequest> for DesiredTower {
    fn from(t: TowerRequest) -> Self {
        Self {
            id: t.id,
            name: t.name,
            total_floors: t.total_floors,
            units: t.units.into_iter().map(DesiredUnit::from).collect(),
        }
    }
}

impl From<UnitRequest> for DesiredUnit {
    fn from(u: UnitRequest) -> Self {
        Self {
            id: u.id,
            unit_number: u.unit_number,
            floor: u.floor,
            unit_type: u.unit_type,
            carpet_area_sqft: u.carpet_area_sqft,
            price: u.price,
            blocked: u.blocked,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct ProjectResponse {
    pub id: ProjectId,
    pub name: String,
    pub developer: String,
    pub city: String,
    pub address: String,
    pub description: String,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub group_target: i32,
    pub group_discount_pct: i32,
    pub token_amount: i64,
    pub status: ProjectStatus,
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        let d = p.details;
        Self {
            id: p.id,
            name: d.name,
            developer: d.developer,
            city: d.city,
            address: d.address,
            description: d.description,
            amenities: d.amenities,
            images: d.images,
            group_target: d.group_target,
            group_discount_pct: d.group_discount_pct,
            token_amount: d.token_amount,
            status: p.status,
            version: p.version,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectCardResponse {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub progress: ProjectProgress,
}

impl From<ProjectCard> for ProjectCardResponse {
    fn from(card: ProjectCard) -> Self {
        Self {
            project: card.project.into(),
            progress: card.progress,
        }
    }
}

/// A unit as seen by one viewer at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct UnitResponse {
    pub id: UnitId,
    pub tower_id: TowerId,
    pub unit_number: String,
    pub floor: i32,
    pub unit_type: String,
    pub carpet_area_sqft: i64,
    pub price: i64,
    pub group_price: i64,
    pub status: UnitStatus,
    pub held_by_me: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_expires_at: Option<Timestamp>,
    pub booked_at: Option<Timestamp>,
}

impl UnitResponse {
    pub fn render(unit: Unit, discount_pct: i32, viewer: Option<&UserId>, now: Timestamp) -> Self {
        let status = unit.effective_status(now);
        let held_by_me = viewer.map(|v| unit.is_held_by(v, now)).unwrap_or(false);
        Self {
            id: unit.id,
            tower_id: unit.tower_id,
            group_price: group_price(unit.price, discount_pct),
            unit_number: unit.unit_number,
            floor: unit.floor,
            unit_type: unit.unit_type,
            carpet_area_sqft: unit.carpet_area_sqft,
            price: unit.price,
            status,
            held_by_me,
            lock_expires_at: if status == UnitStatus::Locked {
                unit.lock_expires_at
            } else {
                None
            },
            booked_at: unit.booked_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TowerResponse {
    pub id: TowerId,
    pub name: String,
    pub total_floors: i32,
    pub position: i32,
    pub units: Vec<UnitResponse>,
}

impl TowerResponse {
    fn render(t: TowerWithUnits, discount_pct: i32, viewer: Option<&UserId>, now: Timestamp) -> Self {
        Self {
            id: t.tower.id,
            name: t.tower.name,
            total_floors: t.tower.total_floors,
            position: t.tower.position,
            units: t
                .units
                .into_iter()
                .map(|u| UnitResponse::render(u, discount_pct, viewer, now))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetailResponse {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub progress: ProjectProgress,
    pub towers: Vec<TowerResponse>,
}

impl ProjectDetailResponse {
    pub fn render(view: ProjectView, viewer: Option<&UserId>, now: Timestamp) -> Self {
        let discount = view.project.details.group_discount_pct;
        Self {
            towers: view
                .hierarchy
                .towers
                .into_iter()
                .map(|t| TowerResponse::render(t, discount, viewer, now))
                .collect(),
            project: view.project.into(),
            progress: view.progress,
        }
    }
}

/// Unit state after a hold is taken or released.
#[derive(Debug, Clone, Serialize)]
pub struct UnitStateResponse {
    pub unit_id: UnitId,
    pub status: UnitStatus,
    pub lock_expires_at: Option<Timestamp>,
}

impl From<Unit> for UnitStateResponse {
    fn from(u: Unit) -> Self {
        Self {
            unit_id: u.id,
            status: u.status,
            lock_expires_at: u.lock_expires_at,
        }
    }
}

/// A hold owned by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct HoldResponse {
    pub unit_id: UnitId,
    pub project_id: ProjectId,
    pub unit_number: String,
    pub price: i64,
    pub lock_expires_at: Option<Timestamp>,
}

impl From<Unit> for HoldResponse {
    fn from(u: Unit) -> Self {
        Self {
            unit_id: u.id,
            project_id: u.project_id,
            unit_number: u.unit_number,
            price: u.price,
            lock_expires_at: u.lock_expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MyLiveGroupResponse {
    pub holds: Vec<HoldResponse>,
    pub bookings: Vec<LiveBooking>,
}

impl From<MyLiveGroup> for MyLiveGroupResponse {
    fn from(mine: MyLiveGroup) -> Self {
        Self {
            holds: mine.holds.into_iter().map(HoldResponse::from).collect(),
            bookings: mine.bookings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::live_group::available_unit;

    #[test]
    fn expired_hold_renders_as_available() {
        let now = Timestamp::now();
        let holder = UserId::new();
        let mut unit = available_unit();
        unit.status = UnitStatus::Locked;
        unit.locked_by = Some(holder);
        unit.lock_expires_at = Some(now.plus_minutes(-1));

        let view = UnitResponse::render(unit, 10, Some(&holder), now);
        assert_eq!(view.status, UnitStatus::Available);
        assert!(!view.held_by_me);
        assert!(view.lock_expires_at.is_none());
    }

    #[test]
    fn live_hold_is_flagged_for_holder_only() {
        let now = Timestamp::now();
        let holder = UserId::new();
        let mut unit = available_unit();
        unit.status = UnitStatus::Locked;
        unit.locked_by = Some(holder);
        unit.lock_expires_at = Some(now.plus_minutes(10));

        assert!(UnitResponse::render(unit.clone(), 0, Some(&holder), now).held_by_me);
        let other = UserId::new();
        let seen = UnitResponse::render(unit, 0, Some(&other), now);
        assert!(!seen.held_by_me);
        assert_eq!(seen.status, UnitStatus::Locked);
    }

    #[test]
    fn group_price_applies_discount() {
        let mut unit = available_unit();
        unit.price = 1_000_000;
        let view = UnitResponse::render(unit, 10, None, Timestamp::now());
        assert_eq!(view.group_price, 900_000);
    }

    #[test]
    fn hierarchy_request_defaults_missing_ids() {
        let req: HierarchyRequest = serde_json::from_str(
            r#"{"expected_version":3,"towers":[{"name":"A","total_floors":5,
                "units":[{"unit_number":"A-101","floor":1,"unit_type":"2BHK",
                          "carpet_area_sqft":900,"price":5000000}]}]}"#,
        )
        .unwrap();
        let towers: Vec<DesiredTower> = req.towers.into_iter().map(Into::into).collect();
        assert!(towers[0].id.is_none());
        assert!(towers[0].units[0].id.is_none());
        assert!(!towers[0].units[0].blocked);
    }
}
