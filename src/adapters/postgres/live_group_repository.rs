//! PostgreSQL implementation of the live-group ports.
//!
//! Every hold, booking and sync locks the project row first and the unit row
//! second, so all writes against one project are serialized and the per-user
//! hold count seen inside a transaction cannot go stale.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, LiveBookingId, ProjectId, Timestamp, TowerId, UnitId, UserId,
};
use crate::domain::live_group::{
    DesiredTower, Hierarchy, LiveBooking, LiveBookingStatus, LiveGroupError, LockPolicy, Project,
    ProjectDetails, ProjectProgress, SyncPlan, Tower, TowerWithUnits, Unit,
};
use crate::ports::{ProjectRepository, SyncPlanner, UnitHoldRepository};

use super::support::{db_error, opt_dt, opt_ts, parse_column, ts};

pub struct PostgresLiveGroupRepository {
    pool: PgPool,
}

impl PostgresLiveGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    name: String,
    developer: String,
    city: String,
    address: String,
    description: String,
    amenities: Vec<String>,
    images: Vec<String>,
    group_target: i32,
    group_discount_pct: i32,
    token_amount: i64,
    status: String,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = DomainError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: ProjectId::from_uuid(row.id),
            details: ProjectDetails {
                name: row.name,
                developer: row.developer,
                city: row.city,
                address: row.address,
                description: row.description,
                amenities: row.amenities,
                images: row.images,
                group_target: row.group_target,
                group_discount_pct: row.group_discount_pct,
                token_amount: row.token_amount,
            },
            status: parse_column("status", &row.status)?,
            version: row.version,
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TowerRow {
    id: Uuid,
    project_id: Uuid,
    name: String,
    total_floors: i32,
    position: i32,
}

impl From<TowerRow> for Tower {
    fn from(row: TowerRow) -> Self {
        Tower {
            id: TowerId::from_uuid(row.id),
            project_id: ProjectId::from_uuid(row.project_id),
            name: row.name,
            total_floors: row.total_floors,
            position: row.position,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UnitRow {
    id: Uuid,
    project_id: Uuid,
    tower_id: Uuid,
    unit_number: String,
    floor: i32,
    unit_type: String,
    carpet_area_sqft: i64,
    price: i64,
    status: String,
    locked_by: Option<Uuid>,
    lock_expires_at: Option<DateTime<Utc>>,
    booked_by: Option<Uuid>,
    booked_at: Option<DateTime<Utc>>,
    position: i32,
}

impl TryFrom<UnitRow> for Unit {
    type Error = DomainError;

    fn try_from(row: UnitRow) -> Result<Self, Self::Error> {
        Ok(Unit {
            id: UnitId::from_uuid(row.id),
            project_id: ProjectId::from_uuid(row.project_id),
            tower_id: TowerId::from_uuid(row.tower_id),
            unit_number: row.unit_number,
            floor: row.floor,
            unit_type: row.unit_type,
            carpet_area_sqft: row.carpet_area_sqft,
            price: row.price,
            status: parse_column("status", &row.status)?,
            locked_by: row.locked_by.map(UserId::from_uuid),
            lock_expires_at: opt_ts(row.lock_expires_at),
            booked_by: row.booked_by.map(UserId::from_uuid),
            booked_at: opt_ts(row.booked_at),
            position: row.position,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LiveBookingRow {
    id: Uuid,
    project_id: Uuid,
    unit_id: Option<Uuid>,
    user_id: Uuid,
    list_price: i64,
    amount: i64,
    token_amount: i64,
    payment_reference: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    cancelled_at: Option<DateTime<Utc>>,
}

impl TryFrom<LiveBookingRow> for LiveBooking {
    type Error = DomainError;

    fn try_from(row: LiveBookingRow) -> Result<Self, Self::Error> {
        Ok(LiveBooking {
            id: LiveBookingId::from_uuid(row.id),
            project_id: ProjectId::from_uuid(row.project_id),
            unit_id: row.unit_id.map(UnitId::from_uuid),
            user_id: UserId::from_uuid(row.user_id),
            list_price: row.list_price,
            amount: row.amount,
            token_amount: row.token_amount,
            payment_reference: row.payment_reference,
            status: parse_column("status", &row.status)?,
            created_at: ts(row.created_at),
            cancelled_at: opt_ts(row.cancelled_at),
        })
    }
}

const PROJECT_COLUMNS: &str = "id, name, developer, city, address, description, amenities, \
    images, group_target, group_discount_pct, token_amount, status, version, created_at, updated_at";

const UNIT_COLUMNS: &str = "id, project_id, tower_id, unit_number, floor, unit_type, \
    carpet_area_sqft, price, status, locked_by, lock_expires_at, booked_by, booked_at, position";

const LIVE_BOOKING_COLUMNS: &str = "id, project_id, unit_id, user_id, list_price, amount, \
    token_amount, payment_reference, status, created_at, cancelled_at";

/// Matches `Unit::has_live_lock` being false for a locked row.
const LAPSED_LOCK: &str = "status = 'locked' AND (lock_expires_at IS NULL OR lock_expires_at <= $1)";

fn project_not_found(id: &ProjectId) -> DomainError {
    DomainError::not_found(ErrorCode::ProjectNotFound, "Project", id)
}

fn unit_not_found(id: &UnitId) -> DomainError {
    DomainError::not_found(ErrorCode::UnitNotFound, "Unit", id)
}

fn into_units(rows: Vec<UnitRow>) -> Result<Vec<Unit>, DomainError> {
    rows.into_iter().map(Unit::try_from).collect()
}

fn into_live_bookings(rows: Vec<LiveBookingRow>) -> Result<Vec<LiveBooking>, DomainError> {
    rows.into_iter().map(LiveBooking::try_from).collect()
}

async fn lock_project(conn: &mut PgConnection, id: &ProjectId) -> Result<Project, DomainError> {
    let row: Option<ProjectRow> = sqlx::query_as(&format!(
        "SELECT {} FROM live_group_projects WHERE id = $1 FOR UPDATE",
        PROJECT_COLUMNS
    ))
    .bind(id.as_uuid())
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_error("Failed to lock project"))?;

    row.map(Project::try_from)
        .transpose()?
        .ok_or_else(|| project_not_found(id))
}

/// Locks the unit's project, then the unit itself.
async fn lock_unit_and_project(
    conn: &mut PgConnection,
    id: &UnitId,
) -> Result<(Unit, Project), DomainError> {
    let owner: Option<(Uuid,)> =
        sqlx::query_as("SELECT project_id FROM live_group_units WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&mut *conn)
            .await
            .map_err(db_error("Failed to find unit"))?;
    let (project_id,) = owner.ok_or_else(|| unit_not_found(id))?;

    let project = lock_project(conn, &ProjectId::from_uuid(project_id)).await?;

    let row: Option<UnitRow> = sqlx::query_as(&format!(
        "SELECT {} FROM live_group_units WHERE id = $1 FOR UPDATE",
        UNIT_COLUMNS
    ))
    .bind(id.as_uuid())
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_error("Failed to lock unit"))?;
    let unit = row
        .map(Unit::try_from)
        .transpose()?
        .ok_or_else(|| unit_not_found(id))?;

    Ok((unit, project))
}

async fn fetch_hierarchy(
    conn: &mut PgConnection,
    project_id: &ProjectId,
    version: i64,
) -> Result<Hierarchy, DomainError> {
    let tower_rows: Vec<TowerRow> = sqlx::query_as(
        r#"
        SELECT id, project_id, name, total_floors, position
        FROM live_group_towers
        WHERE project_id = $1
        ORDER BY position, name
        "#,
    )
    .bind(project_id.as_uuid())
    .fetch_all(&mut *conn)
    .await
    .map_err(db_error("Failed to load towers"))?;

    let unit_rows: Vec<UnitRow> = sqlx::query_as(&format!(
        "SELECT {} FROM live_group_units WHERE project_id = $1 ORDER BY position, unit_number",
        UNIT_COLUMNS
    ))
    .bind(project_id.as_uuid())
    .fetch_all(&mut *conn)
    .await
    .map_err(db_error("Failed to load units"))?;

    Ok(assemble_hierarchy(
        *project_id,
        version,
        tower_rows.into_iter().map(Tower::from).collect(),
        into_units(unit_rows)?,
    ))
}

/// Groups position-ordered units under their towers.
fn assemble_hierarchy(
    project_id: ProjectId,
    version: i64,
    towers: Vec<Tower>,
    units: Vec<Unit>,
) -> Hierarchy {
    let mut towers: Vec<TowerWithUnits> = towers
        .into_iter()
        .map(|tower| TowerWithUnits {
            tower,
            units: Vec::new(),
        })
        .collect();
    for unit in units {
        if let Some(entry) = towers.iter_mut().find(|t| t.tower.id == unit.tower_id) {
            entry.units.push(unit);
        }
    }
    Hierarchy {
        project_id,
        version,
        towers,
    }
}

async fn save_unit_state(conn: &mut PgConnection, unit: &Unit) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        UPDATE live_group_units SET
            status = $2,
            locked_by = $3,
            lock_expires_at = $4,
            booked_by = $5,
            booked_at = $6
        WHERE id = $1
        "#,
    )
    .bind(unit.id.as_uuid())
    .bind(unit.status.as_str())
    .bind(unit.locked_by.map(|id| *id.as_uuid()))
    .bind(opt_dt(&unit.lock_expires_at))
    .bind(unit.booked_by.map(|id| *id.as_uuid()))
    .bind(opt_dt(&unit.booked_at))
    .execute(&mut *conn)
    .await
    .map_err(db_error("Failed to update unit"))?;
    Ok(())
}

async fn insert_tower(conn: &mut PgConnection, tower: &Tower) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO live_group_towers (id, project_id, name, total_floors, position)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(tower.id.as_uuid())
    .bind(tower.project_id.as_uuid())
    .bind(&tower.name)
    .bind(tower.total_floors)
    .bind(tower.position)
    .execute(&mut *conn)
    .await
    .map_err(db_error("Failed to insert tower"))?;
    Ok(())
}

async fn update_tower(conn: &mut PgConnection, tower: &Tower) -> Result<(), DomainError> {
    sqlx::query(
        "UPDATE live_group_towers SET name = $2, total_floors = $3, position = $4 WHERE id = $1",
    )
    .bind(tower.id.as_uuid())
    .bind(&tower.name)
    .bind(tower.total_floors)
    .bind(tower.position)
    .execute(&mut *conn)
    .await
    .map_err(db_error("Failed to update tower"))?;
    Ok(())
}

async fn insert_unit(conn: &mut PgConnection, unit: &Unit) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO live_group_units (
            id, project_id, tower_id, unit_number, floor, unit_type, carpet_area_sqft,
            price, status, locked_by, lock_expires_at, booked_by, booked_at, position
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
    )
    .bind(unit.id.as_uuid())
    .bind(unit.project_id.as_uuid())
    .bind(unit.tower_id.as_uuid())
    .bind(&unit.unit_number)
    .bind(unit.floor)
    .bind(&unit.unit_type)
    .bind(unit.carpet_area_sqft)
    .bind(unit.price)
    .bind(unit.status.as_str())
    .bind(unit.locked_by.map(|id| *id.as_uuid()))
    .bind(opt_dt(&unit.lock_expires_at))
    .bind(unit.booked_by.map(|id| *id.as_uuid()))
    .bind(opt_dt(&unit.booked_at))
    .bind(unit.position)
    .execute(&mut *conn)
    .await
    .map_err(db_error("Failed to insert unit"))?;
    Ok(())
}

async fn update_unit(conn: &mut PgConnection, unit: &Unit) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        UPDATE live_group_units SET
            tower_id = $2,
            unit_number = $3,
            floor = $4,
            unit_type = $5,
            carpet_area_sqft = $6,
            price = $7,
            status = $8,
            position = $9
        WHERE id = $1
        "#,
    )
    .bind(unit.id.as_uuid())
    .bind(unit.tower_id.as_uuid())
    .bind(&unit.unit_number)
    .bind(unit.floor)
    .bind(&unit.unit_type)
    .bind(unit.carpet_area_sqft)
    .bind(unit.price)
    .bind(unit.status.as_str())
    .bind(unit.position)
    .execute(&mut *conn)
    .await
    .map_err(db_error("Failed to update unit"))?;
    Ok(())
}

/// Applies a plan: deletes first, then towers before the units that reference them.
async fn apply_plan(conn: &mut PgConnection, plan: &SyncPlan) -> Result<(), DomainError> {
    if !plan.unit_deletes.is_empty() {
        let ids: Vec<Uuid> = plan.unit_deletes.iter().map(|id| *id.as_uuid()).collect();
        sqlx::query("DELETE FROM live_group_units WHERE id = ANY($1)")
            .bind(&ids)
            .execute(&mut *conn)
            .await
            .map_err(db_error("Failed to delete units"))?;
    }
    if !plan.tower_deletes.is_empty() {
        let ids: Vec<Uuid> = plan.tower_deletes.iter().map(|id| *id.as_uuid()).collect();
        sqlx::query("DELETE FROM live_group_towers WHERE id = ANY($1)")
            .bind(&ids)
            .execute(&mut *conn)
            .await
            .map_err(db_error("Failed to delete towers"))?;
    }
    for tower in &plan.tower_inserts {
        insert_tower(conn, tower).await?;
    }
    for tower in &plan.tower_updates {
        update_tower(conn, tower).await?;
    }
    for unit in &plan.unit_inserts {
        insert_unit(conn, unit).await?;
    }
    for unit in &plan.unit_updates {
        update_unit(conn, unit).await?;
    }
    Ok(())
}

#[async_trait]
impl ProjectRepository for PostgresLiveGroupRepository {
    async fn create(&self, project: &Project) -> Result<(), DomainError> {
        let d = &project.details;
        sqlx::query(
            r#"
            INSERT INTO live_group_projects (
                id, name, developer, city, address, description, amenities, images,
                group_target, group_discount_pct, token_amount, status, version,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(project.id.as_uuid())
        .bind(&d.name)
        .bind(&d.developer)
        .bind(&d.city)
        .bind(&d.address)
        .bind(&d.description)
        .bind(&d.amenities)
        .bind(&d.images)
        .bind(d.group_target)
        .bind(d.group_discount_pct)
        .bind(d.token_amount)
        .bind(project.status.as_str())
        .bind(project.version)
        .bind(project.created_at.as_datetime())
        .bind(project.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert project"))?;

        Ok(())
    }

    async fn update(&self, project: &Project) -> Result<(), DomainError> {
        let d = &project.details;
        let result = sqlx::query(
            r#"
            UPDATE live_group_projects SET
                name = $2,
                developer = $3,
                city = $4,
                address = $5,
                description = $6,
                amenities = $7,
                images = $8,
                group_target = $9,
                group_discount_pct = $10,
                token_amount = $11,
                status = $12,
                updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(project.id.as_uuid())
        .bind(&d.name)
        .bind(&d.developer)
        .bind(&d.city)
        .bind(&d.address)
        .bind(&d.description)
        .bind(&d.amenities)
        .bind(&d.images)
        .bind(d.group_target)
        .bind(d.group_discount_pct)
        .bind(d.token_amount)
        .bind(project.status.as_str())
        .bind(project.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update project"))?;

        if result.rows_affected() == 0 {
            return Err(project_not_found(&project.id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        let row: Option<ProjectRow> = sqlx::query_as(&format!(
            "SELECT {} FROM live_group_projects WHERE id = $1",
            PROJECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find project"))?;

        row.map(Project::try_from).transpose()
    }

    async fn list_public(&self) -> Result<Vec<Project>, DomainError> {
        let rows: Vec<ProjectRow> = sqlx::query_as(&format!(
            "SELECT {} FROM live_group_projects WHERE status IN ('live', 'closed') \
             ORDER BY created_at DESC",
            PROJECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list projects"))?;

        rows.into_iter().map(Project::try_from).collect()
    }

    async fn list_all(&self) -> Result<Vec<Project>, DomainError> {
        let rows: Vec<ProjectRow> = sqlx::query_as(&format!(
            "SELECT {} FROM live_group_projects ORDER BY created_at DESC",
            PROJECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list projects"))?;

        rows.into_iter().map(Project::try_from).collect()
    }

    async fn load_hierarchy(&self, id: &ProjectId) -> Result<Hierarchy, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(db_error("Failed to acquire connection"))?;

        let version: Option<(i64,)> =
            sqlx::query_as("SELECT version FROM live_group_projects WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&mut *conn)
                .await
                .map_err(db_error("Failed to find project"))?;
        let (version,) = version.ok_or_else(|| project_not_found(id))?;

        fetch_hierarchy(&mut conn, id, version).await
    }

    async fn progress(&self, project: &Project, now: Timestamp) -> Result<ProjectProgress, DomainError> {
        let (total, available, booked): (i64, i64, i64) = sqlx::query_as(&format!(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'available' OR ({})),
                   COUNT(*) FILTER (WHERE status = 'booked')
            FROM live_group_units
            WHERE project_id = $2
            "#,
            LAPSED_LOCK
        ))
        .bind(now.as_datetime())
        .bind(project.id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count units"))?;

        Ok(ProjectProgress::new(
            total,
            available,
            booked,
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
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let project = lock_project(&mut tx, id).await?;
        if project.version != expected_version {
            return Err(LiveGroupError::VersionConflict {
                expected: expected_version,
                actual: project.version,
            }
            .into());
        }

        let current = fetch_hierarchy(&mut tx, id, project.version).await?;
        let plan = planner(&current)?;
        apply_plan(&mut tx, &plan).await?;

        let version = project.version + 1;
        sqlx::query("UPDATE live_group_projects SET version = $2, updated_at = $3 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(version)
            .bind(Timestamp::now().as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to bump project version"))?;

        tx.commit().await.map_err(db_error("Failed to commit transaction"))?;

        tracing::debug!(project_id = %id, towers = desired.len(), version, "Hierarchy synced");
        Ok((version, plan))
    }

    async fn delete(&self, id: &ProjectId) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let found: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM live_group_projects WHERE id = $1 FOR UPDATE")
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to lock project"))?;
        if found.is_none() {
            return Ok(false);
        }

        let (confirmed,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM live_group_bookings WHERE project_id = $1 AND status = 'confirmed'
            )
            "#,
        )
        .bind(id.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to check project bookings"))?;
        if confirmed {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Project has confirmed bookings and cannot be deleted",
            ));
        }

        // Towers, units and cancelled bookings go with the project.
        sqlx::query("DELETE FROM live_group_projects WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete project"))?;

        tx.commit().await.map_err(db_error("Failed to commit transaction"))?;
        Ok(true)
    }
}

#[async_trait]
impl UnitHoldRepository for PostgresLiveGroupRepository {
    async fn find_unit(&self, id: &UnitId) -> Result<Option<Unit>, DomainError> {
        let row: Option<UnitRow> = sqlx::query_as(&format!(
            "SELECT {} FROM live_group_units WHERE id = $1",
            UNIT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find unit"))?;

        row.map(Unit::try_from).transpose()
    }

    async fn lock_unit(
        &self,
        id: &UnitId,
        user: UserId,
        policy: LockPolicy,
        now: Timestamp,
    ) -> Result<Unit, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let (mut unit, project) = lock_unit_and_project(&mut tx, id).await?;

        let (held_elsewhere,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM live_group_units
            WHERE project_id = $1 AND id <> $2 AND status = 'locked'
              AND locked_by = $3 AND lock_expires_at > $4
            "#,
        )
        .bind(project.id.as_uuid())
        .bind(id.as_uuid())
        .bind(user.as_uuid())
        .bind(now.as_datetime())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to count holds"))?;

        unit.acquire_lock(
            user,
            project.status,
            u32::try_from(held_elsewhere).unwrap_or(u32::MAX),
            &policy,
            now,
        )?;
        save_unit_state(&mut tx, &unit).await?;

        tx.commit().await.map_err(db_error("Failed to commit transaction"))?;
        Ok(unit)
    }

    async fn release_unit(&self, id: &UnitId, user: &UserId, now: Timestamp) -> Result<Unit, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let (mut unit, _) = lock_unit_and_project(&mut tx, id).await?;
        unit.release_lock(user, now)?;
        save_unit_state(&mut tx, &unit).await?;

        tx.commit().await.map_err(db_error("Failed to commit transaction"))?;
        Ok(unit)
    }

    async fn book_unit(
        &self,
        id: &UnitId,
        user: UserId,
        payment_reference: Option<String>,
        now: Timestamp,
    ) -> Result<LiveBooking, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let (mut unit, project) = lock_unit_and_project(&mut tx, id).await?;
        unit.book(user, project.status, now)?;
        let booking = LiveBooking::confirmed(
            &unit,
            user,
            project.group_price(unit.price),
            project.details.token_amount,
            payment_reference,
            now,
        );
        save_unit_state(&mut tx, &unit).await?;

        sqlx::query(
            r#"
            INSERT INTO live_group_bookings (
                id, project_id, unit_id, user_id, list_price, amount, token_amount,
                payment_reference, status, created_at, cancelled_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.project_id.as_uuid())
        .bind(booking.unit_id.map(|id| *id.as_uuid()))
        .bind(booking.user_id.as_uuid())
        .bind(booking.list_price)
        .bind(booking.amount)
        .bind(booking.token_amount)
        .bind(&booking.payment_reference)
        .bind(booking.status.as_str())
        .bind(booking.created_at.as_datetime())
        .bind(opt_dt(&booking.cancelled_at))
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to insert live booking"))?;

        tx.commit().await.map_err(db_error("Failed to commit transaction"))?;
        Ok(booking)
    }

    async fn release_expired_locks(&self, now: Timestamp) -> Result<u64, DomainError> {
        let result = sqlx::query(&format!(
            "UPDATE live_group_units \
             SET status = 'available', locked_by = NULL, lock_expires_at = NULL \
             WHERE {}",
            LAPSED_LOCK
        ))
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to release expired holds"))?;

        Ok(result.rows_affected())
    }

    async fn holds_for_user(&self, user: &UserId, now: Timestamp) -> Result<Vec<Unit>, DomainError> {
        let rows: Vec<UnitRow> = sqlx::query_as(&format!(
            "SELECT {} FROM live_group_units \
             WHERE status = 'locked' AND locked_by = $1 AND lock_expires_at > $2 \
             ORDER BY lock_expires_at",
            UNIT_COLUMNS
        ))
        .bind(user.as_uuid())
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list holds"))?;

        into_units(rows)
    }

    async fn bookings_for_user(&self, user: &UserId) -> Result<Vec<LiveBooking>, DomainError> {
        let rows: Vec<LiveBookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM live_group_bookings WHERE user_id = $1 ORDER BY created_at DESC",
            LIVE_BOOKING_COLUMNS
        ))
        .bind(user.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list live bookings"))?;

        into_live_bookings(rows)
    }

    async fn bookings_for_project(&self, project: &ProjectId) -> Result<Vec<LiveBooking>, DomainError> {
        let rows: Vec<LiveBookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM live_group_bookings WHERE project_id = $1 ORDER BY created_at DESC",
            LIVE_BOOKING_COLUMNS
        ))
        .bind(project.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list live bookings"))?;

        into_live_bookings(rows)
    }

    async fn cancel_booking(&self, id: &LiveBookingId, now: Timestamp) -> Result<LiveBooking, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let row: Option<LiveBookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM live_group_bookings WHERE id = $1 FOR UPDATE",
            LIVE_BOOKING_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to find live booking"))?;
        let mut booking = row
            .map(LiveBooking::try_from)
            .transpose()?
            .ok_or_else(|| DomainError::not_found(ErrorCode::NotFound, "Live booking", id))?;

        if booking.status != LiveBookingStatus::Confirmed {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Booking is already cancelled",
            ));
        }
        booking.status = LiveBookingStatus::Cancelled;
        booking.cancelled_at = Some(now);

        sqlx::query("UPDATE live_group_bookings SET status = $2, cancelled_at = $3 WHERE id = $1")
            .bind(booking.id.as_uuid())
            .bind(booking.status.as_str())
            .bind(now.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to cancel live booking"))?;

        if let Some(unit_id) = booking.unit_id {
            let (mut unit, _) = lock_unit_and_project(&mut tx, &unit_id).await?;
            unit.unbook();
            save_unit_state(&mut tx, &unit).await?;
        }

        tx.commit().await.map_err(db_error("Failed to commit transaction"))?;
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::live_group::{ProjectStatus, UnitStatus};

    fn unit_row(tower: Uuid, status: &str, position: i32) -> UnitRow {
        UnitRow {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            tower_id: tower,
            unit_number: format!("A-{}", position),
            floor: 1,
            unit_type: "2BHK".into(),
            carpet_area_sqft: 950,
            price: 7_500_000,
            status: status.into(),
            locked_by: None,
            lock_expires_at: None,
            booked_by: None,
            booked_at: None,
            position,
        }
    }

    #[test]
    fn project_row_keeps_version_and_status() {
        let now = Utc::now();
        let project = Project::try_from(ProjectRow {
            id: Uuid::new_v4(),
            name: "Skyline Heights".into(),
            developer: "Prestige".into(),
            city: "Bengaluru".into(),
            address: "Whitefield".into(),
            description: "Group buy".into(),
            amenities: vec!["Pool".into()],
            images: vec![],
            group_target: 20,
            group_discount_pct: 8,
            token_amount: 100_000,
            status: "live".into(),
            version: 4,
            created_at: now,
            updated_at: now,
        })
        .unwrap();
        assert_eq!(project.status, ProjectStatus::Live);
        assert_eq!(project.version, 4);
        assert_eq!(project.group_price(1_000_000), 920_000);
    }

    #[test]
    fn unit_row_with_unknown_status_fails() {
        let err = Unit::try_from(unit_row(Uuid::new_v4(), "reserved", 0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn hierarchy_groups_units_under_towers() {
        let project_id = ProjectId::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let towers = vec![
            Tower::from(TowerRow {
                id: a,
                project_id: *project_id.as_uuid(),
                name: "A".into(),
                total_floors: 10,
                position: 0,
            }),
            Tower::from(TowerRow {
                id: b,
                project_id: *project_id.as_uuid(),
                name: "B".into(),
                total_floors: 12,
                position: 1,
            }),
        ];
        let units = into_units(vec![
            unit_row(b, "booked", 0),
            unit_row(a, "available", 0),
            unit_row(a, "blocked", 1),
        ])
        .unwrap();

        let hierarchy = assemble_hierarchy(project_id, 2, towers, units);
        assert_eq!(hierarchy.version, 2);
        assert_eq!(hierarchy.towers[0].units.len(), 2);
        assert_eq!(hierarchy.towers[0].units[1].status, UnitStatus::Blocked);
        assert_eq!(hierarchy.towers[1].units[0].status, UnitStatus::Booked);
    }
}
