//! Persistent storage for actions and follows.

use crate::{Page, StoreError, StoreResult};
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tideline_registry::Registry;
use tideline_types::{
    format_timestamp, parse_timestamp, Action, ActionId, EntityRef, Follow, FollowId, NewAction,
    TypeId,
};
use tracing::info;

/// Column list shared by every action SELECT.
pub(crate) const ACTION_COLUMNS: &str =
    "id, actor_type, actor_id, verb, object_type, object_id, target_type, target_id, \
     timestamp, description, public, data";

/// Persistent store for actions and follows, backed by SQLite.
///
/// The connection is mutex-guarded; all operations are synchronous, bounded
/// request/response calls. The registry is consulted at creation time to
/// verify that required references resolve.
pub struct StreamStore {
    pub(crate) conn: Arc<Mutex<Connection>>,
    pub(crate) registry: Arc<Registry>,
}

impl StreamStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: &Path, registry: Arc<Registry>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            registry,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Opens an in-memory store (for testing and ephemeral deployments).
    pub fn open_in_memory(registry: Arc<Registry>) -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            registry,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// The registry this store validates and resolves references against.
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS actions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                actor_type INTEGER NOT NULL,
                actor_id TEXT NOT NULL,
                verb TEXT NOT NULL,
                object_type INTEGER,
                object_id TEXT,
                target_type INTEGER,
                target_id TEXT,
                timestamp TEXT NOT NULL,
                description TEXT,
                public INTEGER NOT NULL DEFAULT 1,
                data TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_actions_order
                ON actions (timestamp DESC, id DESC);
            CREATE INDEX IF NOT EXISTS idx_actions_actor
                ON actions (actor_type, actor_id);
            CREATE INDEX IF NOT EXISTS idx_actions_target
                ON actions (target_type, target_id);
            CREATE INDEX IF NOT EXISTS idx_actions_object
                ON actions (object_type, object_id);

            CREATE TABLE IF NOT EXISTS follows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                follower_type INTEGER NOT NULL,
                follower_id TEXT NOT NULL,
                followed_type INTEGER NOT NULL,
                followed_id TEXT NOT NULL,
                actor_only INTEGER NOT NULL DEFAULT 0,
                started TEXT NOT NULL,
                UNIQUE (follower_type, follower_id, followed_type, followed_id)
            );
            ",
        )?;
        Ok(())
    }

    // ── Actions ──────────────────────────────────────────────────

    /// Creates and persists an action.
    ///
    /// Fails with a validation error when the verb is blank or the actor does
    /// not resolve through the registry. The timestamp defaults to the
    /// creation time unless one was supplied. Returns the fully populated,
    /// immutable record including the generated id.
    pub fn create_action(&self, new: NewAction) -> StoreResult<Action> {
        if new.verb.trim().is_empty() {
            return Err(StoreError::Validation("verb must not be empty".into()));
        }
        if !self.registry.resolves(&new.actor) {
            return Err(StoreError::Validation(format!(
                "actor does not resolve: {}",
                new.actor
            )));
        }

        let timestamp = new.timestamp.unwrap_or_else(|| Utc::now().naive_utc());
        let data_json = match &new.data {
            Some(value) => Some(serde_json::to_string(value)?),
            None => None,
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO actions (actor_type, actor_id, verb, object_type, object_id, \
             target_type, target_id, timestamp, description, public, data) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                i64::from(new.actor.type_id.as_u32()),
                new.actor.object_id,
                new.verb,
                new.action_object.as_ref().map(|r| i64::from(r.type_id.as_u32())),
                new.action_object.as_ref().map(|r| r.object_id.as_str()),
                new.target.as_ref().map(|r| i64::from(r.type_id.as_u32())),
                new.target.as_ref().map(|r| r.object_id.as_str()),
                format_timestamp(&timestamp),
                new.description,
                new.public as i64,
                data_json,
            ],
        )?;
        let id = ActionId::from_i64(conn.last_insert_rowid());
        info!(action = %id, actor = %new.actor, verb = %new.verb, "action recorded");

        Ok(Action {
            id,
            actor: new.actor,
            verb: new.verb,
            action_object: new.action_object,
            target: new.target,
            timestamp,
            description: new.description,
            public: new.public,
            data: new.data,
        })
    }

    /// Fetches a single action by id.
    pub fn get_action(&self, id: ActionId) -> StoreResult<Action> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ACTION_COLUMNS} FROM actions WHERE id = ?1"
        ))?;
        let mut rows = stmt.query_map(params![id.as_i64()], map_action_row)?;
        match rows.next() {
            Some(raw) => raw?.into_action(),
            None => Err(StoreError::NotFound(format!("action {id}"))),
        }
    }

    /// Total number of stored actions.
    pub fn count_actions(&self) -> StoreResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM actions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ── Follows ──────────────────────────────────────────────────

    /// Creates a follow from `follower` to `followed`.
    ///
    /// The pair-uniqueness invariant is enforced as an atomic check-and-insert:
    /// the database's `UNIQUE` index is the source of truth, and a violation
    /// maps to `Conflict`. Duplicate follows conflict; they are not idempotent.
    pub fn create_follow(
        &self,
        follower: EntityRef,
        followed: EntityRef,
        actor_only: bool,
    ) -> StoreResult<Follow> {
        if !self.registry.resolves(&follower) {
            return Err(StoreError::Validation(format!(
                "follower does not resolve: {follower}"
            )));
        }
        if !self.registry.contains(followed.type_id) {
            return Err(StoreError::Validation(format!(
                "followed type is not registered: {}",
                followed.type_id
            )));
        }

        let started = Utc::now().naive_utc();
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT INTO follows (follower_type, follower_id, followed_type, followed_id, \
             actor_only, started) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                i64::from(follower.type_id.as_u32()),
                follower.object_id,
                i64::from(followed.type_id.as_u32()),
                followed.object_id,
                actor_only as i64,
                format_timestamp(&started),
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
                return Err(StoreError::Conflict(format!(
                    "{follower} already follows {followed}"
                )));
            }
            Err(e) => return Err(e.into()),
        }
        let id = FollowId::from_i64(conn.last_insert_rowid());
        info!(follow = %id, %follower, %followed, actor_only, "follow created");

        Ok(Follow {
            id,
            follower,
            followed,
            actor_only,
            started,
        })
    }

    /// Deletes the follow for the given pair.
    ///
    /// Fails with `NotFound` when no matching record exists; callers wanting
    /// idempotent semantics must check existence first.
    pub fn delete_follow(&self, follower: &EntityRef, followed: &EntityRef) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute(
            "DELETE FROM follows WHERE follower_type = ?1 AND follower_id = ?2 \
             AND followed_type = ?3 AND followed_id = ?4",
            params![
                i64::from(follower.type_id.as_u32()),
                follower.object_id,
                i64::from(followed.type_id.as_u32()),
                followed.object_id,
            ],
        )?;
        if removed == 0 {
            return Err(StoreError::NotFound(format!(
                "no follow from {follower} to {followed}"
            )));
        }
        info!(%follower, %followed, "follow deleted");
        Ok(())
    }

    /// Returns true when a follow exists for the pair.
    pub fn exists_follow(&self, follower: &EntityRef, followed: &EntityRef) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM follows WHERE follower_type = ?1 AND follower_id = ?2 \
             AND followed_type = ?3 AND followed_id = ?4",
            params![
                i64::from(follower.type_id.as_u32()),
                follower.object_id,
                i64::from(followed.type_id.as_u32()),
                followed.object_id,
            ],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Fetches a single follow by id.
    pub fn get_follow(&self, id: FollowId) -> StoreResult<Follow> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, follower_type, follower_id, followed_type, followed_id, actor_only, \
             started FROM follows WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id.as_i64()], map_follow_row)?;
        match rows.next() {
            Some(raw) => raw?.into_follow(),
            None => Err(StoreError::NotFound(format!("follow {id}"))),
        }
    }

    /// All follows where the given entity is the follower.
    pub fn follows_of(&self, follower: &EntityRef) -> StoreResult<Vec<Follow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, follower_type, follower_id, followed_type, followed_id, actor_only, \
             started FROM follows WHERE follower_type = ?1 AND follower_id = ?2 ORDER BY id",
        )?;
        let rows = stmt.query_map(
            params![i64::from(follower.type_id.as_u32()), follower.object_id],
            map_follow_row,
        )?;
        let mut result = Vec::new();
        for raw in rows {
            result.push(raw?.into_follow()?);
        }
        Ok(result)
    }

    /// Lists follows with pagination, oldest first.
    pub fn list_follows(&self, page: Page) -> StoreResult<Vec<Follow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, follower_type, follower_id, followed_type, followed_id, actor_only, \
             started FROM follows ORDER BY id LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt.query_map(
            params![page.limit as i64, page.offset as i64],
            map_follow_row,
        )?;
        let mut result = Vec::new();
        for raw in rows {
            result.push(raw?.into_follow()?);
        }
        Ok(result)
    }

    /// Total number of stored follows.
    pub fn count_follows(&self) -> StoreResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM follows", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

// ── Row mapping ──────────────────────────────────────────────────

pub(crate) struct RawAction {
    id: i64,
    actor_type: i64,
    actor_id: String,
    verb: String,
    object_type: Option<i64>,
    object_id: Option<String>,
    target_type: Option<i64>,
    target_id: Option<String>,
    timestamp: String,
    description: Option<String>,
    public: i64,
    data: Option<String>,
}

pub(crate) fn map_action_row(row: &Row<'_>) -> rusqlite::Result<RawAction> {
    Ok(RawAction {
        id: row.get(0)?,
        actor_type: row.get(1)?,
        actor_id: row.get(2)?,
        verb: row.get(3)?,
        object_type: row.get(4)?,
        object_id: row.get(5)?,
        target_type: row.get(6)?,
        target_id: row.get(7)?,
        timestamp: row.get(8)?,
        description: row.get(9)?,
        public: row.get(10)?,
        data: row.get(11)?,
    })
}

impl RawAction {
    pub(crate) fn into_action(self) -> StoreResult<Action> {
        let action_object = make_ref(self.object_type, self.object_id)?;
        let target = make_ref(self.target_type, self.target_id)?;
        let data = match self.data {
            Some(text) => Some(serde_json::from_str(&text)?),
            None => None,
        };
        Ok(Action {
            id: ActionId::from_i64(self.id),
            actor: EntityRef::new(TypeId::from_u32(self.actor_type as u32), self.actor_id),
            verb: self.verb,
            action_object,
            target,
            timestamp: parse_timestamp(&self.timestamp)
                .map_err(|e| StoreError::InvalidData(e.to_string()))?,
            description: self.description,
            public: self.public != 0,
            data,
        })
    }
}

fn make_ref(type_id: Option<i64>, object_id: Option<String>) -> StoreResult<Option<EntityRef>> {
    match (type_id, object_id) {
        (Some(t), Some(id)) => Ok(Some(EntityRef::new(TypeId::from_u32(t as u32), id))),
        (None, None) => Ok(None),
        _ => Err(StoreError::InvalidData(
            "reference columns must be both set or both null".into(),
        )),
    }
}

struct RawFollow {
    id: i64,
    follower_type: i64,
    follower_id: String,
    followed_type: i64,
    followed_id: String,
    actor_only: i64,
    started: String,
}

fn map_follow_row(row: &Row<'_>) -> rusqlite::Result<RawFollow> {
    Ok(RawFollow {
        id: row.get(0)?,
        follower_type: row.get(1)?,
        follower_id: row.get(2)?,
        followed_type: row.get(3)?,
        followed_id: row.get(4)?,
        actor_only: row.get(5)?,
        started: row.get(6)?,
    })
}

impl RawFollow {
    fn into_follow(self) -> StoreResult<Follow> {
        Ok(Follow {
            id: FollowId::from_i64(self.id),
            follower: EntityRef::new(
                TypeId::from_u32(self.follower_type as u32),
                self.follower_id,
            ),
            followed: EntityRef::new(
                TypeId::from_u32(self.followed_type as u32),
                self.followed_id,
            ),
            actor_only: self.actor_only != 0,
            started: parse_timestamp(&self.started)
                .map_err(|e| StoreError::InvalidData(e.to_string()))?,
        })
    }
}
