//! Stream selectors — ordered, filtered, paginated views over the action log.
//!
//! Every selector produces one SQL query ordered `timestamp DESC, id DESC`
//! (the fixed-width timestamp text sorts chronologically), with the
//! visibility predicate appended uniformly and `LIMIT`/`OFFSET` bounding the
//! materialized page. Deduplication in the aggregated user stream is
//! structural: the union is a single `OR`'d query, so each row appears once.

use crate::store::{map_action_row, StreamStore, ACTION_COLUMNS};
use crate::StoreResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::ToSql;
use tideline_types::{Action, EntityRef, TypeId};
use tracing::debug;

/// Pagination bounds for a stream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    /// Default page size; callers may lower or raise it per request.
    pub const DEFAULT_LIMIT: usize = 100;

    #[must_use]
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Who is reading a stream. Private actions are visible only to their
/// participants, so the viewer feeds the visibility predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(EntityRef),
}

enum SqlValue {
    Int(i64),
    Text(String),
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlValue::Int(i) => i.to_sql(),
            SqlValue::Text(s) => s.to_sql(),
        }
    }
}

fn ref_match(role: &str, entity: &EntityRef, params: &mut Vec<SqlValue>) -> String {
    params.push(SqlValue::Int(i64::from(entity.type_id.as_u32())));
    params.push(SqlValue::Text(entity.object_id.clone()));
    format!("({role}_type = ? AND {role}_id = ?)")
}

fn any_role_match(entity: &EntityRef, params: &mut Vec<SqlValue>) -> String {
    let actor = ref_match("actor", entity, params);
    let target = ref_match("target", entity, params);
    let object = ref_match("object", entity, params);
    format!("({actor} OR {target} OR {object})")
}

/// The visibility predicate layered onto every selector: public actions for
/// everyone, private ones only when the viewer participates.
fn visibility(viewer: &Viewer, params: &mut Vec<SqlValue>) -> String {
    match viewer {
        Viewer::Anonymous => "public = 1".to_string(),
        Viewer::User(user) => {
            let participant = any_role_match(user, params);
            format!("(public = 1 OR {participant})")
        }
    }
}

impl StreamStore {
    fn fetch(
        &self,
        condition: &str,
        mut params: Vec<SqlValue>,
        page: Page,
    ) -> StoreResult<Vec<Action>> {
        params.push(SqlValue::Int(page.limit as i64));
        params.push(SqlValue::Int(page.offset as i64));
        let sql = format!(
            "SELECT {ACTION_COLUMNS} FROM actions WHERE {condition} \
             ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?"
        );

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), map_action_row)?;

        let mut actions = Vec::new();
        for raw in rows {
            let action = raw?.into_action()?;
            // Skip, never fail: a reference may dangle when its entity was
            // deleted after the action was recorded.
            if let Some(dangling) = action
                .participants()
                .find(|r| !self.registry.resolves(r))
            {
                debug!(action = %action.id, reference = %dangling, "skipping action with dangling reference");
                continue;
            }
            actions.push(action);
        }
        Ok(actions)
    }

    /// Actions where the given entity is the actor.
    pub fn actor_stream(
        &self,
        entity: &EntityRef,
        viewer: &Viewer,
        page: Page,
    ) -> StoreResult<Vec<Action>> {
        let mut params = Vec::new();
        let cond = ref_match("actor", entity, &mut params);
        let vis = visibility(viewer, &mut params);
        self.fetch(&format!("{cond} AND {vis}"), params, page)
    }

    /// Actions where the given entity is the action-object.
    pub fn object_stream(
        &self,
        entity: &EntityRef,
        viewer: &Viewer,
        page: Page,
    ) -> StoreResult<Vec<Action>> {
        let mut params = Vec::new();
        let cond = ref_match("object", entity, &mut params);
        let vis = visibility(viewer, &mut params);
        self.fetch(&format!("{cond} AND {vis}"), params, page)
    }

    /// Actions where the given entity is the target.
    pub fn target_stream(
        &self,
        entity: &EntityRef,
        viewer: &Viewer,
        page: Page,
    ) -> StoreResult<Vec<Action>> {
        let mut params = Vec::new();
        let cond = ref_match("target", entity, &mut params);
        let vis = visibility(viewer, &mut params);
        self.fetch(&format!("{cond} AND {vis}"), params, page)
    }

    /// Actions where the given entity appears in any role
    /// (actor, target, or action-object).
    pub fn any_stream(
        &self,
        entity: &EntityRef,
        viewer: &Viewer,
        page: Page,
    ) -> StoreResult<Vec<Action>> {
        let mut params = Vec::new();
        let cond = any_role_match(entity, &mut params);
        let vis = visibility(viewer, &mut params);
        self.fetch(&format!("{cond} AND {vis}"), params, page)
    }

    /// Actions involving any entity of the given type, in any role.
    pub fn model_stream(
        &self,
        type_id: TypeId,
        viewer: &Viewer,
        page: Page,
    ) -> StoreResult<Vec<Action>> {
        let mut params = Vec::new();
        let t = i64::from(type_id.as_u32());
        params.push(SqlValue::Int(t));
        params.push(SqlValue::Int(t));
        params.push(SqlValue::Int(t));
        let cond = "(actor_type = ? OR target_type = ? OR object_type = ?)".to_string();
        let vis = visibility(viewer, &mut params);
        self.fetch(&format!("{cond} AND {vis}"), params, page)
    }

    /// The aggregated "my" feed for a user: their own actions, unioned with
    /// the activity of everything they follow.
    ///
    /// For an `actor_only` follow only actions where the followed entity is
    /// the actor are included; otherwise any role counts. The union is a
    /// single query, so actions matching several follows appear once.
    pub fn user_stream(&self, user: &EntityRef, page: Page) -> StoreResult<Vec<Action>> {
        let follows = self.follows_of(user)?;

        let mut params = Vec::new();
        let mut branches = vec![ref_match("actor", user, &mut params)];
        for follow in &follows {
            if follow.actor_only {
                branches.push(ref_match("actor", &follow.followed, &mut params));
            } else {
                branches.push(any_role_match(&follow.followed, &mut params));
            }
        }
        let cond = format!("({})", branches.join(" OR "));
        let vis = visibility(&Viewer::User(user.clone()), &mut params);
        self.fetch(&format!("{cond} AND {vis}"), params, page)
    }

    /// The global feed: all public actions, visible without authentication.
    pub fn public_stream(&self, page: Page) -> StoreResult<Vec<Action>> {
        self.fetch("public = 1", Vec::new(), page)
    }
}
