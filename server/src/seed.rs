//! Deployment configuration: entity collections, field specs, sessions, and
//! the reference render mode, loaded from a JSON seed file.
//!
//! The seed stands in for the application-startup collaborator that performs
//! registration calls in a larger system; the server binary reads it once,
//! builds the immutable registries from it, and never mutates them again.

use crate::state::{AppState, Sessions};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tideline_registry::{MemoryDirectory, ProbeResponse, RegistryBuilder};
use tideline_serialize::{
    ExpandRender, FieldSpec, HyperlinkRender, PlainRender, Projector, RefRender,
    SpecRegistryBuilder,
};
use tideline_store::{Page, StreamStore};

/// How reference fields render, deployment-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Plain,
    Hyperlink,
    Expand,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RenderConfig {
    #[serde(default)]
    pub mode: RenderMode,
    /// External base URL, required for hyperlink mode.
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntitySeed {
    pub id: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSeed {
    pub name: String,
    /// Payload keys exposed in API responses.
    pub fields: Vec<String>,
    /// Optional existence-probe override for the whole class.
    pub probe: Option<ProbeResponse>,
    #[serde(default)]
    pub entities: Vec<EntitySeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSeed {
    pub collection: String,
    pub object_id: String,
}

/// The full deployment seed.
#[derive(Debug, Clone, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub render: RenderConfig,
    pub collections: Vec<CollectionSeed>,
    #[serde(default)]
    pub sessions: HashMap<String, SessionSeed>,
}

impl Seed {
    /// Reads a seed from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid seed file {}", path.display()))
    }

    /// A small built-in deployment for running the server without a seed
    /// file: two users, one group with a probe override, one session.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            render: RenderConfig::default(),
            collections: vec![
                CollectionSeed {
                    name: "users".into(),
                    fields: vec!["username".into()],
                    probe: None,
                    entities: vec![
                        EntitySeed {
                            id: "1".into(),
                            data: serde_json::json!({"username": "admin"}),
                        },
                        EntitySeed {
                            id: "2".into(),
                            data: serde_json::json!({"username": "Two"}),
                        },
                    ],
                },
                CollectionSeed {
                    name: "groups".into(),
                    fields: vec!["name".into()],
                    probe: Some(ProbeResponse {
                        status: 420,
                        body: serde_json::json!(["chill"]),
                    }),
                    entities: vec![EntitySeed {
                        id: "1".into(),
                        data: serde_json::json!({"name": "CoolGroup"}),
                    }],
                },
            ],
            sessions: HashMap::from([(
                "demo-admin".to_string(),
                SessionSeed {
                    collection: "users".into(),
                    object_id: "1".into(),
                },
            )]),
        }
    }
}

/// Builds the immutable application state from a seed. `db_path` of `None`
/// keeps the store in memory.
pub fn build_state(seed: &Seed, db_path: Option<&Path>) -> Result<AppState> {
    let mut registry_builder = RegistryBuilder::new();
    for collection in &seed.collections {
        let directory = match &collection.probe {
            Some(probe) => MemoryDirectory::new().with_probe(probe.clone()),
            None => MemoryDirectory::new(),
        };
        for entity in &collection.entities {
            directory.insert(entity.id.clone(), entity.data.clone());
        }
        registry_builder = registry_builder.register(collection.name.clone(), Arc::new(directory));
    }
    let registry = Arc::new(registry_builder.build()?);

    let mut spec_builder = SpecRegistryBuilder::new();
    for collection in &seed.collections {
        let type_id = registry
            .type_id(&collection.name)
            .context("collection vanished between registration and spec build")?;
        spec_builder = spec_builder.register(type_id, FieldSpec::new(collection.fields.clone()))?;
    }
    let specs = spec_builder.build();

    let style: Arc<dyn RefRender> = match seed.render.mode {
        RenderMode::Plain => Arc::new(PlainRender),
        RenderMode::Expand => Arc::new(ExpandRender),
        RenderMode::Hyperlink => match &seed.render.base_url {
            Some(base) => Arc::new(HyperlinkRender::new(base.clone())),
            None => bail!("hyperlink render mode requires a base_url"),
        },
    };
    let projector = Arc::new(Projector::new(Arc::clone(&registry), specs, style)?);

    let store = match db_path {
        Some(path) => StreamStore::open(path, Arc::clone(&registry))?,
        None => StreamStore::open_in_memory(Arc::clone(&registry))?,
    };

    let mut sessions = Sessions::new();
    for (token, session) in &seed.sessions {
        let user = registry
            .entity_ref(&session.collection, session.object_id.clone())
            .with_context(|| format!("session references unknown collection {}", session.collection))?;
        sessions.insert(token.clone(), user);
    }

    Ok(AppState {
        registry,
        store: Arc::new(store),
        projector,
        sessions: Arc::new(sessions),
        page_limit: Page::DEFAULT_LIMIT,
    })
}
