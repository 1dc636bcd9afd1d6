//! Merge observation: the injected logging capability of the merger.
//!
//! Observers are infallible by construction; nothing an observer does can fail a merge.

use crate::cube::GraphDbBackend;
use serde_json::Value;
use tracing::{debug, info};

/// Something that happened during a merge
#[derive(Debug, Clone, PartialEq)]
pub enum MergeEvent {
    Started {
        user_id: Option<String>,
        cube_id: Option<String>,
    },
    /// A field kept the existing record's value
    FieldPreserved { path: String, value: Value },
    /// A field took the default template's value. `old` is `None` when the existing record
    /// did not have the field.
    FieldOverwritten {
        path: String,
        old: Option<Value>,
        new: Value,
    },
    /// Multi-database mode was switched off: the old database name became the user name
    MultiDbDowngraded { user_name: String, db_name: String },
    /// The template disables multi-database mode and the existing record already had it off
    MultiDbAlreadyDisabled,
    /// The merged graph section was installed into the output
    GraphDbPreserved { backend: GraphDbBackend },
    Completed {
        user_id: Option<String>,
        cube_id: Option<String>,
    },
}

impl MergeEvent {
    /// True for overwrites that actually changed a value
    pub fn is_change(&self) -> bool {
        match self {
            MergeEvent::FieldOverwritten { old, new, .. } => old.as_ref() != Some(new),
            MergeEvent::MultiDbDowngraded { .. } => true,
            _ => false,
        }
    }
}

/// Receives merge events
pub trait MergeObserver {
    fn record(&mut self, event: MergeEvent);
}

impl<O: MergeObserver + ?Sized> MergeObserver for &mut O {
    fn record(&mut self, event: MergeEvent) {
        (**self).record(event);
    }
}

/// Fan out to two observers
impl<A: MergeObserver, B: MergeObserver> MergeObserver for (A, B) {
    fn record(&mut self, event: MergeEvent) {
        self.0.record(event.clone());
        self.1.record(event);
    }
}

/// Emits every event as a `tracing` event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MergeObserver for TracingObserver {
    fn record(&mut self, event: MergeEvent) {
        match event {
            MergeEvent::Started { user_id, cube_id } => info!(
                user_id = user_id.as_deref().unwrap_or("-"),
                cube_id = cube_id.as_deref().unwrap_or("-"),
                "Starting cube config merge"
            ),
            MergeEvent::FieldPreserved { path, value } => debug!(
                field = %path,
                value = %redact(&path, &value),
                "Preserved field from existing config"
            ),
            MergeEvent::FieldOverwritten { path, old, new } => {
                let old = old
                    .as_ref()
                    .map(|v| redact(&path, v))
                    .unwrap_or(serde_json::Value::Null);
                let new = redact(&path, &new);
                debug!(
                    field = %path,
                    old = %old,
                    new = %new,
                    "Updated field from default config"
                )
            }
            MergeEvent::MultiDbDowngraded { user_name, db_name } => info!(
                user_name = %user_name,
                db_name = %db_name,
                "Switched graph db from multi-database to shared-database mode"
            ),
            MergeEvent::MultiDbAlreadyDisabled => {
                info!("use_multi_db is already false, no change needed")
            }
            MergeEvent::GraphDbPreserved { backend } => {
                debug!(backend = %backend, "Preserved graph_db with merged config")
            }
            MergeEvent::Completed { user_id, cube_id } => info!(
                user_id = user_id.as_deref().unwrap_or("-"),
                cube_id = cube_id.as_deref().unwrap_or("-"),
                "Merged cube config"
            ),
        }
    }
}

/// Collects events for later inspection or presentation
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    events: Vec<MergeEvent>,
}

impl MergeReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[MergeEvent] {
        &self.events
    }

    /// Events that changed the merged value relative to the existing record
    pub fn changes(&self) -> impl Iterator<Item = &MergeEvent> {
        self.events.iter().filter(|e| e.is_change())
    }

    /// Paths of every overwritten field, in merge order
    pub fn overwritten_paths(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                MergeEvent::FieldOverwritten { path, .. } => Some(path.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Paths of every preserved field, in merge order
    pub fn preserved_paths(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                MergeEvent::FieldPreserved { path, .. } => Some(path.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn downgraded_multi_db(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, MergeEvent::MultiDbDowngraded { .. }))
    }

    pub fn completed(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, MergeEvent::Completed { .. }))
    }
}

impl MergeObserver for MergeReport {
    fn record(&mut self, event: MergeEvent) {
        self.events.push(event);
    }
}

const SECRET_KEYS: [&str; 4] = ["password", "api_key", "secret", "token"];

/// Mask secret-looking values for display.
pub fn redact(path: &str, value: &Value) -> Value {
    let key = path.rsplit('.').next().unwrap_or(path).to_ascii_lowercase();
    let is_secret = SECRET_KEYS.iter().any(|s| key.contains(s));
    match value {
        Value::String(_) if is_secret => Value::String("***".to_string()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact(&format!("{}.{}", path, k), v)))
                .collect(),
        ),
        other => other.clone(),
    }
}
