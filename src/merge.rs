//! Cube Config Merge
//!
//! Upgrades an existing cube configuration to a newer default template. The default template
//! supplies every field except the cube's identity and the deployment-specific graph settings,
//! which are carried over from the existing record (see [`policy`]). When the template switches
//! the graph database to shared-database mode, the existing multi-database settings are
//! downgraded (see [`graph_db::merge_graph_db`]).
//!
//! The merge is pure: inputs are borrowed, the output is a new record, and logging goes
//! through an injected [`MergeObserver`].

use crate::cube::{MemCubeConfig, TextMemorySection};
use crate::error::CubeError;
use serde_json::Value;

pub mod graph_db;
pub mod observer;
pub mod policy;

pub use observer::{MergeEvent, MergeObserver, MergeReport, TracingObserver};
pub use policy::{CubeField, FieldPolicy, GraphDbField, IdentityField};

/// Merges existing cube configs with a default template
#[derive(Debug, Default)]
pub struct ConfigMerger<O: MergeObserver = TracingObserver> {
    observer: O,
}

impl ConfigMerger<TracingObserver> {
    /// Merger that logs through `tracing`
    pub fn new() -> Self {
        Self {
            observer: TracingObserver,
        }
    }
}

impl<O: MergeObserver> ConfigMerger<O> {
    pub fn with_observer(observer: O) -> Self {
        Self { observer }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Merge `existing` with `default`, returning a validated record.
    ///
    /// Fails with [`CubeError::Validation`] if the assembled record violates the schema; no
    /// partially merged record is ever returned.
    pub fn merge(
        &mut self,
        existing: &MemCubeConfig,
        default: &MemCubeConfig,
    ) -> Result<MemCubeConfig, CubeError> {
        self.observer.record(MergeEvent::Started {
            user_id: existing.user_id.clone(),
            cube_id: existing.cube_id.clone(),
        });

        let preserved_graph_db = match (existing.graph_db(), default.graph_db()) {
            (Some(existing_graph), Some(default_graph)) => Some(graph_db::merge_graph_db(
                existing_graph,
                default_graph,
                &mut self.observer,
            )),
            _ => None,
        };

        let mut merged = default.clone();

        for field in IdentityField::ALL {
            self.merge_cube_field(CubeField::Identity(field), existing, &mut merged);
        }
        for field in [CubeField::ActMem, CubeField::ParaMem, CubeField::Extra] {
            self.merge_cube_field(field, existing, &mut merged);
        }

        if let Some(graph) = preserved_graph_db {
            if CubeField::TextMem.policy() == FieldPolicy::Derived {
                if let Some(text_mem) = merged.text_mem.as_mut() {
                    install_graph_db(text_mem, graph, &mut self.observer);
                }
            }
        }

        let merged = merged.validated()?;

        self.observer.record(MergeEvent::Completed {
            user_id: merged.user_id.clone(),
            cube_id: merged.cube_id.clone(),
        });
        Ok(merged)
    }

    fn merge_cube_field(
        &mut self,
        field: CubeField,
        existing: &MemCubeConfig,
        merged: &mut MemCubeConfig,
    ) {
        match field.policy() {
            FieldPolicy::PreserveFromExisting => {
                let CubeField::Identity(identity) = field else {
                    return;
                };
                if let Some(value) = identity.get(existing) {
                    *identity.slot(merged) = Some(value.clone());
                    self.observer.record(MergeEvent::FieldPreserved {
                        path: identity.name().to_string(),
                        value: Value::String(value.clone()),
                    });
                }
            }
            // `merged` starts as a copy of the default, so these already hold its values.
            FieldPolicy::TakeFromDefault | FieldPolicy::Derived => {}
        }
    }
}

fn install_graph_db<O: MergeObserver>(
    text_mem: &mut TextMemorySection,
    graph: crate::cube::GraphDbSection,
    observer: &mut O,
) {
    observer.record(MergeEvent::GraphDbPreserved {
        backend: graph.backend,
    });
    text_mem.config.graph_db = Some(graph);
}

/// Merge with the default `tracing` observer.
pub fn merge_config_with_default(
    existing: &MemCubeConfig,
    default: &MemCubeConfig,
) -> Result<MemCubeConfig, CubeError> {
    ConfigMerger::new().merge(existing, default)
}
