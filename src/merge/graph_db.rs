//! Graph-database level merge, including the multi-database downgrade.

use crate::cube::{GraphDbConfig, GraphDbSection};
use crate::merge::observer::{MergeEvent, MergeObserver};
use crate::merge::policy::{FieldPolicy, GraphDbField};
use serde::Serialize;
use serde_json::Value;

pub(crate) const GRAPH_DB_CONFIG_PATH: &str = "text_mem.config.graph_db.config";

/// Merge the graph section of an existing record with a default template's.
///
/// Starts from the existing config, adopts every non-protected field from the default, then
/// applies the multi-database downgrade. The backend tag always comes from `existing`.
pub fn merge_graph_db<O: MergeObserver>(
    existing: &GraphDbSection,
    default: &GraphDbSection,
    observer: &mut O,
) -> GraphDbSection {
    let mut merged = existing.config.clone();
    let mut fields = FieldMerger { observer };

    fields.apply(GraphDbField::Uri, &mut merged.uri, &default.config.uri);
    fields.apply(GraphDbField::User, &mut merged.user, &default.config.user);
    fields.apply(GraphDbField::Password, &mut merged.password, &default.config.password);
    fields.apply(GraphDbField::DbName, &mut merged.db_name, &default.config.db_name);
    fields.apply(GraphDbField::UserName, &mut merged.user_name, &default.config.user_name);
    fields.apply(GraphDbField::AutoCreate, &mut merged.auto_create, &default.config.auto_create);
    fields.apply(GraphDbField::UseMultiDb, &mut merged.use_multi_db, &default.config.use_multi_db);
    fields.apply(
        GraphDbField::EmbeddingDimension,
        &mut merged.embedding_dimension,
        &default.config.embedding_dimension,
    );
    fields.apply_extra(&mut merged, &default.config);

    downgrade_multi_db(&existing.config, &default.config, &mut merged, fields.observer);

    GraphDbSection {
        backend: existing.backend,
        config: merged,
    }
}

/// Switch a multi-database config to shared-database mode when the template asks for it.
///
/// The cube's old database name becomes its tenant `user_name` inside the shared database, and
/// `db_name` points at the template's shared database. There is no reverse (shared → multi) path.
fn downgrade_multi_db<O: MergeObserver>(
    existing: &GraphDbConfig,
    default: &GraphDbConfig,
    merged: &mut GraphDbConfig,
    observer: &mut O,
) {
    if default.use_multi_db {
        return;
    }

    if merged.use_multi_db {
        // Read the pre-merge database name; the field loop has already replaced merged.db_name.
        let previous_db_name = existing.db_name.clone();
        merged.use_multi_db = false;
        merged.user_name = Some(previous_db_name.clone());
        merged.db_name = default.db_name.clone();
        observer.record(MergeEvent::MultiDbDowngraded {
            user_name: previous_db_name,
            db_name: merged.db_name.clone(),
        });
    } else {
        observer.record(MergeEvent::MultiDbAlreadyDisabled);
    }
}

struct FieldMerger<'a, O> {
    observer: &'a mut O,
}

impl<O: MergeObserver> FieldMerger<'_, O> {
    fn apply<T>(&mut self, field: GraphDbField, slot: &mut T, default: &T)
    where
        T: Clone + Serialize,
    {
        let path = format!("{}.{}", GRAPH_DB_CONFIG_PATH, field.name());
        match field.policy() {
            FieldPolicy::PreserveFromExisting => {
                self.observer.record(MergeEvent::FieldPreserved {
                    path,
                    value: to_value(slot),
                });
            }
            FieldPolicy::TakeFromDefault => {
                self.observer.record(MergeEvent::FieldOverwritten {
                    path,
                    old: Some(to_value(slot)),
                    new: to_value(default),
                });
                *slot = default.clone();
            }
            FieldPolicy::Derived => {}
        }
    }

    /// Backend-specific keys: default's keys overwrite, keys only in existing survive.
    fn apply_extra(&mut self, merged: &mut GraphDbConfig, default: &GraphDbConfig) {
        if GraphDbField::Extra.policy() != FieldPolicy::TakeFromDefault {
            return;
        }
        for (key, value) in &default.extra {
            let old = merged.extra.insert(key.clone(), value.clone());
            self.observer.record(MergeEvent::FieldOverwritten {
                path: format!("{}.{}", GRAPH_DB_CONFIG_PATH, key),
                old,
                new: value.clone(),
            });
        }
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
