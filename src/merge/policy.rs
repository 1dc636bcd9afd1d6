//! Merge rules: which source wins for each field of each structural level.
//!
//! The tables are exhaustive `match`es over typed field enums, so adding a field to the schema
//! without deciding its policy fails to compile.

use crate::cube::MemCubeConfig;

/// Where a merged field's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Keep the existing record's value (when it has one)
    PreserveFromExisting,
    /// Adopt the default template's value
    TakeFromDefault,
    /// Computed by a level-specific rule from both records
    Derived,
}

/// Identity fields of a cube record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    UserId,
    CubeId,
    ConfigFilename,
    ModelSchema,
}

impl IdentityField {
    pub const ALL: [IdentityField; 4] = [
        IdentityField::UserId,
        IdentityField::CubeId,
        IdentityField::ConfigFilename,
        IdentityField::ModelSchema,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IdentityField::UserId => "user_id",
            IdentityField::CubeId => "cube_id",
            IdentityField::ConfigFilename => "config_filename",
            IdentityField::ModelSchema => "model_schema",
        }
    }

    pub fn get(self, config: &MemCubeConfig) -> Option<&String> {
        match self {
            IdentityField::UserId => config.user_id.as_ref(),
            IdentityField::CubeId => config.cube_id.as_ref(),
            IdentityField::ConfigFilename => config.config_filename.as_ref(),
            IdentityField::ModelSchema => config.model_schema.as_ref(),
        }
    }

    pub fn slot(self, config: &mut MemCubeConfig) -> &mut Option<String> {
        match self {
            IdentityField::UserId => &mut config.user_id,
            IdentityField::CubeId => &mut config.cube_id,
            IdentityField::ConfigFilename => &mut config.config_filename,
            IdentityField::ModelSchema => &mut config.model_schema,
        }
    }
}

/// Top-level fields of a cube record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeField {
    Identity(IdentityField),
    TextMem,
    ActMem,
    ParaMem,
    Extra,
}

impl CubeField {
    pub fn policy(self) -> FieldPolicy {
        match self {
            CubeField::Identity(_) => FieldPolicy::PreserveFromExisting,
            CubeField::TextMem => FieldPolicy::Derived,
            CubeField::ActMem | CubeField::ParaMem | CubeField::Extra => {
                FieldPolicy::TakeFromDefault
            }
        }
    }
}

/// Fields of a graph database config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphDbField {
    Uri,
    User,
    Password,
    DbName,
    UserName,
    AutoCreate,
    UseMultiDb,
    EmbeddingDimension,
    /// Any backend-specific key
    Extra,
}

impl GraphDbField {
    pub fn name(self) -> &'static str {
        match self {
            GraphDbField::Uri => "uri",
            GraphDbField::User => "user",
            GraphDbField::Password => "password",
            GraphDbField::DbName => "db_name",
            GraphDbField::UserName => "user_name",
            GraphDbField::AutoCreate => "auto_create",
            GraphDbField::UseMultiDb => "use_multi_db",
            GraphDbField::EmbeddingDimension => "embedding_dimension",
            GraphDbField::Extra => "*",
        }
    }

    /// Deployment-specific fields are protected; the multi-db downgrade may still rewrite
    /// `user_name`, `use_multi_db` and `db_name` afterwards.
    pub fn policy(self) -> FieldPolicy {
        match self {
            GraphDbField::AutoCreate | GraphDbField::UserName | GraphDbField::UseMultiDb => {
                FieldPolicy::PreserveFromExisting
            }
            GraphDbField::Uri
            | GraphDbField::User
            | GraphDbField::Password
            | GraphDbField::DbName
            | GraphDbField::EmbeddingDimension
            | GraphDbField::Extra => FieldPolicy::TakeFromDefault,
        }
    }
}

/// Fields never taken from a default template's graph config
pub const PROTECTED_GRAPH_DB_FIELDS: [GraphDbField; 3] = [
    GraphDbField::AutoCreate,
    GraphDbField::UserName,
    GraphDbField::UseMultiDb,
];
