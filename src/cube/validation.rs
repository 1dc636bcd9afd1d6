//! Schema validation for cube configuration records.
//!
//! Every check runs and every problem is reported, so a caller fixing a broken config file sees
//! the full list at once.

use crate::cube::backend::{BackendSection, MemorySection};
use crate::cube::graph_db::GraphDbConfig;
use crate::cube::text_mem::TextMemorySection;
use crate::cube::MemCubeConfig;
use thiserror::Error;

/// One schema violation, addressed by dotted field path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: required field is missing or empty")]
    Missing { field: String },

    #[error("{field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        ValidationError::Missing {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Dotted path of the offending field
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Missing { field } | ValidationError::Invalid { field, .. } => field,
        }
    }
}

impl MemCubeConfig {
    /// Validate the entire record
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        require_non_empty(&mut errors, "user_id", self.user_id.as_deref());
        require_non_empty(&mut errors, "cube_id", self.cube_id.as_deref());

        if let Some(filename) = &self.config_filename {
            if filename.trim().is_empty() {
                errors.push(ValidationError::missing("config_filename"));
            } else if filename.contains('/') || filename.contains('\\') {
                errors.push(ValidationError::invalid(
                    "config_filename",
                    format!("'{}' must be a bare file name", filename),
                ));
            }
        }
        if let Some(schema) = &self.model_schema {
            if schema.trim().is_empty() {
                errors.push(ValidationError::missing("model_schema"));
            }
        }

        if let Some(text_mem) = &self.text_mem {
            validate_text_mem(&mut errors, text_mem);
        }
        validate_memory_section(&mut errors, "act_mem", &self.act_mem);
        validate_memory_section(&mut errors, "para_mem", &self.para_mem);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl GraphDbConfig {
    /// Validate graph settings; `prefix` is the dotted path of this config object.
    pub fn validate(&self, prefix: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let field = |name: &str| format!("{}.{}", prefix, name);

        if self.uri.trim().is_empty() {
            errors.push(ValidationError::missing(field("uri")));
        } else if !self.uri.contains("://") {
            errors.push(ValidationError::invalid(
                field("uri"),
                format!("'{}' is not a URL (expected scheme://host)", self.uri),
            ));
        }

        if self.db_name.trim().is_empty() {
            errors.push(ValidationError::missing(field("db_name")));
        }

        // Shared-database mode partitions tenants by user_name.
        if !self.use_multi_db
            && self
                .user_name
                .as_deref()
                .map_or(true, |name| name.trim().is_empty())
        {
            errors.push(ValidationError::invalid(
                field("user_name"),
                "required when use_multi_db is false",
            ));
        }

        if self.embedding_dimension == Some(0) {
            errors.push(ValidationError::invalid(
                field("embedding_dimension"),
                "must be greater than zero",
            ));
        }

        errors
    }
}

fn validate_text_mem(errors: &mut Vec<ValidationError>, text_mem: &TextMemorySection) {
    if text_mem.backend.trim().is_empty() {
        errors.push(ValidationError::missing("text_mem.backend"));
    }

    let settings = &text_mem.config;
    let sections: [(&str, Option<&BackendSection>); 4] = [
        ("extractor_llm", settings.extractor_llm.as_ref()),
        ("dispatcher_llm", settings.dispatcher_llm.as_ref()),
        ("embedder", settings.embedder.as_ref()),
        ("internet_retriever", settings.internet_retriever.as_ref()),
    ];
    for (name, section) in sections {
        if let Some(section) = section {
            if section.backend.trim().is_empty() {
                errors.push(ValidationError::missing(format!(
                    "text_mem.config.{}.backend",
                    name
                )));
            }
        }
    }

    if let Some(graph_db) = &settings.graph_db {
        errors.extend(graph_db.config.validate("text_mem.config.graph_db.config"));
    }
}

fn validate_memory_section(errors: &mut Vec<ValidationError>, name: &str, section: &MemorySection) {
    if section.backend.trim().is_empty() && !section.config.is_empty() {
        errors.push(ValidationError::missing(format!("{}.backend", name)));
    }
}

fn require_non_empty(errors: &mut Vec<ValidationError>, field: &str, value: Option<&str>) {
    if value.map_or(true, |v| v.trim().is_empty()) {
        errors.push(ValidationError::missing(field));
    }
}
