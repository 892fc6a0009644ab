use crate::model::Id;
use serde::{Deserialize, Serialize};

/// A stored (class, designation, definition) → value row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub id: Id,
    pub class_id: Id,
    pub designation_id: Id,
    pub definition_id: Id,
    pub value: String,
}

/// Caller-supplied part of a mapping, used for single JSON writes and batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSpec {
    pub class_id: Id,
    pub designation_id: Id,
    pub definition_id: Id,
    pub value: String,
}

impl MappingSpec {
    pub fn new(class_id: Id, designation_id: Id, definition_id: Id, value: impl Into<String>) -> Self {
        Self {
            class_id,
            designation_id,
            definition_id,
            value: value.into(),
        }
    }

    pub fn into_mapping(self, id: Id) -> Mapping {
        Mapping {
            id,
            class_id: self.class_id,
            designation_id: self.designation_id,
            definition_id: self.definition_id,
            value: self.value,
        }
    }

    /// Key the store keeps unique per mapping table
    pub fn triple(&self) -> (Id, Id, Id) {
        (self.class_id, self.designation_id, self.definition_id)
    }
}

/// How a batch of mappings is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// One transaction; any rejected row rolls back the whole batch
    #[default]
    Atomic,
    /// Rows are written one at a time; rows before a rejected one stay
    BestEffort,
}
