use serde::{Deserialize, Serialize};

/// Physical tables holding definition rows. Every variant shares the
/// `Definition` shape (`id`, `name`, `description`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionTable {
    Microservice,
    Variable,
    Class,
    Designation,
}

impl DefinitionTable {
    pub const ALL: [DefinitionTable; 4] = [
        DefinitionTable::Microservice,
        DefinitionTable::Variable,
        DefinitionTable::Class,
        DefinitionTable::Designation,
    ];

    pub const fn table_name(self) -> &'static str {
        match self {
            DefinitionTable::Microservice => "microservice_definitions",
            DefinitionTable::Variable => "variable_definitions",
            DefinitionTable::Class => "classes",
            DefinitionTable::Designation => "designations",
        }
    }

    /// Human readable name used in log lines and error messages
    pub const fn label(self) -> &'static str {
        match self {
            DefinitionTable::Microservice => "microservice definition",
            DefinitionTable::Variable => "variable definition",
            DefinitionTable::Class => "class",
            DefinitionTable::Designation => "designation",
        }
    }
}

/// Physical tables holding (class, designation, definition) mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingTable {
    Microservice,
    Variable,
}

impl MappingTable {
    pub const ALL: [MappingTable; 2] = [MappingTable::Microservice, MappingTable::Variable];

    pub const fn table_name(self) -> &'static str {
        match self {
            MappingTable::Microservice => "microservice_mappings",
            MappingTable::Variable => "variable_mappings",
        }
    }

    /// Foreign key column pointing at the definition table
    pub const fn definition_column(self) -> &'static str {
        match self {
            MappingTable::Microservice => "microservice_id",
            MappingTable::Variable => "variable_id",
        }
    }

    pub const fn value_column(self) -> &'static str {
        match self {
            MappingTable::Microservice => "yaml",
            MappingTable::Variable => "value",
        }
    }

    pub const fn definition_table(self) -> DefinitionTable {
        match self {
            MappingTable::Microservice => DefinitionTable::Microservice,
            MappingTable::Variable => DefinitionTable::Variable,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            MappingTable::Microservice => "microservice mapping",
            MappingTable::Variable => "variable mapping",
        }
    }

    /// Turn a raw request body into the stored value.
    ///
    /// Microservice mappings keep the document byte for byte. Variable
    /// mappings hold plain strings, so a body that is a JSON string literal
    /// (`"50"`) is unwrapped and anything else is taken as-is, trimmed.
    pub fn decode_value(self, body: &str) -> String {
        match self {
            MappingTable::Microservice => body.to_string(),
            MappingTable::Variable => {
                let trimmed = body.trim();
                match serde_json::from_str::<String>(trimmed) {
                    Ok(unquoted) => unquoted,
                    Err(_) => trimmed.to_string(),
                }
            }
        }
    }
}
