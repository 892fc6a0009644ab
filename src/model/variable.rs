use crate::model::Id;
use serde::{Deserialize, Serialize};

/// Designation referenced by name. The id is filled in once the name has been
/// resolved against the `designations` table; anything a caller sends there is
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignationRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub name: String,
}

/// A key/value pair scoped to a designation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    pub designation: DesignationRef,
    #[serde(default)]
    pub value: String,
}

impl Variable {
    pub fn new(designation: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            designation: DesignationRef {
                id: None,
                name: designation.into(),
            },
            value: value.into(),
        }
    }

    /// Attach the resolved designation id
    pub fn resolved(mut self, designation_id: Id) -> Self {
        self.designation.id = Some(designation_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_request_shape() {
        let json = r#"{"key": "volume", "designation": {"name": "production"}, "value": "50"}"#;
        let variable: Variable = serde_json::from_str(json).unwrap();
        assert_eq!(variable, Variable::new("production", "volume", "50"));

        let resolved = serde_json::to_value(variable.resolved(7)).unwrap();
        assert_eq!(resolved["designation"]["id"], 7);
        assert_eq!(resolved["designation"]["name"], "production");
    }
}
