use serde::{Deserialize, Serialize};

pub type Id = i64;

/// A named row in one of the definition tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Definition {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description,
        }
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_without_id_deserializes() {
        let definition: Definition = serde_json::from_str(r#"{"name": "volume"}"#).unwrap();
        assert_eq!(definition.id, 0);
        assert_eq!(definition.name, "volume");
        assert_eq!(definition.description, None);
    }

    #[test]
    fn test_definition_requires_name() {
        let result = serde_json::from_str::<Definition>(r#"{"id": 4}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_description_omitted_when_none() {
        let json = serde_json::to_string(&Definition::new("volume", None).with_id(1)).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"volume"}"#);
    }
}
