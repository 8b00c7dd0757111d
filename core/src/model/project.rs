use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient::{de_opt_id, de_positive_id, de_string};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "de_positive_id")]
    pub id: u64,
    #[serde(default, deserialize_with = "de_string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Products share the project shape on the wire.
pub type Product = Project;

/// A scheduling container under a project; the unit of task-list pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    #[serde(deserialize_with = "de_positive_id")]
    pub id: u64,
    #[serde(default, deserialize_with = "de_opt_id", skip_serializing_if = "Option::is_none")]
    pub project: Option<u64>,
    #[serde(default, deserialize_with = "de_string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Execution {
    /// Whether this execution is the project itself or belongs to it.
    pub fn belongs_to_project(&self, project_id: u64) -> bool {
        self.id == project_id || self.project == Some(project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn execution_project_is_optional_and_lenient() {
        let e: Execution =
            serde_json::from_value(json!({"id": 5, "project": "2", "name": "Sprint 1"})).unwrap();
        assert_eq!(e.project, Some(2));
        assert!(e.belongs_to_project(2));
        assert!(e.belongs_to_project(5));
        assert!(!e.belongs_to_project(3));

        let bare: Execution = serde_json::from_value(json!({"id": 6, "name": "Loose"})).unwrap();
        assert_eq!(bare.project, None);
    }

    #[test]
    fn project_round_trips_extra_fields() {
        let p: Project = serde_json::from_value(
            json!({"id": 1, "name": "Apollo", "code": "APL", "PM": "alice"}),
        )
        .unwrap();
        assert_eq!(p.code.as_deref(), Some("APL"));
        assert_eq!(serde_json::to_value(&p).unwrap()["PM"], json!("alice"));
    }
}
