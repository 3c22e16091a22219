use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Records of every resource, keyed by resource name, in insertion order.
#[derive(Debug, Default)]
pub struct ResourceStore {
    collections: HashMap<String, Vec<(String, Value)>>,
}

impl ResourceStore {
    /// Stores `record` under a fresh UUID, replacing any client-supplied `id`.
    pub fn create(&mut self, resource: &str, mut record: Map<String, Value>) -> String {
        let id = Uuid::new_v4().to_string();
        record.insert("id".to_string(), Value::String(id.clone()));
        self.collections
            .entry(resource.to_string())
            .or_default()
            .push((id.clone(), Value::Object(record)));
        id
    }

    pub fn list(&self, resource: &str) -> Vec<Value> {
        self.collections
            .get(resource)
            .map(|records| records.iter().map(|(_, record)| record.clone()).collect())
            .unwrap_or_default()
    }

    pub fn get(&self, resource: &str, id: &str) -> Option<&Value> {
        self.collections
            .get(resource)?
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, record)| record)
    }

    pub fn remove(&mut self, resource: &str, id: &str) -> bool {
        let Some(records) = self.collections.get_mut(resource) else {
            return false;
        };
        match records.iter().position(|(key, _)| key == id) {
            Some(index) => {
                records.remove(index);
                true
            }
            None => false,
        }
    }
}
