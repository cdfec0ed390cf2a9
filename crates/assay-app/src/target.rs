use assay_domain::audit::Target;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// A target described entirely by configuration: a uri and a static property map.
#[derive(Debug)]
pub struct PropertyTarget {
    uri: RwLock<String>,
    properties: BTreeMap<String, JsonValue>,
}

impl PropertyTarget {
    pub fn new(uri: impl Into<String>, properties: BTreeMap<String, JsonValue>) -> Self {
        Self {
            uri: RwLock::new(uri.into()),
            properties,
        }
    }
}

impl Target for PropertyTarget {
    fn uri(&self) -> String {
        match self.uri.read() {
            Ok(uri) => uri.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_uri(&self, uri: &str) {
        let mut current = match self.uri.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *current = uri.to_string();
    }

    fn property(&self, key: &str) -> Option<JsonValue> {
        self.properties.get(key).cloned()
    }
}
