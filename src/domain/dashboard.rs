// Dashboard domain model
use super::widget::WidgetInstance;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DASHBOARD_ID: &str = "default";
pub const DEFAULT_DASHBOARD_NAME: &str = "My Dashboard";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: String,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    /// Order only decides z-order of overlapping widgets.
    #[serde(default)]
    pub layout: Vec<WidgetInstance>,
}

fn default_version() -> u32 {
    1
}

impl Dashboard {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            version: 1,
            layout: Vec::new(),
        }
    }

    /// The empty dashboard used when nothing could be loaded.
    pub fn empty_default() -> Self {
        Self::new(
            DEFAULT_DASHBOARD_ID.to_string(),
            DEFAULT_DASHBOARD_NAME.to_string(),
        )
    }

    pub fn widget(&self, id: &str) -> Option<&WidgetInstance> {
        self.layout.iter().find(|w| w.id == id)
    }

    pub fn contains_widget(&self, id: &str) -> bool {
        self.widget(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_default() {
        let dashboard = Dashboard::empty_default();
        assert_eq!(dashboard.id, "default");
        assert_eq!(dashboard.name, "My Dashboard");
        assert_eq!(dashboard.version, 1);
        assert!(dashboard.layout.is_empty());
    }

    #[test]
    fn test_deserialize_without_version_or_layout() {
        let dashboard: Dashboard =
            serde_json::from_value(json!({ "id": "ops", "name": "Ops" })).unwrap();
        assert_eq!(dashboard.version, 1);
        assert!(dashboard.layout.is_empty());
    }
}
