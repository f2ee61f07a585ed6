// Widget catalog - Registry of widget variants and factory for new instances
use crate::domain::error::{DashboardError, Result};
use crate::domain::grid::Placement;
use crate::domain::widget::{WidgetConfig, WidgetInstance, WidgetKind};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_WIDGET_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generate a widget id that is distinct within this process.
pub fn generate_widget_id() -> String {
    let seq = NEXT_WIDGET_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("w{}_{}", Utc::now().timestamp_millis(), seq)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WidgetSize {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetDefinition {
    #[serde(rename = "id")]
    pub kind: WidgetKind,
    pub title: String,
    pub description: String,
    pub category: String,
    pub default_size: WidgetSize,
    pub default_config: WidgetConfig,
}

impl WidgetDefinition {
    fn new(
        kind: WidgetKind,
        title: &str,
        description: &str,
        category: &str,
        (w, h): (u32, u32),
        default_config: Value,
    ) -> Self {
        let default_config = match default_config {
            Value::Object(map) => map,
            _ => WidgetConfig::new(),
        };

        Self {
            kind,
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            default_size: WidgetSize { w, h },
            default_config,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub widgets: Vec<&'a WidgetDefinition>,
}

/// Read-only catalog of widget definitions, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct WidgetCatalog {
    definitions: Vec<WidgetDefinition>,
}

impl WidgetCatalog {
    pub fn new() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }

    /// Catalog with every built-in widget variant.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();

        catalog.register(WidgetDefinition::new(
            WidgetKind::TimeSeries,
            "Time Series Chart",
            "Line chart showing data over time",
            "Charts",
            (6, 4),
            json!({ "title": "Sales Trend", "source": "sales", "range": "30d", "showAvg": false }),
        ));
        catalog.register(WidgetDefinition::new(
            WidgetKind::Bar,
            "Bar Chart",
            "Compare values across categories",
            "Charts",
            (6, 4),
            json!({ "title": "Top Products", "source": "topProducts", "limit": 5 }),
        ));
        catalog.register(WidgetDefinition::new(
            WidgetKind::Pie,
            "Pie Chart",
            "Show distribution as percentages",
            "Charts",
            (4, 4),
            json!({ "title": "Order Status Mix", "source": "mixByStatus" }),
        ));
        catalog.register(WidgetDefinition::new(
            WidgetKind::OrdersTable,
            "Orders Table",
            "View and filter orders",
            "Tables",
            (6, 5),
            json!({
                "title": "Recent Orders",
                "status": "all",
                "pageSize": 10,
                "columns": ["id", "customer", "total", "status", "createdAt"]
            }),
        ));
        catalog.register(WidgetDefinition::new(
            WidgetKind::UsersTable,
            "Users Table",
            "View and filter users",
            "Tables",
            (6, 5),
            json!({
                "title": "Users",
                "role": "all",
                "pageSize": 10,
                "columns": ["id", "name", "role", "status", "createdAt"]
            }),
        ));
        catalog.register(WidgetDefinition::new(
            WidgetKind::KpiSimple,
            "Single KPI",
            "Display one key metric",
            "KPIs",
            (3, 2),
            json!({ "metric": "todaySales", "precision": 0 }),
        ));
        catalog.register(WidgetDefinition::new(
            WidgetKind::KpiMulti,
            "Multi KPI",
            "Display multiple metrics in one card",
            "KPIs",
            (6, 2),
            json!({ "metrics": ["todaySales", "ordersToday", "convRate"] }),
        ));
        catalog.register(WidgetDefinition::new(
            WidgetKind::Markdown,
            "Notes",
            "Add text notes or documentation",
            "Other",
            (4, 3),
            json!({ "title": "Notes", "content": "# Notes\n\nAdd your notes here..." }),
        ));

        catalog
    }

    /// Register a definition. A later registration of the same kind replaces
    /// the earlier one in place, keeping its position.
    pub fn register(&mut self, definition: WidgetDefinition) {
        match self
            .definitions
            .iter_mut()
            .find(|d| d.kind == definition.kind)
        {
            Some(existing) => *existing = definition,
            None => self.definitions.push(definition),
        }
    }

    pub fn lookup(&self, tag: &str) -> Result<&WidgetDefinition> {
        self.definitions
            .iter()
            .find(|d| d.kind.tag() == tag)
            .ok_or_else(|| DashboardError::NotFound(tag.to_string()))
    }

    pub fn definitions(&self) -> &[WidgetDefinition] {
        &self.definitions
    }

    /// Definitions grouped by category. Categories appear in the order their
    /// first member was registered.
    pub fn list_by_category(&self) -> Vec<CategoryGroup<'_>> {
        let mut groups: Vec<CategoryGroup<'_>> = Vec::new();

        for definition in &self.definitions {
            match groups
                .iter_mut()
                .find(|g| g.category == definition.category)
            {
                Some(group) => group.widgets.push(definition),
                None => groups.push(CategoryGroup {
                    category: &definition.category,
                    widgets: vec![definition],
                }),
            }
        }

        groups
    }

    /// Create a new instance of a registered widget type.
    pub fn instantiate(&self, tag: &str, placement: Placement) -> Result<WidgetInstance> {
        let definition = self
            .lookup(tag)
            .map_err(|_| DashboardError::UnknownWidgetType(tag.to_string()))?;

        Ok(WidgetInstance {
            id: generate_widget_id(),
            x: placement.x.unwrap_or(0),
            y: placement.y.unwrap_or(0),
            w: definition.default_size.w,
            h: definition.default_size.h,
            kind: definition.kind.clone(),
            config: definition.default_config.clone(),
        })
    }

    /// Title shown for a widget: its configured title, else the definition
    /// title, else a deterministic label for unregistered types.
    pub fn display_title(&self, widget: &WidgetInstance) -> String {
        if let Some(title) = widget.title() {
            return title.to_string();
        }

        match self.lookup(widget.kind.tag()) {
            Ok(definition) => definition.title.clone(),
            Err(_) => format!("Unknown widget ({})", widget.kind.tag()),
        }
    }
}
