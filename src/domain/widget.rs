// Widget domain model
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Variant-specific widget configuration. The shape depends on the widget kind.
pub type WidgetConfig = Map<String, Value>;

/// Closed set of widget variants known to the composer.
///
/// `Unknown` keeps the original tag so that data restored from an older or
/// newer store survives a load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetKind {
    TimeSeries,
    Bar,
    Pie,
    OrdersTable,
    UsersTable,
    KpiSimple,
    KpiMulti,
    Markdown,
    Unknown(String),
}

impl WidgetKind {
    pub const KNOWN: [WidgetKind; 8] = [
        WidgetKind::TimeSeries,
        WidgetKind::Bar,
        WidgetKind::Pie,
        WidgetKind::OrdersTable,
        WidgetKind::UsersTable,
        WidgetKind::KpiSimple,
        WidgetKind::KpiMulti,
        WidgetKind::Markdown,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "chart.timeseries" => WidgetKind::TimeSeries,
            "chart.bar" => WidgetKind::Bar,
            "chart.pie" => WidgetKind::Pie,
            "table.orders" => WidgetKind::OrdersTable,
            "table.users" => WidgetKind::UsersTable,
            "kpi.simple" => WidgetKind::KpiSimple,
            "kpi.multi" => WidgetKind::KpiMulti,
            "notes.markdown" => WidgetKind::Markdown,
            other => WidgetKind::Unknown(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            WidgetKind::TimeSeries => "chart.timeseries",
            WidgetKind::Bar => "chart.bar",
            WidgetKind::Pie => "chart.pie",
            WidgetKind::OrdersTable => "table.orders",
            WidgetKind::UsersTable => "table.users",
            WidgetKind::KpiSimple => "kpi.simple",
            WidgetKind::KpiMulti => "kpi.multi",
            WidgetKind::Markdown => "notes.markdown",
            WidgetKind::Unknown(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, WidgetKind::Unknown(_))
    }
}

impl From<String> for WidgetKind {
    fn from(tag: String) -> Self {
        match WidgetKind::from_tag(&tag) {
            WidgetKind::Unknown(_) => WidgetKind::Unknown(tag),
            known => known,
        }
    }
}

impl From<WidgetKind> for String {
    fn from(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Unknown(tag) => tag,
            known => known.tag().to_string(),
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One placed, configured widget on a dashboard.
///
/// Field names follow the grid layout records (`i`, `x`, `y`, `w`, `h`) so
/// the same JSON travels to the grid renderer and the dashboard store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetInstance {
    #[serde(rename = "i")]
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(rename = "widgetType")]
    pub kind: WidgetKind,
    #[serde(default)]
    pub config: WidgetConfig,
}

impl WidgetInstance {
    pub fn title(&self) -> Option<&str> {
        self.config.get("title").and_then(Value::as_str)
    }
}
