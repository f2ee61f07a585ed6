// Mutation pipeline - Permission-gated reducer for structural dashboard edits
use crate::application::layout::{LayoutModel, RemoveOutcome};
use crate::application::widget_catalog::WidgetCatalog;
use crate::domain::dashboard::Dashboard;
use crate::domain::error::{DashboardError, Result};
use crate::domain::grid::{LayoutItem, Placement};
use crate::domain::widget::{WidgetConfig, WidgetInstance};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Session role. Editors and admins may change dashboards, viewers may not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    #[default]
    Editor,
    Admin,
}

impl Role {
    pub fn capability(self) -> Capability {
        Capability {
            can_mutate: matches!(self, Role::Editor | Role::Admin),
        }
    }
}

/// Permission flag read before every structural mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    can_mutate: bool,
}

impl Capability {
    pub const READ_ONLY: Capability = Capability { can_mutate: false };
    pub const EDIT: Capability = Capability { can_mutate: true };

    pub fn can_mutate(&self) -> bool {
        self.can_mutate
    }
}

/// Every structural change a dashboard can go through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Operation {
    AddWidget {
        widget: WidgetInstance,
    },
    /// Create a widget from the catalog and add it (gallery click).
    AddFromCatalog {
        #[serde(rename = "widgetType")]
        widget_type: String,
        #[serde(default)]
        placement: Placement,
    },
    RemoveWidget {
        id: String,
    },
    DuplicateWidget {
        id: String,
    },
    UpdateConfig {
        id: String,
        config: WidgetConfig,
    },
    /// Positions reported by the grid renderer after drag or resize.
    Relayout {
        items: Vec<LayoutItem>,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::AddWidget { .. } => "addWidget",
            Operation::AddFromCatalog { .. } => "addFromCatalog",
            Operation::RemoveWidget { .. } => "removeWidget",
            Operation::DuplicateWidget { .. } => "duplicateWidget",
            Operation::UpdateConfig { .. } => "updateConfig",
            Operation::Relayout { .. } => "relayout",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum MutationOutcome {
    Changed {
        /// Id of the widget created by add or duplicate.
        #[serde(rename = "widgetId", skip_serializing_if = "Option::is_none")]
        widget_id: Option<String>,
    },
    Unchanged {
        reason: String,
    },
}

impl MutationOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, MutationOutcome::Changed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Applied {
    pub dashboard: Dashboard,
    pub outcome: MutationOutcome,
}

#[derive(Debug, Clone)]
pub struct MutationPipeline {
    catalog: Arc<WidgetCatalog>,
    layout: LayoutModel,
}

impl MutationPipeline {
    pub fn new(catalog: Arc<WidgetCatalog>, layout: LayoutModel) -> Self {
        Self { catalog, layout }
    }

    pub fn catalog(&self) -> &WidgetCatalog {
        &self.catalog
    }

    pub fn layout(&self) -> &LayoutModel {
        &self.layout
    }

    /// Apply an operation to a copy of `current`.
    ///
    /// `current` is never modified. On error nothing changed; on success the
    /// caller records the returned dashboard in history when it changed.
    pub fn apply(
        &self,
        current: &Dashboard,
        operation: Operation,
        capability: Capability,
    ) -> Result<Applied> {
        if !capability.can_mutate() {
            tracing::warn!(
                dashboard_id = %current.id,
                operation = operation.name(),
                "Rejected mutation for read-only session"
            );
            return Err(DashboardError::PermissionDenied(format!(
                "{} requires edit permission",
                operation.name()
            )));
        }

        let name = operation.name();
        let mut next = current.clone();
        let mut widget_id = None;

        match operation {
            Operation::AddWidget { widget } => {
                widget_id = Some(widget.id.clone());
                self.layout.add_widget(&mut next, widget)?;
            }
            Operation::AddFromCatalog {
                widget_type,
                placement,
            } => {
                let widget = self.catalog.instantiate(&widget_type, placement)?;
                widget_id = Some(widget.id.clone());
                self.layout.add_widget(&mut next, widget)?;
            }
            Operation::RemoveWidget { id } => {
                if let RemoveOutcome::Absent = self.layout.remove_widget(&mut next, &id) {
                    tracing::info!(dashboard_id = %current.id, widget_id = %id, "Remove of absent widget ignored");
                    return Ok(Applied {
                        dashboard: next,
                        outcome: MutationOutcome::Unchanged {
                            reason: format!("widget {} is not on the dashboard", id),
                        },
                    });
                }
            }
            Operation::DuplicateWidget { id } => {
                widget_id = Some(self.layout.duplicate_widget(&mut next, &id)?);
            }
            Operation::UpdateConfig { id, config } => {
                self.layout.update_config(&mut next, &id, config)?;
            }
            Operation::Relayout { items } => {
                let report = self.layout.reconcile(&mut next, &items);
                if !report.ignored.is_empty() {
                    tracing::debug!(
                        dashboard_id = %current.id,
                        ignored = ?report.ignored,
                        "Relayout reported unknown widget ids"
                    );
                }
            }
        }

        let outcome = if next == *current {
            MutationOutcome::Unchanged {
                reason: format!("{} left the dashboard as it was", name),
            }
        } else {
            tracing::debug!(dashboard_id = %current.id, operation = name, "Applied mutation");
            MutationOutcome::Changed { widget_id }
        };

        Ok(Applied {
            dashboard: next,
            outcome,
        })
    }
}
