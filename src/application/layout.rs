// Layout model - Structural edits and position reconciliation for one dashboard
use crate::application::widget_catalog::generate_widget_id;
use crate::domain::dashboard::Dashboard;
use crate::domain::error::{DashboardError, Result};
use crate::domain::grid::{GridSettings, LayoutItem};
use crate::domain::widget::{WidgetConfig, WidgetInstance};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    Removed(WidgetInstance),
    Absent,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Widgets whose geometry actually changed.
    pub moved: usize,
    /// Reported ids that do not exist in the layout.
    pub ignored: Vec<String>,
}

/// Repairs applied to a dashboard that came from outside the engine.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SanitizeReport {
    /// Widgets raised to the minimum grid size.
    pub resized: Vec<String>,
    /// Duplicate ids replaced, as `(old, new)`.
    pub reassigned: Vec<(String, String)>,
    /// Widgets whose type is not registered; kept and rendered as unknown.
    pub unknown: Vec<String>,
}

impl SanitizeReport {
    pub fn is_clean(&self) -> bool {
        self.resized.is_empty() && self.reassigned.is_empty() && self.unknown.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutModel {
    grid: GridSettings,
}

impl LayoutModel {
    pub fn new(grid: GridSettings) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &GridSettings {
        &self.grid
    }

    pub fn add_widget(&self, dashboard: &mut Dashboard, mut widget: WidgetInstance) -> Result<()> {
        if dashboard.contains_widget(&widget.id) {
            return Err(DashboardError::DuplicateId(widget.id));
        }

        widget.w = self.grid.clamp_w(widget.w);
        widget.h = self.grid.clamp_h(widget.h);
        dashboard.layout.push(widget);
        Ok(())
    }

    pub fn remove_widget(&self, dashboard: &mut Dashboard, id: &str) -> RemoveOutcome {
        match dashboard.layout.iter().position(|w| w.id == id) {
            Some(index) => RemoveOutcome::Removed(dashboard.layout.remove(index)),
            None => RemoveOutcome::Absent,
        }
    }

    /// Copy a widget next to the original and return the id of the copy.
    pub fn duplicate_widget(&self, dashboard: &mut Dashboard, id: &str) -> Result<String> {
        let source = dashboard
            .widget(id)
            .ok_or_else(|| DashboardError::NotFound(id.to_string()))?;

        let copy = WidgetInstance {
            id: generate_widget_id(),
            x: self.grid.duplicate_x(source.x),
            y: self.grid.duplicate_y(source.y),
            w: source.w,
            h: source.h,
            kind: source.kind.clone(),
            config: source.config.clone(),
        };
        let new_id = copy.id.clone();

        self.add_widget(dashboard, copy)?;
        Ok(new_id)
    }

    /// Replace a widget's configuration wholesale.
    pub fn update_config(
        &self,
        dashboard: &mut Dashboard,
        id: &str,
        config: WidgetConfig,
    ) -> Result<()> {
        let widget = dashboard
            .layout
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| DashboardError::NotFound(id.to_string()))?;

        widget.config = config;
        Ok(())
    }

    /// Merge geometry reported by the grid renderer into the layout.
    ///
    /// Only `x`, `y`, `w` and `h` are written; type and configuration are
    /// never touched. Items for ids not in the layout are ignored.
    pub fn reconcile(&self, dashboard: &mut Dashboard, items: &[LayoutItem]) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let index: HashMap<&str, usize> = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id.as_str(), i))
            .collect();

        let mut seen = HashSet::new();
        for widget in dashboard.layout.iter_mut() {
            let Some(&i) = index.get(widget.id.as_str()) else {
                continue;
            };
            seen.insert(i);

            let item = &items[i];
            let geometry = (
                item.x,
                item.y,
                self.grid.clamp_w(item.w),
                self.grid.clamp_h(item.h),
            );
            if geometry != (widget.x, widget.y, widget.w, widget.h) {
                (widget.x, widget.y, widget.w, widget.h) = geometry;
                report.moved += 1;
            }
        }

        // Earlier repeats of a known id are superseded, not ignored.
        report.ignored = items
            .iter()
            .enumerate()
            .filter(|(i, item)| !seen.contains(i) && !dashboard.contains_widget(&item.id))
            .map(|(_, item)| item.id.clone())
            .collect();

        report
    }

    /// Bring a dashboard loaded from storage back within the layout invariants.
    pub fn sanitize(&self, dashboard: &mut Dashboard) -> SanitizeReport {
        let mut report = SanitizeReport::default();
        let mut ids: HashSet<String> = HashSet::new();

        for widget in dashboard.layout.iter_mut() {
            if !ids.insert(widget.id.clone()) {
                let mut fresh = generate_widget_id();
                while ids.contains(&fresh) {
                    fresh = generate_widget_id();
                }
                ids.insert(fresh.clone());
                let old = std::mem::replace(&mut widget.id, fresh.clone());
                report.reassigned.push((old, fresh));
            }

            let (w, h) = (self.grid.clamp_w(widget.w), self.grid.clamp_h(widget.h));
            if (w, h) != (widget.w, widget.h) {
                widget.w = w;
                widget.h = h;
                report.resized.push(widget.id.clone());
            }

            if !widget.kind.is_known() {
                report.unknown.push(widget.id.clone());
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::widget::WidgetKind;
    use serde_json::json;

    fn widget(id: &str, x: u32, y: u32, kind: WidgetKind, config: serde_json::Value) -> WidgetInstance {
        WidgetInstance {
            id: id.to_string(),
            x,
            y,
            w: 3,
            h: 2,
            kind,
            config: config.as_object().cloned().unwrap_or_default(),
        }
    }

    fn item(id: &str, x: u32, y: u32, w: u32, h: u32) -> LayoutItem {
        LayoutItem {
            id: id.to_string(),
            x,
            y,
            w,
            h,
        }
    }

    fn sample() -> Dashboard {
        let mut dashboard = Dashboard::empty_default();
        dashboard.layout.push(widget(
            "kpi",
            10,
            3,
            WidgetKind::KpiSimple,
            json!({ "metric": "todaySales" }),
        ));
        dashboard.layout.push(widget(
            "bar",
            0,
            0,
            WidgetKind::Bar,
            json!({ "title": "Top Products", "source": "topProducts", "limit": 5 }),
        ));
        dashboard
    }

    #[test]
    fn test_add_widget_rejects_duplicate_id() {
        let model = LayoutModel::default();
        let mut dashboard = sample();
        let before = dashboard.clone();

        let result = model.add_widget(
            &mut dashboard,
            widget("kpi", 0, 0, WidgetKind::Pie, json!({})),
        );

        assert!(matches!(result, Err(DashboardError::DuplicateId(id)) if id == "kpi"));
        assert_eq!(dashboard, before);
    }

    #[test]
    fn test_add_widget_enforces_minimum_size() {
        let model = LayoutModel::default();
        let mut dashboard = Dashboard::empty_default();
        let mut tiny = widget("tiny", 0, 0, WidgetKind::Markdown, json!({}));
        tiny.w = 1;
        tiny.h = 0;

        model.add_widget(&mut dashboard, tiny).unwrap();
        assert_eq!((dashboard.layout[0].w, dashboard.layout[0].h), (2, 2));
    }

    #[test]
    fn test_remove_widget() {
        let model = LayoutModel::default();
        let mut dashboard = sample();

        assert!(matches!(
            model.remove_widget(&mut dashboard, "bar"),
            RemoveOutcome::Removed(w) if w.id == "bar"
        ));
        assert_eq!(dashboard.layout.len(), 1);
        assert_eq!(model.remove_widget(&mut dashboard, "bar"), RemoveOutcome::Absent);
        assert_eq!(dashboard.layout.len(), 1);
    }

    #[test]
    fn test_duplicate_widget_offsets_and_wraps() {
        let model = LayoutModel::default();
        let mut dashboard = sample();

        let new_id = model.duplicate_widget(&mut dashboard, "kpi").unwrap();
        assert_ne!(new_id, "kpi");

        let copy = dashboard.widget(&new_id).unwrap().clone();
        assert_eq!((copy.x, copy.y), (0, 4));
        assert_eq!(copy.kind, WidgetKind::KpiSimple);
        assert_eq!(copy.config, dashboard.widget("kpi").unwrap().config);

        model
            .update_config(
                &mut dashboard,
                &new_id,
                json!({ "metric": "convRate" }).as_object().cloned().unwrap(),
            )
            .unwrap();
        assert_eq!(dashboard.widget("kpi").unwrap().config["metric"], "todaySales");
    }

    #[test]
    fn test_duplicate_missing_widget() {
        let model = LayoutModel::default();
        let mut dashboard = sample();
        assert!(matches!(
            model.duplicate_widget(&mut dashboard, "nope"),
            Err(DashboardError::NotFound(_))
        ));
        assert_eq!(dashboard.layout.len(), 2);
    }

    #[test]
    fn test_update_config_replaces_wholesale() {
        let model = LayoutModel::default();
        let mut dashboard = sample();

        model
            .update_config(
                &mut dashboard,
                "bar",
                json!({ "title": "Best Sellers" }).as_object().cloned().unwrap(),
            )
            .unwrap();

        let config = &dashboard.widget("bar").unwrap().config;
        assert_eq!(config.len(), 1);
        assert_eq!(config["title"], "Best Sellers");

        assert!(matches!(
            model.update_config(&mut dashboard, "nope", WidgetConfig::new()),
            Err(DashboardError::NotFound(_))
        ));
    }

    #[test]
    fn test_reconcile_only_touches_geometry() {
        let model = LayoutModel::default();
        let mut dashboard = sample();
        let before = dashboard.widget("bar").unwrap().clone();

        let report = model.reconcile(&mut dashboard, &[item("bar", 4, 6, 8, 3)]);

        let after = dashboard.widget("bar").unwrap();
        assert_eq!((after.x, after.y, after.w, after.h), (4, 6, 8, 3));
        assert_eq!(after.kind, before.kind);
        assert_eq!(after.config, before.config);
        assert_eq!(report.moved, 1);
        assert!(report.ignored.is_empty());
    }

    #[test]
    fn test_reconcile_ignores_unknown_ids_and_keeps_order() {
        let model = LayoutModel::default();
        let mut dashboard = sample();

        let report = model.reconcile(
            &mut dashboard,
            &[item("ghost", 1, 1, 4, 4), item("kpi", 10, 3, 3, 2)],
        );

        assert_eq!(report.moved, 0);
        assert_eq!(report.ignored, vec!["ghost".to_string()]);
        let ids: Vec<&str> = dashboard.layout.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["kpi", "bar"]);
    }

    #[test]
    fn test_reconcile_repeated_id_uses_last_report() {
        let model = LayoutModel::default();
        let mut dashboard = sample();

        let report = model.reconcile(
            &mut dashboard,
            &[item("bar", 1, 1, 4, 4), item("bar", 2, 5, 6, 3)],
        );

        assert!(report.ignored.is_empty());
        let bar = dashboard.widget("bar").unwrap();
        assert_eq!((bar.x, bar.y, bar.w, bar.h), (2, 5, 6, 3));
    }

    #[test]
    fn test_duplicate_widget_at_coordinate_limit() {
        let model = LayoutModel::default();
        let mut dashboard = Dashboard::empty_default();
        model
            .add_widget(
                &mut dashboard,
                widget("far", u32::MAX, u32::MAX, WidgetKind::Markdown, json!({})),
            )
            .unwrap();

        let new_id = model.duplicate_widget(&mut dashboard, "far").unwrap();
        let copy = dashboard.widget(&new_id).unwrap();
        assert!(copy.x < 12);
        assert_eq!(copy.y, u32::MAX);
    }

    #[test]
    fn test_reconcile_clamps_undersized_geometry() {
        let model = LayoutModel::default();
        let mut dashboard = sample();

        model.reconcile(&mut dashboard, &[item("kpi", 0, 0, 1, 1)]);
        let kpi = dashboard.widget("kpi").unwrap();
        assert_eq!((kpi.w, kpi.h), (2, 2));
    }

    #[test]
    fn test_sanitize_repairs_restored_dashboard() {
        let model = LayoutModel::default();
        let mut dashboard = sample();
        let mut clone = widget("kpi", 1, 1, WidgetKind::KpiSimple, json!({}));
        clone.w = 1;
        dashboard.layout.push(clone);
        dashboard.layout.push(widget(
            "geo",
            0,
            8,
            WidgetKind::Unknown("map.geo".to_string()),
            json!({ "zoom": 3 }),
        ));

        let report = model.sanitize(&mut dashboard);

        assert_eq!(dashboard.layout.len(), 4);
        assert_eq!(report.reassigned.len(), 1);
        assert_eq!(report.reassigned[0].0, "kpi");
        let new_id = &report.reassigned[0].1;
        assert_eq!(dashboard.layout[2].id, *new_id);
        assert_eq!(report.resized, vec![new_id.clone()]);
        assert_eq!(report.unknown, vec!["geo".to_string()]);
        assert_eq!(dashboard.layout[3].config["zoom"], 3);

        assert!(model.sanitize(&mut dashboard).unknown.len() == 1);
        assert!(model.sanitize(&mut sample()).is_clean());
    }
}
