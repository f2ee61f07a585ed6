// Domain layer - Dashboard, widget and grid models
pub mod dashboard;
pub mod error;
pub mod grid;
pub mod widget;
