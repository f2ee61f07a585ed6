// Dashboard session - Owned editing state: current dashboard, history and role
use crate::application::history::HistoryManager;
use crate::application::layout::SanitizeReport;
use crate::application::mutation::{Applied, MutationOutcome, MutationPipeline, Operation, Role};
use crate::domain::dashboard::Dashboard;
use crate::domain::error::{DashboardError, Result};

/// Marker handed out before an async fetch so the response can be checked
/// for freshness when it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

#[derive(Debug)]
pub struct DashboardSession {
    pipeline: MutationPipeline,
    history: HistoryManager,
    current: Option<Dashboard>,
    role: Role,
    generation: u64,
}

impl DashboardSession {
    pub fn new(pipeline: MutationPipeline, history: HistoryManager, role: Role) -> Self {
        Self {
            pipeline,
            history,
            current: None,
            role,
            generation: 0,
        }
    }

    pub fn current(&self) -> Option<&Dashboard> {
        self.current.as_ref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    pub fn pipeline(&self) -> &MutationPipeline {
        &self.pipeline
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replace the session's dashboard and start a fresh history with it.
    pub fn load(&mut self, mut dashboard: Dashboard) -> SanitizeReport {
        let report = self.pipeline.layout().sanitize(&mut dashboard);
        if !report.is_clean() {
            tracing::warn!(
                dashboard_id = %dashboard.id,
                resized = ?report.resized,
                reassigned = ?report.reassigned,
                unknown = ?report.unknown,
                "Repaired dashboard on load"
            );
        }

        self.history.reset();
        self.history.record(&dashboard);
        self.current = Some(dashboard);
        self.bump();
        report
    }

    /// Run an operation through the pipeline using the session's role.
    pub fn dispatch(&mut self, operation: Operation) -> Result<MutationOutcome> {
        let current = self.current.as_ref().ok_or(DashboardError::NoDashboard)?;
        let Applied { dashboard, outcome } =
            self.pipeline
                .apply(current, operation, self.role.capability())?;

        if outcome.is_changed() && self.history.record(&dashboard) {
            self.current = Some(dashboard);
            self.bump();
        }

        Ok(outcome)
    }

    /// Step back one snapshot. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(dashboard) => {
                self.current = Some(dashboard);
                self.bump();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(dashboard) => {
                self.current = Some(dashboard);
                self.bump();
                true
            }
            None => false,
        }
    }

    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Whether nothing changed locally since the ticket was issued.
    pub fn is_fresh(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    fn bump(&mut self) {
        self.generation += 1;
    }
}
