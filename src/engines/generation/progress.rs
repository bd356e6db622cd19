use crate::types::{Distance, SearchOutcome};
use std::sync::mpsc::Sender;

/// Snapshot handed to callbacks after each generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub generation: usize,
    pub total_generations: usize,
    /// Closest valid member of this generation, if any
    pub generation_best: Option<Distance>,
    pub best_distance: Distance,
    pub best_expression: Option<String>,
    pub valid_individuals: usize,
}

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, report: &GenerationReport);
    fn on_search_complete(&mut self, _outcome: &SearchOutcome) {}
}

/// Logs one line per generation
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, report: &GenerationReport) {
        log::info!(
            "Generation {}/{}, Best distance: {}, Expression: {}",
            report.generation + 1,
            report.total_generations,
            report.best_distance,
            report.best_expression.as_deref().unwrap_or("None")
        );
    }

    fn on_search_complete(&mut self, outcome: &SearchOutcome) {
        log::info!(
            "Search complete. Best expression: {} (distance {})",
            outcome.expression,
            outcome.hamming_distance
        );
    }
}

pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _report: &GenerationReport) {}
}

// For driving a UI or another thread
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

#[derive(Debug, Clone)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete(GenerationReport),
    Finished(SearchOutcome),
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, report: &GenerationReport) {
        let _ = self
            .sender
            .send(ProgressMessage::GenerationComplete(report.clone()));
    }

    fn on_search_complete(&mut self, outcome: &SearchOutcome) {
        let _ = self.sender.send(ProgressMessage::Finished(outcome.clone()));
    }
}
