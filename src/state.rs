use crate::orchestrator::Orchestrator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}
