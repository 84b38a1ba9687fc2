use std::sync::Arc;

use supportflow_core::{BatchDriver, Config, SanitizedConfig, SupportPipeline, TicketStore};

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: Arc<SupportPipeline>,
    batch: BatchDriver,
    ticket_store: Arc<dyn TicketStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        pipeline: Arc<SupportPipeline>,
        batch: BatchDriver,
        ticket_store: Arc<dyn TicketStore>,
    ) -> Self {
        Self {
            config,
            pipeline,
            batch,
            ticket_store,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn pipeline(&self) -> &SupportPipeline {
        &self.pipeline
    }

    pub fn batch(&self) -> &BatchDriver {
        &self.batch
    }

    pub fn ticket_store(&self) -> &dyn TicketStore {
        self.ticket_store.as_ref()
    }
}
