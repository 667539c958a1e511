use std::sync::Arc;

use crate::catalog::ContentCatalog;
use crate::config;
use crate::db::DocumentStore;
use crate::engine::{CertificateIssuer, QuizEngine};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub env: config::Config,
    pub engine: Arc<QuizEngine>,
    pub catalog: Arc<ContentCatalog>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, env: config::Config) -> Self {
        let issuer = CertificateIssuer::new(env.app.certificate_issuing_body.clone());
        let engine = Arc::new(QuizEngine::new(store.clone(), issuer));
        let catalog = Arc::new(ContentCatalog::new(
            store.clone(),
            env.app.completion_threshold_percent,
        ));
        Self {
            store,
            env,
            engine,
            catalog,
        }
    }
}
