use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::gql::domains::picks::RuleTable;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    config: Arc<AppConfig>,
    rules: Arc<RuleTable>,
}

impl AppState {
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        Self::with_rules(db, config, RuleTable::default())
    }

    pub fn with_rules(db: PgPool, config: AppConfig, rules: RuleTable) -> Self {
        Self {
            db,
            config: Arc::new(config),
            rules: Arc::new(rules),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }
}
