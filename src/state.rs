//! Application state: the activity store, the AI gateway, the judge proxy,
//! and the prompt set, all wired from one explicit `Config`.
//!
//! No component reads env vars after startup; tests construct a `Config`
//! by hand and get a fully isolated instance.

use tracing::{info, instrument};

use crate::ai::AiClient;
use crate::config::{Config, Prompts};
use crate::error::{ApiError, ApiResult};
use crate::judge::JudgeClient;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub ai: Option<AiClient>,
    pub judge: JudgeClient,
    pub prompts: Prompts,
}

impl AppState {
    /// Connect the store and build the external-service clients.
    #[instrument(level = "info", skip_all)]
    pub async fn from_config(cfg: &Config) -> Result<Self, sqlx::Error> {
        let store = Store::connect(&cfg.database_url).await?;

        let ai = AiClient::from_config(cfg);
        match &ai {
            Some(client) => {
                info!(target: "elevate_backend", base_url = %client.base_url, model = %client.model, "AI gateway enabled")
            }
            None => {
                info!(target: "elevate_backend", "AI gateway disabled (no GEMINI_API_KEY); AI endpoints will answer 502")
            }
        }

        let judge = JudgeClient::from_config(cfg);
        if judge.is_configured() {
            info!(target: "elevate_backend", "Judge0 forwarding enabled");
        } else {
            info!(target: "elevate_backend", "Judge0 key absent; /code/execute will simulate via the AI gateway");
        }

        Ok(Self { store, ai, judge, prompts: cfg.prompts.clone() })
    }

    /// The gateway, or the upstream error every AI-backed endpoint reports
    /// when no model is configured.
    pub fn ai(&self) -> ApiResult<&AiClient> {
        self.ai
            .as_ref()
            .ok_or_else(|| ApiError::AiService("no model API key configured".into()))
    }
}
