use serde::Deserialize;
use service_core::config::{self as core_config, get_env, get_env_parsed, get_optional_env};
use service_core::error::AppError;

pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-5-sonnet-20241022-v2:0";
pub const DEFAULT_HISTORY_TABLE_NAME: &str = "ChatMessageHistory";
pub const DEFAULT_NUMBER_OF_RESULTS: usize = 4;
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone, Deserialize)]
pub struct RagChatConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    /// Region used for SigV4 signing and the default endpoints.
    pub region: String,
    /// Bedrock API key. When unset, requests are signed with credentials
    /// from the AWS default chain.
    pub api_key: Option<String>,
    pub knowledge_base: KnowledgeBaseSettings,
    pub model: ModelSettings,
    pub history: HistorySettings,
    /// Feed the assembled grounding prompt to the model instead of the raw
    /// query. Off by default.
    pub grounded_generation: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBaseSettings {
    pub id: String,
    pub endpoint: String,
    pub number_of_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    pub id: String,
    pub endpoint: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistorySettings {
    pub mongodb_uri: String,
    pub database: String,
    pub table_name: String,
}

impl RagChatConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let region = get_env("AWS_REGION", Some(DEFAULT_REGION))?;
        let api_key = get_optional_env("AWS_BEARER_TOKEN_BEDROCK");

        Ok(RagChatConfig {
            common: common_config,
            region: region.clone(),
            api_key,
            knowledge_base: KnowledgeBaseSettings {
                id: get_env("KB_ID", None)?,
                endpoint: get_env(
                    "KB_ENDPOINT",
                    Some(&format!("https://bedrock-agent-runtime.{}.amazonaws.com", region)),
                )?,
                number_of_results: get_env_parsed(
                    "KB_NUMBER_OF_RESULTS",
                    DEFAULT_NUMBER_OF_RESULTS,
                ),
            },
            model: ModelSettings {
                id: get_env("MODEL_ID", Some(DEFAULT_MODEL_ID))?,
                endpoint: get_env(
                    "MODEL_ENDPOINT",
                    Some(&format!("https://bedrock-runtime.{}.amazonaws.com", region)),
                )?,
                temperature: get_env_parsed("MODEL_TEMPERATURE", DEFAULT_TEMPERATURE),
                max_tokens: get_env_parsed("MODEL_MAX_TOKENS", DEFAULT_MAX_TOKENS),
            },
            history: HistorySettings {
                mongodb_uri: get_env("MONGODB_URI", None)?,
                database: get_env("MONGODB_DATABASE", Some("rag_chat_db"))?,
                table_name: get_env("HISTORY_TABLE_NAME", Some(DEFAULT_HISTORY_TABLE_NAME))?,
            },
            grounded_generation: get_env_parsed("GROUNDED_GENERATION", false),
        })
    }
}
