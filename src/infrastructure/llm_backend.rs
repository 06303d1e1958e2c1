//! 模型后端 - 基础设施层
//!
//! 只负责"把提示词发给模型并拿回文本"，不关心题型
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（自定义端点和模型）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GenerationError;

const SYSTEM_MESSAGE: &str = "You write concise educational exam content. \
                              Reply with the requested text only, without numbering or commentary.";

/// 模型后端能力
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// 模型名称（用于日志和 `GeneratorInfo`）
    fn model_name(&self) -> &str;

    /// 发送提示词，返回去掉首尾空白的文本
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, GenerationError>;
}

/// OpenAI 兼容的聊天补全后端
pub struct LlmBackend {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmBackend {
    /// 根据配置初始化
    ///
    /// API key / 地址 / 模型名任一为空时视为不可用
    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        let missing: Vec<&str> = [
            ("LLM_API_KEY", config.llm_api_key.as_str()),
            ("LLM_API_BASE_URL", config.llm_api_base_url.as_str()),
            ("LLM_MODEL_NAME", config.llm_model_name.as_str()),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(GenerationError::Unavailable {
                reason: format!("缺少配置: {}", missing.join(", ")),
            });
        }

        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Ok(Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        })
    }
}

#[async_trait]
impl ModelBackend for LlmBackend {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, GenerationError> {
        debug!(
            "调用模型 API，模型: {}，提示词长度: {} 字符，temperature: {:.1}",
            self.model_name,
            prompt.len(),
            temperature
        );

        let backend_err = |e| GenerationError::backend(self.model_name.clone(), e);

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_MESSAGE)
            .build()
            .map_err(backend_err)?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(backend_err)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .temperature(temperature)
            .max_tokens(256u32)
            .build()
            .map_err(backend_err)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("模型 API 调用失败: {}", e);
            backend_err(e)
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(GenerationError::EmptyResponse {
                model: self.model_name.clone(),
            });
        }

        debug!("模型 API 调用成功，返回 {} 字符", content.len());
        Ok(content)
    }
}
