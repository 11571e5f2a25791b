use serde_json::{Map, Value};

/// Provider 配置
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub provider_name: String,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// 附加请求参数（如 top_p、seed），原样并入请求体
    pub extra: Map<String, Value>,
}
