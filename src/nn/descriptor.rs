/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : 层摘要（Layer Summary）
 *                 可序列化为 JSON 的中间表示，用于展示和调试输出
 */

use serde::{Deserialize, Serialize};

use super::{Layer, LayerSpec};

/// 单个层的可序列化摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSummary {
    /// 层类型名
    pub layer_type: String,
    /// 格式标识
    pub uuid: String,
    pub window_sizes: Vec<usize>,
    pub input_feature_map_count: usize,
    pub output_feature_map_count: usize,
    pub feature_map_connection_count: usize,
    pub left_zero_padding: Vec<usize>,
    pub right_zero_padding: Vec<usize>,
    /// 权重数（连接数 × 窗口体积）
    pub weight_count: usize,
    /// 偏置数
    pub bias_count: usize,
}

/// 多个层的摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    /// 格式版本（用于向后兼容）
    pub version: String,
    pub layers: Vec<LayerSummary>,
}

impl ModelSummary {
    pub fn new(layers: &[Layer]) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            layers: layers.iter().map(LayerSpec::summary).collect(),
        }
    }

    /// 获取总参数量（权重 + 偏置）
    pub fn total_params(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weight_count + l.bias_count)
            .sum()
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl LayerSummary {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
