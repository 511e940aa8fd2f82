/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : 稀疏卷积层的 JSON 配置
 */

use serde::{Deserialize, Serialize};

use super::SparseConvolutionLayer;
use crate::errors::LayerError;

/// 连接数的给法：直接给出条数，或给出相对全连接的比例
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connections {
    Count(usize),
    SparsityRatio(f32),
}

/// 稀疏卷积层配置
///
/// # 示例
/// ```json
/// {
///   "window_sizes": [3, 3],
///   "input_feature_map_count": 4,
///   "output_feature_map_count": 2,
///   "connections": { "count": 6 },
///   "left_zero_padding": [1, 1]
/// }
/// ```
/// 未给出的填充视为全0。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseConvolutionConfig {
    pub window_sizes: Vec<usize>,
    pub input_feature_map_count: usize,
    pub output_feature_map_count: usize,
    pub connections: Connections,
    #[serde(default)]
    pub left_zero_padding: Vec<usize>,
    #[serde(default)]
    pub right_zero_padding: Vec<usize>,
}

impl SparseConvolutionConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 校验并构造层
    pub fn build(&self) -> Result<SparseConvolutionLayer, LayerError> {
        match self.connections {
            Connections::Count(count) => SparseConvolutionLayer::new(
                &self.window_sizes,
                self.input_feature_map_count,
                self.output_feature_map_count,
                count,
                &self.left_zero_padding,
                &self.right_zero_padding,
            ),
            Connections::SparsityRatio(ratio) => SparseConvolutionLayer::with_sparsity_ratio(
                &self.window_sizes,
                self.input_feature_map_count,
                self.output_feature_map_count,
                ratio,
                &self.left_zero_padding,
                &self.right_zero_padding,
            ),
        }
    }
}

impl From<&SparseConvolutionLayer> for SparseConvolutionConfig {
    fn from(layer: &SparseConvolutionLayer) -> Self {
        Self {
            window_sizes: layer.window_sizes().to_vec(),
            input_feature_map_count: layer.input_feature_map_count(),
            output_feature_map_count: layer.output_feature_map_count(),
            connections: Connections::Count(layer.feature_map_connection_count()),
            left_zero_padding: layer.left_zero_padding().to_vec(),
            right_zero_padding: layer.right_zero_padding().to_vec(),
        }
    }
}
