//! 层的算力（FLOP）估计，只用于调度与报告，不影响计算正确性

use serde::{Deserialize, Serialize};

/// 前向、反向、权重更新三个阶段的浮点运算次数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerCost {
    pub forward_flops: f64,
    pub backward_flops: f64,
    pub weights_update_flops: f64,
}

impl LayerCost {
    /// 稀疏卷积的算力
    ///
    /// - 前向：`output_neuron_count × (connection_count × window_volume × 2 − 1)`
    /// - 反向与权重更新：`output_neuron_count × connection_count × window_volume × 2`
    ///
    /// 前向比另外两项少1次/神经元，保持原样
    pub fn sparse_convolution(
        output_neuron_count: usize,
        feature_map_connection_count: usize,
        window_volume: usize,
    ) -> Self {
        let per_item_flops = feature_map_connection_count as f64 * window_volume as f64 * 2.0;
        let neuron_count = output_neuron_count as f64;
        Self {
            forward_flops: neuron_count * (per_item_flops - 1.0),
            backward_flops: neuron_count * per_item_flops,
            weights_update_flops: neuron_count * per_item_flops,
        }
    }

    pub fn total(&self) -> f64 {
        self.forward_flops + self.backward_flops + self.weights_update_flops
    }
}
