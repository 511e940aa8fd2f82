/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : 稀疏卷积层的权重与偏置，以及依据连接图的截断正态初始化
 */

use ndarray::{Array1, ArrayView1, ArrayView2, s};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ConnectivityGraph;
use crate::errors::{ComparisonOperator, LayerError};

/// 截断阈值（单位：标准差）
pub const TRUNCATION_STD_COUNT: f32 = 3.0;

/// 权重与偏置
///
/// 权重按输出特征图依次连续存放：输出特征图`k`占用
/// `row_offsets[k] * window_volume .. row_offsets[k + 1] * window_volume`，
/// 即一个`(连接的输入特征图数) × window_volume`的块。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerWeights {
    weights: Array1<f32>,
    biases: Array1<f32>,
    window_volume: usize,
}

impl LayerWeights {
    /// 全零的权重与偏置
    pub fn zeros(graph: &ConnectivityGraph, window_volume: usize) -> Self {
        Self {
            weights: Array1::zeros(graph.connection_count() * window_volume),
            biases: Array1::zeros(graph.output_feature_map_count()),
            window_volume,
        }
    }

    /// 截断正态初始化（须在连接图生成之后调用）
    ///
    /// 输出特征图`k`的 fan-in 为`window_volume × 连接的输入特征图数`，
    /// 其权重取自均值0、标准差`1/sqrt(fan_in)`的正态分布，绝对值超过3倍标准差的样本丢弃重采。
    /// 重采次数期望为常数，此处不设上限。fan-in 为0的输出特征图没有权重。偏置全为0。
    pub fn truncated_normal<R: Rng + ?Sized>(
        graph: &ConnectivityGraph,
        window_volume: usize,
        rng: &mut R,
    ) -> Result<Self, LayerError> {
        let mut res = Self::zeros(graph, window_volume);
        let mut redraw_count = 0usize;

        for output_id in 0..graph.output_feature_map_count() {
            let fan_in = window_volume * graph.degree(output_id);
            if fan_in == 0 {
                continue;
            }

            let std_dev = 1.0 / (fan_in as f32).sqrt();
            let max_abs_value = TRUNCATION_STD_COUNT * std_dev;
            let normal = Normal::new(0.0f32, std_dev)
                .map_err(|e| LayerError::InternalInconsistency(format!("正态分布参数无效: {e}")))?;

            let start = graph.row_offsets()[output_id] * window_volume;
            for w in res.weights.slice_mut(s![start..start + fan_in]).iter_mut() {
                let mut val = normal.sample(rng);
                while val.abs() > max_abs_value {
                    redraw_count += 1;
                    val = normal.sample(rng);
                }
                *w = val;
            }
        }

        debug!(
            weights = res.weights.len(),
            redraws = redraw_count,
            "已按截断正态分布初始化权重"
        );
        Ok(res)
    }

    /// 全部权重（连续存放）
    pub fn weights(&self) -> ArrayView1<'_, f32> {
        self.weights.view()
    }

    /// 偏置（每个输出特征图一个）
    pub fn biases(&self) -> ArrayView1<'_, f32> {
        self.biases.view()
    }

    pub fn window_volume(&self) -> usize {
        self.window_volume
    }

    pub fn weight_count(&self) -> usize {
        self.weights.len()
    }

    pub fn bias_count(&self) -> usize {
        self.biases.len()
    }

    /// 输出特征图`output_id`的权重块，形状为`[连接的输入特征图数, window_volume]`
    ///
    /// `output_id`越界，或连接图与权重长度对不上时返回错误
    pub fn block(
        &self,
        graph: &ConnectivityGraph,
        output_id: usize,
    ) -> Result<ArrayView2<'_, f32>, LayerError> {
        let output_count = graph.output_feature_map_count();
        if output_id >= output_count {
            return Err(LayerError::comparison(
                "output_id",
                output_id,
                ComparisonOperator::LessThan,
                output_count,
            ));
        }
        let start = graph.row_offsets()[output_id] * self.window_volume;
        let degree = graph.degree(output_id);
        let end = start + degree * self.window_volume;
        if end > self.weights.len() {
            return Err(LayerError::ConfigMismatch {
                what: "权重数",
                expected: end,
                got: self.weights.len(),
            });
        }
        self.weights
            .slice(s![start..end])
            .into_shape((degree, self.window_volume))
            .map_err(|e| LayerError::ValidationError(format!("权重块形状错误: {e}")))
    }

    /// 原始权重切片（供拷贝到设备缓冲区）
    pub fn weights_as_slice(&self) -> Option<&[f32]> {
        self.weights.as_slice()
    }

    pub fn biases_as_slice(&self) -> Option<&[f32]> {
        self.biases.as_slice()
    }
}
