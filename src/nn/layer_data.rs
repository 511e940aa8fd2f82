/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : 层的随机化数据（连接图 + 权重），随机生成一次后保存/加载，不再重新随机
 */

use std::io::{Read, Write};

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ConnectivityGraph, LayerWeights};
use crate::errors::LayerError;

/// 一次随机化调用同时生成的连接图与权重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerData {
    pub connectivity: ConnectivityGraph,
    pub weights: LayerWeights,
}

impl LayerData {
    pub const fn new(connectivity: ConnectivityGraph, weights: LayerWeights) -> Self {
        Self {
            connectivity,
            weights,
        }
    }

    /// 输出特征图`output_id`的权重块
    pub fn weight_block(&self, output_id: usize) -> Result<ArrayView2<'_, f32>, LayerError> {
        self.weights.block(&self.connectivity, output_id)
    }

    /// 以 bincode 格式写出
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<(), LayerError> {
        bincode::serialize_into(writer, self)?;
        debug!(
            connections = self.connectivity.connection_count(),
            weights = self.weights.weight_count(),
            "已保存层数据"
        );
        Ok(())
    }

    /// 读取 bincode 格式的层数据，并校验连接图与权重的尺寸是否自洽
    ///
    /// 与具体层参数的比对见`SparseConvolutionLayer::check_data`
    pub fn load<R: Read>(reader: &mut R) -> Result<Self, LayerError> {
        let data: Self = bincode::deserialize_from(reader)?;
        data.check_self_consistency()?;
        Ok(data)
    }

    fn check_self_consistency(&self) -> Result<(), LayerError> {
        let graph = &self.connectivity;
        // 列下标的上界由层参数决定，这里只校验结构
        graph.check(usize::MAX)?;

        let expected_weights = graph.connection_count() * self.weights.window_volume();
        if self.weights.weight_count() != expected_weights {
            return Err(LayerError::ValidationError(format!(
                "权重数{}与连接图不符，应为{expected_weights}",
                self.weights.weight_count()
            )));
        }
        if self.weights.bias_count() != graph.output_feature_map_count() {
            return Err(LayerError::ValidationError(format!(
                "偏置数{}与输出特征图数{}不符",
                self.weights.bias_count(),
                graph.output_feature_map_count()
            )));
        }
        Ok(())
    }
}
