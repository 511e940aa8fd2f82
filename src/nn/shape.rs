/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 层的输入/输出形状描述
 *
 * - LayerConfiguration：与具体尺寸无关的配置（特征图数 + 维数，可未知）
 * - LayerShape：含具体尺寸的形状（特征图数可未知，各维尺寸已知）
 * - Region：按维给出的闭区间，用于由输出区域反推所依赖的输入区域
 */

use serde::{Deserialize, Serialize};

/// 与具体尺寸无关的层配置
///
/// `None`表示未知（不参与校验）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerConfiguration {
    pub feature_map_count: Option<usize>,
    pub dimension_count: Option<usize>,
}

impl LayerConfiguration {
    pub const fn new(feature_map_count: usize, dimension_count: usize) -> Self {
        Self {
            feature_map_count: Some(feature_map_count),
            dimension_count: Some(dimension_count),
        }
    }

    /// 特征图数与维数都未知
    pub const fn unknown() -> Self {
        Self {
            feature_map_count: None,
            dimension_count: None,
        }
    }
}

/// 含具体空间尺寸的形状：`feature_map_count` × `dimension_sizes[0]` × ...
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerShape {
    /// 特征图数（`None`表示未知）
    pub feature_map_count: Option<usize>,
    /// 各空间维的尺寸
    pub dimension_sizes: Vec<usize>,
}

impl LayerShape {
    pub fn new(feature_map_count: usize, dimension_sizes: &[usize]) -> Self {
        Self {
            feature_map_count: Some(feature_map_count),
            dimension_sizes: dimension_sizes.to_vec(),
        }
    }

    /// 特征图数未知、仅知空间尺寸的形状
    pub fn with_unknown_feature_maps(dimension_sizes: &[usize]) -> Self {
        Self {
            feature_map_count: None,
            dimension_sizes: dimension_sizes.to_vec(),
        }
    }

    /// 空间维数
    pub fn dimension_count(&self) -> usize {
        self.dimension_sizes.len()
    }

    /// 单个特征图的神经元数（各维尺寸之积）
    pub fn neuron_count_per_feature_map(&self) -> usize {
        self.dimension_sizes.iter().product()
    }

    /// 全部神经元数；特征图数未知时返回`None`
    pub fn neuron_count(&self) -> Option<usize> {
        self.feature_map_count
            .map(|count| count * self.neuron_count_per_feature_map())
    }

    pub fn configuration(&self) -> LayerConfiguration {
        LayerConfiguration {
            feature_map_count: self.feature_map_count,
            dimension_count: Some(self.dimension_count()),
        }
    }
}

/// 按维的闭区间`[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}
