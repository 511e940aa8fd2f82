/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : SparseConvolution（稀疏连接卷积）层描述符
 *
 * 与普通卷积的区别：输入/输出特征图之间并非全连接，
 * 而是只有 feature_map_connection_count 条随机生成的连接（见 connectivity.rs）。
 *
 * 输出尺寸计算（步长固定为1）：
 * out[i] = in[i] + left_pad[i] + right_pad[i] - window[i] + 1
 */

use std::collections::BTreeSet;
use std::io::Write;

use rand::RngCore;

use super::{LayerSpec, LayerUuid, format_uuid};
use crate::errors::{ComparisonOperator, LayerError};
use crate::nn::{
    ConnectivityGraph, LayerConfiguration, LayerCost, LayerData, LayerShape, LayerSummary,
    LayerWeights, Region,
};

/// 当前格式标识 {228C72EF-B260-493C-AEFD-24A13D455696}
pub const SPARSE_CONVOLUTION_UUID: LayerUuid = [
    0x22, 0x8c, 0x72, 0xef, 0xb2, 0x60, 0x49, 0x3c, 0xae, 0xfd, 0x24, 0xa1, 0x3d, 0x45, 0x56, 0x96,
];

/// 旧版格式标识（不含填充字段）{359B361C-61E7-4E52-89E6-E722B433F95C}
pub const SPARSE_CONVOLUTION_UUID_V1: LayerUuid = [
    0x35, 0x9b, 0x36, 0x1c, 0x61, 0xe7, 0x4e, 0x52, 0x89, 0xe6, 0xe7, 0x22, 0xb4, 0x33, 0xf9, 0x5c,
];

/// 稀疏连接卷积层
///
/// 构造（或反序列化）成功即保证参数自洽：
/// - 窗口尺寸非空且各维均为正
/// - `max(in, out) ≤ feature_map_connection_count ≤ in × out`
/// - 各维左右填充均小于该维窗口尺寸
/// - `in × out`与`窗口体积 × 连接数 × 2`均不溢出 usize
///
/// # 使用示例
/// ```ignore
/// let layer = SparseConvolutionLayer::new(&[3, 3], 4, 2, 6, &[], &[])?;
/// let output_shape = layer.get_output_shape(&LayerShape::new(4, &[5, 5]))?;
/// let data = layer.randomize_data(&mut StdRng::seed_from_u64(42))?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseConvolutionLayer {
    window_sizes: Vec<usize>,
    input_feature_map_count: usize,
    output_feature_map_count: usize,
    feature_map_connection_count: usize,
    left_zero_padding: Vec<usize>,
    right_zero_padding: Vec<usize>,
}

impl SparseConvolutionLayer {
    /// 创建新的稀疏卷积层
    ///
    /// # 参数
    /// - `window_sizes`: 各空间维的窗口尺寸
    /// - `input_feature_map_count`: 输入特征图数
    /// - `output_feature_map_count`: 输出特征图数
    /// - `feature_map_connection_count`: 输入/输出特征图之间的连接总数
    /// - `left_zero_padding`/`right_zero_padding`: 各维左右零填充，传空切片表示全为0
    pub fn new(
        window_sizes: &[usize],
        input_feature_map_count: usize,
        output_feature_map_count: usize,
        feature_map_connection_count: usize,
        left_zero_padding: &[usize],
        right_zero_padding: &[usize],
    ) -> Result<Self, LayerError> {
        let dimension_count = window_sizes.len();
        let left_zero_padding = Self::padding_or_zeros(left_zero_padding, dimension_count, "左")?;
        let right_zero_padding =
            Self::padding_or_zeros(right_zero_padding, dimension_count, "右")?;

        let layer = Self {
            window_sizes: window_sizes.to_vec(),
            input_feature_map_count,
            output_feature_map_count,
            feature_map_connection_count,
            left_zero_padding,
            right_zero_padding,
        };
        layer.check_consistency()?;
        Ok(layer)
    }

    /// 以稀疏比例创建：连接数 = `floor(in × out × ratio)`
    pub fn with_sparsity_ratio(
        window_sizes: &[usize],
        input_feature_map_count: usize,
        output_feature_map_count: usize,
        feature_map_connection_sparsity_ratio: f32,
        left_zero_padding: &[usize],
        right_zero_padding: &[usize],
    ) -> Result<Self, LayerError> {
        if !(feature_map_connection_sparsity_ratio.is_finite()
            && feature_map_connection_sparsity_ratio >= 0.0)
        {
            return Err(LayerError::ValidationError(format!(
                "稀疏比例{feature_map_connection_sparsity_ratio}须为非负有限数"
            )));
        }
        let dense_count =
            Self::dense_connection_count(input_feature_map_count, output_feature_map_count)?;
        let feature_map_connection_count =
            (dense_count as f64 * f64::from(feature_map_connection_sparsity_ratio)) as usize;

        Self::new(
            window_sizes,
            input_feature_map_count,
            output_feature_map_count,
            feature_map_connection_count,
            left_zero_padding,
            right_zero_padding,
        )
    }

    /// 全连接时的连接数`in × out`，溢出即视为参数不合法
    fn dense_connection_count(
        input_feature_map_count: usize,
        output_feature_map_count: usize,
    ) -> Result<usize, LayerError> {
        input_feature_map_count
            .checked_mul(output_feature_map_count)
            .ok_or_else(|| {
                LayerError::ValidationError(format!(
                    "特征图数过大：{input_feature_map_count} × {output_feature_map_count}溢出"
                ))
            })
    }

    fn padding_or_zeros(
        padding: &[usize],
        dimension_count: usize,
        side: &str,
    ) -> Result<Vec<usize>, LayerError> {
        if padding.is_empty() {
            Ok(vec![0; dimension_count])
        } else if padding.len() != dimension_count {
            Err(LayerError::ValidationError(format!(
                "{side}零填充的维数{}与窗口维数{dimension_count}不一致",
                padding.len()
            )))
        } else {
            Ok(padding.to_vec())
        }
    }

    fn check_consistency(&self) -> Result<(), LayerError> {
        if self.window_sizes.is_empty() {
            return Err(LayerError::ValidationError(
                "稀疏卷积层的窗口尺寸不能为空".to_string(),
            ));
        }
        if let Some(dimension) = self.window_sizes.iter().position(|&size| size == 0) {
            return Err(LayerError::ValidationError(format!(
                "稀疏卷积层第{dimension}维的窗口尺寸不能为0"
            )));
        }

        let count = self.feature_map_connection_count;
        if count < self.input_feature_map_count {
            return Err(LayerError::comparison(
                "feature_map_connection_count",
                count,
                ComparisonOperator::GreaterOrEqual,
                self.input_feature_map_count,
            ));
        }
        if count < self.output_feature_map_count {
            return Err(LayerError::comparison(
                "feature_map_connection_count",
                count,
                ComparisonOperator::GreaterOrEqual,
                self.output_feature_map_count,
            ));
        }
        let dense_count = Self::dense_connection_count(
            self.input_feature_map_count,
            self.output_feature_map_count,
        )?;
        if count > dense_count {
            return Err(LayerError::comparison(
                "feature_map_connection_count",
                count,
                ComparisonOperator::LessOrEqual,
                dense_count,
            ));
        }

        // 权重总数及其算力（×2）须能用 usize 表示，之后的 window_volume 等才可直接相乘
        let window_volume = self
            .window_sizes
            .iter()
            .try_fold(1usize, |acc, &size| acc.checked_mul(size))
            .ok_or_else(|| {
                LayerError::ValidationError(format!("窗口尺寸{:?}之积溢出", self.window_sizes))
            })?;
        if window_volume
            .checked_mul(count)
            .and_then(|weight_count| weight_count.checked_mul(2))
            .is_none()
        {
            return Err(LayerError::ValidationError(format!(
                "权重数过大：窗口体积{window_volume} × 连接数{count}溢出"
            )));
        }

        for (side, padding) in [
            ("left_zero_padding", &self.left_zero_padding),
            ("right_zero_padding", &self.right_zero_padding),
        ] {
            if padding.len() != self.window_sizes.len() {
                return Err(LayerError::ValidationError(format!(
                    "{side}的维数{}与窗口维数{}不一致",
                    padding.len(),
                    self.window_sizes.len()
                )));
            }
            for (dimension, (&pad, &window_size)) in
                padding.iter().zip(&self.window_sizes).enumerate()
            {
                if pad >= window_size {
                    return Err(LayerError::comparison(
                        &format!("{side}[{dimension}]"),
                        pad,
                        ComparisonOperator::LessThan,
                        window_size,
                    ));
                }
            }
        }

        Ok(())
    }

    /* ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓ 访问器 ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓ */

    pub fn window_sizes(&self) -> &[usize] {
        &self.window_sizes
    }

    pub fn input_feature_map_count(&self) -> usize {
        self.input_feature_map_count
    }

    pub fn output_feature_map_count(&self) -> usize {
        self.output_feature_map_count
    }

    pub fn feature_map_connection_count(&self) -> usize {
        self.feature_map_connection_count
    }

    pub fn left_zero_padding(&self) -> &[usize] {
        &self.left_zero_padding
    }

    pub fn right_zero_padding(&self) -> &[usize] {
        &self.right_zero_padding
    }

    pub fn dimension_count(&self) -> usize {
        self.window_sizes.len()
    }

    /// 窗口体积（各维窗口尺寸之积）
    pub fn window_volume(&self) -> usize {
        self.window_sizes.iter().product()
    }

    /* ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑ 访问器 ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑ */

    /// 层数据各部分的元素个数：`[权重数, 偏置数]`
    pub fn data_config(&self) -> [usize; 2] {
        [
            self.feature_map_connection_count * self.window_volume(),
            self.output_feature_map_count,
        ]
    }

    /// 连接图各数组的长度：`[列下标数, 行偏移数]`
    pub fn data_custom_config(&self) -> [usize; 2] {
        [
            self.feature_map_connection_count,
            self.output_feature_map_count + 1,
        ]
    }

    /// 层数据各部分的`(块数, 每块的形状)`：
    /// 权重为`连接数`个窗口形状的块，偏置为`输出特征图数`个标量
    pub fn data_configuration_list(&self) -> [(usize, Vec<usize>); 2] {
        [
            (self.feature_map_connection_count, self.window_sizes.clone()),
            (self.output_feature_map_count, Vec::new()),
        ]
    }

    /// 参与权重衰减的数据部分（只有权重，偏置不衰减）
    pub fn weight_decay_part_ids(&self) -> BTreeSet<usize> {
        BTreeSet::from([0])
    }

    /// 只生成连接图
    pub fn randomize_connectivity<R: rand::Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<ConnectivityGraph, LayerError> {
        ConnectivityGraph::generate(
            self.input_feature_map_count,
            self.output_feature_map_count,
            self.feature_map_connection_count,
            rng,
        )
    }

    /// 依据已有连接图初始化权重
    pub fn randomize_weights<R: rand::Rng + ?Sized>(
        &self,
        connectivity: &ConnectivityGraph,
        rng: &mut R,
    ) -> Result<LayerWeights, LayerError> {
        LayerWeights::truncated_normal(connectivity, self.window_volume(), rng)
    }

    fn check_dimension_count(&self, got: usize) -> Result<(), LayerError> {
        if got != self.dimension_count() {
            return Err(LayerError::ConfigMismatch {
                what: "维数",
                expected: self.dimension_count(),
                got,
            });
        }
        Ok(())
    }

    fn check_feature_map_count(&self, got: Option<usize>) -> Result<(), LayerError> {
        match got {
            Some(got) if got != self.input_feature_map_count => Err(LayerError::ConfigMismatch {
                what: "输入特征图数",
                expected: self.input_feature_map_count,
                got,
            }),
            _ => Ok(()),
        }
    }
}

impl LayerSpec for SparseConvolutionLayer {
    fn uuid(&self) -> &'static LayerUuid {
        &SPARSE_CONVOLUTION_UUID
    }

    fn type_name(&self) -> &'static str {
        "SparseConvolution"
    }

    fn get_layer_configuration(
        &self,
        input_configuration: &LayerConfiguration,
    ) -> Result<LayerConfiguration, LayerError> {
        self.check_feature_map_count(input_configuration.feature_map_count)?;
        if let Some(dimension_count) = input_configuration.dimension_count {
            self.check_dimension_count(dimension_count)?;
        }
        Ok(LayerConfiguration::new(
            self.output_feature_map_count,
            self.dimension_count(),
        ))
    }

    fn get_output_shape(&self, input_shape: &LayerShape) -> Result<LayerShape, LayerError> {
        self.check_feature_map_count(input_shape.feature_map_count)?;
        self.check_dimension_count(input_shape.dimension_count())?;

        let dimension_sizes = input_shape
            .dimension_sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| {
                let total = size + self.left_zero_padding[i] + self.right_zero_padding[i];
                if total < self.window_sizes[i] {
                    return Err(LayerError::GeometryError {
                        dimension: i,
                        total,
                        window_size: self.window_sizes[i],
                    });
                }
                Ok(total - self.window_sizes[i] + 1)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LayerShape::new(
            self.output_feature_map_count,
            &dimension_sizes,
        ))
    }

    fn get_input_region(&self, output_region: &[Region]) -> Result<Vec<Region>, LayerError> {
        self.check_dimension_count(output_region.len())?;

        Ok(output_region
            .iter()
            .enumerate()
            .map(|(i, region)| {
                let left = self.left_zero_padding[i];
                Region::new(
                    region.start.saturating_sub(left),
                    region.end + self.window_sizes[i] - 1 - left,
                )
            })
            .collect())
    }

    fn write(&self, writer: &mut dyn Write) -> Result<(), LayerError> {
        self.write_params(writer)
    }

    fn estimate_cost(&self, input_shape: &LayerShape) -> Result<LayerCost, LayerError> {
        let output_shape = self.get_output_shape(input_shape)?;
        // 全部输出神经元（各输出特征图之和）
        let output_neuron_count = output_shape
            .dimension_sizes
            .iter()
            .try_fold(self.output_feature_map_count, |acc, &size| acc.checked_mul(size))
            .ok_or_else(|| {
                LayerError::ValidationError(format!(
                    "输出形状{:?}的神经元数溢出",
                    output_shape.dimension_sizes
                ))
            })?;
        Ok(LayerCost::sparse_convolution(
            output_neuron_count,
            self.feature_map_connection_count,
            self.window_volume(),
        ))
    }

    fn randomize_data(&self, rng: &mut dyn RngCore) -> Result<LayerData, LayerError> {
        let connectivity = self.randomize_connectivity(rng)?;
        let weights = self.randomize_weights(&connectivity, rng)?;
        Ok(LayerData::new(connectivity, weights))
    }

    fn check_data(&self, data: &LayerData) -> Result<(), LayerError> {
        let graph = &data.connectivity;
        if graph.columns().len() != self.data_custom_config()[0]
            || graph.row_offsets().len() != self.data_custom_config()[1]
        {
            return Err(LayerError::ValidationError(format!(
                "连接图尺寸[{}, {}]与层参数{:?}不符",
                graph.columns().len(),
                graph.row_offsets().len(),
                self.data_custom_config()
            )));
        }
        graph.check(self.input_feature_map_count)?;

        let weights = &data.weights;
        if [weights.weight_count(), weights.bias_count()] != self.data_config()
            || weights.window_volume() != self.window_volume()
        {
            return Err(LayerError::ValidationError(format!(
                "权重尺寸[{}, {}]与层参数{:?}不符",
                weights.weight_count(),
                weights.bias_count(),
                self.data_config()
            )));
        }
        Ok(())
    }

    fn summary(&self) -> LayerSummary {
        LayerSummary {
            layer_type: self.type_name().to_string(),
            uuid: format_uuid(self.uuid()),
            window_sizes: self.window_sizes.clone(),
            input_feature_map_count: self.input_feature_map_count,
            output_feature_map_count: self.output_feature_map_count,
            feature_map_connection_count: self.feature_map_connection_count,
            left_zero_padding: self.left_zero_padding.clone(),
            right_zero_padding: self.right_zero_padding.clone(),
            weight_count: self.data_config()[0],
            bias_count: self.data_config()[1],
        }
    }
}
