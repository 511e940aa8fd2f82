/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : Layer 模块 - 层类型的统一能力接口与封闭的层类型集合
 *
 * 层类型在模型文件中是固定的，故用 enum_dispatch 做静态分派，
 * 读取时按 128 位格式标识（uuid）选择具体的层类型。
 */

mod sparse_conv;

pub use sparse_conv::{SPARSE_CONVOLUTION_UUID, SPARSE_CONVOLUTION_UUID_V1, SparseConvolutionLayer};

use std::io::{Read, Write};

use enum_dispatch::enum_dispatch;
use rand::RngCore;

use super::{LayerConfiguration, LayerCost, LayerData, LayerShape, LayerSummary, Region};
use crate::errors::LayerError;

/// 128 位格式标识
pub type LayerUuid = [u8; 16];

/// 所有层类型共有的能力
#[enum_dispatch]
pub trait LayerSpec {
    /// 当前版本的格式标识（写出时使用）
    fn uuid(&self) -> &'static LayerUuid;

    /// 层类型名，如"SparseConvolution"
    fn type_name(&self) -> &'static str;

    /// 由尺寸无关的输入配置推导输出配置
    fn get_layer_configuration(
        &self,
        input_configuration: &LayerConfiguration,
    ) -> Result<LayerConfiguration, LayerError>;

    /// 由输入形状推导输出形状
    fn get_output_shape(&self, input_shape: &LayerShape) -> Result<LayerShape, LayerError>;

    /// 由输出区域反推所依赖的输入区域（用于限定预取范围）
    fn get_input_region(&self, output_region: &[Region]) -> Result<Vec<Region>, LayerError>;

    /// 写出层参数（不含格式标识与权重）
    fn write(&self, writer: &mut dyn Write) -> Result<(), LayerError>;

    /// 估计各阶段的浮点运算次数
    fn estimate_cost(&self, input_shape: &LayerShape) -> Result<LayerCost, LayerError>;

    /// 随机生成层数据（连接图 + 权重）
    fn randomize_data(&self, rng: &mut dyn RngCore) -> Result<LayerData, LayerError>;

    /// 校验已有层数据与本层参数是否一致
    fn check_data(&self, data: &LayerData) -> Result<(), LayerError>;

    /// 生成可序列化为 JSON 的层摘要
    fn summary(&self) -> LayerSummary;
}

/// 封闭的层类型集合
#[enum_dispatch(LayerSpec)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer {
    SparseConvolution(SparseConvolutionLayer),
}

impl Layer {
    /// 写出格式标识 + 层参数
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<(), LayerError> {
        writer.write_all(self.uuid())?;
        self.write(writer)
    }

    /// 读取格式标识，并据此读取对应类型的层参数
    pub fn load<R: Read>(reader: &mut R) -> Result<Self, LayerError> {
        let mut uuid: LayerUuid = [0; 16];
        reader.read_exact(&mut uuid)?;

        if uuid == SPARSE_CONVOLUTION_UUID || uuid == SPARSE_CONVOLUTION_UUID_V1 {
            Ok(SparseConvolutionLayer::read(reader, &uuid)?.into())
        } else {
            Err(LayerError::CorruptStream(format!(
                "未知的层格式标识: {}",
                format_uuid(&uuid)
            )))
        }
    }
}

/// 以`XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX`形式显示格式标识
pub fn format_uuid(uuid: &LayerUuid) -> String {
    let hex: String = uuid.iter().map(|b| format!("{b:02X}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
