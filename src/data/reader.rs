/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : 无标签数据读取器
 *
 * 每次 read 把一个展平的样本写入调用方提供的缓冲区，读完返回 false；
 * reset 回到开头，因此读取器是有限且可按轮（epoch）重启的。
 */

use serde::{Deserialize, Serialize};

use super::{DataError, FeatureMapDataStat, stats};
use crate::nn::LayerShape;

/// 样本元素的数据类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputType {
    Byte,
    Float,
}

impl InputType {
    /// 单个元素的字节数
    pub const fn size(&self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Float => 4,
        }
    }
}

/// 无标签数据读取器
pub trait UnsupervisedDataReader {
    /// 读取下一个样本到`buffer`（长度须为`input_configuration().neuron_count()`）。
    /// 返回`false`表示本轮已读完
    fn read(&mut self, buffer: &mut [f32]) -> Result<bool, DataError>;

    /// 回到第一个样本
    fn reset(&mut self);

    /// 样本数
    fn entry_count(&self) -> usize;

    /// 单个样本的形状（特征图数已知）
    fn input_configuration(&self) -> &LayerShape;

    fn input_type(&self) -> InputType;

    /// 单个样本元素的字节数
    fn input_neuron_elem_size(&self) -> usize {
        self.input_type().size()
    }

    /// 开始新的一轮
    fn next_epoch(&mut self) {
        self.reset();
    }

    /// 两遍扫描，统计每个特征图的最小值、最大值、均值与标准差
    fn feature_map_stats(&mut self) -> Result<Vec<FeatureMapDataStat>, DataError>
    where
        Self: Sized,
    {
        stats::feature_map_stats(self)
    }
}

/// 内存中的读取器：所有样本首尾相接地存放在一个`Vec<f32>`里
#[derive(Debug, Clone)]
pub struct InMemoryDataReader {
    data: Vec<f32>,
    input_configuration: LayerShape,
    sample_len: usize,
    entry_count: usize,
    cursor: usize,
}

impl InMemoryDataReader {
    /// # 参数
    /// - `data`: 展平后首尾相接的全部样本
    /// - `input_configuration`: 单个样本的形状，特征图数须已知
    pub fn new(data: Vec<f32>, input_configuration: LayerShape) -> Result<Self, DataError> {
        let sample_len = input_configuration.neuron_count().unwrap_or(0);
        if sample_len == 0 {
            if !data.is_empty() {
                return Err(DataError::ShapeMismatch {
                    expected: 0,
                    got: data.len(),
                });
            }
        } else if data.len() % sample_len != 0 {
            return Err(DataError::PartialSample {
                sample_len,
                got: data.len(),
            });
        }
        let entry_count = if sample_len == 0 {
            0
        } else {
            data.len() / sample_len
        };

        Ok(Self {
            data,
            input_configuration,
            sample_len,
            entry_count,
            cursor: 0,
        })
    }
}

impl UnsupervisedDataReader for InMemoryDataReader {
    fn read(&mut self, buffer: &mut [f32]) -> Result<bool, DataError> {
        if self.cursor >= self.entry_count {
            return Ok(false);
        }
        if buffer.len() != self.sample_len {
            return Err(DataError::ShapeMismatch {
                expected: self.sample_len,
                got: buffer.len(),
            });
        }
        let start = self.cursor * self.sample_len;
        buffer.copy_from_slice(&self.data[start..start + self.sample_len]);
        self.cursor += 1;
        Ok(true)
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }

    fn entry_count(&self) -> usize {
        self.entry_count
    }

    fn input_configuration(&self) -> &LayerShape {
        &self.input_configuration
    }

    fn input_type(&self) -> InputType {
        InputType::Float
    }
}
