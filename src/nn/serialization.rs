/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : 稀疏卷积层参数的二进制读写
 *
 * 只处理结构参数，不含权重（权重见 layer_data.rs）。
 * 所有整数均为 u32，字节序为本机字节序：
 *
 *   input_feature_map_count
 *   output_feature_map_count
 *   feature_map_connection_count
 *   D（维数）
 *   window_sizes[D]
 *   left_zero_padding[D]    （旧版格式没有）
 *   right_zero_padding[D]   （旧版格式没有）
 *
 * 格式标识（uuid）由 Layer::save/load 读写，这里只根据它决定是否读取填充字段。
 */

use std::io::{Read, Write};

use tracing::debug;

use super::layer::{LayerUuid, SPARSE_CONVOLUTION_UUID_V1, SparseConvolutionLayer};
use crate::errors::LayerError;

fn write_u32<W: Write + ?Sized>(writer: &mut W, value: usize, name: &str) -> Result<(), LayerError> {
    let value = u32::try_from(value).map_err(|_| {
        LayerError::ValidationError(format!("{name}({value})超出u32范围，无法写出"))
    })?;
    writer.write_all(&value.to_ne_bytes())?;
    Ok(())
}

fn read_u32<R: Read + ?Sized>(reader: &mut R, name: &str) -> Result<usize, LayerError> {
    let mut bytes = [0u8; 4];
    reader
        .read_exact(&mut bytes)
        .map_err(|e| LayerError::CorruptStream(format!("读取{name}失败: {e}")))?;
    Ok(u32::from_ne_bytes(bytes) as usize)
}

fn read_u32_array<R: Read + ?Sized>(
    reader: &mut R,
    count: usize,
    name: &str,
) -> Result<Vec<usize>, LayerError> {
    // 维数来自流本身，不按它预分配
    let mut res = Vec::new();
    for _ in 0..count {
        res.push(read_u32(reader, name)?);
    }
    Ok(res)
}

impl SparseConvolutionLayer {
    /// 写出当前版本格式的全部字段
    pub(crate) fn write_params<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LayerError> {
        write_u32(writer, self.input_feature_map_count(), "input_feature_map_count")?;
        write_u32(writer, self.output_feature_map_count(), "output_feature_map_count")?;
        write_u32(
            writer,
            self.feature_map_connection_count(),
            "feature_map_connection_count",
        )?;
        write_u32(writer, self.dimension_count(), "dimension_count")?;
        for &size in self.window_sizes() {
            write_u32(writer, size, "window_sizes")?;
        }
        for &pad in self.left_zero_padding() {
            write_u32(writer, pad, "left_zero_padding")?;
        }
        for &pad in self.right_zero_padding() {
            write_u32(writer, pad, "right_zero_padding")?;
        }

        debug!(
            window_sizes = ?self.window_sizes(),
            connections = self.feature_map_connection_count(),
            "已写出稀疏卷积层参数"
        );
        Ok(())
    }

    /// 按格式标识读取层参数
    ///
    /// 旧版标识的流没有填充字段，此时填充全为0；读取后重新校验全部参数。
    pub fn read<R: Read + ?Sized>(reader: &mut R, uuid: &LayerUuid) -> Result<Self, LayerError> {
        let input_feature_map_count = read_u32(reader, "input_feature_map_count")?;
        let output_feature_map_count = read_u32(reader, "output_feature_map_count")?;
        let feature_map_connection_count = read_u32(reader, "feature_map_connection_count")?;
        let dimension_count = read_u32(reader, "dimension_count")?;
        let window_sizes = read_u32_array(reader, dimension_count, "window_sizes")?;

        let is_legacy = *uuid == SPARSE_CONVOLUTION_UUID_V1;
        let (left_zero_padding, right_zero_padding) = if is_legacy {
            (vec![0; dimension_count], vec![0; dimension_count])
        } else {
            (
                read_u32_array(reader, dimension_count, "left_zero_padding")?,
                read_u32_array(reader, dimension_count, "right_zero_padding")?,
            )
        };

        debug!(
            legacy = is_legacy,
            window_sizes = ?window_sizes,
            "已读取稀疏卷积层参数"
        );
        Self::new(
            &window_sizes,
            input_feature_map_count,
            output_feature_map_count,
            feature_map_connection_count,
            &left_zero_padding,
            &right_zero_padding,
        )
    }
}
