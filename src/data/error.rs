//! 数据读取错误类型定义

use thiserror::Error;

use super::InputType;

/// 数据读取相关错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 不支持统计的输入数据类型
    #[error("无法统计输入数据类型为{0:?}的数据")]
    UnsupportedInputType(InputType),

    /// 数据集为空
    #[error("无法统计没有样本的数据")]
    EmptyDataset,

    /// 形状不匹配
    #[error("形状不匹配: 期望 {expected} 个元素, 实际 {got} 个")]
    ShapeMismatch { expected: usize, got: usize },

    /// 数据末尾有不完整的样本
    #[error("数据长度{got}不是单个样本长度{sample_len}的整数倍")]
    PartialSample { sample_len: usize, got: usize },
}
