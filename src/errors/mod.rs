use thiserror::Error;
mod ops;
pub use self::ops::*;

/// 层描述符相关的所有错误
///
/// 除`InternalInconsistency`外，其余错误都只会在构造或反序列化时出现：
/// 一个成功构造的层，其后续的几何推导、连接生成与算力估计都保证自洽。
#[derive(Error, Debug)]
pub enum LayerError {
    /// 调用方给出的形状与层参数不一致
    #[error("配置不匹配：{what}，层中为{expected}，输入为{got}")]
    ConfigMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// 输入（含填充）尺寸小于窗口尺寸
    #[error("第{dimension}维含填充的总尺寸{total}小于窗口尺寸{window_size}")]
    GeometryError {
        dimension: usize,
        total: usize,
        window_size: usize,
    },

    /// 描述符本身不合法
    #[error("层参数不合法：{0}")]
    ValidationError(String),

    /// 稀疏连接随机生成时走到了不应到达的状态（致命错误）
    #[error("随机生成稀疏连接时出现内部错误：{0}")]
    InternalInconsistency(String),

    /// 读取二进制流失败（截断、格式错误等）
    #[error("二进制流损坏：{0}")]
    CorruptStream(String),
}

impl LayerError {
    /// 数值比较类的校验错误，如`feature_map_connection_count(3)须≥4`
    pub fn comparison(
        value_name: &str,
        value: usize,
        operator: ComparisonOperator,
        threshold: usize,
    ) -> Self {
        Self::ValidationError(format!("{value_name}({value})须{operator}{threshold}"))
    }
}

impl From<std::io::Error> for LayerError {
    fn from(e: std::io::Error) -> Self {
        Self::CorruptStream(e.to_string())
    }
}

impl From<bincode::Error> for LayerError {
    fn from(e: bincode::Error) -> Self {
        Self::CorruptStream(e.to_string())
    }
}
