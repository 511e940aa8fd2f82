//! 数据读取模块
//!
//! 层描述符只需要读取器给出的样本形状；这里另外提供按特征图的统计，
//! 常用于输入归一化。
//!
//! # 主要组件
//!
//! - [`UnsupervisedDataReader`]: 有限、可按轮重启的无标签数据读取器
//! - [`InMemoryDataReader`]: 内存中的读取器
//! - [`FeatureMapDataStat`]: 单个特征图的最小值、最大值、均值与标准差
//! - [`DataError`]: 数据读取错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use only_sparse::data::{InMemoryDataReader, UnsupervisedDataReader};
//!
//! let mut reader = InMemoryDataReader::new(samples, LayerShape::new(3, &[32, 32]))?;
//! for stat in reader.feature_map_stats()? {
//!     println!("{} ± {}", stat.average, stat.std_dev);
//! }
//! ```

pub mod error;
mod reader;
mod stats;


// Re-exports
pub use error::DataError;
pub use reader::{InMemoryDataReader, InputType, UnsupervisedDataReader};
pub use stats::FeatureMapDataStat;
