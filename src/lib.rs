//! # Only Sparse
//!
//! 稀疏连接卷积层（sparse convolution layer）的描述符：
//! 由窗口/填充推导输出几何、校验层参数、在输入与输出特征图之间随机生成满足连接数约束的稀疏连接图、
//! 依据连接图做截断正态初始化、以带版本的二进制格式存取，以及估计各阶段的算力（FLOP）。
//!
//! 随机数发生器一律由调用方持有并以参数传入，不使用任何全局随机状态。
//!

pub mod data;
pub mod errors;
pub mod nn;
