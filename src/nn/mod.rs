/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 负责稀疏连接卷积层的描述、随机化、存取与算力估计
 */

mod config;
mod connectivity;
mod cost;
mod descriptor;
mod init;
pub mod layer;
mod layer_data;
mod serialization;
mod shape;

pub use config::{Connections, SparseConvolutionConfig};
pub use connectivity::ConnectivityGraph;
pub use cost::LayerCost;
pub use descriptor::{LayerSummary, ModelSummary};
pub use init::{LayerWeights, TRUNCATION_STD_COUNT};
pub use layer::{
    Layer, LayerSpec, LayerUuid, SPARSE_CONVOLUTION_UUID, SPARSE_CONVOLUTION_UUID_V1,
    SparseConvolutionLayer,
};
pub use layer_data::LayerData;
pub use shape::{LayerConfiguration, LayerShape, Region};

#[cfg(test)]
mod tests;
