mod connectivity;
mod layer_serialization;

use crate::nn::SparseConvolutionLayer;

/// 常用的测试层：窗口 3×3，4 个输入特征图，2 个输出特征图，6 条连接，无填充
fn scenario_layer() -> SparseConvolutionLayer {
    SparseConvolutionLayer::new(&[3, 3], 4, 2, 6, &[], &[]).expect("创建稀疏卷积层失败")
}
