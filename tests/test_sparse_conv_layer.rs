/*
 * @Author       : 老董
 * @Date         : 2026-03-09
 * @Description  : 稀疏卷积层端到端流程：配置 -> 构造 -> 几何/算力 -> 随机化 -> 存取
 */

use std::io::Cursor;

use only_sparse::data::{InMemoryDataReader, UnsupervisedDataReader};
use only_sparse::nn::{Layer, LayerData, LayerShape, LayerSpec, SparseConvolutionConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_sparse_conv_layer_pipeline() {
    let config = SparseConvolutionConfig::from_json(
        r#"{
            "window_sizes": [3, 3],
            "input_feature_map_count": 4,
            "output_feature_map_count": 2,
            "connections": { "count": 6 }
        }"#,
    )
    .unwrap();
    let layer: Layer = config.build().unwrap().into();

    // 1. 由读取器提供的样本形状推导输出形状与算力
    let samples: Vec<f32> = (0..3 * 4 * 5 * 5).map(|i| (i % 7) as f32).collect();
    let mut reader = InMemoryDataReader::new(samples, LayerShape::new(4, &[5, 5])).unwrap();
    let input_shape = reader.input_configuration().clone();
    let output_shape = layer.get_output_shape(&input_shape).unwrap();
    assert_eq!(output_shape, LayerShape::new(2, &[3, 3]));

    let cost = layer.estimate_cost(&input_shape).unwrap();
    assert_eq!(cost.forward_flops, 1926.0);

    let stats = reader.feature_map_stats().unwrap();
    assert_eq!(stats.len(), 4);
    assert!(stats.iter().all(|s| s.min >= 0.0 && s.max <= 6.0));

    // 2. 随机化一次，层参数与层数据分别保存
    let mut rng = StdRng::seed_from_u64(2026);
    let data = layer.randomize_data(&mut rng).unwrap();

    let mut layer_bytes = Vec::new();
    layer.save(&mut layer_bytes).unwrap();
    let mut data_bytes = Vec::new();
    data.save(&mut data_bytes).unwrap();

    // 3. 重新加载，不再随机
    let loaded_layer = Layer::load(&mut Cursor::new(&layer_bytes)).unwrap();
    let loaded_data = LayerData::load(&mut Cursor::new(&data_bytes)).unwrap();
    assert_eq!(loaded_layer, layer);
    assert_eq!(loaded_data, data);
    loaded_layer.check_data(&loaded_data).unwrap();

    assert_eq!(loaded_data.weights.weight_count(), 54);
    assert!(loaded_data.weights.biases().iter().all(|&b| b == 0.0));
}
