/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : 层参数二进制读写测试（含旧版格式）
 */

use std::io::Cursor;

use super::scenario_layer;
use crate::errors::LayerError;
use crate::nn::{
    Layer, LayerSpec, SPARSE_CONVOLUTION_UUID, SPARSE_CONVOLUTION_UUID_V1, SparseConvolutionLayer,
};

fn u32_bytes(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

#[test]
fn test_save_load_round_trip() {
    let layer: Layer =
        SparseConvolutionLayer::new(&[3, 5, 2], 6, 4, 10, &[1, 2, 0], &[2, 4, 1])
            .unwrap()
            .into();

    let mut buffer = Vec::new();
    layer.save(&mut buffer).expect("写出层失败");
    // 16字节格式标识 + 4个计数 + 3×3个数组元素
    assert_eq!(buffer.len(), 16 + 4 * (4 + 3 * 3));
    assert_eq!(&buffer[..16], &SPARSE_CONVOLUTION_UUID);

    let loaded = Layer::load(&mut Cursor::new(&buffer)).expect("读取层失败");
    assert_eq!(loaded, layer);

    let Layer::SparseConvolution(loaded) = loaded;
    assert_eq!(loaded.window_sizes(), &[3, 5, 2]);
    assert_eq!(loaded.input_feature_map_count(), 6);
    assert_eq!(loaded.output_feature_map_count(), 4);
    assert_eq!(loaded.feature_map_connection_count(), 10);
    assert_eq!(loaded.left_zero_padding(), &[1, 2, 0]);
    assert_eq!(loaded.right_zero_padding(), &[2, 4, 1]);
}

/// 写出字段顺序与字节序
#[test]
fn test_write_layout() {
    let layer = SparseConvolutionLayer::new(&[3, 2], 4, 2, 6, &[1, 0], &[2, 1]).unwrap();
    let mut buffer = Vec::new();
    layer.write(&mut buffer).unwrap();

    assert_eq!(buffer, u32_bytes(&[4, 2, 6, 2, 3, 2, 1, 0, 2, 1]));
}

/// 旧版格式没有填充字段，读出的填充全为0，且不多读后续字节
#[test]
fn test_load_legacy() {
    let mut bytes = SPARSE_CONVOLUTION_UUID_V1.to_vec();
    bytes.extend(u32_bytes(&[4, 2, 6, 2, 3, 3]));
    bytes.extend(u32_bytes(&[0xDEAD_BEEF]));

    let mut cursor = Cursor::new(&bytes);
    let Layer::SparseConvolution(layer) = Layer::load(&mut cursor).expect("读取旧版层失败");

    assert_eq!(layer, scenario_layer());
    assert_eq!(layer.left_zero_padding(), &[0, 0]);
    assert_eq!(layer.right_zero_padding(), &[0, 0]);
    assert_eq!(cursor.position() as usize, bytes.len() - 4);

    // 再次写出时一律使用当前格式
    let mut buffer = Vec::new();
    Layer::from(layer).save(&mut buffer).unwrap();
    assert_eq!(&buffer[..16], &SPARSE_CONVOLUTION_UUID);
    assert_eq!(buffer.len(), 16 + 4 * (4 + 2 * 3));
}

#[test]
fn test_read_with_explicit_uuid() {
    let body = u32_bytes(&[4, 2, 6, 1, 3, 1, 2]);
    let layer =
        SparseConvolutionLayer::read(&mut Cursor::new(&body), &SPARSE_CONVOLUTION_UUID).unwrap();
    assert_eq!(layer.window_sizes(), &[3]);
    assert_eq!(layer.left_zero_padding(), &[1]);
    assert_eq!(layer.right_zero_padding(), &[2]);
}

/// 截断在任意位置都报 CorruptStream
#[test]
fn test_load_truncated() {
    let mut buffer = Vec::new();
    Layer::from(scenario_layer()).save(&mut buffer).unwrap();

    for len in 0..buffer.len() {
        let err = Layer::load(&mut Cursor::new(&buffer[..len])).unwrap_err();
        assert!(
            matches!(err, LayerError::CorruptStream(_)),
            "长度{len}: 应返回 CorruptStream，实际为 {err:?}"
        );
    }
}

#[test]
fn test_load_unknown_uuid() {
    let mut bytes = vec![0u8; 16];
    bytes.extend(u32_bytes(&[4, 2, 6, 2, 3, 3, 0, 0, 0, 0]));
    assert!(matches!(
        Layer::load(&mut Cursor::new(&bytes)),
        Err(LayerError::CorruptStream(_))
    ));
}

/// 流中的参数不合法时，读出后的校验会拒绝它
#[test]
fn test_load_invalid_parameters() {
    let mut bytes = SPARSE_CONVOLUTION_UUID.to_vec();
    // 连接数 9 > 4×2
    bytes.extend(u32_bytes(&[4, 2, 9, 2, 3, 3, 0, 0, 0, 0]));
    assert!(matches!(
        Layer::load(&mut Cursor::new(&bytes)),
        Err(LayerError::ValidationError(_))
    ));

    let mut bytes = SPARSE_CONVOLUTION_UUID.to_vec();
    // 左填充等于窗口尺寸
    bytes.extend(u32_bytes(&[4, 2, 6, 2, 3, 3, 3, 0, 0, 0]));
    assert!(matches!(
        Layer::load(&mut Cursor::new(&bytes)),
        Err(LayerError::ValidationError(_))
    ));
}
