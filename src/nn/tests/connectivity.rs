/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 稀疏连接图随机生成测试
 */

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::errors::LayerError;
use crate::nn::ConnectivityGraph;

/// (输入特征图数, 输出特征图数, 连接数)
const CASES: &[(usize, usize, usize)] = &[
    (4, 2, 6),
    (3, 5, 7),
    (1, 1, 1),
    (6, 6, 6),
    (6, 6, 36),
    (10, 3, 12),
    (2, 7, 7),
    (7, 2, 13),
    (16, 16, 100),
];

fn assert_graph_valid(graph: &ConnectivityGraph, input_count: usize, output_count: usize, count: usize) {
    let case = format!("(in={input_count}, out={output_count}, count={count})");

    assert_eq!(graph.connection_count(), count, "{case}: 连接总数不符");
    assert_eq!(graph.output_feature_map_count(), output_count, "{case}");
    assert_eq!(graph.row_offsets().len(), output_count + 1, "{case}");
    assert_eq!(graph.row_offsets()[0], 0, "{case}");
    assert_eq!(graph.row_offsets()[output_count], count, "{case}");

    let mut degree_sum = 0;
    let mut pairs = BTreeSet::new();
    let mut used_inputs = BTreeSet::new();
    for output_id in 0..output_count {
        let inputs = graph.inputs_of(output_id);
        assert!(
            inputs.windows(2).all(|w| w[0] < w[1]),
            "{case}: 输出{output_id}的输入未严格递增: {inputs:?}"
        );
        assert!(!inputs.is_empty(), "{case}: 输出{output_id}没有任何连接");
        for &input_id in inputs {
            assert!(input_id < input_count, "{case}");
            assert!(pairs.insert((input_id, output_id)), "{case}: 重复连接");
            used_inputs.insert(input_id);
        }
        degree_sum += graph.degree(output_id);
    }
    assert_eq!(degree_sum, count, "{case}: 各输出连接数之和不符");
    assert_eq!(used_inputs.len(), input_count, "{case}: 有输入特征图未被连接");
    assert!(graph.check(input_count).is_ok(), "{case}");
}

/// 多个种子下的结构性质
#[test]
fn test_generate_invariants_across_seeds() {
    for &(input_count, output_count, count) in CASES {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let graph = ConnectivityGraph::generate(input_count, output_count, count, &mut rng)
                .expect("生成连接图失败");
            assert_graph_valid(&graph, input_count, output_count, count);
        }
    }
}

/// 连接数等于全连接时，每对输入/输出恰好连接一次
#[test]
fn test_generate_dense() {
    let (input_count, output_count) = (3, 4);
    let mut rng = StdRng::seed_from_u64(7);
    let graph =
        ConnectivityGraph::generate(input_count, output_count, input_count * output_count, &mut rng)
            .unwrap();

    for output_id in 0..output_count {
        assert_eq!(graph.inputs_of(output_id), &[0, 1, 2]);
        for input_id in 0..input_count {
            assert!(graph.contains(input_id, output_id));
        }
    }
}

/// 同一种子得到同一连接图
#[test]
fn test_generate_reproducible() {
    let first = ConnectivityGraph::generate(10, 3, 12, &mut StdRng::seed_from_u64(42)).unwrap();
    let second = ConnectivityGraph::generate(10, 3, 12, &mut StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(first, second);
}

/// 连接数等于 max(in, out) 时，轮转使各输出的连接数尽量均匀
#[test]
fn test_generate_round_robin_fairness() {
    let mut rng = StdRng::seed_from_u64(3);
    let graph = ConnectivityGraph::generate(8, 4, 8, &mut rng).unwrap();
    for output_id in 0..4 {
        assert_eq!(graph.degree(output_id), 2);
    }
}

/// 参数违反约束时生成失败而不是死循环或越界
#[test]
fn test_generate_unreachable_state() {
    let mut rng = StdRng::seed_from_u64(0);
    let err = ConnectivityGraph::generate(1, 1, 2, &mut rng).unwrap_err();
    assert!(matches!(err, LayerError::InternalInconsistency(_)));
}

#[test]
fn test_from_parts() {
    let graph = ConnectivityGraph::from_parts(vec![0, 2, 3], vec![0, 3, 1], 4).unwrap();
    assert_eq!(graph.inputs_of(0), &[0, 3]);
    assert_eq!(graph.inputs_of(1), &[1]);
    assert!(graph.contains(3, 0));
    assert!(!graph.contains(1, 0));
    assert!(!graph.contains(0, 5));

    let invalid_cases = [
        (vec![1, 2, 3], vec![0, 1, 2]),    // 不以0开头
        (vec![0, 2, 1], vec![0, 1]),       // 偏移递减
        (vec![0, 1, 2], vec![0, 1, 2]),    // 末项与列数不符
        (vec![0, 2, 3], vec![3, 0, 1]),    // 未升序
        (vec![0, 2, 3], vec![1, 1, 2]),    // 重复连接
        (vec![0, 1, 2], vec![0, 4]),       // 输入下标越界
    ];
    for (row_offsets, columns) in invalid_cases {
        assert!(matches!(
            ConnectivityGraph::from_parts(row_offsets, columns, 4),
            Err(LayerError::ValidationError(_))
        ));
    }
}
