//! 按特征图统计无标签数据

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DataError, InputType, UnsupervisedDataReader};

/// 单个特征图的统计量
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureMapDataStat {
    pub min: f32,
    pub max: f32,
    pub average: f32,
    pub std_dev: f32,
}

impl Default for FeatureMapDataStat {
    fn default() -> Self {
        Self {
            min: f32::MAX,
            max: -f32::MAX,
            average: 0.0,
            std_dev: 0.0,
        }
    }
}

/// 第一遍求最值与均值，第二遍求标准差；累加均用 f64。
/// 结束后读取器停在末尾，调用方需要时自行 reset。
pub(super) fn feature_map_stats<R: UnsupervisedDataReader>(
    reader: &mut R,
) -> Result<Vec<FeatureMapDataStat>, DataError> {
    let input_type = reader.input_type();
    if input_type != InputType::Float {
        return Err(DataError::UnsupportedInputType(input_type));
    }

    reader.reset();
    let entry_count = reader.entry_count();
    let configuration = reader.input_configuration().clone();
    let feature_map_count = configuration.feature_map_count.unwrap_or(0);
    let neurons_per_feature_map = configuration.neuron_count_per_feature_map();
    if entry_count == 0 || neurons_per_feature_map == 0 {
        return Err(DataError::EmptyDataset);
    }

    let mut res = vec![FeatureMapDataStat::default(); feature_map_count];
    let mut input_data = vec![0.0f32; feature_map_count * neurons_per_feature_map];
    let mult = 1.0 / (entry_count as f64 * neurons_per_feature_map as f64);

    let mut sums = vec![0.0f64; feature_map_count];
    while reader.read(&mut input_data)? {
        for ((stat, sum), values) in res
            .iter_mut()
            .zip(sums.iter_mut())
            .zip(input_data.chunks_exact(neurons_per_feature_map))
        {
            for &val in values {
                stat.min = stat.min.min(val);
                stat.max = stat.max.max(val);
                *sum += f64::from(val);
            }
        }
    }
    for (stat, sum) in res.iter_mut().zip(&sums) {
        stat.average = (sum * mult) as f32;
    }

    reader.reset();
    let mut squares = vec![0.0f64; feature_map_count];
    while reader.read(&mut input_data)? {
        for ((stat, square), values) in res
            .iter()
            .zip(squares.iter_mut())
            .zip(input_data.chunks_exact(neurons_per_feature_map))
        {
            for &val in values {
                let diff = val - stat.average;
                *square += f64::from(diff * diff);
            }
        }
    }
    for (stat, square) in res.iter_mut().zip(&squares) {
        stat.std_dev = (square * mult).sqrt() as f32;
    }

    debug!(
        entries = entry_count,
        feature_maps = feature_map_count,
        "已完成特征图统计"
    );
    Ok(res)
}
