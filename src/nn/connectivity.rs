/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 输入/输出特征图之间的稀疏连接图（CSR 压缩行存储）及其随机生成
 *
 * 行 = 输出特征图，列 = 输入特征图：
 * - row_offsets：长度 out+1，非递减，首项 0，末项为连接总数
 * - columns：长度为连接总数，每个输出特征图所占的片段严格递增（无重复连接）
 */

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::LayerError;

/// 稀疏连接图（CSR）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityGraph {
    row_offsets: Vec<usize>,
    columns: Vec<usize>,
}

impl ConnectivityGraph {
    /// 由 CSR 两个数组构建，并校验其结构
    ///
    /// `input_feature_map_count`用于校验列下标的范围
    pub fn from_parts(
        row_offsets: Vec<usize>,
        columns: Vec<usize>,
        input_feature_map_count: usize,
    ) -> Result<Self, LayerError> {
        let graph = Self {
            row_offsets,
            columns,
        };
        graph.check(input_feature_map_count)?;
        Ok(graph)
    }

    /// 校验 CSR 结构：偏移数组首0、非递减、末项等于列数；每行列下标严格递增且在范围内
    pub fn check(&self, input_feature_map_count: usize) -> Result<(), LayerError> {
        let invalid = |msg: String| Err(LayerError::ValidationError(msg));

        if self.row_offsets.first() != Some(&0) {
            return invalid("连接图的行偏移数组须以0开头".to_string());
        }
        if self.row_offsets.windows(2).any(|w| w[0] > w[1]) {
            return invalid("连接图的行偏移数组须非递减".to_string());
        }
        if self.row_offsets.last() != Some(&self.columns.len()) {
            return invalid(format!(
                "连接图的行偏移末项须等于列数{}",
                self.columns.len()
            ));
        }
        for output_id in 0..self.output_feature_map_count() {
            let inputs = self.inputs_of(output_id);
            if inputs.windows(2).any(|w| w[0] >= w[1]) {
                return invalid(format!("输出特征图{output_id}的输入下标须严格递增"));
            }
            if let Some(&bad) = inputs.iter().find(|&&i| i >= input_feature_map_count) {
                return invalid(format!(
                    "输出特征图{output_id}连接了不存在的输入特征图{bad}（共{input_feature_map_count}个）"
                ));
            }
        }
        Ok(())
    }

    /// 行偏移数组（长度 = 输出特征图数 + 1）
    pub fn row_offsets(&self) -> &[usize] {
        &self.row_offsets
    }

    /// 列下标数组（长度 = 连接总数）
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    pub fn output_feature_map_count(&self) -> usize {
        self.row_offsets.len().saturating_sub(1)
    }

    /// 连接总数
    pub fn connection_count(&self) -> usize {
        self.columns.len()
    }

    /// 与输出特征图`output_id`相连的输入特征图（升序）
    ///
    /// # Panics
    /// `output_id >= output_feature_map_count()`时 panic
    pub fn inputs_of(&self, output_id: usize) -> &[usize] {
        &self.columns[self.row_offsets[output_id]..self.row_offsets[output_id + 1]]
    }

    /// 输出特征图`output_id`所连接的输入特征图数
    ///
    /// # Panics
    /// `output_id >= output_feature_map_count()`时 panic
    pub fn degree(&self, output_id: usize) -> usize {
        self.row_offsets[output_id + 1] - self.row_offsets[output_id]
    }

    pub fn contains(&self, input_id: usize, output_id: usize) -> bool {
        output_id < self.output_feature_map_count()
            && self.inputs_of(output_id).binary_search(&input_id).is_ok()
    }

    /// 随机生成连接图
    ///
    /// 采用循环轮转的输出序列（长度 = 连接数 + 输出特征图数）与可补充的输入池：
    /// 每次从游标处找到第一个尚未消耗、且输入池中仍有未与之相连的输入的输出，
    /// 在这些候选输入中均匀随机选取一个建立连接。输入池耗尽后重新装满全部输入，
    /// 因此同一输入可以再连到别的输出，但绝不会重复连到同一输出。
    ///
    /// 只保证轮转意义上的公平，不保证各输出的连接数相等。
    /// 调用方须保证`max(in, out) ≤ connection_count ≤ in * out`（层构造时已校验）。
    pub fn generate<R: Rng + ?Sized>(
        input_feature_map_count: usize,
        output_feature_map_count: usize,
        connection_count: usize,
        rng: &mut R,
    ) -> Result<Self, LayerError> {
        let mut connected = vec![BTreeSet::new(); output_feature_map_count];

        // 循环排列的输出特征图序列，`None`表示该位置已消耗
        let mut schedule: Vec<Option<usize>> = (0..connection_count + output_feature_map_count)
            .map(|i| Some(i % output_feature_map_count))
            .collect();
        let mut pool = BTreeSet::new();
        let mut cursor = 0;
        let mut candidates = Vec::with_capacity(input_feature_map_count);

        for _ in 0..connection_count {
            if pool.is_empty() {
                pool.extend(0..input_feature_map_count);
            }

            let mut placed = None;
            for slot in cursor..schedule.len() {
                let Some(output_id) = schedule[slot] else {
                    continue;
                };
                let present: &mut BTreeSet<usize> = &mut connected[output_id];
                candidates.clear();
                candidates.extend(pool.difference(present).copied());
                if candidates.is_empty() {
                    continue;
                }

                let index = if candidates.len() > 1 {
                    rng.gen_range(0..candidates.len())
                } else {
                    0
                };
                let input_id = candidates[index];
                present.insert(input_id);
                pool.remove(&input_id);
                placed = Some(slot);
                break;
            }

            let slot = placed.ok_or_else(|| {
                LayerError::InternalInconsistency(format!(
                    "找不到可连接的输出特征图（输入{input_feature_map_count}，输出{output_feature_map_count}，连接{connection_count}）"
                ))
            })?;
            schedule[slot] = None;
            while cursor < schedule.len() && schedule[cursor].is_none() {
                cursor += 1;
            }
        }

        // BTreeSet 本身有序，直接展开即为 CSR
        let mut row_offsets = Vec::with_capacity(output_feature_map_count + 1);
        let mut columns = Vec::with_capacity(connection_count);
        row_offsets.push(0);
        for inputs in &connected {
            columns.extend(inputs.iter().copied());
            row_offsets.push(columns.len());
        }

        let graph = Self {
            row_offsets,
            columns,
        };
        debug!(
            connections = connection_count,
            outputs = output_feature_map_count,
            min_degree = ?(0..output_feature_map_count).map(|k| graph.degree(k)).min(),
            max_degree = ?(0..output_feature_map_count).map(|k| graph.degree(k)).max(),
            "已生成稀疏连接图"
        );
        Ok(graph)
    }
}
