// ==========================================
// Repair Queens - 导出领域模型
// ==========================================
// 职责: 导出请求 (ExportRequest) 与导出数据包 (ExportBundle)
// 生命周期: 导出时构建、一次性消费、随后丢弃，不跨调用共享
// ==========================================

use crate::domain::types::{ExportFormat, ResourceType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// 单条导出记录: 字段名 → 标量值（字段顺序保持后端返回顺序）
pub type Record = Map<String, Value>;

// ==========================================
// ExportRequest - 导出请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub resource_types: BTreeSet<ResourceType>,
    pub format: ExportFormat,
}

impl ExportRequest {
    pub fn new<I>(resource_types: I, format: ExportFormat) -> Self
    where
        I: IntoIterator<Item = ResourceType>,
    {
        Self {
            resource_types: resource_types.into_iter().collect(),
            format,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resource_types.is_empty()
    }

    /// 是否走批量接口（选择了多于一种资源）
    pub fn wants_bulk(&self) -> bool {
        self.resource_types.len() > 1
    }
}

// ==========================================
// ExportBundle - 导出数据包
// ==========================================
// 抓取阶段逐步构建，序列化前必须完整物化
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    records: BTreeMap<ResourceType, Vec<Record>>,
}

impl ExportBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: ResourceType, records: Vec<Record>) {
        self.records.insert(resource, records);
    }

    pub fn get(&self, resource: ResourceType) -> Option<&[Record]> {
        self.records.get(&resource).map(|v| v.as_slice())
    }

    pub fn resource_types(&self) -> impl Iterator<Item = ResourceType> + '_ {
        self.records.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, &[Record])> {
        self.records.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 记录总数（跨所有资源类型）
    pub fn total_records(&self) -> usize {
        self.records.values().map(|v| v.len()).sum()
    }
}
