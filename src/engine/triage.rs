// ==========================================
// Repair Queens - 低库存分级引擎
// ==========================================
// 红线: 紧急等级是"等级制",不是评分制; 永远实时推导,不落库
// ==========================================
// 职责: 等级判定 + 筛选 + 排序 + 汇总指标 + 补货建议
// 输入: 已加载到内存的配件列表
// 输出: 纯内存结构（不做 I/O，不会失败）
// ==========================================

use crate::domain::part::Part;
use crate::domain::types::{SortKey, UrgencyTier};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::instrument;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 缺货时的补货倍数
const CRITICAL_RESTOCK_MULTIPLIER: i64 = 2;
/// 非缺货时在补足缺口之外额外增加的缓冲数量
const RESTOCK_BUFFER_UNITS: i64 = 5;

// ==========================================
// 筛选条件
// ==========================================

/// 紧急等级筛选: "all" 或某个等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UrgencyFilter {
    #[default]
    All,
    Tier(UrgencyTier),
}

impl UrgencyFilter {
    /// 从界面取值解析; 无法识别的值按 "all" 处理
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "all" => UrgencyFilter::All,
            other => other
                .parse::<UrgencyTier>()
                .map(UrgencyFilter::Tier)
                .unwrap_or(UrgencyFilter::All),
        }
    }
}

/// 分类筛选: "all" 或精确匹配某个分类
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        match value {
            "" | "all" => CategoryFilter::All,
            other => CategoryFilter::Exact(other.to_string()),
        }
    }
}

/// 低库存视图的筛选/排序条件（由界面层组装后按值传入）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub urgency: UrgencyFilter,
    pub category: CategoryFilter,
    pub sort: Option<SortKey>,
}

impl FilterCriteria {
    /// 从界面原始字符串构建（未知排序键 → 不排序）
    pub fn from_raw(urgency: &str, category: &str, sort: &str) -> Self {
        Self {
            urgency: UrgencyFilter::parse(urgency),
            category: CategoryFilter::parse(category),
            sort: SortKey::parse(sort),
        }
    }
}

// ==========================================
// 汇总指标
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageSummary {
    pub critical_count: usize,
    pub low_stock_count: usize,
    /// 缺货配件的潜在损失: Σ price × minimumStockLevel（RON）
    pub lost_value: f64,
}

// ==========================================
// TriageEngine - 低库存分级引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct TriageEngine;

impl TriageEngine {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 等级判定
    // ==========================================

    /// 判定紧急等级（全函数，仅依赖两个库存字段）
    ///
    /// 规则（顺序执行，命中即返回）:
    /// 1) stockQuantity == 0 → critical（与 minimumStockLevel 无关，包括 0）
    /// 2) stockQuantity ≤ floor(minimumStockLevel / 2) → high
    /// 3) 其他 → medium
    ///
    /// 前置条件: 调用方传入的是"低于最低库存"的配件集合;
    /// 库存充足的配件请使用 `assess`
    pub fn classify(&self, part: &Part) -> UrgencyTier {
        if part.stock_quantity == 0 {
            return UrgencyTier::Critical;
        }
        if part.stock_quantity <= part.minimum_stock_level / 2 {
            return UrgencyTier::High;
        }
        UrgencyTier::Medium
    }

    /// 带上界保护的判定: 不需要补货的配件返回 None
    pub fn assess(&self, part: &Part) -> Option<UrgencyTier> {
        if part.needs_restock() {
            Some(self.classify(part))
        } else {
            None
        }
    }

    /// 预筛选: 仅保留需要补货的配件（保持原顺序）
    pub fn low_stock_parts<'a>(&self, parts: &'a [Part]) -> Vec<&'a Part> {
        parts.iter().filter(|p| p.needs_restock()).collect()
    }

    // ==========================================
    // 筛选 / 排序
    // ==========================================

    /// 按紧急等级与分类筛选（两个条件 AND 组合，与应用顺序无关）
    #[instrument(skip(self, parts), fields(count = parts.len()))]
    pub fn filter<'a>(
        &self,
        parts: &'a [Part],
        urgency: &UrgencyFilter,
        category: &CategoryFilter,
    ) -> Vec<&'a Part> {
        parts
            .iter()
            .filter(|p| self.matches_urgency(p, urgency))
            .filter(|p| Self::matches_category(p, category))
            .collect()
    }

    fn matches_urgency(&self, part: &Part, filter: &UrgencyFilter) -> bool {
        match filter {
            UrgencyFilter::All => true,
            UrgencyFilter::Tier(tier) => self.classify(part) == *tier,
        }
    }

    fn matches_category(part: &Part, filter: &CategoryFilter) -> bool {
        match filter {
            CategoryFilter::All => true,
            CategoryFilter::Exact(category) => part.category == *category,
        }
    }

    /// 按排序键排序（稳定排序）
    ///
    /// - urgency: critical < high < medium
    /// - name: 不区分大小写的字典序升序
    /// - stockQuantity: 升序
    /// - price: 降序（高价在前）
    pub fn sort(&self, parts: &mut [&Part], key: SortKey) {
        match key {
            SortKey::Urgency => parts.sort_by_key(|p| self.classify(p).severity_rank()),
            SortKey::Name => parts.sort_by(|a, b| compare_names(&a.name, &b.name)),
            SortKey::StockQuantity => parts.sort_by_key(|p| p.stock_quantity),
            SortKey::Price => parts.sort_by(|a, b| b.price.total_cmp(&a.price)),
        }
    }

    /// 按界面原始排序键排序; 未知键保持原顺序
    pub fn sort_by_raw_key(&self, parts: &mut [&Part], key: &str) {
        if let Some(key) = SortKey::parse(key) {
            self.sort(parts, key);
        }
    }

    /// 筛选 + 排序一次完成
    pub fn apply<'a>(&self, parts: &'a [Part], criteria: &FilterCriteria) -> Vec<&'a Part> {
        let mut view = self.filter(parts, &criteria.urgency, &criteria.category);
        if let Some(key) = criteria.sort {
            self.sort(&mut view, key);
        }
        view
    }

    // ==========================================
    // 汇总与补货建议
    // ==========================================

    /// 汇总指标; 空输入返回全 0
    #[instrument(skip(self, parts), fields(count = parts.len()))]
    pub fn summarize(&self, parts: &[Part]) -> TriageSummary {
        parts.iter().fold(TriageSummary::default(), |mut acc, part| {
            if part.stock_quantity == 0 {
                acc.critical_count += 1;
                acc.lost_value += part.price * f64::from(part.minimum_stock_level);
            } else if part.stock_quantity <= part.minimum_stock_level {
                acc.low_stock_count += 1;
            }
            acc
        })
    }

    /// 建议补货数量（≥ 1）
    ///
    /// - 缺货: minimumStockLevel × 2
    /// - 其他: minimumStockLevel − stockQuantity + 5
    pub fn suggest_restock_quantity(&self, part: &Part) -> u32 {
        let stock = i64::from(part.stock_quantity);
        let minimum = i64::from(part.minimum_stock_level);

        let suggested = if stock == 0 {
            minimum * CRITICAL_RESTOCK_MULTIPLIER
        } else {
            minimum - stock + RESTOCK_BUFFER_UNITS
        };

        u32::try_from(suggested.max(1)).unwrap_or(u32::MAX)
    }
}

/// 排序键: 分解后去掉变音符号并转小写（Ș → s, Ă → a）
fn name_sort_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// 名称比较: 先按去变音符号的小写形式，再按小写原文，最后按原文
fn compare_names(a: &str, b: &str) -> Ordering {
    name_sort_key(a)
        .cmp(&name_sort_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

// ==========================================
// LowStockBoard - 低库存看板状态
// ==========================================
// 当前加载的配件集合由看板对象显式持有，引擎函数按参数接收
#[derive(Debug, Clone, Default)]
pub struct LowStockBoard {
    engine: TriageEngine,
    parts: Vec<Part>,
}

impl LowStockBoard {
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            engine: TriageEngine::new(),
            parts,
        }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// 替换当前配件集合（重新加载后调用）
    pub fn replace(&mut self, parts: Vec<Part>) {
        self.parts = parts;
    }

    /// 本地更新单个配件库存（库存调整成功后调用）
    pub fn update_stock(&mut self, part_id: &str, stock_quantity: u32) -> bool {
        match self.parts.iter_mut().find(|p| p.id == part_id) {
            Some(part) => {
                part.stock_quantity = stock_quantity;
                true
            }
            None => false,
        }
    }

    /// 看板视图: 只展示需要补货的配件，再按条件筛选、排序
    pub fn view(&self, criteria: &FilterCriteria) -> Vec<&Part> {
        let mut view: Vec<&Part> = self
            .engine
            .low_stock_parts(&self.parts)
            .into_iter()
            .filter(|p| self.engine.matches_urgency(p, &criteria.urgency))
            .filter(|p| TriageEngine::matches_category(p, &criteria.category))
            .collect();
        if let Some(key) = criteria.sort {
            self.engine.sort(&mut view, key);
        }
        view
    }

    pub fn summary(&self) -> TriageSummary {
        self.engine.summarize(&self.parts)
    }

    /// 看板中出现过的分类（去重、排序），用于分类下拉框
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .parts
            .iter()
            .map(|p| p.category.clone())
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    pub fn engine(&self) -> &TriageEngine {
        &self.engine
    }
}
