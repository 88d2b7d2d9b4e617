// ==========================================
// Repair Queens - 预约日历网格
// ==========================================
// 职责: 生成月视图网格（周一起始），标记不可预约日期
// 规则: 过去的日期、周六、周日不可预约
// ==========================================

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// 一周天数
const DAYS_PER_WEEK: usize = 7;

/// 日历中的一天
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub selectable: bool,
    pub is_today: bool,
}

/// 月视图网格: 每行 7 格，空格为 None（月初偏移/月末补齐）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[Option<DayCell>; DAYS_PER_WEEK]>,
}

impl MonthGrid {
    /// 下一个月的 (year, month)
    pub fn next_month(&self) -> (i32, u32) {
        if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        }
    }

    /// 上一个月的 (year, month)
    pub fn prev_month(&self) -> (i32, u32) {
        if self.month == 1 {
            (self.year - 1, 12)
        } else {
            (self.year, self.month - 1)
        }
    }

    /// 所有可预约日期
    pub fn selectable_days(&self) -> Vec<NaiveDate> {
        self.weeks
            .iter()
            .flat_map(|week| week.iter().flatten())
            .filter(|cell| cell.selectable)
            .map(|cell| cell.date)
            .collect()
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from((next_first - first).num_days()).ok()
}

/// 生成月视图网格
///
/// # 返回
/// - None: 月份非法
pub fn build_month_grid(year: i32, month: u32, today: NaiveDate) -> Option<MonthGrid> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let total_days = days_in_month(year, month)?;
    let offset = first.weekday().num_days_from_monday() as usize;

    let mut cells: Vec<Option<DayCell>> = vec![None; offset];
    for day in 1..=total_days {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        cells.push(Some(DayCell {
            date,
            selectable: date >= today && !is_weekend(date),
            is_today: date == today,
        }));
    }
    while cells.len() % DAYS_PER_WEEK != 0 {
        cells.push(None);
    }

    let weeks = cells
        .chunks(DAYS_PER_WEEK)
        .map(|chunk| {
            let mut week = [None; DAYS_PER_WEEK];
            week.copy_from_slice(chunk);
            week
        })
        .collect();

    Some(MonthGrid { year, month, weeks })
}
