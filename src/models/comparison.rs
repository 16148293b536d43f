use serde::{Deserialize, Serialize};

use crate::models::record::{deserialize_amount, deserialize_text, CreditorRecord, UNKNOWN_LABEL};
use crate::utils::format_currency;

/// 匹配状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Exact,
    Close,
    NameOnly,
    AmountOnly,
    Missing,
    /// 后端返回了未知状态
    #[serde(other)]
    Unknown,
}

impl MatchStatus {
    /// 线上格式的名称
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Exact => "exact",
            MatchStatus::Close => "close",
            MatchStatus::NameOnly => "name_only",
            MatchStatus::AmountOnly => "amount_only",
            MatchStatus::Missing => "missing",
            MatchStatus::Unknown => "unknown",
        }
    }

    /// 显示用的语气：完全匹配 / 部分匹配 / 缺失
    pub fn tone(self) -> StatusTone {
        match self {
            MatchStatus::Exact | MatchStatus::Close => StatusTone::Matched,
            MatchStatus::NameOnly | MatchStatus::AmountOnly => StatusTone::Partial,
            MatchStatus::Missing => StatusTone::Missing,
            MatchStatus::Unknown => StatusTone::Neutral,
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Matched,
    Partial,
    Missing,
    Neutral,
}

/// 一条基准记录与至多一条提取记录的对齐结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub gt_idx: usize,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub gt_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub gt_summe: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub ext_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub ext_summe: Option<f64>,
    pub status: MatchStatus,
}

impl ComparisonRow {
    pub fn ground_truth_name(&self) -> &str {
        self.gt_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// 提取金额，非正数显示为 `—`
    pub fn extracted_amount_label(&self) -> String {
        match self.ext_summe {
            Some(value) if value > 0.0 => format_currency(value),
            _ => "—".to_string(),
        }
    }

    pub fn ground_truth_amount_label(&self) -> String {
        format_currency(self.gt_summe.unwrap_or(0.0))
    }
}

/// 比对汇总
///
/// 所有计数和匹配率原样来自后端，这里不重新计算。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    #[serde(default)]
    pub total_gt: usize,
    #[serde(default)]
    pub total_extracted: usize,
    #[serde(default)]
    pub exact_match: usize,
    #[serde(default)]
    pub close_match: usize,
    #[serde(default)]
    pub name_only: usize,
    #[serde(default)]
    pub amount_only: usize,
    #[serde(default)]
    pub missing: usize,
    #[serde(default)]
    pub extra: usize,
    /// 0–100
    #[serde(default)]
    pub match_rate: f64,
    #[serde(default)]
    pub rows: Vec<ComparisonRow>,
    #[serde(default)]
    pub extra_rows: Vec<CreditorRecord>,
}

impl ComparisonSummary {
    /// 部分匹配卡片：name_only + close_match
    pub fn partial_matches(&self) -> usize {
        self.name_only + self.close_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn statuses_parse_from_snake_case() {
        let statuses: Vec<MatchStatus> = serde_json::from_value(json!([
            "exact", "close", "name_only", "amount_only", "missing", "fuzzy"
        ]))
        .unwrap();
        assert_eq!(
            statuses,
            vec![
                MatchStatus::Exact,
                MatchStatus::Close,
                MatchStatus::NameOnly,
                MatchStatus::AmountOnly,
                MatchStatus::Missing,
                MatchStatus::Unknown,
            ]
        );
    }

    #[test]
    fn missing_row_has_dash_for_extracted_amount() {
        let row: ComparisonRow = serde_json::from_value(json!({
            "gt_idx": 3,
            "gt_name": "Stadtwerke",
            "gt_summe": 88.0,
            "ext_name": null,
            "ext_summe": 0,
            "status": "missing"
        }))
        .unwrap();
        assert_eq!(row.ext_name, None);
        assert_eq!(row.extracted_amount_label(), "—");
        assert_eq!(row.ground_truth_amount_label(), "88,00\u{a0}€");
        assert_eq!(row.status.tone(), StatusTone::Missing);
    }

    #[test]
    fn blank_or_odd_names_fall_back() {
        let row: ComparisonRow = serde_json::from_value(json!({
            "gt_idx": 1,
            "gt_name": "  ",
            "ext_name": 4711,
            "status": "name_only"
        }))
        .unwrap();
        assert_eq!(row.ground_truth_name(), UNKNOWN_LABEL);
        assert_eq!(row.ext_name.as_deref(), Some("4711"));

        let row: ComparisonRow =
            serde_json::from_value(json!({ "gt_idx": 2, "gt_name": ["x"], "status": "exact" }))
                .unwrap();
        assert_eq!(row.ground_truth_name(), UNKNOWN_LABEL);
    }
}
