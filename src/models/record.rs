use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::utils::format_currency;

/// 名称缺失时的显示文本
pub const UNKNOWN_LABEL: &str = "Unknown";
/// 案卷号缺失时的显示文本
pub const NO_REF_LABEL: &str = "No ref";
/// 来源页缺失时的显示文本
pub const UNKNOWN_PAGES_LABEL: &str = "?";

/// 债权人记录（提取结果与基准清单共用）
///
/// 已知字段带名称，其余属性原样保存在 `extra` 中。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditorRecord {
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub creditor_name: Option<String>,

    /// 金额，数字或数字字符串；无法解析或为负时视为缺失
    #[serde(
        default,
        deserialize_with = "deserialize_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub summe: Option<f64>,

    /// 案卷号，数字也按文本保存
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub aktenzeichen: Option<String>,

    /// 来源页（1 开始），无效的项被丢弃
    #[serde(
        default,
        deserialize_with = "deserialize_pages",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_pages: Option<Vec<u32>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreditorRecord {
    pub fn display_name(&self) -> &str {
        self.creditor_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_LABEL)
    }

    pub fn reference(&self) -> &str {
        self.aktenzeichen
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(NO_REF_LABEL)
    }

    /// 金额，缺失时为 0
    pub fn amount(&self) -> f64 {
        self.summe.unwrap_or(0.0)
    }

    pub fn amount_label(&self) -> String {
        format_currency(self.amount())
    }

    pub fn source_pages(&self) -> &[u32] {
        self.source_pages.as_deref().unwrap_or(&[])
    }

    /// 例如 `"3, 4"`；没有来源页时为 `"?"`
    pub fn pages_label(&self) -> String {
        let pages = self.source_pages();
        if pages.is_empty() {
            UNKNOWN_PAGES_LABEL.to_string()
        } else {
            join_pages(pages)
        }
    }
}

/// 页码列表拼成 `"1, 2, 5"`
pub fn join_pages(pages: &[u32]) -> String {
    pages
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// 文本字段：字符串原样保留，数字和布尔值转成文本，其它值视为缺失
pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

/// 页码列表：整数、整数值的浮点数和数字字符串都接受，其余项丢弃
fn deserialize_pages<'de, D>(deserializer: D) -> Result<Option<Vec<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(items.iter().filter_map(page_number).collect()),
        _ => None,
    })
}

fn page_number(value: &Value) -> Option<u32> {
    let page = match value {
        Value::Number(number) => match number.as_u64() {
            Some(page) => page,
            None => {
                let page = number.as_f64()?;
                if page.fract() != 0.0 || page < 0.0 || page > f64::from(u32::MAX) {
                    return None;
                }
                page as u64
            }
        },
        Value::String(text) => text.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(page).ok().filter(|page| *page >= 1)
}

// 金额既可能是数字也可能是字符串（"1234.5" / "1.234,50"）
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = Option<f64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or a numeric string")
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(non_negative(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(non_negative(value as f64))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value as f64))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(parse_amount_str(value))
        }

        fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            deserializer.deserialize_any(AmountVisitor)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::SeqAccess<'de>,
        {
            while seq.next_element::<serde::de::IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::MapAccess<'de>,
        {
            while map
                .next_entry::<serde::de::IgnoredAny, serde::de::IgnoredAny>()?
                .is_some()
            {}
            Ok(None)
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

fn non_negative(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// 解析字符串金额，支持 `1234.5`、`1.234,50`、`1,234.50`、带 `€`
///
/// 只有一个 `.` 且后面正好三位数字时按千分位处理（`1.234` 为 1234）。
/// 只有一个 `,` 时总是小数点（`1,234` 为 1.234）。
fn parse_amount_str(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        // 最后出现的分隔符是小数点
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) if cleaned.matches(',').count() > 1 => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        (Some(dot), None) if cleaned.matches('.').count() > 1 || cleaned.len() - dot == 4 => {
            cleaned.replace('.', "")
        }
        _ => cleaned,
    };

    normalized.parse::<f64>().ok().and_then(non_negative)
}
