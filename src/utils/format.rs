//! 金额格式化
//!
//! 后端数据是德国债权人清单，金额按 de-DE 的欧元写法显示：`1.234,56 €`。

/// 千分位与小数点之外，货币符号前是不换行空格
const EURO_SUFFIX: &str = "\u{a0}€";

/// 以 de-DE 欧元格式渲染金额
pub fn format_currency(value: f64) -> String {
    let total_cents = (value.abs() * 100.0).round() as u64;
    let (euros, cents) = (total_cents / 100, total_cents % 100);

    let digits = euros.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && total_cents > 0 { "-" } else { "" };
    format!("{}{},{:02}{}", sign, grouped, cents, EURO_SUFFIX)
}
