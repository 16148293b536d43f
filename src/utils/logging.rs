/// 日志工具模块
///
/// 提供日志初始化、运行报告和格式化输出的辅助函数
use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::RunResult;

/// 初始化 tracing 订阅器
///
/// `RUST_LOG` 优先；否则按 `verbose` 选择 debug / info。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 初始化运行报告文件
///
/// # 参数
/// - `log_file_path`: 报告文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\nPipeline run report - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 把一次运行的比对结果追加到报告文件
pub fn append_run_report(log_file_path: &str, result: &RunResult) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    file.write_all(render_run_report(result).as_bytes())?;
    Ok(())
}

/// 渲染报告正文
pub fn render_run_report(result: &RunResult) -> String {
    let comparison = &result.comparison;
    let mut report = format!(
        "Folder: {}\nFinished: {}\nMatch rate: {}%\nExact: {} | Close: {} | Name only: {} | Amount only: {} | Missing: {} | Extra: {}\n",
        result.extraction.folder,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        comparison.match_rate,
        comparison.exact_match,
        comparison.close_match,
        comparison.name_only,
        comparison.amount_only,
        comparison.missing,
        comparison.extra,
    );
    for row in &comparison.rows {
        report.push_str(&format!(
            "  #{:<3} {:<12} {} ({}) -> {} ({})\n",
            row.gt_idx,
            row.status.as_str(),
            row.ground_truth_name(),
            row.ground_truth_amount_label(),
            row.ext_name.as_deref().unwrap_or("—"),
            row.extracted_amount_label(),
        ));
    }
    report.push('\n');
    report
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, api_base_url: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 债权人提取流水线看板");
    info!("🌐 后端地址: {}", api_base_url);
    info!("⏱️ 请求超时: {} 秒", config.request_timeout_secs);
    info!("{}", "=".repeat(60));
}

/// 打印运行完成信息
pub fn print_final_stats(result: &RunResult, log_file_path: &str) {
    let comparison = &result.comparison;
    info!("\n{}", "=".repeat(60));
    info!("📊 文件夹 {} 处理完成", result.extraction.folder);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 匹配率: {}%", comparison.match_rate);
    info!(
        "📄 文档: {} | 提取: {} | 基准: {}",
        result.extraction.documents.len(),
        comparison.total_extracted,
        comparison.total_gt
    );
    info!("❌ 缺失: {}", comparison.missing);
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", log_file_path);
}

/// 截断长文本用于显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
///
/// # 返回
/// 超长时返回截断后追加 `...` 的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("Gläubiger", 4), "Gläu...");
        assert_eq!(truncate_text("kurz", 10), "kurz");
    }
}
