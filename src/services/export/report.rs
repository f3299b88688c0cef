//! 估值报告导出
//!
//! 生成带标签行的文本报告，图表以收盘价表格代替。
//! 报告先写入临时目录再读回作为下载内容，随后删除临时文件。

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AnalyzerResult;
use crate::models::{format_value, get_market_time, AnalysisReport};

const REPORT_TITLE: &str = "估值报告 - Graham Analyzer B3";

/// 导出的报告文件
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

pub struct ReportExporter {
    temp_dir: PathBuf,
}

fn optional(value: Option<f64>, suffix: &str) -> String {
    value
        .map(|v| format!("{}{}", v, suffix))
        .unwrap_or_else(|| "N/A".to_string())
}

/// 渲染报告正文
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", REPORT_TITLE);
    let _ = writeln!(out, "{}", "=".repeat(REPORT_TITLE.chars().count()));
    let _ = writeln!(out);

    let lines = [
        ("日期", report.date.format("%d/%m/%Y").to_string()),
        ("股票代码", report.ticker.clone()),
        ("公司名称", report.name.clone()),
        ("每股收益 (LPA)", format!("R$ {}", report.earnings_per_share)),
        ("预期增长率", format!("{}%", report.growth_rate)),
        ("基准利率 (SELIC)", format!("{}%", report.reference_rate)),
        ("内在价值", format!("R$ {}", report.intrinsic_value)),
        ("当前价格", format!("R$ {}", report.current_price)),
        ("安全边际", format!("{}%", report.margin_percent)),
        ("市净率 (P/VPA)", optional(report.price_to_book, "")),
        ("股息率", optional(report.dividend_yield, "%")),
    ];
    for (label, value) in &lines {
        let _ = writeln!(out, "{}: {}", label, value);
    }

    if !report.warnings.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "警告");
        for warning in &report.warnings {
            let _ = writeln!(out, "- {}", warning);
        }
    }

    if let Some(profile) = &report.profile {
        let _ = writeln!(out);
        let _ = writeln!(out, "公司概况");
        let _ = writeln!(out, "行业板块: {}", profile.sector.as_deref().unwrap_or("N/A"));
        let _ = writeln!(out, "细分行业: {}", profile.industry.as_deref().unwrap_or("N/A"));
    }

    if let Some(stats) = &report.key_statistics {
        let _ = writeln!(out);
        let _ = writeln!(out, "关键指标（近 12 个月）");
        for (label, value) in stats.labeled() {
            let _ = writeln!(out, "{}: {}", label, format_value(value));
        }
    }

    let _ = writeln!(out);
    if report.history.is_empty() {
        let _ = writeln!(out, "没有可用的历史数据。");
    } else {
        let _ = writeln!(out, "历史收盘价（近 12 个月）");
        let _ = writeln!(out, "{:<12} {:>10}", "日期", "收盘价 (R$)");
        for point in &report.history {
            let _ = writeln!(out, "{:<12} {:>10.2}", point.date.format("%d/%m/%Y"), point.close);
        }
    }

    out
}

impl ReportExporter {
    pub fn new<P: AsRef<Path>>(temp_dir: P) -> Self {
        Self {
            temp_dir: temp_dir.as_ref().to_path_buf(),
        }
    }

    /// 导出报告：写入临时文件、读回内容、清理临时文件
    pub fn export(&self, report: &AnalysisReport) -> AnalyzerResult<ReportFile> {
        fs::create_dir_all(&self.temp_dir)?;

        let timestamp = get_market_time().timestamp();
        let file_name = format!("Report_{}_{}.txt", report.ticker, timestamp);
        let path = self.temp_dir.join(&file_name);

        let result = fs::write(&path, render_report(report)).and_then(|_| fs::read(&path));
        cleanup(&path);

        Ok(ReportFile {
            file_name,
            content: result?,
        })
    }
}

/// 尽力删除临时文件，失败只记录日志
fn cleanup(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(e) = fs::remove_file(path) {
        log::warn!("删除临时报告文件 {} 失败: {}", path.display(), e);
    }
}
