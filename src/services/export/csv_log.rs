//! 分析记录 CSV
//!
//! 每次分析追加一行，文件首次创建时写入表头

use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::AnalysisRecord;

pub struct AnalysisLog {
    path: PathBuf,
    // 串行化并发追加
    write_lock: Mutex<()>,
}

impl AnalysisLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 追加一条记录
    pub fn append(&self, record: &AnalysisRecord) -> AnalyzerResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| AnalyzerError::Storage("分析记录写锁已损坏".to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // 文件不存在或为空（首次写入中断）时都需要表头
        let is_new = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;

        let mut writer = WriterBuilder::new().has_headers(is_new).from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        log::debug!("分析记录已写入 {}: {}", self.path.display(), record.ticker);
        Ok(())
    }

    /// 读取全部记录，文件不存在时返回空列表
    pub fn read_all(&self) -> AnalyzerResult<Vec<AnalysisRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new().has_headers(true).from_path(&self.path)?;
        let records = reader
            .deserialize()
            .collect::<Result<Vec<AnalysisRecord>, csv::Error>>()
            .map_err(|e| AnalyzerError::Storage(format!("分析记录格式无效: {}", e)))?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(ticker: &str, price_to_book: Option<f64>) -> AnalysisRecord {
        AnalysisRecord {
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            ticker: ticker.to_string(),
            name: format!("{} S.A.", ticker),
            earnings_per_share: 2.5,
            growth_rate: 7.0,
            reference_rate: 11.0,
            intrinsic_value: 22.5,
            current_price: 18.0,
            margin_percent: 25.0,
            price_to_book,
            dividend_yield: Some(6.1),
        }
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let log = AnalysisLog::new(dir.path().join("data").join("historico.csv"));

        log.append(&record("PETR4", Some(1.2))).unwrap();
        log.append(&record("VALE3", None)).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "date,ticker,name,earnings_per_share,growth_rate,reference_rate,intrinsic_value,current_price,margin_percent,price_to_book,dividend_yield"
        );
        assert_eq!(content.matches("date,ticker").count(), 1);
    }

    #[test]
    fn test_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = AnalysisLog::new(dir.path().join("historico.csv"));

        log.append(&record("PETR4", Some(1.2))).unwrap();
        log.append(&record("VALE3", None)).unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(records, vec![record("PETR4", Some(1.2)), record("VALE3", None)]);
    }

    #[test]
    fn test_empty_file_gets_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("historico.csv");
        fs::write(&path, "").unwrap();

        let log = AnalysisLog::new(&path);
        log.append(&record("PETR4", Some(1.2))).unwrap();

        assert!(fs::read_to_string(&path).unwrap().starts_with("date,ticker,"));
        assert_eq!(log.read_all().unwrap(), vec![record("PETR4", Some(1.2))]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = AnalysisLog::new(dir.path().join("nope.csv"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        fs::write(&path, "date,ticker\nnot-a-date,PETR4\n").unwrap();

        let err = AnalysisLog::new(&path).read_all().unwrap_err();
        assert!(matches!(err, AnalyzerError::Storage(_)));
    }
}
