//! 股票代码校验

/// 最短代码长度
const MIN_TICKER_LEN: usize = 4;

/// 代码非空、只包含字母数字且至少 4 个字符
///
/// 不检查代码是否真实存在
pub fn is_valid_ticker(ticker: &str) -> bool {
    !ticker.is_empty()
        && ticker.chars().all(char::is_alphanumeric)
        && ticker.chars().count() >= MIN_TICKER_LEN
}
