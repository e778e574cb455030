//! 关键词提取 - 业务能力层

use crate::services::stopwords::{filter_stopwords, is_stopword};
use crate::services::tokenizer::lowercase_words;
use std::collections::HashMap;

/// 默认关键词数量
pub const DEFAULT_KEYWORD_COUNT: usize = 5;

/// 提取出现频率最高的关键词
///
/// 先去停用词并转小写，统计词频后取前 `top_n` 个（同频按首次出现顺序），
/// 再剔除非纯字母的词。因此返回数量可能少于 `top_n`。
pub fn extract_keywords(text: &str, top_n: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let filtered = filter_stopwords(text).to_lowercase();

    // 词 -> (频次, 首次出现位置)
    let mut freq: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, word) in lowercase_words(&filtered).into_iter().enumerate() {
        freq.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = freq
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(top_n)
        .map(|(word, _, _)| word)
        .filter(|word| is_alphabetic(word) && !is_stopword(word))
        .collect()
}

fn is_alphabetic(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphabetic)
}
