//! 抽取式摘要 - 业务能力层
//!
//! 按词频给句子打分，取分数最高的若干句。

use crate::services::tokenizer::{lowercase_words, split_sentences};
use std::collections::HashMap;

/// 默认摘要句数
pub const DEFAULT_SUMMARY_SENTENCES: usize = 3;

/// 句子及其得分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceScore<'a> {
    pub sentence: &'a str,
    pub score: usize,
}

/// 统计全文词频（小写）
pub fn word_frequencies(text: &str) -> HashMap<String, usize> {
    let mut freq = HashMap::new();
    for word in lowercase_words(text) {
        *freq.entry(word).or_insert(0) += 1;
    }
    freq
}

/// 给每个句子打分并排序
///
/// 得分为句中每个单词在全文中的出现次数之和。按得分降序稳定排序，
/// 同分的句子保持原文中的先后顺序。
pub fn rank_sentences(text: &str) -> Vec<SentenceScore<'_>> {
    let freq = word_frequencies(text);

    let mut scored: Vec<SentenceScore<'_>> = split_sentences(text)
        .into_iter()
        .map(|sentence| SentenceScore {
            sentence,
            score: lowercase_words(sentence)
                .iter()
                .map(|word| freq.get(word).copied().unwrap_or(0))
                .sum(),
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// 生成摘要
///
/// 取得分最高的 `sentence_count` 句，按排名顺序（而非原文顺序）以空格拼接。
/// 空文本或只有空白时返回空串。
pub fn summarize(text: &str, sentence_count: usize) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    rank_sentences(text)
        .into_iter()
        .take(sentence_count)
        .map(|scored| scored.sentence)
        .collect::<Vec<_>>()
        .join(" ")
}
