//! 分句与分词

use once_cell::sync::Lazy;
use regex::Regex;

/// 单词：字母数字序列，允许中间出现撇号（don't / it's）
static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:['’]\w+)*").expect("单词正则应合法"));

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '”' | '’')
}

/// 分句
///
/// 句末标点（可连续，如 `?!`、`...`）后可跟引号或右括号，
/// 且其后是空白或文本结尾时断句。返回的句子是原文切片（去掉首尾空白）。
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !is_terminator(ch) {
            continue;
        }

        let mut end = idx + ch.len_utf8();
        while let Some(&(i, c)) = chars.peek() {
            if is_terminator(c) || is_closing(c) {
                end = i + c.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        let at_boundary = chars.peek().map_or(true, |&(_, c)| c.is_whitespace());
        if at_boundary {
            push_sentence(&mut sentences, &text[start..end]);
            start = end;
        }
    }

    push_sentence(&mut sentences, &text[start..]);
    sentences
}

fn push_sentence<'a>(sentences: &mut Vec<&'a str>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}

/// 分词并转小写，标点不算单词
pub fn lowercase_words(text: &str) -> Vec<String> {
    WORD_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}
