pub mod keywords;
pub mod stopwords;
pub mod summarizer;
pub mod tokenizer;

pub use keywords::{extract_keywords, DEFAULT_KEYWORD_COUNT};
pub use stopwords::{filter_stopwords, is_stopword};
pub use summarizer::{summarize, SentenceScore, DEFAULT_SUMMARY_SENTENCES};
