use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

pub const TOP_KEYWORDS: usize = 30;

/// Procedural vocabulary that would otherwise dominate every ranking.
const STOP_WORDS: &[&str] = &[
    "委員会", "本会議", "政府", "総理", "大臣", "答弁", "質疑", "報告", "資料", "法律", "制度",
    "今回", "我が国", "国会", "議員", "先生", "委員", "議論", "問題", "課題", "対応", "検討",
    "実施", "推進", "確認", "説明", "質問",
];

fn kanji_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new("[\u{4E00}-\u{9FFF}]{2,6}").expect("kanji pattern compiles")
    })
}

fn katakana_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("[ァ-ヴー]{3,}").expect("katakana pattern compiles"))
}

/// Candidate terms: kanji runs of 2 to 6 characters, then katakana runs of 3 or
/// more, minus stop words. Long kanji runs split into consecutive chunks.
pub fn extract_keywords(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    kanji_pattern()
        .find_iter(text)
        .chain(katakana_pattern().find_iter(text))
        .map(|found| found.as_str())
        .filter(|term| !STOP_WORDS.contains(term))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// Frequency table that remembers first-seen order for tie breaking.
#[derive(Debug, Default)]
pub struct TermCounter {
    index: HashMap<String, usize>,
    entries: Vec<TermCount>,
}

impl TermCounter {
    pub fn add(&mut self, term: &str) {
        match self.index.get(term) {
            Some(&position) => self.entries[position].count += 1,
            None => {
                self.index.insert(term.to_string(), self.entries.len());
                self.entries.push(TermCount {
                    term: term.to_string(),
                    count: 1,
                });
            }
        }
    }

    pub fn extend<'a, I: IntoIterator<Item = &'a str>>(&mut self, terms: I) {
        for term in terms {
            self.add(term);
        }
    }

    /// Highest counts first; equal counts keep first-seen order.
    pub fn most_common(&self, limit: usize) -> Vec<TermCount> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(limit);
        ranked
    }
}

/// Counts keywords across every speech text.
pub fn top_keywords<'a, I>(texts: I, limit: usize) -> Vec<TermCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counter = TermCounter::default();
    for text in texts {
        counter.extend(extract_keywords(text));
    }
    counter.most_common(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_kanji_then_katakana_and_drops_stop_words() {
        let text = "消費税の減税について政府にインフレ対策とエネルギー政策を問う";
        let terms = extract_keywords(text);
        assert_eq!(terms, vec!["消費税", "減税", "対策", "政策", "インフレ", "エネルギー"]);
    }

    #[test]
    fn long_kanji_runs_split_into_six_character_chunks() {
        let terms = extract_keywords("少子高齢化社会保障制度改革");
        assert_eq!(terms, vec!["少子高齢化社", "会保障制度改"]);
    }

    #[test]
    fn short_katakana_and_single_kanji_are_ignored() {
        assert!(extract_keywords("ガス と 党").is_empty());
        assert!(extract_keywords("   ").is_empty());
    }

    #[test]
    fn most_common_breaks_ties_by_first_appearance() {
        let mut counter = TermCounter::default();
        counter.extend(["税制", "外国", "消費税", "外国", "税制", "年金"]);

        let top = counter.most_common(3);
        let ranked: Vec<(&str, usize)> = top.iter().map(|t| (t.term.as_str(), t.count)).collect();
        assert_eq!(ranked, vec![("税制", 2), ("外国", 2), ("消費税", 1)]);
        assert_eq!(counter.most_common(10).len(), 4);
    }

    #[test]
    fn top_keywords_counts_across_texts() {
        let top = top_keywords(["物価高騰への対応", "物価高騰と賃上げ", ""], 2);
        assert_eq!(
            top[0],
            TermCount {
                term: "物価高騰".to_string(),
                count: 2
            }
        );
        assert_eq!(top.len(), 2);
    }
}
