use crate::interpret::table::CategoryKeywordTable;

/// Splits free text into words for category scoring.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Dictionary forward-maximum-matching segmenter.
///
/// At each position the longest dictionary word wins. Characters no word
/// covers are grouped into one token per run, Latin letters form their own
/// lowercase tokens, and pure numbers are dropped since they never name a
/// category.
#[derive(Debug, Clone)]
pub struct KeywordSegmenter {
    dictionary: Vec<Vec<char>>,
}

impl KeywordSegmenter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary: Vec<Vec<char>> = words
            .into_iter()
            .map(|word| normalize(word.as_ref()).chars().collect::<Vec<char>>())
            .filter(|word| !word.is_empty())
            .collect();
        // Longest first so the first hit at a position is the maximal one.
        dictionary.sort_by(|left, right| right.len().cmp(&left.len()).then(left.cmp(right)));
        dictionary.dedup();
        Self { dictionary }
    }

    pub fn from_table(table: &CategoryKeywordTable) -> Self {
        Self::new(table.all_keywords())
    }

    fn longest_match(&self, chars: &[char], start: usize) -> Option<usize> {
        let rest = &chars[start..];
        self.dictionary
            .iter()
            .find(|word| rest.starts_with(word))
            .map(Vec::len)
    }
}

impl Segmenter for KeywordSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = normalize(text).chars().collect();
        let mut tokens = Vec::new();
        let mut unmatched = String::new();
        let mut index = 0;

        while index < chars.len() {
            let character = chars[index];
            if character.is_whitespace() || is_separator(character) {
                flush(&mut unmatched, &mut tokens);
                index += 1;
                continue;
            }
            if character.is_ascii_alphanumeric() {
                flush(&mut unmatched, &mut tokens);
                let start = index;
                while index < chars.len() && chars[index].is_ascii_alphanumeric() {
                    index += 1;
                }
                let word: String = chars[start..index].iter().collect();
                if !word.chars().all(|value| value.is_ascii_digit()) {
                    tokens.push(word);
                }
                continue;
            }
            if let Some(length) = self.longest_match(&chars, index) {
                flush(&mut unmatched, &mut tokens);
                tokens.push(chars[index..index + length].iter().collect());
                index += length;
                continue;
            }
            unmatched.push(character);
            index += 1;
        }
        flush(&mut unmatched, &mut tokens);
        tokens
    }
}

pub(crate) fn normalize(text: &str) -> String {
    text.chars().map(|value| value.to_ascii_lowercase()).collect()
}

fn flush(unmatched: &mut String, tokens: &mut Vec<String>) {
    if !unmatched.is_empty() {
        tokens.push(std::mem::take(unmatched));
    }
}

fn is_separator(character: char) -> bool {
    character.is_ascii_punctuation()
        || matches!(
            character,
            '，' | '。' | '、' | '；' | '：' | '！' | '？' | '「' | '」' | '（' | '）'
        )
}
