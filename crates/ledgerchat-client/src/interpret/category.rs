use crate::interpret::segment::{Segmenter, normalize};
use crate::interpret::table::CategoryKeywordTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScore<'a> {
    pub name: &'a str,
    pub score: usize,
}

/// Scores every category in table order. A (token, keyword) pair counts once
/// when either string contains the other.
pub fn score_categories<'a>(
    text: &str,
    table: &'a CategoryKeywordTable,
    segmenter: &dyn Segmenter,
) -> Vec<CategoryScore<'a>> {
    let tokens = segmenter.segment(text);
    table
        .categories()
        .iter()
        .map(|category| {
            let keywords: Vec<String> = category
                .keywords
                .iter()
                .map(|keyword| normalize(keyword))
                .collect();
            let score = tokens
                .iter()
                .map(|token| {
                    keywords
                        .iter()
                        .filter(|keyword| {
                            token.contains(keyword.as_str()) || keyword.contains(token.as_str())
                        })
                        .count()
                })
                .sum();
            CategoryScore {
                name: category.name.as_str(),
                score,
            }
        })
        .collect()
}

/// Best-scoring category name; the earliest category wins a tie.
pub fn classify(
    text: &str,
    table: &CategoryKeywordTable,
    segmenter: &dyn Segmenter,
) -> Option<String> {
    let mut best: Option<CategoryScore<'_>> = None;
    for candidate in score_categories(text, table, segmenter) {
        if candidate.score == 0 {
            continue;
        }
        let replaces = match &best {
            Some(current) => candidate.score > current.score,
            None => true,
        };
        if replaces {
            best = Some(candidate);
        }
    }
    best.map(|winner| winner.name.to_string())
}
