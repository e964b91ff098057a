//! The category keyword table.
//!
//! A table is built once (from the built-in catalog or a JSON file, see
//! [`crate::catalog`]) and shared read-only between every parser call.

use std::collections::HashSet;

use crate::interpret::types::EntryKind;
use crate::{ClientError, ClientResult};

pub const DEFAULT_FALLBACK_EXPENSE: &str = "其他";
pub const DEFAULT_FALLBACK_INCOME: &str = "其他收入";
pub const DEFAULT_INCOME_MARKER: &str = "收入";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryKeywords {
    pub name: String,
    pub kind: EntryKind,
    pub keywords: Vec<String>,
}

impl CategoryKeywords {
    pub fn new(name: &str, kind: EntryKind, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind,
            keywords: keywords.iter().map(|value| (*value).to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryKeywordTable {
    categories: Vec<CategoryKeywords>,
    fallback_expense: String,
    fallback_income: String,
    income_markers: Vec<String>,
}

impl CategoryKeywordTable {
    /// Validates and builds a table. Category order is significant: it breaks
    /// classifier ties and decides which name a query matches first.
    pub fn new(
        categories: Vec<CategoryKeywords>,
        fallback_expense: &str,
        fallback_income: &str,
        income_markers: Vec<String>,
    ) -> ClientResult<Self> {
        if categories.is_empty() {
            return Err(ClientError::keyword_table_invalid(
                None,
                "at least one category is required",
            ));
        }

        let mut seen = HashSet::new();
        for category in &categories {
            let name = category.name.trim();
            if name.is_empty() {
                return Err(ClientError::keyword_table_invalid(
                    None,
                    "category names must be non-empty",
                ));
            }
            if !seen.insert(name.to_string()) {
                return Err(ClientError::keyword_table_invalid(
                    None,
                    &format!("category `{name}` is listed more than once"),
                ));
            }
            if category.keywords.is_empty() {
                return Err(ClientError::keyword_table_invalid(
                    None,
                    &format!("category `{name}` has no keywords"),
                ));
            }
            if category
                .keywords
                .iter()
                .any(|keyword| keyword.trim().is_empty())
            {
                return Err(ClientError::keyword_table_invalid(
                    None,
                    &format!("category `{name}` contains an empty keyword"),
                ));
            }
        }

        let fallback_expense = fallback_expense.trim();
        let fallback_income = fallback_income.trim();
        if fallback_expense.is_empty() || fallback_income.is_empty() {
            return Err(ClientError::keyword_table_invalid(
                None,
                "fallback category names must be non-empty",
            ));
        }
        for (fallback, expected) in [
            (fallback_expense, EntryKind::Expense),
            (fallback_income, EntryKind::Income),
        ] {
            if let Some(listed) = categories
                .iter()
                .find(|category| category.name.trim() == fallback)
                && listed.kind != expected
            {
                return Err(ClientError::keyword_table_invalid(
                    None,
                    &format!(
                        "fallback `{fallback}` is listed as {} but must be {}",
                        listed.kind.as_str(),
                        expected.as_str()
                    ),
                ));
            }
        }

        let income_markers = income_markers
            .into_iter()
            .map(|marker| marker.trim().to_string())
            .filter(|marker| !marker.is_empty())
            .collect();

        Ok(Self {
            categories: categories
                .into_iter()
                .map(|category| CategoryKeywords {
                    name: category.name.trim().to_string(),
                    kind: category.kind,
                    keywords: category
                        .keywords
                        .into_iter()
                        .map(|keyword| keyword.trim().to_string())
                        .collect(),
                })
                .collect(),
            fallback_expense: fallback_expense.to_string(),
            fallback_income: fallback_income.to_string(),
            income_markers,
        })
    }

    /// The catalog shipped with the app: ten categories, three of them income.
    pub fn builtin() -> Self {
        Self {
            categories: builtin_categories(),
            fallback_expense: DEFAULT_FALLBACK_EXPENSE.to_string(),
            fallback_income: DEFAULT_FALLBACK_INCOME.to_string(),
            income_markers: vec![DEFAULT_INCOME_MARKER.to_string()],
        }
    }

    pub fn categories(&self) -> &[CategoryKeywords] {
        &self.categories
    }

    pub fn fallback_expense(&self) -> &str {
        &self.fallback_expense
    }

    pub fn fallback_income(&self) -> &str {
        &self.fallback_income
    }

    pub fn income_markers(&self) -> &[String] {
        &self.income_markers
    }

    pub fn kind_of(&self, name: &str) -> Option<EntryKind> {
        if let Some(category) = self.categories.iter().find(|category| category.name == name) {
            return Some(category.kind);
        }
        if name == self.fallback_income {
            return Some(EntryKind::Income);
        }
        if name == self.fallback_expense {
            return Some(EntryKind::Expense);
        }
        None
    }

    pub fn is_income(&self, name: &str) -> bool {
        self.kind_of(name) == Some(EntryKind::Income)
    }

    /// Default category for text no keyword matched.
    pub fn fallback_for(&self, text: &str) -> &str {
        if self
            .income_markers
            .iter()
            .any(|marker| text.contains(marker.as_str()))
        {
            return &self.fallback_income;
        }
        &self.fallback_expense
    }

    pub fn all_keywords(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|category| category.keywords.iter().map(String::as_str))
    }
}

fn builtin_categories() -> Vec<CategoryKeywords> {
    vec![
        CategoryKeywords::new(
            "餐飲",
            EntryKind::Expense,
            &[
                "吃", "餐", "飯", "午餐", "晚餐", "早餐", "宵夜", "飲料", "咖啡", "奶茶", "便當",
                "麵", "火鍋", "燒烤", "外食", "食", "喝", "零食", "點心", "蛋糕",
            ],
        ),
        CategoryKeywords::new(
            "交通",
            EntryKind::Expense,
            &[
                "車", "捷運", "公車", "uber", "計程車", "高鐵", "火車", "機票", "加油", "停車",
                "通勤", "騎", "搭", "坐車", "交通",
            ],
        ),
        CategoryKeywords::new(
            "娛樂",
            EntryKind::Expense,
            &[
                "電影", "遊戲", "KTV", "唱歌", "玩", "門票", "旅遊", "遊", "看展", "演唱會",
                "娛樂", "訂閱", "Netflix", "Spotify",
            ],
        ),
        CategoryKeywords::new(
            "購物",
            EntryKind::Expense,
            &[
                "買", "購", "衣服", "鞋", "包", "3C", "電器", "手機", "電腦", "網購", "蝦皮",
                "淘寶", "百貨", "超市", "便利商店", "全聯",
            ],
        ),
        CategoryKeywords::new(
            "醫療",
            EntryKind::Expense,
            &["醫", "藥", "看診", "掛號", "健檢", "牙", "眼科", "診所", "醫院"],
        ),
        CategoryKeywords::new(
            "居住",
            EntryKind::Expense,
            &[
                "房租", "水電", "電費", "水費", "瓦斯", "管理費", "網路", "cable", "租金", "房貸",
                "維修",
            ],
        ),
        CategoryKeywords::new(
            "教育",
            EntryKind::Expense,
            &["書", "課", "學費", "補習", "教材", "文具", "考試", "證照", "線上課程"],
        ),
        CategoryKeywords::new(
            "薪資",
            EntryKind::Income,
            &["薪", "薪水", "工資", "發薪", "月薪", "獎金", "年終"],
        ),
        CategoryKeywords::new(
            "投資",
            EntryKind::Income,
            &["股", "基金", "利息", "股利", "配息", "投資收益"],
        ),
        CategoryKeywords::new(
            "其他收入",
            EntryKind::Income,
            &["收入", "入帳", "轉帳收入", "紅包", "禮金", "中獎"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::{CategoryKeywordTable, CategoryKeywords};
    use crate::interpret::types::EntryKind;

    #[test]
    fn builtin_table_partitions_income_and_expense() {
        let table = CategoryKeywordTable::builtin();
        assert_eq!(table.categories().len(), 10);
        assert!(table.is_income("薪資"));
        assert!(table.is_income("其他收入"));
        assert!(!table.is_income("餐飲"));
        assert_eq!(table.kind_of("其他"), Some(EntryKind::Expense));
        assert_eq!(table.kind_of("不存在"), None);
    }

    #[test]
    fn fallback_uses_income_marker() {
        let table = CategoryKeywordTable::builtin();
        assert_eq!(table.fallback_for("額外收入 300"), "其他收入");
        assert_eq!(table.fallback_for("不知道 300"), "其他");
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = CategoryKeywordTable::new(
            vec![
                CategoryKeywords::new("餐飲", EntryKind::Expense, &["吃"]),
                CategoryKeywords::new(" 餐飲 ", EntryKind::Income, &["喝"]),
            ],
            "其他",
            "其他收入",
            vec!["收入".to_string()],
        );
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "keyword_table_invalid");
            assert!(error.message.contains("more than once"));
        }
    }

    #[test]
    fn rejects_empty_tables_and_keywords() {
        let empty = CategoryKeywordTable::new(Vec::new(), "其他", "其他收入", Vec::new());
        assert!(empty.is_err());

        let blank_keyword = CategoryKeywordTable::new(
            vec![CategoryKeywords::new("餐飲", EntryKind::Expense, &["吃", " "])],
            "其他",
            "其他收入",
            Vec::new(),
        );
        assert!(blank_keyword.is_err());
    }

    #[test]
    fn rejects_fallback_listed_with_wrong_kind() {
        let result = CategoryKeywordTable::new(
            vec![CategoryKeywords::new("其他", EntryKind::Income, &["雜"])],
            "其他",
            "其他收入",
            Vec::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn trims_names_and_drops_blank_markers() {
        let result = CategoryKeywordTable::new(
            vec![CategoryKeywords::new(" 寵物 ", EntryKind::Expense, &[" 貓砂 "])],
            "雜支",
            "雜項收入",
            vec![" ".to_string(), "進帳".to_string()],
        );
        assert!(result.is_ok());
        if let Ok(table) = result {
            assert_eq!(table.categories()[0].name, "寵物");
            assert_eq!(table.categories()[0].keywords, vec!["貓砂".to_string()]);
            assert_eq!(table.income_markers(), ["進帳".to_string()]);
            assert_eq!(table.fallback_for("進帳 500"), "雜項收入");
        }
    }
}
