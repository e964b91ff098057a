/// Terminal columns a string occupies; CJK and other wide characters take two.
pub fn display_width(text: &str) -> usize {
    text.chars()
        .map(|character| if is_wide(character) { 2 } else { 1 })
        .sum()
}

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    if entries.is_empty() {
        return Vec::new();
    }

    let label_width = entries
        .iter()
        .map(|(label, _)| display_width(label))
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| {
            let fill = " ".repeat(label_width - display_width(label));
            format!("{padding}{label}{fill}  {value}")
        })
        .collect()
}

/// `NT$120` for whole amounts, `NT$12.5` otherwise.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("NT${amount:.0}")
    } else {
        format!("NT${amount}")
    }
}

fn is_wide(character: char) -> bool {
    matches!(
        u32::from(character),
        0x1100..=0x115F
            | 0x2E80..=0x303E
            | 0x3041..=0x33FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xA000..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
    )
}
