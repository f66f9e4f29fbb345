//! Display-width helpers for the fixed-width console tables. CJK characters
//! count as two columns.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string, counting double-width (CJK) characters as 2.
pub fn display_width(content: &str) -> usize {
    UnicodeWidthStr::width(content)
}

/// Pads `content` with trailing spaces to exactly `width` display columns.
/// Content wider than the budget is truncated on whole-character boundaries:
/// a character that does not fit entirely is dropped, never split.
pub fn pad(content: &str, width: usize) -> String {
    let current = display_width(content);
    if current <= width {
        return format!("{content}{}", " ".repeat(width - current));
    }

    let mut used = 0;
    let mut truncated = String::new();
    for ch in content.chars() {
        let char_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + char_width > width {
            break;
        }
        truncated.push(ch);
        used += char_width;
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_widths() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn cjk_counts_double() {
        assert_eq!(display_width("序号"), 4);
        assert_eq!(display_width("a序"), 3);
    }

    #[test]
    fn pad_fills_to_width() {
        assert_eq!(pad("abc", 5), "abc  ");
        assert_eq!(pad("序号", 4), "序号");
        assert_eq!(pad("序号", 6), "序号  ");
    }

    #[test]
    fn truncation_drops_whole_characters() {
        // Width 5 can hold two CJK characters (4 columns); the third would
        // straddle the boundary and is dropped entirely.
        assert_eq!(pad("中文字", 5), "中文");
        assert_eq!(pad("abcdef", 4), "abcd");
    }

    #[test]
    fn padded_cells_never_exceed_the_budget() {
        for content in ["", "a", "plain@example.com", "中文名字很长很长很长", "混mix合"] {
            for width in 1..12 {
                assert!(display_width(&pad(content, width)) <= width);
            }
        }
    }
}
