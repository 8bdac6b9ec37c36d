//! Price extraction from raw response text
//!
//! Responses are never parsed as HTML. Each source scans the text with an
//! ordered set of currency patterns and keeps prices inside a plausible range.

use lazy_static::lazy_static;
use regex::Regex;

/// Plausible retail price range (both bounds exclusive)
pub const PLAUSIBLE_MIN: u64 = 1000;
pub const PLAUSIBLE_MAX: u64 = 10_000_000;

lazy_static! {
    /// Label-based patterns for search result snippets (定価, 希望小売価格, ...)
    pub static ref LABEL_PATTERNS: PatternSet = PatternSet::new(&[
        (r"(?:定価|希望小売価格|メーカー希望小売価格|参考価格|税込価格)[：:\s]*[¥￥]?\s*([0-9０-９,]+)\s*円", 0),
        (r"(?:定価|希望小売価格|メーカー希望小売価格|参考価格)[：:\s]*[¥￥]\s*([0-9０-９,]+)", 1),
        (r"[¥￥]\s*([0-9０-９,]+)\s*[\(（]税込[\)）]", 2),
        (r"([0-9０-９,]+)\s*円\s*[\(（]税込[\)）]", 3),
        (r"価格[：:\s]*[¥￥]?\s*([0-9０-９,]+)\s*円", 4),
    ]);

    /// Any yen amount, as listed on shopping search pages
    pub static ref YEN_PATTERNS: PatternSet = PatternSet::new(&[(r"([0-9０-９,]+)\s*円", 0)]);

    /// Amazon search result price markup
    pub static ref AMAZON_PATTERNS: PatternSet = PatternSet::new(&[
        (r#"a-price-whole["\s>]*([0-9０-９,]+)"#, 0),
        (r#"a-offscreen["\s>]*[¥￥]([0-9０-９,]+)"#, 1),
        (r#"a-color-price["\s>]*[¥￥]\s*([0-9０-９,]+)"#, 2),
    ]);
}

/// A plausible price found in text, with the byte span of the whole match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceMatch {
    pub price: u64,
    pub start: usize,
    pub end: usize,
}

/// Ordered list of price patterns. Lower priority values are tried first.
///
/// Every pattern must have the digit group as capture group 1.
pub struct PatternSet {
    patterns: Vec<(Regex, u8)>,
}

impl PatternSet {
    /// Build a pattern set from (pattern, priority) pairs.
    ///
    /// Panics on an invalid pattern; all pattern sets are compile-time constants.
    pub fn new(patterns: &[(&str, u8)]) -> Self {
        let mut patterns: Vec<(Regex, u8)> = patterns
            .iter()
            .map(|(pattern, priority)| {
                let regex = Regex::new(pattern)
                    .unwrap_or_else(|e| panic!("invalid price pattern {pattern:?}: {e}"));
                (regex, *priority)
            })
            .collect();
        patterns.sort_by_key(|(_, priority)| *priority);
        Self { patterns }
    }

    /// All plausible prices, pattern by pattern in priority order
    pub fn matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = PriceMatch> + 'a {
        self.patterns.iter().flat_map(move |(regex, _)| {
            regex.captures_iter(text).filter_map(|caps| {
                let whole = caps.get(0)?;
                let price = parse_digits(caps.get(1)?.as_str())?;
                is_plausible(price).then_some(PriceMatch {
                    price,
                    start: whole.start(),
                    end: whole.end(),
                })
            })
        })
    }

    /// First plausible price (first-match-wins)
    pub fn first_match(&self, text: &str) -> Option<u64> {
        self.matches(text).next().map(|m| m.price)
    }

    /// Every plausible price
    pub fn all_matches(&self, text: &str) -> Vec<u64> {
        self.matches(text).map(|m| m.price).collect()
    }
}

/// Parse a digit group with thousands separators ("54,978" -> 54978).
/// Full-width digits ("１２８００") are accepted.
pub fn parse_digits(raw: &str) -> Option<u64> {
    let digits: String = raw
        .chars()
        .filter(|c| *c != ',')
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            _ => c,
        })
        .collect();
    digits.parse().ok()
}

pub fn is_plausible(price: u64) -> bool {
    price > PLAUSIBLE_MIN && price < PLAUSIBLE_MAX
}

/// Median of a price list: the element at `len / 2` after sorting
pub fn median(prices: &[u64]) -> Option<u64> {
    if prices.is_empty() {
        return None;
    }
    let mut sorted = prices.to_vec();
    sorted.sort_unstable();
    Some(sorted[sorted.len() / 2])
}

/// Text surrounding a match, widened by `radius` characters on each side.
///
/// `start` and `end` are byte offsets on char boundaries, as returned by
/// [`PatternSet::matches`].
pub fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(i, _)| end + i);
    &text[from..to]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_digits_strips_separators() {
        assert_eq!(parse_digits("54,978"), Some(54_978));
        assert_eq!(parse_digits("1,234,567"), Some(1_234_567));
        assert_eq!(parse_digits(","), None);
        assert_eq!(parse_digits(""), None);
    }

    #[test]
    fn range_filter_is_exclusive() {
        assert!(!is_plausible(1000));
        assert!(is_plausible(1001));
        assert!(is_plausible(9_999_999));
        assert!(!is_plausible(10_000_000));
    }

    #[test]
    fn median_takes_upper_middle() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[5000]), Some(5000));
        assert_eq!(median(&[9000, 3000, 5000]), Some(5000));
        assert_eq!(median(&[4000, 2000, 3000, 1000]), Some(3000));
    }

    #[test]
    fn out_of_range_values_do_not_reach_the_median() {
        let text = "1,000円 1,000円 2,000円 9,000,000,000円";
        let prices = YEN_PATTERNS.all_matches(text);
        assert_eq!(prices, vec![2000]);
        assert_eq!(median(&prices), Some(2000));
    }

    #[test]
    fn label_patterns_follow_priority_order() {
        // The tax-included pattern appears first in the text, but the
        // label pattern has higher priority.
        let text = "¥3,300(税込) ... メーカー希望小売価格：54,978円";
        assert_eq!(LABEL_PATTERNS.first_match(text), Some(54_978));
    }

    #[test]
    fn label_patterns_skip_implausible_matches() {
        let text = "定価：500円 / 定価：12,800円";
        assert_eq!(LABEL_PATTERNS.first_match(text), Some(12_800));
    }

    #[test]
    fn label_patterns_handle_fullwidth_markers() {
        assert_eq!(LABEL_PATTERNS.first_match("￥ 8,980（税込）"), Some(8980));
        assert_eq!(LABEL_PATTERNS.first_match("販売価格: 19,800 円"), Some(19_800));
        assert_eq!(LABEL_PATTERNS.first_match("no prices here"), None);
    }

    #[test]
    fn amazon_patterns_read_price_markup() {
        let html = r#"<span class="a-price-whole">39,800</span><span class="a-offscreen">￥41,000</span>"#;
        assert_eq!(AMAZON_PATTERNS.all_matches(html), vec![39_800, 41_000]);
    }

    #[test]
    fn parse_digits_accepts_fullwidth() {
        assert_eq!(parse_digits("１２８００"), Some(12_800));
        assert_eq!(parse_digits("３９,８００"), Some(39_800));
        assert_eq!(YEN_PATTERNS.all_matches("価格 １２８００円"), vec![12_800]);
        assert_eq!(LABEL_PATTERNS.first_match("定価：５４,９７８円"), Some(54_978));
    }

    #[test]
    fn context_window_counts_characters() {
        let text = "中古品 price 5,000円 新品";
        let m = YEN_PATTERNS.matches(text).next().unwrap();
        assert_eq!(context_window(text, m.start, m.end, 6), "price 5,000円 新品");
        assert_eq!(context_window(text, m.start, m.end, 0), "5,000円");
        assert_eq!(context_window(text, m.start, m.end, 100), text);

        let kana = "あいうえお";
        // "う" spans bytes 6..9
        assert_eq!(context_window(kana, 6, 9, 1), "いうえ");
    }
}
