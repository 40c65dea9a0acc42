//! Width-aware line breaking
//!
//! [`wrap`] splits a single paragraph into lines that fit a pixel budget.
//! Break opportunities are spaces (including the ideographic space), the
//! position after a hyphen, and every switch between ASCII letters and
//! anything else, so mixed Latin/CJK text breaks at script boundaries
//! without needing spaces.
//!
//! When a line overflows, the most recent break opportunity is used if it
//! lies within the lookback distance of the limit. Otherwise the line is
//! split at the overflowing character, with kinsoku adjustments (closing
//! punctuation never starts a line, opening punctuation never ends one) and
//! a visible hyphen when the split falls inside an ASCII word.
//!
//! Lines borrow from the input, so wrapping allocates nothing.

use core::iter::FusedIterator;

use crate::font::CellMetrics;
use crate::traits::{GlyphMetrics, TextStyle};

/// Maximum distance (px) between a soft break and the line limit
pub const DEFAULT_LOOKBACK: u32 = 32;

/// Characters that must not start a line
pub const HEAD_FORBIDDEN: &str = "，。、；：？！）》】'\"”’〉」』〕〗";

/// Characters that must not end a line
pub const TAIL_FORBIDDEN: &str = "《（【“‘〈「『〔〖";

/// One laid-out line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Slice of the input shown on this line
    pub text: &'a str,
    /// A `-` is drawn after `text`
    pub hyphenated: bool,
    /// Pixel width including the hyphen
    pub width: u32,
}

impl<'a> Line<'a> {
    /// Characters to draw, hyphen included
    pub fn chars(&self) -> impl Iterator<Item = char> + 'a {
        self.text.chars().chain(self.hyphenated.then_some('-'))
    }
}

/// Lazy line iterator returned by [`wrap`]
#[derive(Debug, Clone)]
pub struct Wrap<'a, M> {
    text: &'a str,
    pos: usize,
    max_width: u32,
    lookback: u32,
    style: TextStyle,
    metrics: M,
}

/// Wrap `text` to `max_width` pixels using the half/full-width cell rule
/// of the 16 px dashboard font
pub fn wrap(text: &str, max_width: u32, style: TextStyle) -> Wrap<'_, CellMetrics> {
    Wrap::new(text, max_width, style, CellMetrics::default())
}

#[derive(Debug, Clone, Copy)]
struct SoftBreak {
    /// Byte offset where the line ends
    end: usize,
    /// Byte offset where the next line starts
    resume: usize,
    /// Line width up to `end`
    width: u32,
    /// Characters on the line up to `end`
    chars: usize,
}

impl<'a, M: GlyphMetrics> Wrap<'a, M> {
    /// Wrap `text` with arbitrary glyph metrics
    pub fn new(text: &'a str, max_width: u32, style: TextStyle, metrics: M) -> Self {
        Self {
            text,
            pos: 0,
            max_width,
            lookback: DEFAULT_LOOKBACK,
            style,
            metrics,
        }
    }

    /// Override the soft-break lookback distance
    pub fn with_lookback(mut self, lookback: u32) -> Self {
        self.lookback = lookback;
        self
    }

    fn advance(&self, c: char) -> u32 {
        self.metrics.advance(c, self.style)
    }

    fn emit(&mut self, rest: &'a str, end: usize, resume: usize, width: u32) -> Line<'a> {
        let (end, width) = self.trim_spaces(rest, end, width);
        self.pos += resume;
        Line {
            text: &rest[..end],
            hyphenated: false,
            width,
        }
    }

    /// Drop spaces before `end`, keeping at least one character
    fn trim_spaces(&self, rest: &str, mut end: usize, mut width: u32) -> (usize, u32) {
        while let Some((i, last)) = rest[..end].char_indices().next_back() {
            if i == 0 || !is_space(last) {
                break;
            }
            end = i;
            width -= self.advance(last);
        }
        (end, width)
    }

    /// Split before `rest[off..]`, which does not fit
    fn hard_split(&mut self, rest: &'a str, off: usize, width: u32, c: char) -> Line<'a> {
        let mut end = off;
        let mut line_width = width;
        let mut carried = 1;

        // A closing mark drags the previous character along with it
        if is_head_forbidden(c) {
            if let Some((i, last)) = rest[..end].char_indices().next_back() {
                if i > 0 {
                    end = i;
                    line_width -= self.advance(last);
                    carried += 1;
                }
            }
        }
        if let Some((i, last)) = rest[..end].char_indices().next_back() {
            if i > 0 && is_tail_forbidden(last) {
                end = i;
                line_width -= self.advance(last);
                carried += 1;
            }
        }

        let (kept, kept_width) = self.trim_spaces(rest, end, line_width);
        let at_gap = kept != end;
        (end, line_width) = (kept, kept_width);

        let mut hyphenated = false;
        let tail = rest[..end].char_indices().next_back();
        if let (1, false, Some((i, last))) = (carried, at_gap, tail) {
            if is_ascii_letter(c) && is_ascii_letter(last) {
                let hyphen = self.advance('-');
                if line_width + hyphen <= self.max_width {
                    hyphenated = true;
                    line_width += hyphen;
                } else if i > 0
                    && rest[..i].chars().next_back().is_some_and(is_ascii_letter)
                    && line_width - self.advance(last) + hyphen <= self.max_width
                {
                    // Give the last letter to the next line to make room
                    end = i;
                    line_width = line_width - self.advance(last) + hyphen;
                    hyphenated = true;
                }
            }
        }

        self.pos += end;
        Line {
            text: &rest[..end],
            hyphenated,
            width: line_width,
        }
    }
}

impl<'a, M: GlyphMetrics> Iterator for Wrap<'a, M> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        let text = self.text;
        // Spaces left over from the previous break never start a line
        self.pos += text.get(self.pos..).map_or(0, leading_spaces);
        let rest = text.get(self.pos..).filter(|rest| !rest.is_empty())?;

        let marker = protected_prefix(rest);
        let mut prev = text[..self.pos].chars().next_back();
        let mut width = 0u32;
        let mut count = 0usize;
        let mut last_break: Option<SoftBreak> = None;

        for (off, c) in rest.char_indices() {
            let cw = self.advance(c);
            let boundary = prev.is_some_and(|p| is_ascii_letter(p) != is_ascii_letter(c));

            if off > marker && count > 0 {
                if is_space(c) {
                    let run = last_break.filter(|soft| soft.resume == off);
                    last_break = Some(match run {
                        // Consecutive spaces share one break
                        Some(soft) => SoftBreak {
                            resume: off + c.len_utf8(),
                            ..soft
                        },
                        None => SoftBreak {
                            end: off,
                            resume: off + c.len_utf8(),
                            width,
                            chars: count,
                        },
                    });
                } else if boundary && !prev.is_some_and(is_space) {
                    last_break = Some(SoftBreak {
                        end: off,
                        resume: off,
                        width,
                        chars: count,
                    });
                }
            }

            if width + cw > self.max_width {
                if count == 0 {
                    // Wider than the whole line; it goes out on its own
                    let end = c.len_utf8();
                    return Some(self.emit(rest, end, end, cw));
                }

                if let Some(soft) = last_break {
                    let resume = soft.resume + leading_spaces(&rest[soft.resume..]);
                    let next = rest[resume..].chars().next();
                    let closes = next.is_some_and(is_head_forbidden) && soft.chars > 1;
                    if self.max_width.saturating_sub(soft.width) <= self.lookback && !closes {
                        return Some(self.emit(rest, soft.end, soft.resume, soft.width));
                    }
                }

                return Some(self.hard_split(rest, off, width, c));
            }

            width += cw;
            count += 1;
            if c == '-' && off > marker {
                let end = off + 1;
                last_break = Some(SoftBreak {
                    end,
                    resume: end,
                    width,
                    chars: count,
                });
            }
            prev = Some(c);
        }

        let end = rest.len();
        Some(self.emit(rest, end, end, width))
    }
}

impl<M: GlyphMetrics> FusedIterator for Wrap<'_, M> {}

/// Length of a list marker (`"- "`, `"* "`, `"12. "`) at the start of a line
fn protected_prefix(line: &str) -> usize {
    if line.starts_with("- ") || line.starts_with("* ") {
        return 2;
    }
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && line[digits..].starts_with(". ") {
        digits + 2
    } else {
        0
    }
}

fn leading_spaces(text: &str) -> usize {
    text.len() - text.trim_start_matches(is_space).len()
}

fn is_space(c: char) -> bool {
    c == ' ' || c == '\u{3000}'
}

fn is_ascii_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_head_forbidden(c: char) -> bool {
    HEAD_FORBIDDEN.contains(c)
}

fn is_tail_forbidden(c: char) -> bool {
    TAIL_FORBIDDEN.contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::string::String;
    use std::vec::Vec;

    fn lines(text: &str, max_width: u32) -> Vec<String> {
        wrap(text, max_width, TextStyle::default())
            .map(|line| line.chars().collect())
            .collect()
    }

    #[test]
    fn test_script_boundary_break() {
        assert_eq!(lines("数据ABC。", 48), ["数据", "ABC。"]);
    }

    #[test]
    fn test_closing_mark_pulls_previous_char() {
        assert_eq!(lines("测试数据。", 64), ["测试数", "据。"]);
    }

    #[test]
    fn test_opening_mark_moves_to_next_line() {
        assert_eq!(lines("看看《重点内容", 48), ["看看", "《重点", "内容"]);
    }

    #[test]
    fn test_ideographic_space_is_dropped() {
        assert_eq!(lines("中文\u{3000}测试", 32), ["中文", "测试"]);
    }

    #[test]
    fn test_mixed_script_compact() {
        assert_eq!(lines("中文测试Abcdefg", 80), ["中文测试", "Abcdefg"]);
    }

    #[test]
    fn test_long_word_hyphenation() {
        let wrapped = lines("Supercalifragilistic", 32);
        assert_eq!(wrapped[0], "Sup-");
        assert_eq!(wrapped[1], "erc-");
        assert!(wrapped.iter().all(|l| l.chars().count() <= 4));
        let joined: String = wrapped.iter().map(|l| l.trim_end_matches('-')).collect();
        assert_eq!(joined, "Supercalifragilistic");
    }

    #[derive(Clone, Copy)]
    struct NarrowHyphen;

    impl GlyphMetrics for NarrowHyphen {
        fn advance(&self, c: char, _style: TextStyle) -> u32 {
            if c == '-' {
                4
            } else {
                10
            }
        }
    }

    #[test]
    fn test_hyphen_appended_when_it_fits() {
        let mut it = Wrap::new("abcdefgh", 44, TextStyle::default(), NarrowHyphen);
        let first = it.next().unwrap();
        assert_eq!(first.text, "abcd");
        assert!(first.hyphenated);
        assert_eq!(first.width, 44);
        assert_eq!(it.next().unwrap().text, "efgh");
    }

    #[test]
    fn test_letter_borrowed_for_hyphen() {
        let first = wrap("abcdefgh", 40, TextStyle::default()).next().unwrap();
        // "abcde" fills the line, so 'e' moves down to make room
        assert_eq!(first.text, "abcd");
        assert!(first.hyphenated);
        assert_eq!(first.width, 40);
    }

    #[test]
    fn test_list_marker_not_split() {
        let wrapped = lines("- ItemVeryLong", 24);
        assert!(wrapped[0].starts_with("- "));
        assert!(wrapped.iter().all(|l| l.chars().count() <= 3));
    }

    #[test]
    fn test_numbered_marker_protected() {
        assert_eq!(protected_prefix("12. item"), 4);
        assert_eq!(protected_prefix("* item"), 2);
        assert_eq!(protected_prefix("12.item"), 0);
        assert_eq!(protected_prefix("item"), 0);
    }

    #[test]
    fn test_space_break_drops_space() {
        assert_eq!(lines("hello world foo", 88), ["hello world", "foo"]);
    }

    #[test]
    fn test_space_runs_dropped_at_break() {
        assert_eq!(lines("abcd  ef", 32), ["abcd", "ef"]);
        assert_eq!(lines("abc  def", 32), ["abc", "def"]);
        assert_eq!(lines("数据  测试", 32), ["数据", "测试"]);
        assert_eq!(lines("数据\u{3000} 测试", 32), ["数据", "测试"]);
    }

    #[test]
    fn test_space_run_break_width() {
        let first = wrap("abc   def", 32, TextStyle::default()).next().unwrap();
        assert_eq!(first.text, "abc");
        assert_eq!(first.width, 24);
    }

    #[test]
    fn test_hard_split_at_gap_has_no_hyphen() {
        // With no lookback the soft break is ignored and the split lands on the gap
        let wrapped: Vec<_> = wrap("ab  cd", 32, TextStyle::default())
            .with_lookback(0)
            .collect();
        assert_eq!(wrapped[0].text, "ab");
        assert!(!wrapped[0].hyphenated);
        assert_eq!(wrapped[0].width, 16);
        assert_eq!(wrapped[1].text, "cd");
    }

    #[test]
    fn test_trailing_spaces_trimmed() {
        let wrapped: Vec<_> = wrap("ab  ", 100, TextStyle::default()).collect();
        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped[0].text, "ab");
        assert_eq!(wrapped[0].width, 16);
        assert_eq!(wrap("   ", 100, TextStyle::default()).count(), 0);
    }

    #[test]
    fn test_hyphen_stays_on_line_end() {
        assert_eq!(lines("well-known", 56), ["well-", "known"]);
    }

    #[test]
    fn test_distant_break_ignored() {
        assert_eq!(
            lines("ab cdefghijklmnop", 80),
            ["ab cdefgh-", "ijklmnop"]
        );
    }

    #[test]
    fn test_soft_break_before_closing_mark_skipped() {
        assert_eq!(lines("abc。数据", 40), ["abc。", "数据"]);
    }

    #[test]
    fn test_overwide_glyph_emitted_alone() {
        assert_eq!(lines("数据", 10), ["数", "据"]);
        let line = wrap("数", 10, TextStyle::default()).next().unwrap();
        assert_eq!(line.width, 16);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert_eq!(wrap("", 100, TextStyle::default()).count(), 0);
    }

    #[test]
    fn test_style_scales_widths() {
        // 2x scale with 2 px spacing: ASCII 18 px, CJK 34 px
        let wrapped: Vec<_> = wrap("AB数", 60, TextStyle::new(2, 2)).collect();
        assert_eq!(wrapped[0].text, "AB");
        assert_eq!(wrapped[0].width, 36);
        assert_eq!(wrapped[1].width, 34);
    }

    fn paragraph() -> impl Strategy<Value = String> {
        let pool: Vec<char> = "abcXYZ -数据测试，。《》（）\u{3000}12.°".chars().collect();
        proptest::collection::vec(proptest::sample::select(pool), 0..80)
            .prop_map(|chars| chars.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_lines_fit_width(text in paragraph(), max_width in 1u32..200) {
            let metrics = CellMetrics::default();
            let style = TextStyle::default();
            let base = text.as_ptr() as usize;
            let mut cursor = 0usize;

            for line in wrap(&text, max_width, style) {
                let measured: u32 = line.chars().map(|c| metrics.advance(c, style)).sum();
                prop_assert_eq!(line.width, measured);
                prop_assert!(
                    line.width <= max_width || line.text.chars().count() == 1,
                    "{:?} is {} px wide", line.text, line.width
                );

                // Lines appear in order; only spaces fall between them
                let start = line.text.as_ptr() as usize - base;
                let gap = &text[cursor..start];
                prop_assert!(gap.chars().all(is_space), "{:?} dropped", gap);
                prop_assert!(!line.text.is_empty());
                prop_assert!(!line.text.starts_with(is_space), "{:?} starts with a space", line.text);
                prop_assert!(!line.text.ends_with(is_space), "{:?} ends with a space", line.text);
                cursor = start + line.text.len();
            }
            prop_assert!(text[cursor..].chars().all(is_space));
        }
    }
}
