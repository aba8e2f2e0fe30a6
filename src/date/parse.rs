//! Pulls a concrete calendar date out of one candidate line.
//!
//! Two grammars run over the normalized text in fixed priority order: the
//! slash shape first, then the worded Vietnamese shape. Every candidate
//! triple is validated against the real calendar and the first valid one
//! wins; an OCR misread like 31/04 falls through to the next candidate
//! instead of aborting the line.

use crate::core::model::ExtractedDate;
use crate::date::normalize::normalize;
use crate::date::scanner::Cursor;

/// Parses the first valid date in the fragment, or `None` when the text
/// holds no resolvable day/month/year (a blank template field).
pub fn parse_date(text: &str) -> Option<ExtractedDate> {
    let norm = normalize(text);
    let candidates = triples(&norm, slash_date_at)
        .into_iter()
        .chain(triples(&norm, worded_date_at));
    for (day, month, year) in candidates {
        if let Some(date) = ExtractedDate::from_ymd(day, month, year) {
            return Some(date);
        }
    }
    None
}

type Triple = (u32, u32, i32);

/// Collects every non-overlapping match of `grammar` in scan order,
/// resuming after each match the way a regex `findall` does.
fn triples(norm: &str, grammar: fn(&str, usize) -> Option<(Triple, usize)>) -> Vec<Triple> {
    let mut found = Vec::new();
    let mut start = 0;
    while start <= norm.len() {
        match grammar(norm, start) {
            Some((triple, end)) => {
                found.push(triple);
                start = end.max(start + 1);
            }
            None => start += 1,
        }
    }
    found
}

/// `dd <sep> mm <sep> yyyy` where each separator is a short run of slashes
/// and spaces. Day and month take one or two digits, the year exactly four.
fn slash_date_at(norm: &str, start: usize) -> Option<(Triple, usize)> {
    let mut c = Cursor::new(norm, start);
    let day = c.eat_digits(1, 2)?;
    eat_separator(&mut c)?;
    let month = c.eat_digits(1, 2)?;
    eat_separator(&mut c)?;
    let year = c.eat_digits(4, 4)?;
    Some((to_triple(day, month, year), c.pos()))
}

/// `dd thang mm nam yyyy`.
fn worded_date_at(norm: &str, start: usize) -> Option<(Triple, usize)> {
    let mut c = Cursor::new(norm, start);
    let day = c.eat_digits(1, 2)?;
    c.eat_spaces();
    if !c.eat_lit("thang") {
        return None;
    }
    c.eat_spaces();
    let month = c.eat_digits(1, 2)?;
    c.eat_spaces();
    if !c.eat_lit("nam") {
        return None;
    }
    c.eat_spaces();
    let year = c.eat_digits(4, 4)?;
    Some((to_triple(day, month, year), c.pos()))
}

/// A separator is a run of slashes and spaces in which all slashes fit a
/// three-character window. OCR noise widens separators with stray spaces;
/// anything looser than the window (e.g. `/ / /` between two numbers) is
/// a template skeleton, not a delimiter.
fn eat_separator(c: &mut Cursor<'_>) -> Option<()> {
    let start = c.pos();
    let mut first_slash = None;
    let mut last_slash = None;
    while let Some(b) = c.peek() {
        match b {
            b'/' => {
                if first_slash.is_none() {
                    first_slash = Some(c.pos());
                }
                last_slash = Some(c.pos());
                c.eat_byte(b'/');
            }
            b' ' => c.eat_spaces(),
            _ => break,
        }
    }
    if c.pos() == start {
        return None;
    }
    match (first_slash, last_slash) {
        (Some(first), Some(last)) if last - first + 1 > 3 => None,
        _ => Some(()),
    }
}

fn to_triple(day: &str, month: &str, year: &str) -> Triple {
    // Captures are 1-4 ASCII digits; they always fit.
    (
        day.parse().unwrap_or(0),
        month.parse().unwrap_or(0),
        year.parse().unwrap_or(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parsed(text: &str) -> Option<String> {
        parse_date(text).map(|d| d.to_string())
    }

    #[test]
    fn parses_slash_dates_with_ocr_spacing() {
        assert_eq!(parsed("12/05/2024"), Some("12/05/2024".into()));
        assert_eq!(parsed("ngày 12 / 05 / 2024"), Some("12/05/2024".into()));
        assert_eq!(parsed("1/2/2024"), Some("01/02/2024".into()));
        assert_eq!(parsed("Ngày ký: 01/02/2024"), Some("01/02/2024".into()));
    }

    #[test]
    fn parses_worded_dates() {
        assert_eq!(
            parsed("Hôm nay ngày 15 tháng 03 năm 2023, hai bên ký hợp đồng"),
            Some("15/03/2023".into())
        );
        assert_eq!(parsed("ngày 5 tháng 1 năm 2020"), Some("05/01/2020".into()));
    }

    #[test]
    fn slash_grammar_outranks_worded_grammar() {
        // The worded date appears first in the text, but the slash grammar
        // runs to completion before the worded grammar is consulted.
        assert_eq!(
            parsed("Hôm nay ngày 10 tháng 11 năm 2021, bản sao gửi ngày 12/12/2022"),
            Some("12/12/2022".into())
        );
    }

    #[test]
    fn rejects_invalid_calendar_dates() {
        assert_eq!(parsed("31/04/2024"), None);
        assert_eq!(parsed("29/02/2023"), None);
        assert_eq!(parsed("00/13/2024"), None);
        assert_eq!(parsed("29/02/2024"), Some("29/02/2024".into()));
    }

    #[test]
    fn invalid_candidate_falls_through_to_the_next() {
        assert_eq!(
            parsed("31/04/2024 sửa lại 15/04/2024"),
            Some("15/04/2024".into())
        );
    }

    #[test]
    fn requires_a_four_digit_year() {
        assert_eq!(parsed("12/05/24"), None);
        assert_eq!(parsed("ngày 12 tháng 05 năm 24"), None);
    }

    #[test]
    fn blank_template_fields_yield_nothing() {
        assert_eq!(parsed("Ngày ký: ... / ... / ......"), None);
        assert_eq!(parsed("Hôm nay ngày .. tháng .. năm .."), None);
        assert_eq!(parsed(""), None);
    }
}
