//! Locates the line where a signing date belongs.
//!
//! Contracts are pre-printed templates: the label text ("Hôm nay ngày …
//! tháng … năm …", "Ngày ký: …/…/…") is reliable while the numbers are
//! handwritten, missing, or OCR-garbled. Both grammars therefore match the
//! label with every numeric group optional; pulling actual numbers out of
//! the line is the parser's job.

use crate::date::normalize::normalize;
use crate::date::scanner::{search, Cursor};

/// Index of the first line whose normalized form matches either context
/// grammar. Scan order is line order; the first hit wins and later
/// candidates are never considered.
pub fn find_date_context<I>(lines: I) -> Option<usize>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    lines
        .into_iter()
        .position(|line| is_date_context(line.as_ref()))
}

/// True if the line carries a date context under either grammar.
pub fn is_date_context(line: &str) -> bool {
    let norm = normalize(line);
    search(&norm, hom_nay) || search(&norm, ngay_ky)
}

/// Grammar A: "hôm nay" followed by a slash-delimited day/month/year
/// skeleton, a worded `ngay … thang … nam …` skeleton, or a bare `//`
/// left blank on the template.
fn hom_nay(c: &mut Cursor<'_>) -> bool {
    if !c.eat_lit("ho") {
        return false;
    }
    let _ = c.eat_byte(b'm');
    c.eat_spaces();
    if !c.eat_lit("nay") {
        return false;
    }
    c.eat_spaces();

    let base = *c;
    slash_skeleton(base) || worded_skeleton(base) || empty_slashes(base)
}

/// Grammar B: "ngày ký" then a colon. The original template accepts a
/// strict dd/mm/yyyy, the worded skeleton, the literal "ngay thang nam",
/// or a slash skeleton whose every element is optional — that last form
/// matches an empty field, so the label alone flags the line and whether a
/// date is actually present is left to the parser.
fn ngay_ky(c: &mut Cursor<'_>) -> bool {
    if !c.eat_lit("ngay") {
        return false;
    }
    c.eat_spaces();
    if !c.eat_lit("ky") {
        return false;
    }
    c.eat_spaces();
    c.eat_byte(b':')
}

/// `[ngay] [dd] <noise> / [mm] <noise> / [yyyy]` — numbers optional,
/// up to three noise characters tolerated before each slash.
fn slash_skeleton(c: Cursor<'_>) -> bool {
    let mut with_label = c;
    if with_label.eat_lit("ngay") {
        with_label.eat_spaces();
        if slash_core(with_label) {
            return true;
        }
    }
    slash_core(c)
}

fn slash_core(mut c: Cursor<'_>) -> bool {
    c.eat_opt_digits(2);
    if !c.noise_then(3, |c| c.eat_byte(b'/')) {
        return false;
    }
    c.eat_spaces();
    c.eat_opt_digits(2);
    c.noise_then(3, |c| c.eat_byte(b'/'))
    // The trailing year group is optional; nothing further is required.
}

/// `ngay [dd] thang [mm] nam [yyyy]` with every numeric group optional.
fn worded_skeleton(mut c: Cursor<'_>) -> bool {
    if !c.eat_lit("ngay") {
        return false;
    }
    c.eat_spaces();
    gap_digits_gap_lit(&mut c, "thang") && gap_digits_gap_lit(&mut c, "nam")
}

/// `<noise> [digits] <noise> <literal>`, each noise run at most three
/// non-digit characters with surrounding spaces.
fn gap_digits_gap_lit(c: &mut Cursor<'_>, lit: &str) -> bool {
    let ok = c.noise_then(3, |c| {
        c.eat_spaces();
        c.eat_opt_digits(2);
        c.noise_then(3, |c| {
            c.eat_spaces();
            c.eat_lit(lit)
        })
    });
    if ok {
        c.eat_spaces();
    }
    ok
}

/// A blank `//` or `///` field with no digits at all.
fn empty_slashes(mut c: Cursor<'_>) -> bool {
    if !c.eat_byte(b'/') {
        return false;
    }
    c.eat_spaces();
    c.eat_byte(b'/')
}
