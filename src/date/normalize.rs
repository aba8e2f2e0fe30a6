use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalizes a text fragment before any grammar matching.
///
/// Accented characters are decomposed and their combining marks dropped, so
/// Vietnamese tone and quality marks disappear while the base Latin letters
/// survive. Everything outside ASCII letters, digits, `/` and `:` becomes a
/// space, whitespace runs collapse to a single space, and whitespace strictly
/// between two digits is deleted (OCR likes to split numbers: `2 0 2 4`).
/// The result is lowercase ASCII. Idempotent.
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '/' || c == ':' {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    let chars: Vec<char> = mapped.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == ' ' {
            let mut j = i;
            while j < chars.len() && chars[j] == ' ' {
                j += 1;
            }
            let prev_digit = out.chars().last().is_some_and(|p| p.is_ascii_digit());
            let next_digit = chars.get(j).is_some_and(|n| n.is_ascii_digit());
            // Keep one space unless the gap sits inside a numeric token or
            // at either end of the string.
            if !(prev_digit && next_digit) && !out.is_empty() && j < chars.len() {
                out.push(' ');
            }
            i = j;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_diacritics_and_punctuation() {
        assert_eq!(
            normalize("Hôm nay, ngày 15 tháng 03 năm 2023!"),
            "hom nay ngay 15 thang 03 nam 2023"
        );
    }

    #[test]
    fn keeps_slashes_and_colons() {
        assert_eq!(normalize("Ngày ký: 01/02/2024"), "ngay ky: 01/02/2024");
    }

    #[test]
    fn removes_gaps_inside_numbers_only() {
        assert_eq!(normalize("2 0 2 4"), "2024");
        // A non-digit between the digits blocks the merge.
        assert_eq!(normalize("12/05 /2024"), "12/05 /2024");
        assert_eq!(normalize("12 / 05 / 2024"), "12 / 05 / 2024");
    }

    #[test]
    fn d_with_stroke_is_not_a_base_latin_letter() {
        // NFKD does not decompose đ/Đ; they fall out as separators.
        assert_eq!(normalize("hợp đồng"), "hop ong");
    }

    #[test]
    fn idempotent() {
        for s in [
            "Hôm nay ngày .. tháng .. năm ..",
            "  NGÀY  KÝ :  12 / 05/  2024  ",
            "⟨⟨weird⟩⟩ 1 2 3",
            "",
        ] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }
}
