pub mod locate;
pub mod normalize;
pub mod parse;
pub mod scanner;

pub use locate::{find_date_context, is_date_context};
pub use normalize::normalize;
pub use parse::parse_date;

use crate::core::model::PageOutcome;

/// Evaluates one text unit (a page or a whole DOCX) already split into
/// lines: locate the context line, then parse it. At most one line is ever
/// parsed; a second context further down is never considered.
pub fn evaluate_lines(lines: &[&str]) -> PageOutcome {
    match find_date_context(lines) {
        Some(idx) => match parse_date(lines[idx]) {
            Some(date) => PageOutcome::Found(date),
            None => PageOutcome::Blank,
        },
        None => PageOutcome::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ExtractedDate;

    #[test]
    fn full_two_stage_evaluation() {
        let lines = vec![
            "HỢP ĐỒNG MUA BÁN",
            "Hôm nay ngày 15 tháng 03 năm 2023, hai bên ký hợp đồng",
        ];
        assert_eq!(
            evaluate_lines(&lines),
            PageOutcome::Found(ExtractedDate::from_ymd(15, 3, 2023).unwrap())
        );
    }

    #[test]
    fn context_without_numbers_is_blank_not_missing() {
        let lines = vec!["Điều 5: Hiệu lực", "Ngày ký: ... / ... / ......"];
        assert_eq!(evaluate_lines(&lines), PageOutcome::Blank);
    }

    #[test]
    fn no_context_at_all() {
        let lines = vec!["Điều 5: Hiệu lực", "Hai bên cam kết thực hiện"];
        assert_eq!(evaluate_lines(&lines), PageOutcome::NotFound);
    }
}
