//! Cursor primitives the context and date grammars are built from.
//!
//! All grammars run over normalized text (see `normalize`), which is plain
//! lowercase ASCII: letters, digits, `/`, `:` and single spaces. That lets
//! the cursor work on bytes and keep captured digit groups as subslices.

/// A cheap, copyable position into a normalized string.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str, pos: usize) -> Self {
        Self { text, pos }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    /// Consumes the literal if it starts here.
    pub fn eat_lit(&mut self, lit: &str) -> bool {
        if self.text[self.pos..].starts_with(lit) {
            self.pos += lit.len();
            true
        } else {
            false
        }
    }

    /// Consumes a single byte if it matches.
    pub fn eat_byte(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consumes any run of spaces.
    pub fn eat_spaces(&mut self) {
        while self.peek() == Some(b' ') {
            self.pos += 1;
        }
    }

    /// Greedily consumes between `min` and `max` ASCII digits and returns the
    /// captured group. Greedy is safe for every grammar here: whatever follows
    /// a digit group can never begin with a digit, so a shorter capture could
    /// not rescue a failed match.
    pub fn eat_digits(&mut self, min: usize, max: usize) -> Option<&'a str> {
        let start = self.pos;
        while self.pos - start < max && self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos - start < min {
            self.pos = start;
            return None;
        }
        Some(&self.text[start..self.pos])
    }

    /// Consumes up to `max` digits; the group is optional.
    pub fn eat_opt_digits(&mut self, max: usize) {
        let _ = self.eat_digits(0, max);
    }

    /// Tolerates up to `max_noise` non-digit characters before `rest`
    /// succeeds, trying the shortest noise run first. Commits to the first
    /// run length under which `rest` matches.
    pub fn noise_then(
        &mut self,
        max_noise: usize,
        mut rest: impl FnMut(&mut Cursor<'a>) -> bool,
    ) -> bool {
        for skip in 0..=max_noise {
            let mut attempt = *self;
            let mut ok = true;
            for _ in 0..skip {
                match attempt.peek() {
                    Some(b) if !b.is_ascii_digit() => attempt.pos += 1,
                    _ => {
                        ok = false;
                        break;
                    }
                }
            }
            if !ok {
                break;
            }
            if rest(&mut attempt) {
                *self = attempt;
                return true;
            }
        }
        false
    }
}

/// Runs `matcher` at every start position until one accepts.
pub fn search(text: &str, mut matcher: impl FnMut(&mut Cursor<'_>) -> bool) -> bool {
    (0..=text.len()).any(|start| matcher(&mut Cursor::new(text, start)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_capture_is_greedy_and_bounded() {
        let mut c = Cursor::new("2024x", 0);
        assert_eq!(c.eat_digits(1, 2), Some("20"));
        assert_eq!(c.eat_digits(1, 2), Some("24"));
        assert_eq!(c.eat_digits(1, 2), None);
        assert!(c.eat_byte(b'x'));
    }

    #[test]
    fn noise_prefers_shortest_run() {
        let mut c = Cursor::new("ab/c", 0);
        assert!(c.noise_then(3, |c| c.eat_byte(b'/')));
        assert_eq!(c.pos(), 3);
    }

    #[test]
    fn noise_never_crosses_digits() {
        let mut c = Cursor::new("a1/b", 0);
        assert!(!c.noise_then(3, |c| c.eat_byte(b'/')));
    }

    #[test]
    fn search_tries_every_offset() {
        assert!(search("xx thang xx", |c| c.eat_lit("thang")));
        assert!(!search("xx thong xx", |c| c.eat_lit("thang")));
    }
}
