//! Lexer for SVG path data.
//!
//! Turns a `d` attribute into a stream of [`PathCommand`]s. Malformed
//! commands become errors in the stream instead of stopping the scan, so the
//! caller can skip them and keep the rest of the path.

use crate::command::{arity, implicit_successor, PathCommand};
use crate::error::PathError;

const COMMAND_LETTERS: &[u8] = b"MmLlHhVvCcSsQqTtAaZz";

fn is_command_letter(c: u8) -> bool {
    COMMAND_LETTERS.contains(&c)
}

/// Byte cursor over path data.
pub struct Scanner<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.src.get(self.pos + ahead).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    /// Skip whitespace and commas.
    pub fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace() || c == b',') {
            self.bump();
        }
    }

    pub fn at_number_start(&self) -> bool {
        matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == b'.' || c == b'+' || c == b'-')
    }

    /// Read one number greedily.
    ///
    /// A number ends at a separator, a command letter, a sign that does not
    /// follow an exponent marker, or a second decimal point, so `-1-2` and
    /// `.6.3` are each two numbers.
    pub fn read_number(&mut self) -> Option<f64> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.bump();
        }
        let mut digits = self.eat_digits();
        if self.peek() == Some(b'.') {
            self.bump();
            digits += self.eat_digits();
        }
        if digits == 0 {
            self.pos = start;
            return None;
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let sign = usize::from(matches!(self.peek_at(1), Some(b'+' | b'-')));
            if matches!(self.peek_at(1 + sign), Some(c) if c.is_ascii_digit()) {
                self.pos += 1 + sign;
                self.eat_digits();
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).ok()?;
        match text.parse::<f64>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.pos = start;
                None
            }
        }
    }

    /// Read a single-character arc flag (`0` or `1`).
    pub fn read_flag(&mut self) -> Option<bool> {
        let flag = match self.peek()? {
            b'0' => false,
            b'1' => true,
            _ => return None,
        };
        self.bump();
        Some(flag)
    }

    /// Skip ahead to the next command letter.
    pub fn skip_to_command(&mut self) {
        while matches!(self.peek(), Some(c) if !is_command_letter(c)) {
            self.bump();
        }
    }

    fn eat_digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        self.pos - start
    }
}

/// Scan path data into commands, in order. Errors mark commands that were
/// skipped.
pub fn parse_commands(d: &str) -> Vec<Result<PathCommand, PathError>> {
    let mut scanner = Scanner::new(d);
    let mut out = Vec::new();
    let mut previous: Option<char> = None;

    loop {
        scanner.skip_separators();
        let Some(c) = scanner.peek() else {
            break;
        };
        let offset = scanner.offset();

        let letter = if is_command_letter(c) {
            scanner.bump();
            c as char
        } else if scanner.at_number_start() {
            match previous {
                Some(p) if arity(p).unwrap_or(0) > 0 => implicit_successor(p),
                _ => {
                    out.push(Err(PathError::UnexpectedNumber { offset }));
                    scanner.skip_to_command();
                    continue;
                }
            }
        } else {
            out.push(Err(PathError::UnknownCommand {
                letter: d[offset..].chars().next().unwrap_or('?'),
                offset,
            }));
            scanner.bump();
            scanner.skip_to_command();
            previous = None;
            continue;
        };

        let expected = arity(letter).unwrap_or(0);
        let is_arc = letter.eq_ignore_ascii_case(&'a');
        let mut args = Vec::with_capacity(expected);
        for i in 0..expected {
            scanner.skip_separators();
            let value = if is_arc && (i == 3 || i == 4) {
                scanner.read_flag().map(f64::from)
            } else {
                scanner.read_number()
            };
            match value {
                Some(v) => args.push(v),
                None => break,
            }
        }

        match PathCommand::from_letter(letter, &args) {
            Some(command) => {
                out.push(Ok(command));
                previous = Some(letter);
            }
            None => {
                out.push(Err(PathError::Arity {
                    command: letter,
                    offset,
                    expected,
                    found: args.len(),
                }));
                scanner.skip_to_command();
                previous = None;
            }
        }
    }

    out
}
