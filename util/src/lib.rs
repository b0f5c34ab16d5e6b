#![deny(missing_docs)]
//! This lib provide the byte scanner used by the `siphdr` codecs.

use std::str;

pub mod macros;
pub mod util;

type Result<T> = std::result::Result<T, Error>;

/// A line and column in the scanned input, both starting from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Current line.
    line: usize,
    /// Current column.
    col: usize,
}

impl Position {
    /// Returns the current line.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the current column.
    pub fn col(&self) -> usize {
        self.col
    }
}

/// Reading byte slice while keep the line and column.
#[derive(Debug)]
pub struct Scanner<'a> {
    /// The input bytes slice to be read.
    src: &'a [u8],
    /// Current position
    pos: Position,
    /// Current index.
    idx: usize,
}

impl<'a> Scanner<'a> {
    /// Create a `Scanner` from a byte slice.
    ///
    /// The `line` and `col` will always start from 1.
    pub const fn new(src: &'a [u8]) -> Self {
        Scanner {
            src,
            pos: Position { line: 1, col: 1 },
            idx: 0,
        }
    }

    /// Returns the current line and column.
    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// Returns the byte offset of the next byte to be read.
    #[inline]
    pub fn offset(&self) -> usize {
        self.idx
    }

    /// Returns `true` if all bytes where read
    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.idx >= self.src.len()
    }

    /// Get next byte without advance
    #[inline]
    pub fn peek(&self) -> Option<&u8> {
        self.src.get(self.idx)
    }

    /// `read_while()` will call the `func` closure for
    /// each element in the slice and advance
    /// while the closure returns `true`.
    ///
    /// # Returns
    ///
    /// A slice of bytes from the starting position to the position
    /// where the closure `func` returns `false` or the end of the slice
    /// is reached.
    #[inline(always)]
    pub fn read_while<F>(&mut self, func: F) -> &'a [u8]
    where
        F: Fn(u8) -> bool,
    {
        let start = self.idx;
        let src = self.src;
        let len = src.len();

        while self.idx < len && func(src[self.idx]) {
            self.bump(src[self.idx]);
        }

        &src[start..self.idx]
    }

    /// Same as [Scanner::read_while] but will return the
    /// slice of bytes converted to a string slice.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Utf8`] if the bytes read are not
    /// valid UTF-8.
    pub fn read_str<F>(&mut self, func: F) -> Result<&'a str>
    where
        F: Fn(u8) -> bool,
    {
        let bytes = self.read_while(func);

        str::from_utf8(bytes).or_else(|_| self.error(ErrorKind::Utf8))
    }

    /// Read next byte if equals to `b`.
    ///
    /// # Errors
    ///
    /// This method will return an error if the byte is not
    /// equal to `b`.
    ///
    /// If the slice reached the end, then an error will
    /// also be returned.
    pub fn must_read(&mut self, b: u8) -> Result<()> {
        let Some(&n) = self.peek() else {
            return self.error(ErrorKind::Eof);
        };
        if b != n {
            return self.error(ErrorKind::Char { expected: b, found: n });
        }
        self.next();
        Ok(())
    }

    /// Read the bytes enclosed by `delim`, e.g, a quoted string.
    ///
    /// The next byte must be `delim`. Both delimiters are
    /// consumed and only the enclosed bytes are returned.
    pub fn read_between(&mut self, delim: u8) -> Result<&'a [u8]> {
        self.must_read(delim)?;
        let value = self.read_while(|b| b != delim);
        if self.is_eof() {
            return self.error(ErrorKind::Unterminated(delim));
        }
        self.next();

        Ok(value)
    }

    /// Read number in the slice.
    ///
    /// This method read until an invalid digit is found.
    pub fn read_num<N>(&mut self) -> Result<N>
    where
        N: lexical_core::FromLexical,
    {
        match lexical_core::parse_partial::<N>(self.remaining()) {
            Ok((value, readed)) if readed > 0 => {
                self.nth(readed - 1);
                Ok(value)
            }
            _ => self.error(ErrorKind::Num),
        }
    }

    /// Call the `func` closure for next byte and read it if
    /// the closure returns `true`.
    ///
    /// # Returns
    ///
    /// The byte readed.
    #[inline(always)]
    pub fn consume_if<F>(&mut self, func: F) -> Option<u8>
    where
        F: FnOnce(u8) -> bool,
    {
        match self.peek() {
            Some(&matched) if func(matched) => {
                self.bump(matched);
                Some(matched)
            }
            _ => None,
        }
    }

    /// Read the next byte if it is equal to `byte`.
    #[inline]
    pub fn advance_if_eq(&mut self, byte: u8) -> Option<u8> {
        self.consume_if(|b| b == byte)
    }

    #[inline(always)]
    fn bump(&mut self, byte: u8) {
        if byte == b'\n' {
            self.pos.col = 1;
            self.pos.line += 1;
        } else {
            self.pos.col += 1;
        }
        self.idx += 1;
    }

    /// Get the bytes not read yet.
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.src[self.idx..]
    }

    /// Yields an error of `kind` at the current position.
    pub fn error<T>(&self, kind: ErrorKind) -> Result<T> {
        Err(Error {
            kind,
            line: self.pos.line,
            col: self.pos.col,
        })
    }
}

/// Errors that can occur while reading the src.
#[derive(Debug, PartialEq, Eq, Clone, Copy, thiserror::Error)]
pub enum ErrorKind {
    /// End of file reached.
    #[error("unexpected end of input")]
    Eof,
    /// Found a byte other than the expected one.
    #[error("expected '{}', found '{}'", char::from(*.expected), char::from(*.found))]
    Char {
        /// The byte that should be read.
        expected: u8,
        /// The byte actually found.
        found: u8,
    },
    /// A delimited value was never closed.
    #[error("missing closing '{}'", char::from(*.0))]
    Unterminated(u8),
    /// Invalid number.
    #[error("invalid number")]
    Num,
    /// Invalid UTF-8 sequence.
    #[error("invalid utf-8")]
    Utf8,
}

/// An scanner error with the position where it happened.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
#[error("{kind} at line {line} column {col}")]
pub struct Error {
    /// What went wrong.
    pub kind: ErrorKind,
    /// The line where the error occurred.
    pub line: usize,
    /// The column where the error occurred.
    pub col: usize,
}

impl Iterator for Scanner<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        self.src.get(self.idx).copied().inspect(|&byte| self.bump(byte))
    }
}
