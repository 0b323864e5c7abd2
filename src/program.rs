use crate::error::SyntaxError;

pub(crate) const LESS: u8 = b'<';
pub(crate) const GREATER: u8 = b'>';
pub(crate) const MINUS: u8 = b'-';
pub(crate) const PLUS: u8 = b'+';
pub(crate) const DOT: u8 = b'.';
pub(crate) const LBRACKET: u8 = b'[';
pub(crate) const RBRACKET: u8 = b']';

/// Marks a bracket (or non-bracket) with no partner in the match table.
const UNMATCHED: usize = usize::MAX;

/// A Brainfuck program with its bracket partners resolved up front.
///
/// Decoding never fails. Unmatched brackets are only an error once the
/// machine actually tries to jump from one, so a program can run (and emit)
/// arbitrarily far before hitting a bad bracket.
pub struct Program<'a> {
    code: &'a [u8],
    bracket_match: Vec<usize>,
}

impl<'a> Program<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::from_bytes(source.as_bytes())
    }

    pub fn from_bytes(code: &'a [u8]) -> Self {
        Self {
            code,
            bracket_match: build_bracket_table(code),
        }
    }

    pub fn code(&self) -> &[u8] {
        self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Partner of the bracket at `offset`.
    ///
    /// Fails with a `SyntaxError` naming the bracket when depth counting runs
    /// off either end of the program without balancing.
    pub fn partner(&self, offset: usize) -> Result<usize, SyntaxError> {
        match self.bracket_match[offset] {
            UNMATCHED => Err(SyntaxError {
                offset,
                bracket: self.code[offset] as char,
            }),
            target => Ok(target),
        }
    }
}

/// Build a bracket-match lookup table for the program.
///
/// `result[i]` is the index of the bracket matching position `i`, or
/// `UNMATCHED` if `i` is an unmatched bracket or not a bracket at all.
/// Stack pairing gives the same partner as scanning with a depth counter.
fn build_bracket_table(code: &[u8]) -> Vec<usize> {
    let mut table = vec![UNMATCHED; code.len()];
    let mut stack = Vec::new();

    for (i, &byte) in code.iter().enumerate() {
        match byte {
            LBRACKET => stack.push(i),
            RBRACKET => {
                if let Some(open) = stack.pop() {
                    table[open] = i;
                    table[i] = open;
                }
            }
            _ => {}
        }
    }

    table
}
