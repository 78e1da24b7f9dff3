//! Parser for the edit-script language.
//!
//! Grammar (whitespace between tokens is ignored):
//!
//! ```text
//! script   := command ((';' | '\n') command)*
//! command  := address? op
//! address  := simple? (',' simple?)?
//! simple   := '.' | '$' | '#' digits | digits | '/' regex '/'
//! op       := 'a' text | 'i' text | 'c' text | 'd' | 'p'
//!           | 's' regex text 'g'? | 'x' regex command
//! ```
//!
//! `text` and `regex` are delimited by the character following the command
//! letter. The closing delimiter may be omitted at the end of a line.

use regex::bytes::Regex;

use crate::error::CompileError;

/// A parsed address.
#[derive(Debug, Clone)]
pub(crate) enum Address {
    Dot,
    End,
    Byte(usize),
    Line(usize),
    Pattern(Regex),
    Range(Option<Box<Address>>, Option<Box<Address>>),
}

/// A parsed operation.
#[derive(Debug, Clone)]
pub(crate) enum Op {
    Append(Vec<u8>),
    Insert(Vec<u8>),
    Change(Vec<u8>),
    Delete,
    Print,
    Substitute {
        pattern: Regex,
        replacement: Vec<u8>,
        global: bool,
    },
    Loop {
        pattern: Regex,
        body: Box<Command>,
    },
}

/// One addressed operation.
#[derive(Debug, Clone)]
pub(crate) struct Command {
    pub(crate) address: Option<Address>,
    pub(crate) op: Op,
}

/// Parses a whole script into its command sequence.
pub(crate) fn parse(src: &str) -> Result<Vec<Command>, CompileError> {
    let mut parser = Parser { src, pos: 0 };
    let mut commands = Vec::new();
    loop {
        parser.skip_separators();
        if parser.at_end() {
            break;
        }
        commands.push(parser.command()?);
        parser.skip_blanks();
        match parser.peek() {
            None | Some(';' | '\n') => {}
            Some(_) => return Err(parser.expected("';' or newline")),
        }
    }
    if commands.is_empty() {
        return Err(CompileError::Empty);
    }
    Ok(commands)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn rest(&self) -> &str {
        self.src.get(self.pos..).unwrap_or("")
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.rest().is_empty()
    }

    fn expected(&self, expected: &'static str) -> CompileError {
        CompileError::Expected {
            expected,
            offset: self.pos,
        }
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.bump();
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | ';')) {
            self.bump();
        }
    }

    fn command(&mut self) -> Result<Command, CompileError> {
        self.skip_blanks();
        let address = self.address()?;
        self.skip_blanks();
        let offset = self.pos;
        let letter = self.bump().ok_or_else(|| self.expected("command"))?;
        let op = match letter {
            'a' => Op::Append(self.text()?),
            'i' => Op::Insert(self.text()?),
            'c' => Op::Change(self.text()?),
            'd' => Op::Delete,
            'p' => Op::Print,
            's' => self.substitute()?,
            'x' => {
                let pattern = self.pattern()?;
                let body = Box::new(self.command()?);
                Op::Loop { pattern, body }
            }
            command => return Err(CompileError::UnknownCommand { command, offset }),
        };
        Ok(Command { address, op })
    }

    fn address(&mut self) -> Result<Option<Address>, CompileError> {
        let first = self.simple_address()?;
        self.skip_blanks();
        if self.peek() != Some(',') {
            return Ok(first);
        }
        self.bump();
        self.skip_blanks();
        let second = self.simple_address()?;
        Ok(Some(Address::Range(
            first.map(Box::new),
            second.map(Box::new),
        )))
    }

    fn simple_address(&mut self) -> Result<Option<Address>, CompileError> {
        let address = match self.peek() {
            Some('.') => {
                self.bump();
                Address::Dot
            }
            Some('$') => {
                self.bump();
                Address::End
            }
            Some('#') => {
                self.bump();
                Address::Byte(self.number()?)
            }
            Some(c) if c.is_ascii_digit() => Address::Line(self.number()?),
            Some('/') => Address::Pattern(self.pattern()?),
            _ => return Ok(None),
        };
        Ok(Some(address))
    }

    fn number(&mut self) -> Result<usize, CompileError> {
        let offset = self.pos;
        let digits: String = self.rest().chars().take_while(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(self.expected("digits"));
        }
        self.pos += digits.len();
        digits
            .parse::<usize>()
            .map_err(|_| CompileError::Number { offset })
    }

    /// Reads a delimited segment, returning the raw characters and whether
    /// escapes of the delimiter were removed.
    fn delimited(&mut self, delim: char, keep_escapes: bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == delim {
                self.bump();
                break;
            }
            if c == '\n' {
                break;
            }
            self.bump();
            if c != '\\' {
                out.push(c);
                continue;
            }
            match self.bump() {
                Some(next) if next == delim => out.push(next),
                Some('n') if !keep_escapes => out.push('\n'),
                Some('t') if !keep_escapes => out.push('\t'),
                Some('\\') if !keep_escapes => out.push('\\'),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        }
        out
    }

    fn delimiter(&mut self) -> Result<char, CompileError> {
        match self.peek() {
            Some(c) if !c.is_alphanumeric() && !c.is_whitespace() && c != '\\' => {
                self.bump();
                Ok(c)
            }
            _ => Err(self.expected("delimiter")),
        }
    }

    fn text(&mut self) -> Result<Vec<u8>, CompileError> {
        let delim = self.delimiter()?;
        Ok(self.delimited(delim, false).into_bytes())
    }

    fn pattern(&mut self) -> Result<Regex, CompileError> {
        let offset = self.pos;
        let delim = self.delimiter()?;
        let raw = self.delimited(delim, true);
        if raw.is_empty() {
            return Err(self.expected("non-empty pattern"));
        }
        Regex::new(&raw).map_err(|source| CompileError::Regex { offset, source })
    }

    fn substitute(&mut self) -> Result<Op, CompileError> {
        let offset = self.pos;
        let delim = self.delimiter()?;
        let raw = self.delimited(delim, true);
        if raw.is_empty() {
            return Err(self.expected("non-empty pattern"));
        }
        let pattern =
            Regex::new(&raw).map_err(|source| CompileError::Regex { offset, source })?;
        let replacement = self.delimited(delim, false).into_bytes();
        let global = self.peek() == Some('g');
        if global {
            self.bump();
        }
        Ok(Op::Substitute {
            pattern,
            replacement,
            global,
        })
    }
}
