use logos::Logos;

use crate::FacerError;
use crate::FacerResult;

/// Raw tokens produced by logos for one line of an interface description.
#[derive(Logos, Debug, PartialEq)]
enum RawToken {
	#[token("=")]
	Equals,
	#[token("(")]
	ParenOpen,
	#[token(")")]
	ParenClose,
	#[token(",")]
	Comma,
	#[regex(r"[ \t\r]+")]
	Whitespace,
	#[regex(r"#[^\n]*", allow_greedy = true)]
	Comment,
	#[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
	Ident,
	#[regex(r"-?[0-9]+")]
	Number,
	#[regex(r"0[xX][0-9a-fA-F]+")]
	HexNumber,
}

/// A structural token of an interface record. Numeric literals keep their
/// source spelling so ordinal values round-trip into generated output
/// unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
	Ident(String),
	Number(String),
	Equals,
	ParenOpen,
	ParenClose,
	Comma,
}

/// One logical record: a feature-type tag line plus any continuation lines
/// needed to close its parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Record {
	/// 1-indexed line number where the record starts.
	pub line: usize,
	pub tokens: Vec<Token>,
}

/// Tokenize an interface description into logical records. Blank lines and
/// `#` comment lines are skipped. A record whose parameter list has not
/// closed by end of line continues on the next line.
pub(crate) fn tokenize(source: &str) -> FacerResult<Vec<Record>> {
	let mut records: Vec<Record> = Vec::new();
	let mut current: Option<Record> = None;
	let mut depth = 0usize;

	for (index, raw_line) in source.lines().enumerate() {
		let line_number = index + 1;
		let trimmed = raw_line.trim();

		if current.is_none() {
			if trimmed.is_empty() || trimmed.starts_with('#') {
				continue;
			}
			current = Some(Record {
				line: line_number,
				tokens: Vec::new(),
			});
		}

		let Some(record) = current.as_mut() else {
			continue;
		};

		for (result, span) in RawToken::lexer(raw_line).spanned() {
			let token = match result {
				Ok(RawToken::Whitespace | RawToken::Comment) => continue,
				Ok(RawToken::Ident) => Token::Ident(raw_line[span].to_string()),
				Ok(RawToken::Number | RawToken::HexNumber) => {
					Token::Number(raw_line[span].to_string())
				}
				Ok(RawToken::Equals) => Token::Equals,
				Ok(RawToken::Comma) => Token::Comma,
				Ok(RawToken::ParenOpen) => {
					depth += 1;
					Token::ParenOpen
				}
				Ok(RawToken::ParenClose) => {
					depth = depth.saturating_sub(1);
					Token::ParenClose
				}
				Err(()) => {
					return Err(FacerError::Parse {
						line: line_number,
						message: format!("unrecognized input `{}`", &raw_line[span]),
					});
				}
			};
			record.tokens.push(token);
		}

		if depth == 0 {
			if let Some(record) = current.take() {
				records.push(record);
			}
		}
	}

	if let Some(record) = current {
		return Err(FacerError::Parse {
			line: record.line,
			message: "unterminated parameter list".to_string(),
		});
	}

	Ok(records)
}

/// Cursor over a record's tokens with positioned error reporting.
pub(crate) struct TokenCursor<'a> {
	tokens: &'a [Token],
	line: usize,
	position: usize,
}

impl<'a> TokenCursor<'a> {
	pub fn new(record: &'a Record) -> Self {
		Self {
			tokens: &record.tokens,
			line: record.line,
			position: 0,
		}
	}

	pub fn peek(&self) -> Option<&'a Token> {
		self.tokens.get(self.position)
	}

	pub fn next(&mut self) -> Option<&'a Token> {
		let token = self.tokens.get(self.position);
		if token.is_some() {
			self.position += 1;
		}
		token
	}

	pub fn is_done(&self) -> bool {
		self.position >= self.tokens.len()
	}

	pub fn error(&self, message: impl Into<String>) -> FacerError {
		FacerError::Parse {
			line: self.line,
			message: message.into(),
		}
	}

	pub fn expect_ident(&mut self, what: &str) -> FacerResult<String> {
		match self.next() {
			Some(Token::Ident(name)) => Ok(name.clone()),
			_ => Err(self.error(format!("expected {what}"))),
		}
	}

	pub fn expect_number(&mut self, what: &str) -> FacerResult<String> {
		match self.next() {
			Some(Token::Number(value)) => Ok(value.clone()),
			_ => Err(self.error(format!("expected {what}"))),
		}
	}

	pub fn expect(&mut self, token: &Token, what: &str) -> FacerResult<()> {
		match self.next() {
			Some(found) if found == token => Ok(()),
			_ => Err(self.error(format!("expected {what}"))),
		}
	}

	pub fn expect_end(&mut self) -> FacerResult<()> {
		if self.is_done() {
			Ok(())
		} else {
			Err(self.error("unexpected trailing input"))
		}
	}
}
