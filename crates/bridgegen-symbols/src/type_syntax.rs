//! Parser for type references written in C# syntax.
//!
//! Graph documents spell every type the way source code does:
//! `global::Demo.Container<T>[]`, `int?`, `byte*`, `delegate*<int, void>`.
//! The parser produces unresolved syntax; the loader binds names.

use bridgegen_common::limits::MAX_TYPE_SYNTAX_DEPTH;
use thiserror::Error;

/// One dotted segment of a type name with its own type arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameSegment {
    pub name: String,
    pub args: Vec<TypeSyntax>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeSyntax {
    /// `A.B<C>.D`, possibly `global::`-qualified. Keywords appear as a
    /// single unqualified segment.
    Name {
        global: bool,
        segments: Vec<NameSegment>,
    },
    Array {
        element: Box<TypeSyntax>,
        rank: u8,
    },
    Pointer(Box<TypeSyntax>),
    /// `T?`
    Nullable(Box<TypeSyntax>),
    FunctionPointer {
        params: Vec<TypeSyntax>,
        ret: Box<TypeSyntax>,
    },
}

impl TypeSyntax {
    /// Keyword or simple identifier with no qualification or arguments.
    #[must_use]
    pub fn as_simple_name(&self) -> Option<&str> {
        match self {
            Self::Name {
                global: false,
                segments,
            } if segments.len() == 1 && segments[0].args.is_empty() => {
                Some(segments[0].name.as_str())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid type syntax '{text}' at offset {offset}: {reason}")]
pub struct TypeSyntaxError {
    pub text: String,
    pub offset: usize,
    pub reason: &'static str,
}

/// Parse a complete type reference.
pub fn parse_type(text: &str) -> Result<TypeSyntax, TypeSyntaxError> {
    let mut parser = Parser {
        text,
        pos: 0,
        depth: 0,
    };
    let ty = parser.parse_type()?;
    parser.skip_whitespace();
    if parser.pos != text.len() {
        return Err(parser.error("unexpected trailing characters"));
    }
    Ok(ty)
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    depth: u32,
}

impl Parser<'_> {
    fn error(&self, reason: &'static str) -> TypeSyntaxError {
        TypeSyntaxError {
            text: self.text.to_string(),
            offset: self.pos,
            reason,
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        self.skip_whitespace();
        if self.text[self.pos..].starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char, reason: &'static str) -> Result<(), TypeSyntaxError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(reason))
        }
    }

    fn identifier(&mut self) -> Result<String, TypeSyntaxError> {
        self.skip_whitespace();
        let start = self.pos;
        // `@` escapes keywords used as identifiers.
        if self.peek() == Some('@') {
            self.pos += 1;
        }
        let body_start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        if self.pos == body_start
            || self.text[body_start..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit())
        {
            self.pos = start;
            return Err(self.error("expected identifier"));
        }
        Ok(self.text[body_start..self.pos].to_string())
    }

    fn parse_type(&mut self) -> Result<TypeSyntax, TypeSyntaxError> {
        self.depth += 1;
        if self.depth > MAX_TYPE_SYNTAX_DEPTH {
            return Err(self.error("type nesting too deep"));
        }
        let mut ty = self.parse_primary()?;
        loop {
            if self.eat('?') {
                ty = TypeSyntax::Nullable(Box::new(ty));
            } else if self.eat('*') {
                ty = TypeSyntax::Pointer(Box::new(ty));
            } else if self.eat('[') {
                // `int[][,]` is a one-dimensional array of `int[,]`: the first
                // rank specifier of a run is the outermost array.
                let mut ranks = vec![self.rank_specifier()?];
                while self.eat('[') {
                    ranks.push(self.rank_specifier()?);
                }
                for rank in ranks.into_iter().rev() {
                    ty = TypeSyntax::Array {
                        element: Box::new(ty),
                        rank,
                    };
                }
            } else {
                break;
            }
        }
        self.depth -= 1;
        Ok(ty)
    }

    /// The rest of a rank specifier after its `[`: commas, then `]`.
    fn rank_specifier(&mut self) -> Result<u8, TypeSyntaxError> {
        let mut rank: u8 = 1;
        while self.eat(',') {
            rank = rank
                .checked_add(1)
                .ok_or_else(|| self.error("array rank too large"))?;
        }
        self.expect(']', "expected ']'")?;
        Ok(rank)
    }

    fn parse_primary(&mut self) -> Result<TypeSyntax, TypeSyntaxError> {
        if self.peek_identifier_is("delegate") {
            self.pos += "delegate".len();
            if !self.eat('*') {
                return Err(self.error("expected '*' after 'delegate'"));
            }
            // Calling convention (`managed`, `unmanaged[Cdecl]`) is not modelled.
            if self.peek_identifier_is("managed") || self.peek_identifier_is("unmanaged") {
                self.identifier()?;
                if self.eat('[') {
                    while !self.eat(']') {
                        if self.peek().is_none() {
                            return Err(self.error("unterminated calling convention"));
                        }
                        self.pos += 1;
                    }
                }
            }
            self.expect('<', "expected '<' in function pointer type")?;
            let mut types = self.parse_type_list('>')?;
            let ret = types
                .pop()
                .ok_or_else(|| self.error("function pointer needs a return type"))?;
            return Ok(TypeSyntax::FunctionPointer {
                params: types,
                ret: Box::new(ret),
            });
        }

        let global = self.eat_str("global::");
        let mut segments = Vec::new();
        loop {
            let name = self.identifier()?;
            let args = if self.eat('<') {
                self.parse_type_list('>')?
            } else {
                Vec::new()
            };
            segments.push(NameSegment { name, args });
            if !self.eat('.') {
                break;
            }
        }
        Ok(TypeSyntax::Name { global, segments })
    }

    fn peek_identifier_is(&mut self, word: &str) -> bool {
        self.skip_whitespace();
        let rest = &self.text[self.pos..];
        rest.starts_with(word)
            && !rest[word.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
    }

    fn parse_type_list(&mut self, close: char) -> Result<Vec<TypeSyntax>, TypeSyntaxError> {
        let mut types = vec![self.parse_type()?];
        while self.eat(',') {
            types.push(self.parse_type()?);
        }
        self.expect(close, "unterminated type argument list")?;
        Ok(types)
    }
}

#[cfg(test)]
#[path = "tests/type_syntax_tests.rs"]
mod tests;
