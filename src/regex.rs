//
//   Copyright 2016 Andrew Hunter
//
//   Licensed under the Apache License, Version 2.0 (the "License");
//   you may not use this file except in compliance with the License.
//   You may obtain a copy of the License at
//
//       http://www.apache.org/licenses/LICENSE-2.0
//
//   Unless required by applicable law or agreed to in writing, software
//   distributed under the License is distributed on an "AS IS" BASIS,
//   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//   See the License for the specific language governing permissions and
//   limitations under the License.
//

//!
//! # Regular expressions
//!
//! A `Regex` is the syntax tree of a regular expression. Expressions are written with one character per symbol and
//! these operators, from loosest to tightest binding:
//!
//! * `a|b` matches either side (the leftmost `|` splits the expression)
//! * `ab` matches one after the other (`.` or `•` may be written between the two, but doesn't have to be)
//! * `a*` matches any number of repetitions, `a+` at least one, `a?` at most one
//!
//! Parentheses group, whitespace is ignored, and `ε` or `&` match the empty string.
//!
//! ```
//! # use formlang::*;
//! let regex = Regex::parse("(a|b)* abb").unwrap();
//! assert!(regex.to_string() == "(a|b)*abb");
//! ```
//!
//! `Regex::to_automaton` (see the `aho_syntax_tree` module) compiles an expression directly into a DFA.
//!

use std::fmt;

use super::error::*;
use super::symbol::*;

/// Older spelling of the empty string in stored expressions
pub const LEGACY_EPSILON: char = '&';

///
/// Syntax tree of a regular expression
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Regex {
    /// Matches the empty string
    Epsilon,

    /// Matches a single symbol
    Literal(Symbol),

    /// Matches the first expression followed by the second
    Concat(Box<Regex>, Box<Regex>),

    /// Matches either expression
    Or(Box<Regex>, Box<Regex>),

    /// Matches any number of repetitions of an expression (Kleene closure)
    Closure(Box<Regex>)
}

use self::Regex::*;

impl Regex {
    ///
    /// Parses an expression
    ///
    pub fn parse(expression: &str) -> Result<Regex> {
        let tokens: Vec<(usize, char)> = expression.char_indices()
            .filter(|(_, c)| !c.is_whitespace())
            .map(|(position, c)| (position, if c == LEGACY_EPSILON { 'ε' } else { c }))
            .collect();

        let mut parser  = Parser { tokens: tokens, position: 0, end: expression.len() };
        let regex       = parser.alternation()?;

        match parser.peek() {
            None                => Ok(regex),
            Some((position, _)) => Err(Error::RegexSyntax { position: position, message: "unmatched ')'".to_string() })
        }
    }

    ///
    /// Creates a concatenation
    ///
    pub fn concat(first: Regex, second: Regex) -> Regex {
        Concat(Box::new(first), Box::new(second))
    }

    ///
    /// Creates an alternation
    ///
    pub fn or(first: Regex, second: Regex) -> Regex {
        Or(Box::new(first), Box::new(second))
    }

    ///
    /// Creates a Kleene closure
    ///
    pub fn closure(inner: Regex) -> Regex {
        Closure(Box::new(inner))
    }

    ///
    /// The symbols used by this expression, in the order they first appear
    ///
    pub fn alphabet(&self) -> Alphabet {
        let mut result = Alphabet::new();
        self.collect_symbols(&mut result);
        result
    }

    fn collect_symbols(&self, into: &mut Alphabet) {
        match self {
            Epsilon                     => { },
            Literal(symbol)             => { into.insert(symbol.clone()); },
            Concat(first, second)       |
            Or(first, second)           => { first.collect_symbols(into); second.collect_symbols(into); },
            Closure(inner)              => inner.collect_symbols(into)
        }
    }

    /// Binding strength when printing (higher binds tighter)
    fn precedence(&self) -> u32 {
        match self {
            Or(_, _)        => 0,
            Concat(_, _)    => 1,
            _               => 2
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter, min_precedence: u32) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Epsilon                 => f.write_str(EPSILON),
            Literal(symbol)         => write!(f, "{}", symbol),
            Or(first, second)       => write!(f, "{}|{}", first, second),
            Concat(first, second)   => { first.fmt_operand(f, 1)?; second.fmt_operand(f, 1) },
            Closure(inner)          => { inner.fmt_operand(f, 2)?; f.write_str("*") }
        }
    }
}

///
/// Recursive descent parser over the characters of an expression
///
struct Parser {
    tokens: Vec<(usize, char)>,
    position: usize,

    /// Position reported for errors at the end of the expression
    end: usize
}

impl Parser {
    fn peek(&self) -> Option<(usize, char)> {
        self.tokens.get(self.position).cloned()
    }

    fn error<T>(&self, message: &str) -> Result<T> {
        let position = self.peek().map(|(position, _)| position).unwrap_or(self.end);
        Err(Error::RegexSyntax { position: position, message: message.to_string() })
    }

    ///
    /// `concatenation ('|' alternation)?`
    ///
    fn alternation(&mut self) -> Result<Regex> {
        let first = self.concatenation()?;

        if let Some((_, '|')) = self.peek() {
            self.position += 1;
            let second = self.alternation()?;
            Ok(Regex::or(first, second))
        } else {
            Ok(first)
        }
    }

    ///
    /// A sequence of postfix terms; an empty sequence matches the empty string
    ///
    fn concatenation(&mut self) -> Result<Regex> {
        let mut result: Option<Regex> = None;

        loop {
            match self.peek() {
                None | Some((_, '|')) | Some((_, ')')) => break,

                Some((_, '.')) | Some((_, '•')) => {
                    if result.is_none() {
                        return self.error("concatenation has no left operand");
                    }
                    self.position += 1;

                    match self.peek() {
                        None | Some((_, '|')) | Some((_, ')')) => return self.error("concatenation has no right operand"),
                        _ => { }
                    }
                },

                _ => {
                    let term = self.postfix()?;
                    result = Some(match result {
                        None            => term,
                        Some(previous)  => Regex::concat(previous, term)
                    });
                }
            }
        }

        Ok(result.unwrap_or(Epsilon))
    }

    ///
    /// An atom followed by any number of `*`, `+` or `?`
    ///
    fn postfix(&mut self) -> Result<Regex> {
        let mut result = self.atom()?;

        while let Some((_, operator)) = self.peek() {
            result = match operator {
                '*' => Regex::closure(result),
                '+' => Regex::concat(result.clone(), Regex::closure(result)),
                '?' => Regex::or(result, Epsilon),
                _   => break
            };
            self.position += 1;
        }

        Ok(result)
    }

    fn atom(&mut self) -> Result<Regex> {
        match self.peek() {
            Some((_, '(')) => {
                self.position += 1;
                let inner = self.alternation()?;

                match self.peek() {
                    Some((_, ')'))  => { self.position += 1; Ok(inner) },
                    _               => self.error("missing ')'")
                }
            },

            Some((_, '*')) | Some((_, '+')) | Some((_, '?')) => self.error("operator has no operand"),

            Some((_, 'ε')) => {
                self.position += 1;
                Ok(Epsilon)
            },

            Some((_, c)) => {
                self.position += 1;
                Ok(Literal(Symbol::from(c)))
            },

            None => self.error("unexpected end of expression")
        }
    }
}

///
/// A named regular expression, as stored by the application
///
/// `definitions` are named sub-expressions. They are resolved by the caller before the expression reaches this library,
/// so they are carried along but not interpreted.
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RegularExpression {
    pub id: String,
    pub name: String,
    pub expression: String,
    pub definitions: Vec<(String, String)>,
    pub global_definitions: Vec<String>
}

impl RegularExpression {
    ///
    /// Parses the expression
    ///
    pub fn regex(&self) -> Result<Regex> {
        Regex::parse(&self.expression)
    }
}
