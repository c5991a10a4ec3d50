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
//! # Symbols
//!
//! Automata, grammars and regular expressions all work over opaque string tokens. A symbol is usually a single character
//! (`a`, `0`, `S`) but nothing requires this: `id` or `q1,q2` are equally valid symbols.
//!
//! Two symbols are reserved. `EPSILON` stands for the empty string and `EMPTY` for the empty language.
//!
//! ```
//! # use formlang::*;
//! let abb = word("abb");
//! assert!(abb == vec![Symbol::from("a"), Symbol::from("b"), Symbol::from("b")]);
//! ```
//!

use std::borrow::Borrow;
use std::fmt;

use indexmap::IndexSet;
use serde_derive::{Serialize, Deserialize};

/// The empty string
pub const EPSILON: &str = "ε";

/// The empty language
pub const EMPTY: &str = "∅";

/// Marks the end of the input in FOLLOW sets and LL(1) tables
pub const END_OF_INPUT: &str = "$";

///
/// An atomic symbol of an alphabet
///
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

///
/// An ordered set of symbols
///
/// Iteration follows insertion order, but two alphabets with the same symbols compare equal.
///
pub type Alphabet = IndexSet<Symbol>;

impl Symbol {
    ///
    /// Creates a new symbol
    ///
    pub fn new<S: Into<String>>(name: S) -> Symbol {
        Symbol(name.into())
    }

    ///
    /// The empty string symbol
    ///
    pub fn epsilon() -> Symbol {
        Symbol::new(EPSILON)
    }

    ///
    /// The end of input marker
    ///
    pub fn end_of_input() -> Symbol {
        Symbol::new(END_OF_INPUT)
    }

    /// True if this is the empty string symbol
    #[inline]
    pub fn is_epsilon(&self) -> bool {
        self.0 == EPSILON
    }

    /// The text of this symbol
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'a> From<&'a str> for Symbol {
    fn from(name: &'a str) -> Symbol {
        Symbol::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Symbol {
        Symbol(name)
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Symbol {
        Symbol(c.to_string())
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

///
/// Splits a string into a word made up of one symbol per character
///
pub fn word(text: &str) -> Vec<Symbol> {
    text.chars().map(Symbol::from).collect()
}

///
/// Creates an alphabet from a list of symbol names
///
pub fn alphabet<'a, Names: IntoIterator<Item=&'a str>>(names: Names) -> Alphabet {
    names.into_iter().map(Symbol::from).collect()
}

///
/// Joins a sorted set of names into the canonical name of a composite state (`q1,q2`)
///
pub fn composite_name<'a, Names: IntoIterator<Item=&'a String>>(names: Names) -> String {
    let mut sorted: Vec<&String> = names.into_iter().collect();
    sorted.sort();
    sorted.dedup();

    let parts: Vec<&str> = sorted.into_iter().map(|name| name.as_str()).collect();
    parts.join(",")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn epsilon_is_recognised() {
        assert!(Symbol::epsilon().is_epsilon());
        assert!(!Symbol::from("a").is_epsilon());
    }

    #[test]
    fn word_splits_characters() {
        assert!(word("ab") == vec![Symbol::from('a'), Symbol::from('b')]);
        assert!(word("").is_empty());
    }

    #[test]
    fn alphabets_compare_as_sets() {
        assert!(alphabet(vec!["a", "b"]) == alphabet(vec!["b", "a"]));
    }

    #[test]
    fn composite_names_are_sorted() {
        let names = vec!["q2".to_string(), "q1".to_string(), "q2".to_string()];

        assert!(composite_name(&names) == "q1,q2");
    }

    #[test]
    fn symbol_serializes_as_string() {
        let json = serde_json::to_string(&Symbol::from("a")).unwrap();

        assert!(json == "\"a\"");
    }
}
