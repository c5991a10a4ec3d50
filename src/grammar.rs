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
//! # Grammars
//!
//! A `Grammar` is made up of a set of non-terminal symbols, a set of terminal symbols, a start symbol and a set of
//! production rules. Each rule rewrites a head (a word containing at least one symbol) into one of several bodies.
//! An empty body is the empty string, written `ε`.
//!
//! Grammars can be written down as text, with one line per head:
//!
//! ```
//! # use formlang::*;
//! let grammar: Grammar = "S -> a S b | ε".parse().unwrap();
//!
//! assert!(grammar.start() == &Symbol::from("S"));
//! assert!(grammar.check_own_type() == GrammarType::ContextFree);
//! ```
//!
//! If any head or body contains whitespace, every head and body is split into symbols on whitespace (so `id` can be a
//! single symbol). Otherwise each character is a symbol, and `aSb` means the same as `a S b` would. In that compact
//! form a prime sticks to the character before it, so `aE'` is `a` followed by `E'`.
//! A head made of a single symbol names a non-terminal. In a longer head, such as the `cB` of `cB -> Bc`, a symbol is
//! a non-terminal if it is the whole head of some other line, or if it starts with a capital letter or ends in a
//! prime. Every other symbol is a terminal. The first non-terminal to appear in a head is the start symbol.
//!

use std::fmt;
use std::slice;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use serde_derive::{Serialize, Deserialize};

use super::error::*;
use super::regex::LEGACY_EPSILON;
use super::symbol::*;

///
/// A sequence of symbols: the head or body of a production
///
pub type GrammarWord = Vec<Symbol>;

///
/// The bodies for each head of a grammar
///
pub type Productions = IndexMap<GrammarWord, IndexSet<GrammarWord>>;

///
/// The bodies for each head of a context-free grammar, where every head is a single symbol
///
pub(crate) type RuleTable = IndexMap<Symbol, IndexSet<GrammarWord>>;

///
/// Classes of the Chomsky hierarchy
///
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrammarType {
    Regular,
    ContextFree,
    ContextSensitive,
    Unrestricted
}

impl fmt::Display for GrammarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            GrammarType::Regular            => "REGULAR",
            GrammarType::ContextFree        => "CONTEXT_FREE",
            GrammarType::ContextSensitive   => "CONTEXT_SENSITIVE",
            GrammarType::Unrestricted       => "UNRESTRICTED"
        })
    }
}

///
/// An immutable formal grammar
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grammar {
    non_terminals: Alphabet,
    terminals: Alphabet,
    start: Symbol,
    rules: Productions
}

impl Grammar {
    ///
    /// Creates a grammar from a list of `(head, body)` productions
    ///
    /// Bodies for the same head are merged. `EPSILON` symbols are dropped from bodies, so a body of just `ε` becomes the
    /// empty body. The start symbol must be a non-terminal and every symbol in a production must be declared.
    ///
    pub fn new<Rules>(non_terminals: Alphabet, terminals: Alphabet, start: Symbol, rules: Rules) -> Result<Grammar>
    where Rules: IntoIterator<Item=(GrammarWord, GrammarWord)> {
        if !non_terminals.contains(&start) {
            return Err(Error::StartSymbolNotNonTerminal(start));
        }

        let mut productions = Productions::new();
        for (head, body) in rules {
            if head.is_empty() {
                return Err(Error::EmptyHead);
            }

            let body: GrammarWord = body.into_iter().filter(|symbol| !symbol.is_epsilon()).collect();

            for symbol in head.iter().chain(body.iter()) {
                if !non_terminals.contains(symbol) && !terminals.contains(symbol) {
                    return Err(Error::UndeclaredSymbol(symbol.clone()));
                }
            }

            productions.entry(head).or_insert_with(IndexSet::new).insert(body);
        }

        Ok(Grammar { non_terminals: non_terminals, terminals: terminals, start: start, rules: productions })
    }

    ///
    /// Assembles a context-free grammar from a rule table
    ///
    /// Heads with no bodies are left out, and any head that isn't already a non-terminal is added to the non-terminals.
    ///
    pub(crate) fn from_rule_table(non_terminals: Alphabet, terminals: Alphabet, start: Symbol, table: RuleTable) -> Grammar {
        let mut non_terminals = non_terminals;
        non_terminals.extend(table.keys().cloned());

        let rules = table.into_iter()
            .filter(|(_, bodies)| !bodies.is_empty())
            .map(|(head, bodies)| (vec![head], bodies))
            .collect();

        Grammar { non_terminals: non_terminals, terminals: terminals, start: start, rules: rules }
    }

    ///
    /// The rules of this grammar with single-symbol heads, keyed by that symbol
    ///
    pub(crate) fn rule_table(&self) -> RuleTable {
        self.rules.iter()
            .filter(|(head, _)| head.len() == 1)
            .map(|(head, bodies)| (head[0].clone(), bodies.clone()))
            .collect()
    }

    ///
    /// Returns a grammar with the same symbols as this one but a different set of context-free rules
    ///
    pub(crate) fn with_rule_table(&self, table: RuleTable) -> Grammar {
        Grammar::from_rule_table(self.non_terminals.clone(), self.terminals.clone(), self.start.clone(), table)
    }

    /// The non-terminal symbols
    #[inline]
    pub fn non_terminals(&self) -> &Alphabet {
        &self.non_terminals
    }

    /// The terminal symbols
    #[inline]
    pub fn terminals(&self) -> &Alphabet {
        &self.terminals
    }

    /// The start symbol
    #[inline]
    pub fn start(&self) -> &Symbol {
        &self.start
    }

    /// The production rules
    #[inline]
    pub fn rules(&self) -> &Productions {
        &self.rules
    }

    #[inline]
    pub fn is_terminal(&self, symbol: &Symbol) -> bool {
        self.terminals.contains(symbol)
    }

    #[inline]
    pub fn is_non_terminal(&self, symbol: &Symbol) -> bool {
        self.non_terminals.contains(symbol)
    }

    ///
    /// The bodies of the rules whose head is exactly `head`
    ///
    pub fn bodies_of(&self, head: &Symbol) -> Option<&IndexSet<GrammarWord>> {
        self.rules.get(slice::from_ref(head))
    }

    ///
    /// Every symbol declared by this grammar
    ///
    pub fn symbols(&self) -> impl Iterator<Item=&Symbol> {
        self.non_terminals.iter().chain(self.terminals.iter())
    }

    ///
    /// Works out where this grammar sits in the Chomsky hierarchy
    ///
    /// A grammar is context-free if every head is a single non-terminal. It's regular if, in addition, every body is a
    /// terminal or a terminal followed by a non-terminal. A grammar that isn't context-free is context-sensitive if no
    /// rule has a body shorter than its head.
    ///
    /// In both the regular and the context-sensitive cases the only empty body allowed is one for the start symbol, and
    /// then only if the start symbol appears in no body.
    ///
    pub fn check_own_type(&self) -> GrammarType {
        let start_in_body       = self.rules.values().flatten().any(|body| body.contains(&self.start));
        let allowed_epsilon     = |head: &GrammarWord| !start_in_body && head.len() == 1 && head[0] == self.start;

        let context_free = self.rules.keys().all(|head| head.len() == 1 && self.is_non_terminal(&head[0]));

        if context_free {
            let regular = self.rules.iter().all(|(head, bodies)| bodies.iter().all(|body| match body.len() {
                0 => allowed_epsilon(head),
                1 => self.is_terminal(&body[0]),
                2 => self.is_terminal(&body[0]) && self.is_non_terminal(&body[1]),
                _ => false
            }));

            if regular { GrammarType::Regular } else { GrammarType::ContextFree }
        } else {
            let context_sensitive = self.rules.iter().all(|(head, bodies)| bodies.iter().all(|body| {
                if body.is_empty() {
                    allowed_epsilon(head)
                } else {
                    body.len() >= head.len()
                }
            }));

            if context_sensitive { GrammarType::ContextSensitive } else { GrammarType::Unrestricted }
        }
    }

    ///
    /// Fails with `Error::GrammarType` unless this grammar is regular
    ///
    pub(crate) fn require_regular(&self, operation: &'static str) -> Result<()> {
        match self.check_own_type() {
            GrammarType::Regular    => Ok(()),
            found                   => Err(Error::GrammarType { operation: operation, expected: GrammarType::Regular, found: found })
        }
    }

    ///
    /// Fails with `Error::GrammarType` unless this grammar is context-free (regular grammars are context-free too)
    ///
    pub(crate) fn require_context_free(&self, operation: &'static str) -> Result<()> {
        match self.check_own_type() {
            GrammarType::Regular | GrammarType::ContextFree => Ok(()),
            found => Err(Error::GrammarType { operation: operation, expected: GrammarType::ContextFree, found: found })
        }
    }
}

///
/// Splits the text of a head or body into symbols
///
/// In spaced notation symbols are separated by whitespace. Otherwise each character is a symbol, with any primes
/// attached to the character before them.
///
fn parse_word(text: &str, spaced: bool) -> GrammarWord {
    let symbols: Vec<Symbol> = if spaced {
        text.split_whitespace().map(Symbol::from).collect()
    } else {
        let mut names: Vec<String> = vec![];

        for c in text.chars() {
            match names.last_mut() {
                Some(previous) if c == '\'' => previous.push(c),
                _ => names.push(c.to_string())
            }
        }

        names.into_iter().map(Symbol::from).collect()
    };

    symbols.into_iter()
        .filter(|symbol| !symbol.is_epsilon() && *symbol != Symbol::from(LEGACY_EPSILON))
        .collect()
}

impl FromStr for Grammar {
    type Err = Error;

    fn from_str(text: &str) -> Result<Grammar> {
        // Split into heads and the text of their bodies
        let mut lines: Vec<(usize, &str, Vec<&str>)> = vec![];

        for (index, line) in text.lines().enumerate() {
            let line        = line.trim();
            let line_number = index + 1;

            if line.is_empty() {
                continue;
            }

            let (head, bodies) = line.split_once("->")
                .or_else(|| line.split_once('→'))
                .ok_or_else(|| Error::GrammarSyntax { line: line_number, message: "expected `->`".to_string() })?;

            let bodies: Vec<&str> = bodies.split('|').map(|body| body.trim()).collect();
            if bodies.iter().any(|body| body.is_empty()) {
                return Err(Error::GrammarSyntax { line: line_number, message: "empty alternative (write ε for the empty string)".to_string() });
            }

            lines.push((line_number, head.trim(), bodies));
        }

        let spaced = lines.iter()
            .flat_map(|(_, head, bodies)| Some(*head).into_iter().chain(bodies.iter().cloned()))
            .any(|word| word.chars().any(char::is_whitespace));

        let mut productions: Vec<(GrammarWord, GrammarWord)> = vec![];

        for (line_number, head, bodies) in lines {
            let head = parse_word(head, spaced);
            if head.is_empty() {
                return Err(Error::GrammarSyntax { line: line_number, message: "production has no head".to_string() });
            }

            for body in bodies {
                productions.push((head.clone(), parse_word(body, spaced)));
            }
        }

        if productions.is_empty() {
            return Err(Error::GrammarSyntax { line: 0, message: "grammar has no productions".to_string() });
        }

        let single_heads: Alphabet = productions.iter()
            .filter(|(head, _)| head.len() == 1)
            .map(|(head, _)| head[0].clone())
            .collect();

        let non_terminals: Alphabet = productions.iter()
            .flat_map(|(head, _)| head.iter())
            .filter(|symbol| single_heads.contains(*symbol) || looks_like_non_terminal(symbol))
            .cloned()
            .collect();

        let terminals: Alphabet = productions.iter()
            .flat_map(|(head, body)| body.iter().chain(head.iter()))
            .filter(|symbol| !non_terminals.contains(*symbol))
            .cloned()
            .collect();

        let start = non_terminals.get_index(0)
            .cloned()
            .ok_or_else(|| Error::GrammarSyntax { line: 0, message: "grammar has no non-terminal".to_string() })?;

        Grammar::new(non_terminals, terminals, start, productions)
    }
}

///
/// True for symbols written like non-terminals (`B`, `E'`) when they only appear inside a longer head
///
fn looks_like_non_terminal(symbol: &Symbol) -> bool {
    let name = symbol.as_str();

    name.chars().next().map(char::is_uppercase).unwrap_or(false) || name.ends_with('\'')
}

///
/// Writes out a word with its symbols separated by spaces (`ε` for the empty word)
///
pub(crate) fn format_word(word: &[Symbol]) -> String {
    if word.is_empty() {
        EPSILON.to_string()
    } else {
        let symbols: Vec<&str> = word.iter().map(|symbol| symbol.as_str()).collect();
        symbols.join(" ")
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (head, bodies) in &self.rules {
            let bodies: Vec<String> = bodies.iter().map(|body| format_word(body)).collect();
            writeln!(f, "{} -> {}", format_word(head), bodies.join(" | "))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn grammar(text: &str) -> Grammar {
        text.parse().unwrap()
    }

    #[test]
    fn parses_text_notation() {
        let g = grammar("S -> aA | b\nA -> a | ε");

        assert!(g.start() == &Symbol::from("S"));
        assert!(g.non_terminals() == &alphabet(vec!["S", "A"]));
        assert!(g.terminals() == &alphabet(vec!["a", "b"]));
        assert!(g.bodies_of(&Symbol::from("A")).map(|bodies| bodies.contains(&GrammarWord::new())) == Some(true));
    }

    #[test]
    fn whitespace_separates_long_symbols() {
        let g = grammar("E -> E + T | T\nT -> id");

        assert!(g.is_terminal(&Symbol::from("id")));
        assert!(g.is_terminal(&Symbol::from("+")));
        assert!(g.bodies_of(&Symbol::from("T")).map(|bodies| bodies.contains(&vec![Symbol::from("id")])) == Some(true));
    }

    #[test]
    fn primes_belong_to_previous_symbol() {
        let g = grammar("E' -> +TE' | ε");

        assert!(g.start() == &Symbol::from("E'"));
        assert!(g.bodies_of(&Symbol::from("E'")).map(|bodies| bodies.contains(&vec![Symbol::from("+"), Symbol::from("T"), Symbol::from("E'")])) == Some(true));
    }

    #[test]
    fn legacy_epsilon_is_accepted() {
        assert!(grammar("S -> a | &") == grammar("S -> a | ε"));
    }

    #[test]
    fn display_round_trips() {
        let g = grammar("S -> a A | b\nA -> a | ε");

        assert!(g.to_string() == "S -> a A | b\nA -> a | ε\n");
        assert!(grammar(&g.to_string()) == g);
    }

    #[test]
    fn rejects_lines_without_arrow() {
        assert!("S a".parse::<Grammar>() == Err(Error::GrammarSyntax { line: 1, message: "expected `->`".to_string() }));
    }

    #[test]
    fn rejects_undeclared_symbols() {
        let result = Grammar::new(alphabet(vec!["S"]), alphabet(vec!["a"]), Symbol::from("S"), vec![(word("S"), word("ab"))]);

        assert!(result == Err(Error::UndeclaredSymbol(Symbol::from("b"))));
    }

    #[test]
    fn rejects_start_symbol_that_is_terminal() {
        let result = Grammar::new(alphabet(vec!["S"]), alphabet(vec!["a"]), Symbol::from("a"), vec![]);

        assert!(result == Err(Error::StartSymbolNotNonTerminal(Symbol::from("a"))));
    }

    #[test]
    fn classifies_regular_grammar() {
        assert!(grammar("S -> aA | a | ε\nA -> bA | b").check_own_type() == GrammarType::Regular);
    }

    #[test]
    fn epsilon_for_recursive_start_is_not_regular() {
        assert!(grammar("S -> aS | ε").check_own_type() == GrammarType::ContextFree);
    }

    #[test]
    fn classifies_context_free_grammar() {
        assert!(grammar("S -> aSb | ε").check_own_type() == GrammarType::ContextFree);
    }

    #[test]
    fn classifies_context_sensitive_grammar() {
        assert!(grammar("S -> aSBc | abc\ncB -> Bc\nbB -> bb").check_own_type() == GrammarType::ContextSensitive);
    }

    #[test]
    fn lowercase_symbols_in_long_heads_are_terminals() {
        let g = grammar("S -> aSBc | abc\ncB -> Bc\nbB -> bb");

        assert!(g.start() == &Symbol::from("S"));
        assert!(g.non_terminals() == &alphabet(vec!["S", "B"]));
        assert!(g.terminals() == &alphabet(vec!["a", "c", "b"]));
    }

    #[test]
    fn long_heads_keep_symbols_with_their_own_rules_as_non_terminals() {
        let g = grammar("S -> aA\naA -> ab | b\nA -> a");

        assert!(g.non_terminals() == &alphabet(vec!["S", "A"]));
        assert!(g.terminals() == &alphabet(vec!["a", "b"]));
    }

    #[test]
    fn rejects_grammar_without_non_terminals() {
        assert!("ab -> c".parse::<Grammar>() == Err(Error::GrammarSyntax { line: 0, message: "grammar has no non-terminal".to_string() }));
    }

    #[test]
    fn classifies_unrestricted_grammar() {
        assert!(grammar("S -> aSB | a\naB -> b").check_own_type() == GrammarType::Unrestricted);
    }

    #[test]
    fn start_symbol_without_productions_still_classifies() {
        let g = Grammar::new(alphabet(vec!["S", "A"]), alphabet(vec!["a"]), Symbol::from("S"), vec![(word("A"), word("a"))]).unwrap();

        assert!(g.check_own_type() == GrammarType::Regular);
    }

    #[test]
    fn grammar_type_serializes_in_capitals() {
        assert!(serde_json::to_string(&GrammarType::ContextFree).unwrap() == "\"CONTEXT_FREE\"");
    }
}
