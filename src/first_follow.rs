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
//! # FIRST and FOLLOW sets
//!
//! FIRST(A) is the set of terminals that can begin a string derived from A, plus `ε` if A can derive the empty string.
//! FOLLOW(A) is the set of terminals that can appear straight after A in some sentential form, plus `$` if A can end
//! one. Both are worked out by iterating until nothing changes.
//!

use std::collections::BTreeSet;

use indexmap::IndexMap;
use log::*;

use super::error::*;
use super::grammar::*;
use super::symbol::*;

///
/// A set of symbols for each non-terminal of a grammar
///
pub type SymbolSets = IndexMap<Symbol, BTreeSet<Symbol>>;

impl Grammar {
    ///
    /// Computes FIRST for every non-terminal
    ///
    pub fn firsts(&self) -> Result<SymbolSets> {
        self.require_context_free("firsts")?;

        let mut firsts: SymbolSets = self.non_terminals().iter().map(|symbol| (symbol.clone(), BTreeSet::new())).collect();
        let table = self.rule_table();

        let mut rounds = 0;
        loop {
            rounds += 1;
            let mut changed = false;

            for (head, bodies) in &table {
                for body in bodies {
                    let first = self.first_of_word(&firsts, body);

                    if let Some(existing) = firsts.get_mut(head) {
                        let before = existing.len();
                        existing.extend(first);
                        changed = changed || existing.len() != before;
                    }
                }
            }

            if !changed {
                break;
            }
        }

        trace!("firsts: stable after {} rounds", rounds);

        Ok(firsts)
    }

    ///
    /// Computes FIRST of a word, given FIRST for each non-terminal
    ///
    /// The result contains `ε` if every symbol of the word can derive the empty string (so FIRST of the empty word is
    /// just `ε`). Symbols that aren't non-terminals are treated as terminals.
    ///
    pub fn first_of_word(&self, firsts: &SymbolSets, word: &[Symbol]) -> BTreeSet<Symbol> {
        let mut result = BTreeSet::new();

        for symbol in word {
            match firsts.get(symbol) {
                Some(first) if self.is_non_terminal(symbol) => {
                    result.extend(first.iter().filter(|symbol| !symbol.is_epsilon()).cloned());

                    if !first.contains(EPSILON) {
                        return result;
                    }
                },

                _ => {
                    result.insert(symbol.clone());
                    return result;
                }
            }
        }

        result.insert(Symbol::epsilon());
        result
    }

    ///
    /// Computes FOLLOW for every non-terminal
    ///
    pub fn follows(&self) -> Result<SymbolSets> {
        let firsts = self.firsts()?;
        let table  = self.rule_table();

        let mut follows: SymbolSets = self.non_terminals().iter().map(|symbol| (symbol.clone(), BTreeSet::new())).collect();
        if let Some(start) = follows.get_mut(self.start()) {
            start.insert(Symbol::end_of_input());
        }

        loop {
            let mut changed = false;

            for (head, bodies) in &table {
                for body in bodies {
                    for (index, symbol) in body.iter().enumerate() {
                        if !self.is_non_terminal(symbol) {
                            continue;
                        }

                        // FIRST of whatever comes after the symbol, and FOLLOW of the head if that can vanish
                        let rest            = self.first_of_word(&firsts, &body[index+1..]);
                        let mut additions: BTreeSet<Symbol> = rest.iter().filter(|symbol| !symbol.is_epsilon()).cloned().collect();

                        if rest.contains(EPSILON) {
                            additions.extend(follows.get(head).cloned().unwrap_or_default());
                        }

                        if let Some(existing) = follows.get_mut(symbol) {
                            let before = existing.len();
                            existing.extend(additions);
                            changed = changed || existing.len() != before;
                        }
                    }
                }
            }

            if !changed {
                break;
            }
        }

        Ok(follows)
    }
}

#[cfg(test)]
mod test {
    use super::super::*;
    use std::collections::BTreeSet;

    fn set(symbols: &[&str]) -> BTreeSet<Symbol> {
        symbols.iter().map(|symbol| Symbol::from(*symbol)).collect()
    }

    ///
    /// The classic expression grammar, without left recursion
    ///
    fn expressions() -> Grammar {
        "E -> T E'\nE' -> + T E' | ε\nT -> F T'\nT' -> * F T' | ε\nF -> ( E ) | id".parse().unwrap()
    }

    #[test]
    fn firsts_of_expression_grammar() {
        let firsts = expressions().firsts().unwrap();

        assert!(firsts["E"] == set(&["(", "id"]));
        assert!(firsts["E'"] == set(&["+", "ε"]));
        assert!(firsts["T'"] == set(&["*", "ε"]));
        assert!(firsts["F"] == set(&["(", "id"]));
    }

    #[test]
    fn follows_of_expression_grammar() {
        let follows = expressions().follows().unwrap();

        assert!(follows["E"] == set(&[")", "$"]));
        assert!(follows["E'"] == set(&[")", "$"]));
        assert!(follows["T"] == set(&["+", ")", "$"]));
        assert!(follows["T'"] == set(&["+", ")", "$"]));
        assert!(follows["F"] == set(&["*", "+", ")", "$"]));
    }

    #[test]
    fn first_propagates_through_nullable_prefix() {
        let grammar: Grammar    = "S -> A B c\nA -> a | ε\nB -> b | ε".parse().unwrap();
        let firsts              = grammar.firsts().unwrap();

        assert!(firsts["S"] == set(&["a", "b", "c"]));
        assert!(grammar.first_of_word(&firsts, &[]) == set(&["ε"]));
    }

    #[test]
    fn refuses_context_sensitive_grammar() {
        let grammar: Grammar = "S -> aSBc | abc\ncB -> Bc".parse().unwrap();

        assert!(grammar.firsts().is_err());
    }
}
