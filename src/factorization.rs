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
//! # Left factoring
//!
//! A top-down parser with one symbol of lookahead can't choose between `A -> a b | a c`. Factoring moves the shared
//! prefix out into its own production and defers the choice to a new non-terminal:
//!
//! ```text
//! A -> a b | a c      becomes         A  -> a A'
//!                                     A' -> b | c
//! ```
//!
//! That's direct factoring. Indirect factoring deals with bodies that only share a prefix once their leading non-terminals
//! are expanded (`A -> B | a c` with `B -> a b`): those bodies are replaced by their expansions and then factored directly.
//!
//! Factoring one prefix can expose another, so `factorize` repeats both steps for a bounded number of rounds.
//!

use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};
use log::*;

use super::error::*;
use super::grammar::*;
use super::name_generator::*;
use super::symbol::*;

/// Rounds of factoring that `factorize` is normally allowed
pub const DEFAULT_FACTORIZATION_ROUNDS: usize = 5;

///
/// The longest prefix shared by every one of a group of bodies
///
pub fn identify_common_prefix(bodies: &[GrammarWord]) -> GrammarWord {
    let first = match bodies.first() {
        Some(first) => first,
        None        => return vec![]
    };

    let length = bodies[1..].iter()
        .map(|body| first.iter().zip(body.iter()).take_while(|(a, b)| a == b).count())
        .min()
        .unwrap_or(first.len());

    first[..length].to_vec()
}

///
/// Factors the bodies of every head in a rule table that share a first symbol
///
fn factor_rules(table: &RuleTable, pool: &mut SymbolPool) -> RuleTable {
    let mut result = RuleTable::new();

    for (head, bodies) in table {
        let mut groups: IndexMap<&Symbol, Vec<GrammarWord>> = IndexMap::new();
        for body in bodies {
            if let Some(first) = body.first() {
                groups.entry(first).or_insert_with(Vec::new).push(body.clone());
            }
        }

        let mut head_bodies         = IndexSet::new();
        let mut introduced          = vec![];
        let mut factored: BTreeSet<&Symbol> = BTreeSet::new();

        for body in bodies {
            let group = match body.first() {
                Some(first) => &groups[first],
                None        => { head_bodies.insert(body.clone()); continue; }
            };

            if group.len() < 2 {
                head_bodies.insert(body.clone());
                continue;
            }

            // The first body of a group stands in for the rest
            if !factored.insert(&body[0]) {
                continue;
            }

            let prefix  = identify_common_prefix(group);
            let fresh   = pool.fresh();

            let mut factored_body = prefix.clone();
            factored_body.push(fresh.clone());
            head_bodies.insert(factored_body);

            let suffixes: IndexSet<GrammarWord> = group.iter().map(|body| body[prefix.len()..].to_vec()).collect();
            introduced.push((fresh, suffixes));
        }

        result.insert(head.clone(), head_bodies);
        result.extend(introduced);
    }

    result
}

impl Grammar {
    ///
    /// Factors the bodies of each head that start with the same symbol
    ///
    pub fn direct_factorization(&self) -> Result<Grammar> {
        self.require_context_free("direct_factorization")?;

        let mut pool    = SymbolPool::new(self.symbols());
        let table       = factor_rules(&self.rule_table(), &mut pool);

        Ok(self.with_rule_table(table))
    }

    ///
    /// Expands the leading non-terminals of a body until it starts with a terminal (or is empty)
    ///
    /// A non-terminal that is already being expanded is left in place, so left recursion doesn't loop forever.
    ///
    pub fn first_derivated_bodies(&self, body: &[Symbol]) -> IndexSet<GrammarWord> {
        let mut expanding = vec![];
        self.derive_leading(body, &mut expanding)
    }

    fn derive_leading(&self, body: &[Symbol], expanding: &mut Vec<Symbol>) -> IndexSet<GrammarWord> {
        let mut result = IndexSet::new();

        match body.first() {
            Some(first) if self.is_non_terminal(first) && !expanding.contains(first) => {
                expanding.push(first.clone());

                for replacement in self.bodies_of(first).into_iter().flatten() {
                    let mut expanded = replacement.clone();
                    expanded.extend(body[1..].iter().cloned());

                    result.extend(self.derive_leading(&expanded, expanding));
                }

                expanding.pop();
            },

            _ => { result.insert(body.to_vec()); }
        }

        result
    }

    ///
    /// Expands bodies whose leading non-terminal hides a prefix shared with another body, then factors directly
    ///
    pub fn indirect_factorization(&self) -> Result<Grammar> {
        self.require_context_free("indirect_factorization")?;

        let mut table = RuleTable::new();

        for (head, bodies) in self.rule_table() {
            let derived: Vec<(GrammarWord, IndexSet<GrammarWord>)> = bodies.into_iter()
                .map(|body| {
                    let expansions = self.first_derivated_bodies(&body);
                    (body, expansions)
                })
                .collect();

            let leads: Vec<BTreeSet<&Symbol>> = derived.iter()
                .map(|(_, expansions)| expansions.iter().filter_map(|expansion| expansion.first()).collect())
                .collect();

            let mut new_bodies = IndexSet::new();
            for (index, (body, expansions)) in derived.iter().enumerate() {
                let starts_with_non_terminal = body.first().map(|first| self.is_non_terminal(first)).unwrap_or(false);
                let clashes = leads.iter()
                    .enumerate()
                    .any(|(other, other_leads)| other != index && !leads[index].is_disjoint(other_leads));

                if starts_with_non_terminal && clashes {
                    new_bodies.extend(expansions.iter().cloned());
                } else {
                    new_bodies.insert(body.clone());
                }
            }

            table.insert(head, new_bodies);
        }

        self.with_rule_table(table).direct_factorization()
    }

    ///
    /// Alternates direct and indirect factoring until the grammar stops changing, for at most `max_iterations` rounds
    ///
    pub fn factorize(&self, max_iterations: usize) -> Result<Grammar> {
        self.require_context_free("factorize")?;

        let mut current = self.clone();

        for round in 0..max_iterations {
            let next = current.direct_factorization()?.indirect_factorization()?;

            if next == current {
                debug!("factorize: stable after {} rounds", round);
                return Ok(current);
            }

            current = next;
        }

        debug!("factorize: stopped after {} rounds", max_iterations);
        Ok(current)
    }
}

#[cfg(test)]
mod test {
    use super::super::*;

    fn grammar(text: &str) -> Grammar {
        text.parse().unwrap()
    }

    #[test]
    fn finds_longest_common_prefix() {
        assert!(identify_common_prefix(&[word("abc"), word("abd"), word("ab")]) == word("ab"));
        assert!(identify_common_prefix(&[word("abc")]) == word("abc"));
        assert!(identify_common_prefix(&[]) == word(""));
    }

    #[test]
    fn factors_shared_prefix() {
        let result = grammar("S -> abc | abd | e").direct_factorization().unwrap();

        assert!(result.to_string() == "S -> a b Δ | e\nΔ -> c | d\n");
    }

    #[test]
    fn suffix_can_be_empty() {
        let result = grammar("S -> ab | a").direct_factorization().unwrap();

        assert!(result.to_string() == "S -> a Δ\nΔ -> b | ε\n");
    }

    #[test]
    fn nothing_to_factor_leaves_grammar_unchanged() {
        let original = grammar("S -> aS | bS | c");

        assert!(original.factorize(DEFAULT_FACTORIZATION_ROUNDS).unwrap() == original);
    }

    #[test]
    fn derives_leading_terminals() {
        let g       = grammar("S -> A b\nA -> a | B\nB -> c | ε");
        let bodies  = g.first_derivated_bodies(&word("Ab"));

        assert!(bodies.len() == 3);
        assert!(bodies.contains(&word("ab")));
        assert!(bodies.contains(&word("cb")));
        assert!(bodies.contains(&word("b")));
    }

    #[test]
    fn left_recursion_does_not_loop() {
        let g = grammar("S -> Sa | b");

        assert!(g.first_derivated_bodies(&word("S")).contains(&word("b")));
    }

    #[test]
    fn factors_hidden_prefix() {
        let result = grammar("S -> aB | A\nA -> aC\nB -> b\nC -> c").indirect_factorization().unwrap();

        assert!(result.bodies_of(&Symbol::from("S")).map(|bodies| bodies.len()) == Some(1));
        assert!(result.bodies_of(&Symbol::from("S")).map(|bodies| bodies.contains(&vec![Symbol::from("a"), Symbol::from("Δ")])) == Some(true));
    }

    #[test]
    fn factorize_repeats_until_stable() {
        let result = grammar("S -> abc | abd | ae").factorize(DEFAULT_FACTORIZATION_ROUNDS).unwrap();

        // S -> aΔ, Δ -> bΓ | e, Γ -> c | d
        assert!(result.non_terminals().len() == 3);
        assert!(result.bodies_of(&Symbol::from("S")).map(|bodies| bodies.len()) == Some(1));
    }

    #[test]
    fn zero_rounds_changes_nothing() {
        let original = grammar("S -> ab | ac");

        assert!(original.factorize(0).unwrap() == original);
    }
}
