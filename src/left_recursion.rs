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
//! # Left recursion
//!
//! A top-down parser loops forever on a production like `A -> A α`. Direct left recursion is removed by introducing a
//! new non-terminal `A'`:
//!
//! ```text
//! A -> A α | β        becomes         A  -> β A'
//!                                     A' -> α A' | ε
//! ```
//!
//! Indirect left recursion (`A -> B α`, `B -> A β`) is removed by putting the non-terminals in order and substituting
//! the bodies of earlier non-terminals into later ones until every left recursion is direct.
//!

use indexmap::IndexSet;
use log::*;

use super::error::*;
use super::grammar::*;
use super::name_generator::*;
use super::symbol::*;

///
/// Removes direct left recursion from the rules for a single head, returning the non-terminal that was introduced
///
fn remove_direct_recursion(table: &mut RuleTable, head: &Symbol, pool: &mut SymbolPool) -> Option<Symbol> {
    let bodies = table.get(head)?.clone();

    let (recursive, others): (Vec<GrammarWord>, Vec<GrammarWord>) = bodies.into_iter()
        .partition(|body| body.first() == Some(head));

    if recursive.is_empty() {
        return None;
    }

    let fresh = pool.fresh();

    let head_bodies: IndexSet<GrammarWord> = others.into_iter()
        .map(|mut body| { body.push(fresh.clone()); body })
        .collect();

    // A bare `A -> A` is dropped
    let mut fresh_bodies: IndexSet<GrammarWord> = recursive.into_iter()
        .map(|body| body[1..].to_vec())
        .filter(|tail| !tail.is_empty())
        .map(|mut tail| { tail.push(fresh.clone()); tail })
        .collect();
    fresh_bodies.insert(vec![]);

    trace!("remove_direct_recursion: {} now uses {}", head, fresh);

    table.insert(head.clone(), head_bodies);
    table.insert(fresh.clone(), fresh_bodies);

    Some(fresh)
}

impl Grammar {
    ///
    /// Removes direct left recursion
    ///
    /// If `head` is given, only the rules for that non-terminal are changed. New non-terminals are taken from
    /// `FRESH_SYMBOL_POOL`.
    ///
    pub fn remove_direct_left_production(&self, head: Option<&Symbol>) -> Result<Grammar> {
        self.require_context_free("remove_direct_left_production")?;

        let mut table   = self.rule_table();
        let mut pool    = SymbolPool::new(self.symbols());

        let heads: Vec<Symbol> = match head {
            Some(head)  => vec![head.clone()],
            None        => table.keys().cloned().collect()
        };

        for head in heads {
            remove_direct_recursion(&mut table, &head, &mut pool);
        }

        Ok(self.with_rule_table(table))
    }

    ///
    /// Removes both direct and indirect left recursion
    ///
    /// The grammar must not have epsilon productions or cycles (`A =>+ A`). The result is unspecified if it does.
    ///
    pub fn remove_left_production(&self) -> Result<Grammar> {
        self.require_context_free("remove_left_production")?;

        let mut table   = self.rule_table();
        let mut pool    = SymbolPool::new(self.symbols());
        let order: Vec<Symbol> = table.keys().cloned().collect();

        for (index, later) in order.iter().enumerate() {
            for earlier in &order[..index] {
                let substitutes = match table.get(earlier) { Some(bodies) => bodies.clone(), None => continue };
                let bodies      = match table.get(later) { Some(bodies) => bodies.clone(), None => continue };

                let mut rewritten = IndexSet::new();
                for body in bodies {
                    if body.first() == Some(earlier) {
                        for substitute in &substitutes {
                            let mut expanded = substitute.clone();
                            expanded.extend(body[1..].iter().cloned());
                            rewritten.insert(expanded);
                        }
                    } else {
                        rewritten.insert(body);
                    }
                }

                table.insert(later.clone(), rewritten);
            }

            remove_direct_recursion(&mut table, later, &mut pool);
        }

        debug!("remove_left_production: {} non-terminals became {}", order.len(), table.len());

        Ok(self.with_rule_table(table))
    }
}

#[cfg(test)]
mod test {
    use super::super::*;

    fn grammar(text: &str) -> Grammar {
        text.parse().unwrap()
    }

    fn bodies(grammar: &Grammar, head: &str) -> Vec<String> {
        grammar.bodies_of(&Symbol::from(head))
            .map(|bodies| bodies.iter().map(|body| body.iter().map(|symbol| symbol.to_string()).collect::<Vec<_>>().join("")).collect())
            .unwrap_or_default()
    }

    #[test]
    fn removes_direct_left_recursion() {
        let result = grammar("S -> Sa | b").remove_direct_left_production(None).unwrap();

        assert!(result.to_string() == "S -> b Δ\nΔ -> a Δ | ε\n");
        assert!(result.is_non_terminal(&Symbol::from("Δ")));
    }

    #[test]
    fn only_touches_requested_head() {
        let result = grammar("S -> Sa | A\nA -> Ab | c").remove_direct_left_production(Some(&Symbol::from("A"))).unwrap();

        assert!(bodies(&result, "S") == vec!["Sa", "A"]);
        assert!(bodies(&result, "A") == vec!["cΔ"]);
    }

    #[test]
    fn fresh_symbols_avoid_existing_ones() {
        let result = grammar("Δ -> Δa | b").remove_direct_left_production(None).unwrap();

        assert!(bodies(&result, "Δ") == vec!["bΓ"]);
    }

    #[test]
    fn grammar_without_left_recursion_is_unchanged() {
        let original = grammar("S -> aS | b");

        assert!(original.remove_direct_left_production(None).unwrap() == original);
        assert!(original.remove_left_production().unwrap() == original);
    }

    #[test]
    fn removes_indirect_left_recursion() {
        let result = grammar("S -> Aa | b\nA -> Ac | Sd | e").remove_left_production().unwrap();

        assert!(bodies(&result, "S") == vec!["Aa", "b"]);
        assert!(bodies(&result, "A") == vec!["bdΔ", "eΔ"]);
        assert!(bodies(&result, "Δ") == vec!["cΔ", "adΔ", ""]);
    }

    #[test]
    fn refuses_context_sensitive_grammar() {
        let result = grammar("S -> aSBc | abc\ncB -> Bc").remove_left_production();

        assert!(match result { Err(Error::GrammarType { .. }) => true, _ => false });
    }
}
