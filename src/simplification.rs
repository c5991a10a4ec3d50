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
//! # Simplification
//!
//! The textbook clean-up steps for context-free grammars:
//!
//! * `remove_epsilon_productions` leaves the start symbol as the only non-terminal that can produce `ε`
//! * `remove_unit_productions` replaces `A -> B` with the bodies of B
//! * `remove_improductive_symbols` drops non-terminals that can never derive a string of terminals
//! * `remove_unreachable_symbols` drops symbols that can't appear in anything derived from the start symbol
//!
//! Removing improductive symbols can leave others unreachable, so `remove_useless_symbols` runs the two in that order.
//!

use indexmap::IndexSet;
use log::*;

use super::error::*;
use super::grammar::*;
use super::name_generator::*;
use super::symbol::*;

///
/// Every way of writing a body with some of its nullable symbols left out
///
fn epsilon_variants(body: &[Symbol], nullable: &IndexSet<Symbol>) -> IndexSet<GrammarWord> {
    let mut variants: IndexSet<GrammarWord> = IndexSet::new();
    variants.insert(vec![]);

    for symbol in body {
        let mut next = IndexSet::new();

        for variant in variants {
            let mut with_symbol = variant.clone();
            with_symbol.push(symbol.clone());
            next.insert(with_symbol);

            if nullable.contains(symbol) {
                next.insert(variant);
            }
        }

        variants = next;
    }

    variants
}

impl Grammar {
    ///
    /// The non-terminals that can derive the empty string
    ///
    pub fn nullable_symbols(&self) -> IndexSet<Symbol> {
        let table           = self.rule_table();
        let mut nullable    = IndexSet::new();

        loop {
            let before = nullable.len();

            for (head, bodies) in &table {
                if !nullable.contains(head) && bodies.iter().any(|body| body.iter().all(|symbol| nullable.contains(symbol))) {
                    nullable.insert(head.clone());
                }
            }

            if nullable.len() == before {
                break;
            }
        }

        nullable
    }

    ///
    /// Removes every epsilon production except, if the language contains the empty string, one for the start symbol
    ///
    /// Each body is replaced by all of the ways of writing it with nullable symbols left out. If the start symbol is
    /// nullable and appears in a body, a new start symbol `S' -> S | ε` is introduced.
    ///
    pub fn remove_epsilon_productions(&self) -> Result<Grammar> {
        self.require_context_free("remove_epsilon_productions")?;

        let nullable = self.nullable_symbols();

        let mut table: RuleTable = self.rule_table().into_iter()
            .map(|(head, bodies)| {
                let bodies = bodies.iter()
                    .flat_map(|body| epsilon_variants(body, &nullable))
                    .filter(|body| !body.is_empty())
                    .collect();
                (head, bodies)
            })
            .collect();

        let mut start = self.start().clone();

        if nullable.contains(&start) {
            let start_in_body = table.values().flatten().any(|body| body.contains(&start));

            if start_in_body {
                let new_start = SymbolPool::new(self.symbols()).fresh();

                let mut start_bodies = IndexSet::new();
                start_bodies.insert(vec![start.clone()]);
                start_bodies.insert(vec![]);

                let mut with_new_start = RuleTable::new();
                with_new_start.insert(new_start.clone(), start_bodies);
                with_new_start.extend(table);

                table = with_new_start;
                start = new_start;
            } else {
                table.entry(start.clone()).or_insert_with(IndexSet::new).insert(vec![]);
            }
        }

        debug!("remove_epsilon_productions: {} nullable non-terminals", nullable.len());

        let mut non_terminals = Alphabet::new();
        non_terminals.insert(start.clone());
        non_terminals.extend(self.non_terminals().iter().cloned());

        Ok(Grammar::from_rule_table(non_terminals, self.terminals().clone(), start, table))
    }

    ///
    /// Replaces productions of the form `A -> B` with the bodies of B
    ///
    pub fn remove_unit_productions(&self) -> Result<Grammar> {
        self.require_context_free("remove_unit_productions")?;

        let table   = self.rule_table();
        let is_unit = |body: &GrammarWord| body.len() == 1 && self.is_non_terminal(&body[0]);

        let mut result = RuleTable::new();

        for head in table.keys() {
            // Every non-terminal reachable from head through unit productions, head included
            let mut closure = IndexSet::new();
            closure.insert(head.clone());

            let mut index = 0;
            while let Some(next) = closure.get_index(index).cloned() {
                for body in table.get(&next).into_iter().flatten() {
                    if is_unit(body) {
                        closure.insert(body[0].clone());
                    }
                }
                index += 1;
            }

            let bodies = closure.iter()
                .flat_map(|symbol| table.get(symbol).into_iter().flatten())
                .filter(|body| !is_unit(body))
                .cloned()
                .collect();

            result.insert(head.clone(), bodies);
        }

        Ok(self.with_rule_table(result))
    }

    ///
    /// The non-terminals that can derive a string made up only of terminals
    ///
    pub fn productive_symbols(&self) -> IndexSet<Symbol> {
        let table               = self.rule_table();
        let mut productive      = IndexSet::new();

        loop {
            let before = productive.len();

            for (head, bodies) in &table {
                let derives_terminals = bodies.iter()
                    .any(|body| body.iter().all(|symbol| self.is_terminal(symbol) || productive.contains(symbol)));

                if !productive.contains(head) && derives_terminals {
                    productive.insert(head.clone());
                }
            }

            if productive.len() == before {
                break;
            }
        }

        productive
    }

    ///
    /// Removes the non-terminals that can't derive a string of terminals, along with every body that uses them
    ///
    /// The start symbol stays a non-terminal even if it is improductive, but loses its rules.
    ///
    pub fn remove_improductive_symbols(&self) -> Result<Grammar> {
        self.require_context_free("remove_improductive_symbols")?;

        let productive  = self.productive_symbols();
        let usable      = |symbol: &Symbol| self.is_terminal(symbol) || productive.contains(symbol);

        let table: RuleTable = self.rule_table().into_iter()
            .filter(|(head, _)| productive.contains(head))
            .map(|(head, bodies)| {
                let bodies = bodies.into_iter().filter(|body| body.iter().all(|symbol| usable(symbol))).collect();
                (head, bodies)
            })
            .collect();

        let non_terminals = self.non_terminals().iter()
            .filter(|symbol| productive.contains(*symbol) || *symbol == self.start())
            .cloned()
            .collect();

        debug!("remove_improductive_symbols: kept {} of {} non-terminals", productive.len(), self.non_terminals().len());

        Ok(Grammar::from_rule_table(non_terminals, self.terminals().clone(), self.start().clone(), table))
    }

    ///
    /// The symbols (terminal or not) that appear in some sentential form derived from the start symbol
    ///
    pub fn reachable_symbols(&self) -> IndexSet<Symbol> {
        let table           = self.rule_table();
        let mut reachable   = IndexSet::new();
        reachable.insert(self.start().clone());

        let mut index = 0;
        while let Some(next) = reachable.get_index(index).cloned() {
            for body in table.get(&next).into_iter().flatten() {
                reachable.extend(body.iter().cloned());
            }
            index += 1;
        }

        reachable
    }

    ///
    /// Removes the symbols that can't be reached from the start symbol
    ///
    pub fn remove_unreachable_symbols(&self) -> Result<Grammar> {
        self.require_context_free("remove_unreachable_symbols")?;

        let reachable = self.reachable_symbols();

        let table: RuleTable = self.rule_table().into_iter()
            .filter(|(head, _)| reachable.contains(head))
            .collect();

        let non_terminals   = self.non_terminals().iter().filter(|symbol| reachable.contains(*symbol)).cloned().collect();
        let terminals       = self.terminals().iter().filter(|symbol| reachable.contains(*symbol)).cloned().collect();

        Ok(Grammar::from_rule_table(non_terminals, terminals, self.start().clone(), table))
    }

    ///
    /// Removes improductive symbols and then unreachable ones
    ///
    pub fn remove_useless_symbols(&self) -> Result<Grammar> {
        self.remove_improductive_symbols()?.remove_unreachable_symbols()
    }
}
