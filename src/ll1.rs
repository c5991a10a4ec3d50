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
//! # LL(1) parsing
//!
//! An LL(1) analysis table says, for a non-terminal on top of the stack and the next input symbol, which production to
//! expand. The production `A -> α` goes in the cell `(A, t)` for every terminal `t` in FIRST(α), and if α can derive the
//! empty string, also in `(A, b)` for every `b` in FOLLOW(A).
//!
//! A grammar is LL(1) when no cell needs two different productions. Anything else is reported as
//! `Error::Ll1Conflict` rather than picking one of them.
//!
//! ```
//! # use formlang::*;
//! let grammar: Grammar = "S -> a S b | ε".parse().unwrap();
//! let run = grammar.run_table_ll1(&word("aabb")).unwrap();
//!
//! assert!(run.accepted);
//! ```
//!

use std::fmt;

use indexmap::IndexMap;
use log::*;

use super::error::*;
use super::grammar::*;
use super::symbol::*;

///
/// Maps a (non-terminal, lookahead) pair to the body to expand
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AnalysisTable {
    start: Symbol,
    non_terminals: Alphabet,
    cells: IndexMap<(Symbol, Symbol), GrammarWord>
}

///
/// What the recognizer did at one step
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Ll1Action {
    /// Replaced a non-terminal on the stack with the body of one of its productions
    Expand(Symbol, GrammarWord),

    /// Matched the terminal on top of the stack with the next input symbol
    Match(Symbol),

    /// Stack and input ran out together
    Accept,

    /// No way to carry on
    Reject
}

///
/// The state of the recognizer before an action
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Ll1Step {
    /// The stack, bottom first
    pub stack: Vec<Symbol>,

    /// The input that hasn't been read yet, ending in `$`
    pub input: Vec<Symbol>,

    pub action: Ll1Action
}

///
/// The result of running the LL(1) recognizer over a word
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Ll1Run {
    pub accepted: bool,
    pub steps: Vec<Ll1Step>
}

impl AnalysisTable {
    ///
    /// The body to expand for a non-terminal when the next input symbol is `lookahead`
    ///
    pub fn get(&self, non_terminal: &Symbol, lookahead: &Symbol) -> Option<&GrammarWord> {
        self.cells.get(&(non_terminal.clone(), lookahead.clone()))
    }

    ///
    /// The filled-in cells of this table
    ///
    pub fn cells(&self) -> &IndexMap<(Symbol, Symbol), GrammarWord> {
        &self.cells
    }

    ///
    /// Runs the table-driven recognizer over a word
    ///
    pub fn run(&self, input: &[Symbol]) -> Ll1Run {
        let end         = Symbol::end_of_input();
        let mut stack   = vec![end.clone(), self.start.clone()];
        let mut input   = input.to_vec();
        input.push(end.clone());

        let mut position    = 0;
        let mut steps       = vec![];

        let accepted = loop {
            let top         = stack.last().cloned().unwrap_or_else(|| end.clone());
            let lookahead   = input.get(position).cloned().unwrap_or_else(|| end.clone());

            let action = if top == end && lookahead == end {
                Ll1Action::Accept
            } else if self.non_terminals.contains(&top) {
                match self.get(&top, &lookahead) {
                    Some(body)  => Ll1Action::Expand(top.clone(), body.clone()),
                    None        => Ll1Action::Reject
                }
            } else if top == lookahead {
                Ll1Action::Match(top.clone())
            } else {
                Ll1Action::Reject
            };

            steps.push(Ll1Step { stack: stack.clone(), input: input[position..].to_vec(), action: action.clone() });

            match action {
                Ll1Action::Accept   => break true,
                Ll1Action::Reject   => break false,

                Ll1Action::Match(_) => {
                    stack.pop();
                    position += 1;
                },

                Ll1Action::Expand(_, body) => {
                    stack.pop();
                    stack.extend(body.into_iter().rev());
                }
            }
        };

        trace!("run: {} after {} steps", if accepted { "accepted" } else { "rejected" }, steps.len());

        Ll1Run { accepted: accepted, steps: steps }
    }
}

impl fmt::Display for AnalysisTable {
    ///
    /// One line per filled-in cell: `A, a: A -> α`
    ///
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for ((non_terminal, lookahead), body) in &self.cells {
            writeln!(f, "{}, {}: {} -> {}", non_terminal, lookahead, non_terminal, format_word(body))?;
        }

        Ok(())
    }
}

impl Grammar {
    ///
    /// Builds the LL(1) analysis table for this grammar
    ///
    /// `$` marks the end of the input in the table, so it can't also be a terminal of the grammar.
    ///
    pub fn analysis_table(&self) -> Result<AnalysisTable> {
        if self.is_terminal(&Symbol::end_of_input()) {
            return Err(Error::ReservedSymbol(Symbol::end_of_input()));
        }

        let firsts  = self.firsts()?;
        let follows = self.follows()?;

        let mut cells: IndexMap<(Symbol, Symbol), GrammarWord> = IndexMap::new();

        for (head, bodies) in self.rule_table() {
            for body in bodies {
                let first = self.first_of_word(&firsts, &body);

                let mut lookaheads: Vec<Symbol> = first.iter().filter(|symbol| !symbol.is_epsilon()).cloned().collect();
                if first.contains(EPSILON) {
                    lookaheads.extend(follows.get(&head).into_iter().flatten().cloned());
                }

                for lookahead in lookaheads {
                    let key = (head.clone(), lookahead);

                    if let Some(existing) = cells.get(&key) {
                        if existing != &body {
                            warn!("analysis_table: ({}, {}) is claimed by two productions", key.0, key.1);

                            return Err(Error::Ll1Conflict {
                                non_terminal:   key.0.clone(),
                                terminal:       key.1.clone(),
                                existing:       format_word(existing),
                                conflicting:    format_word(&body)
                            });
                        }
                    }

                    cells.insert(key, body.clone());
                }
            }
        }

        debug!("analysis_table: {} cells", cells.len());

        Ok(AnalysisTable { start: self.start().clone(), non_terminals: self.non_terminals().clone(), cells: cells })
    }

    ///
    /// Builds the analysis table and uses it to decide whether this grammar generates a word
    ///
    pub fn run_table_ll1(&self, input: &[Symbol]) -> Result<Ll1Run> {
        Ok(self.analysis_table()?.run(input))
    }
}

#[cfg(test)]
mod test {
    use super::super::*;

    fn expressions() -> Grammar {
        "E -> T E'\nE' -> + T E' | ε\nT -> F T'\nT' -> * F T' | ε\nF -> ( E ) | id".parse().unwrap()
    }

    fn tokens(text: &str) -> Vec<Symbol> {
        text.split_whitespace().map(Symbol::from).collect()
    }

    #[test]
    fn table_for_expression_grammar() {
        let table = expressions().analysis_table().unwrap();

        assert!(table.get(&Symbol::from("E"), &Symbol::from("id")) == Some(&tokens("T E'")));
        assert!(table.get(&Symbol::from("E'"), &Symbol::from("$")) == Some(&vec![]));
        assert!(table.get(&Symbol::from("T'"), &Symbol::from("+")) == Some(&vec![]));
        assert!(table.get(&Symbol::from("F"), &Symbol::from("+")) == None);
    }

    #[test]
    fn recognizes_expression() {
        let run = expressions().run_table_ll1(&tokens("id + id * id")).unwrap();

        assert!(run.accepted);
        assert!(run.steps.last().map(|step| &step.action) == Some(&Ll1Action::Accept));
    }

    #[test]
    fn rejects_malformed_expression() {
        let run = expressions().run_table_ll1(&tokens("id + * id")).unwrap();

        assert!(!run.accepted);
        assert!(run.steps.last().map(|step| &step.action) == Some(&Ll1Action::Reject));
    }

    #[test]
    fn first_step_expands_start_symbol() {
        let run = expressions().run_table_ll1(&tokens("id")).unwrap();

        assert!(run.steps[0].stack == tokens("$ E"));
        assert!(run.steps[0].input == tokens("id $"));
        assert!(run.steps[0].action == Ll1Action::Expand(Symbol::from("E"), tokens("T E'")));
    }

    #[test]
    fn recognizes_empty_word() {
        let grammar: Grammar = "S -> a S b | ε".parse().unwrap();

        assert!(grammar.run_table_ll1(&[]).unwrap().accepted);
        assert!(!grammar.run_table_ll1(&word("aab")).unwrap().accepted);
    }

    #[test]
    fn end_of_input_marker_is_not_a_terminal() {
        let grammar: Grammar = "S -> a $".parse().unwrap();

        assert!(grammar.is_terminal(&Symbol::end_of_input()));
        assert!(grammar.analysis_table() == Err(Error::ReservedSymbol(Symbol::from("$"))));
        assert!(grammar.run_table_ll1(&word("a")).is_err());
    }

    #[test]
    fn conflicts_are_reported() {
        let grammar: Grammar = "S -> a b | a c".parse().unwrap();

        match grammar.analysis_table() {
            Err(Error::Ll1Conflict { non_terminal, terminal, .. }) => {
                assert!(non_terminal == Symbol::from("S"));
                assert!(terminal == Symbol::from("a"));
            },

            _ => assert!(false)
        }
    }
}
