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
//! # Regular grammars and finite automata
//!
//! A regular grammar and a finite automaton describe the same thing in two ways. Each non-terminal is a state, and a
//! production `A -> a B` is a transition from A to B on `a`. A production `A -> a` goes to an extra accepting state.
//!
//! ```
//! # use formlang::*;
//! let grammar: Grammar = "S -> aS | b".parse().unwrap();
//! let machine = grammar_to_machine(&grammar).unwrap();
//!
//! assert!(machine.accepts(&word("aab")));
//! ```
//!

use indexmap::{IndexMap, IndexSet};
use log::*;

use super::automaton::*;
use super::error::*;
use super::grammar::*;
use super::name_generator::*;
use super::state::*;
use super::symbol::*;

///
/// Converts a regular grammar into a (usually non-deterministic) finite automaton
///
/// There is one state per non-terminal plus an accepting state, named with the first free name from `q0`, `q1`, ...
/// The start symbol's state is the entry and it is also accepting if the grammar has `S -> ε`.
///
pub fn grammar_to_machine(grammar: &Grammar) -> Result<Automaton> {
    grammar.require_regular("grammar_to_machine")?;

    let accept = StateNameGenerator::new(DEFAULT_STATE_PREFIX)
        .next_free(|name| grammar.non_terminals().contains(name));

    let start_accepts = grammar.bodies_of(grammar.start())
        .map(|bodies| bodies.contains(&GrammarWord::new()))
        .unwrap_or(false);

    let mut states: Vec<State> = grammar.non_terminals().iter()
        .map(|symbol| {
            let is_start = symbol == grammar.start();
            State::with_flags(symbol.as_str(), is_start, is_start && start_accepts)
        })
        .collect();
    states.push(State::with_flags(accept.clone(), false, true));

    let mut transitions = vec![];
    for (head, bodies) in grammar.rule_table() {
        for body in bodies {
            match body.len() {
                1 => transitions.push(Transition::new(head.as_str(), body[0].clone(), accept.clone())),
                2 => transitions.push(Transition::new(head.as_str(), body[0].clone(), body[1].as_str())),
                _ => { }
            }
        }
    }

    debug!("grammar_to_machine: {} transitions", transitions.len());

    Automaton::new(states, grammar.terminals().clone(), transitions)
}

///
/// Converts a DFA into a regular grammar
///
/// Every state becomes a non-terminal. A transition from B to C on `a` becomes `B -> a C`, plus `B -> a` if C is an
/// accepting state. If the entry state accepts, the empty word is added: directly to the entry state's rules if nothing
/// leads back into it, otherwise through a new start symbol that has the same rules as the entry state and `ε`.
///
/// A state whose name is also a symbol of the alphabet (the DFAs built from expressions over digits have states called
/// `1`, `2`, ...) is given the first free name from `q0`, `q1`, ... so the terminals and non-terminals stay apart.
///
pub fn machine_to_grammar(automaton: &Automaton) -> Result<Grammar> {
    automaton.require_deterministic("machine_to_grammar")?;

    let terminals: Alphabet = automaton.alphabet().iter().filter(|symbol| !symbol.is_epsilon()).cloned().collect();

    let mut generator                               = StateNameGenerator::new(DEFAULT_STATE_PREFIX);
    let mut non_terminal_of: IndexMap<&str, Symbol> = IndexMap::new();

    for id in automaton.states().keys() {
        let clashes = terminals.contains(id.as_str()) || Symbol::from(id.as_str()).is_epsilon();

        let symbol = if clashes {
            let renamed = generator.next_free(|name| {
                terminals.contains(name)
                    || automaton.states().contains_key(name)
                    || non_terminal_of.values().any(|symbol| symbol.as_str() == name)
            });

            trace!("machine_to_grammar: state {} is also a terminal, renamed to {}", id, renamed);
            Symbol::from(renamed)
        } else {
            Symbol::from(id.as_str())
        };

        non_terminal_of.insert(id.as_str(), symbol);
    }

    let entry = non_terminal_of[automaton.entry_id().as_str()].clone();

    let mut rules = vec![];
    for transition in automaton.transitions() {
        let from = non_terminal_of[transition.from.as_str()].clone();
        let to   = non_terminal_of[transition.to.as_str()].clone();

        rules.push((vec![from.clone()], vec![transition.with.clone(), to]));
        if automaton.is_exit(&transition.to) {
            rules.push((vec![from], vec![transition.with.clone()]));
        }
    }

    let mut non_terminals: Alphabet = non_terminal_of.values().cloned().collect();
    let mut start                   = entry.clone();

    if automaton.is_exit(automaton.entry_id()) {
        let has_incoming = automaton.transitions().iter().any(|transition| &transition.to == automaton.entry_id());

        if has_incoming {
            let used: IndexSet<Symbol> = non_terminals.iter().chain(terminals.iter()).cloned().collect();
            let new_start = SymbolPool::new(&used).fresh();

            let entry_bodies: Vec<GrammarWord> = rules.iter()
                .filter(|(head, _)| head[0] == entry)
                .map(|(_, body)| body.clone())
                .collect();

            rules.extend(entry_bodies.into_iter().map(|body| (vec![new_start.clone()], body)));
            rules.push((vec![new_start.clone()], vec![]));

            non_terminals.insert(new_start.clone());
            start = new_start;
        } else {
            rules.push((vec![entry.clone()], vec![]));
        }
    }

    Grammar::new(non_terminals, terminals, start, rules)
}

#[cfg(test)]
mod test {
    use super::*;
    use super::super::regex::*;

    #[test]
    fn converts_grammar_to_nfa() {
        let grammar: Grammar = "S -> aA | aB\nA -> a | aC\nB -> aD\nC -> aA\nD -> a | aE\nE -> aB".parse().unwrap();
        let machine = grammar_to_machine(&grammar).unwrap();

        let expected: IndexSet<Transition> = vec![
            Transition::new("S", "a", "A"), Transition::new("S", "a", "B"),
            Transition::new("A", "a", "q0"), Transition::new("A", "a", "C"),
            Transition::new("B", "a", "D"),
            Transition::new("C", "a", "A"),
            Transition::new("D", "a", "q0"), Transition::new("D", "a", "E"),
            Transition::new("E", "a", "B")
        ].into_iter().collect();

        assert!(machine.transitions() == &expected);
        assert!(machine.exit_states().len() == 1);
        assert!(machine.is_exit("q0"));
        assert!(machine.entry().id == "S");
    }

    #[test]
    fn start_epsilon_makes_entry_accept() {
        let grammar: Grammar = "S -> aA | ε\nA -> b".parse().unwrap();
        let machine = grammar_to_machine(&grammar).unwrap();

        assert!(machine.accepts(&[]));
        assert!(machine.accepts(&word("ab")));
        assert!(!machine.accepts(&word("a")));
    }

    #[test]
    fn accept_state_avoids_non_terminal_names() {
        let grammar = Grammar::new(alphabet(vec!["q0"]), alphabet(vec!["a"]), Symbol::from("q0"), vec![(vec![Symbol::from("q0")], word("a"))]).unwrap();
        let machine = grammar_to_machine(&grammar).unwrap();

        assert!(machine.is_exit("q1"));
    }

    #[test]
    fn refuses_context_free_grammar() {
        let grammar: Grammar = "S -> aSb | ab".parse().unwrap();

        assert!(grammar_to_machine(&grammar) == Err(Error::GrammarType {
            operation:  "grammar_to_machine",
            expected:   GrammarType::Regular,
            found:      GrammarType::ContextFree
        }));
    }

    fn ab_star() -> Automaton {
        Automaton::new(
            vec![State::with_flags("p", true, true), State::new("r")],
            alphabet(vec!["a", "b"]),
            vec![Transition::new("p", "a", "r"), Transition::new("r", "b", "p")]).unwrap()
    }

    #[test]
    fn converts_dfa_to_grammar() {
        let machine = Automaton::new(
            vec![State::with_flags("p", true, false), State::with_flags("r", false, true)],
            alphabet(vec!["a", "b"]),
            vec![Transition::new("p", "a", "p"), Transition::new("p", "b", "r")]).unwrap();

        let grammar = machine_to_grammar(&machine).unwrap();

        assert!(grammar.to_string() == "p -> a p | b r | b\n");
        assert!(grammar.check_own_type() == GrammarType::Regular);
    }

    #[test]
    fn accepting_entry_with_cycle_gets_new_start() {
        let grammar = machine_to_grammar(&ab_star()).unwrap();

        assert!(grammar.start() == &Symbol::from("Δ"));
        assert!(grammar.bodies_of(&Symbol::from("Δ")).map(|bodies| bodies.contains(&GrammarWord::new())) == Some(true));
        assert!(grammar.check_own_type() == GrammarType::Regular);
    }

    #[test]
    fn accepting_entry_without_cycle_gets_epsilon() {
        let machine = Automaton::new(
            vec![State::with_flags("p", true, true), State::with_flags("r", false, true)],
            alphabet(vec!["a"]),
            vec![Transition::new("p", "a", "r")]).unwrap();

        let grammar = machine_to_grammar(&machine).unwrap();

        assert!(grammar.start() == &Symbol::from("p"));
        assert!(grammar.to_string() == "p -> a r | a | ε\n");
    }

    #[test]
    fn round_trip_keeps_language() {
        let machine     = ab_star();
        let round_trip  = grammar_to_machine(&machine_to_grammar(&machine).unwrap()).unwrap();

        for text in vec!["", "a", "ab", "abab", "aba", "ba", "abb"] {
            assert!(machine.accepts(&word(text)) == round_trip.accepts(&word(text)));
        }
    }

    #[test]
    fn states_named_like_terminals_are_renamed() {
        let machine = Regex::parse("01").unwrap().to_automaton();
        let grammar = machine_to_grammar(&machine).unwrap();

        assert!(grammar.terminals() == &alphabet(vec!["0", "1"]));
        assert!(grammar.non_terminals().iter().all(|symbol| !grammar.is_terminal(symbol)));
        assert!(grammar.start() == &Symbol::from("q0"));
        assert!(grammar.check_own_type() == GrammarType::Regular);

        let round_trip = grammar_to_machine(&grammar).unwrap();
        for text in vec!["01", "0", "1", "", "011"] {
            assert!(round_trip.accepts(&word(text)) == machine.accepts(&word(text)));
        }
    }

    #[test]
    fn refuses_nfa() {
        let nfa = Automaton::new(
            vec![State::with_flags("p", true, true)],
            alphabet(vec!["a"]),
            vec![Transition::epsilon("p", "p")]).unwrap();

        assert!(machine_to_grammar(&nfa) == Err(Error::NotDeterministic { operation: "machine_to_grammar" }));
    }
}
