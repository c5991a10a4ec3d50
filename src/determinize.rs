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
//! # Determinization
//!
//! Converts a (possibly epsilon-) non-deterministic automaton into a DFA using the subset construction. Each state of
//! the result stands for a set of states of the original automaton, and is named by joining the sorted member names
//! with commas: the set `{q2, q1}` becomes the state `q1,q2`. A set with a single member keeps that member's name.
//!
//! Only sets that can be reached from the entry state are generated.
//!

use std::collections::{BTreeSet, VecDeque};

use indexmap::{IndexMap, IndexSet};
use log::*;

use super::automaton::*;
use super::state::*;
use super::symbol::*;

impl Automaton {
    ///
    /// Returns a deterministic automaton that accepts the same language as this one
    ///
    pub fn determinize(&self) -> Automaton {
        let symbols: Vec<Symbol> = self.alphabet().iter()
            .filter(|symbol| !symbol.is_epsilon())
            .cloned()
            .collect();

        let closures    = self.epsilon_closure_of_all_states();
        let start       = closures[self.entry_id()].clone();

        let mut seen: IndexMap<String, BTreeSet<StateId>>   = IndexMap::new();
        let mut transitions                                 = IndexSet::new();
        let mut pending                                     = VecDeque::new();

        let start_name = composite_name(&start);
        seen.insert(start_name.clone(), start.clone());
        pending.push_back((start_name.clone(), start));

        while let Some((name, members)) = pending.pop_front() {
            trace!("determinize: expanding {}", name);

            for symbol in &symbols {
                // Every state reachable on this symbol from any member, followed by any epsilon transitions
                let mut target = BTreeSet::new();
                for member in &members {
                    for moved in self.targets(member, symbol) {
                        target.extend(closures[&moved].iter().cloned());
                    }
                }

                if target.is_empty() {
                    continue;
                }

                let target_name = composite_name(&target);
                if !seen.contains_key(&target_name) {
                    seen.insert(target_name.clone(), target.clone());
                    pending.push_back((target_name.clone(), target));
                }

                transitions.insert(Transition::new(name.clone(), symbol.clone(), target_name));
            }
        }

        let states: IndexMap<StateId, State> = seen.iter()
            .map(|(name, members)| {
                let is_exit = members.iter().any(|member| self.is_exit(member));
                (name.clone(), State::with_flags(name.clone(), name == &start_name, is_exit))
            })
            .collect();

        debug!("determinize: {} states became {}", self.states().len(), states.len());

        Automaton::from_parts(states, symbols.into_iter().collect(), transitions, start_name)
    }
}

#[cfg(test)]
mod test {
    use super::super::*;

    fn scenario_nfa() -> Automaton {
        Automaton::new(
            vec![State::with_flags("q0", true, true), State::new("q1"), State::with_flags("q2", false, true)],
            alphabet(vec!["0", "1"]),
            vec![
                Transition::new("q0", "0", "q0"),
                Transition::new("q0", "1", "q1"),
                Transition::new("q1", "1", "q1"),
                Transition::new("q1", "0", "q1"),
                Transition::new("q1", "0", "q2"),
                Transition::new("q2", "1", "q2"),
                Transition::new("q2", "1", "q1"),
                Transition::new("q2", "0", "q2")
            ]).unwrap()
    }

    #[test]
    fn determinizes_with_composite_names() {
        let dfa = scenario_nfa().determinize();

        let states: Vec<&str> = dfa.states().keys().map(|id| id.as_str()).collect();
        assert!(states == vec!["q0", "q1", "q1,q2"]);

        let expected = vec![
            Transition::new("q0", "1", "q1"),
            Transition::new("q0", "0", "q0"),
            Transition::new("q1", "0", "q1,q2"),
            Transition::new("q1", "1", "q1"),
            Transition::new("q1,q2", "0", "q1,q2"),
            Transition::new("q1,q2", "1", "q1,q2")
        ];
        assert!(dfa.transitions().len() == expected.len());
        assert!(expected.iter().all(|transition| dfa.transitions().contains(transition)));
    }

    #[test]
    fn composite_state_is_exit_if_a_member_is() {
        let dfa = scenario_nfa().determinize();

        assert!(dfa.is_exit("q0"));
        assert!(!dfa.is_exit("q1"));
        assert!(dfa.is_exit("q1,q2"));
        assert!(dfa.is_deterministic());
    }

    #[test]
    fn removes_epsilon_transitions() {
        let nfa = Automaton::new(
            vec![State::with_flags("a", true, false), State::new("b"), State::with_flags("c", false, true)],
            alphabet(vec!["x"]),
            vec![Transition::epsilon("a", "b"), Transition::new("b", "x", "c"), Transition::epsilon("c", "a")]).unwrap();

        let dfa = nfa.determinize();

        assert!(dfa.entry().id == "a,b");
        assert!(dfa.is_deterministic());
        assert!(dfa.accepts(&word("xxx")));
        assert!(!dfa.accepts(&word("")));
    }

    #[test]
    fn empty_alphabet_determinizes_to_itself() {
        let automaton = Automaton::new(vec![State::with_flags("q0", true, true)], alphabet(vec![]), vec![]).unwrap();

        assert!(automaton.determinize() == automaton);
    }

    #[test]
    fn determinized_dfa_is_unchanged() {
        let dfa = scenario_nfa().determinize();

        assert!(dfa.determinize() == dfa);
    }
}
