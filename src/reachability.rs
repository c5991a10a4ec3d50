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
//! # Reachability
//!
//! Forward reachability finds the states the machine can get to from its entry state. Backward reachability finds
//! the states that can still get to an exit state: a state that can't is 'dead' and can be removed without changing
//! the language.
//!

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use log::*;

use super::automaton::*;
use super::state::*;
use super::symbol::*;

impl Automaton {
    ///
    /// Returns the states that can be reached from the entry state, following transitions on any symbol
    ///
    pub fn reachable_states(&self) -> IndexSet<StateId> {
        let mut reached = IndexSet::new();
        let mut pending = VecDeque::new();

        reached.insert(self.entry_id().clone());
        pending.push_back(self.entry_id().clone());

        while let Some(state) = pending.pop_front() {
            for transition in self.transitions_from(&state) {
                if reached.insert(transition.to.clone()) {
                    pending.push_back(transition.to.clone());
                }
            }
        }

        reached
    }

    ///
    /// Returns the states that can't be reached from the entry state
    ///
    pub fn unreachable_states(&self) -> IndexSet<StateId> {
        let reached = self.reachable_states();

        self.states().keys()
            .filter(|id| !reached.contains(*id))
            .cloned()
            .collect()
    }

    ///
    /// Returns the states that have a transition on `symbol` into any of the states in `targets`
    ///
    pub fn states_that_reach_state_in_set_by(&self, targets: &IndexSet<StateId>, symbol: &Symbol) -> IndexSet<StateId> {
        self.transitions().iter()
            .filter(|transition| &transition.with == symbol && targets.contains(&transition.to))
            .map(|transition| transition.from.clone())
            .collect()
    }

    ///
    /// Returns the states from which an exit state can be reached
    ///
    pub fn live_states(&self) -> IndexSet<StateId> {
        let mut live    = IndexSet::new();
        let mut pending = VecDeque::new();

        for exit in self.exit_states() {
            live.insert(exit.clone());
            pending.push_back(exit.clone());
        }

        while let Some(state) = pending.pop_front() {
            for transition in self.transitions() {
                if transition.to == state && live.insert(transition.from.clone()) {
                    pending.push_back(transition.from.clone());
                }
            }
        }

        live
    }

    ///
    /// Returns a copy of this automaton without the states that can't be reached from the entry state
    ///
    pub fn remove_unreachable_states(&self) -> Automaton {
        let reached = self.reachable_states();
        let result  = self.retain_states(|id| reached.contains(id));

        debug!("remove_unreachable_states: removed {} states", self.states().len() - result.states().len());
        result
    }

    ///
    /// Returns a copy of this automaton without the states from which no exit state can be reached
    ///
    /// The entry state is always kept, even if it is dead (in which case the automaton accepts nothing).
    ///
    pub fn remove_dead_states(&self) -> Automaton {
        let live    = self.live_states();
        let entry   = self.entry_id().clone();
        let result  = self.retain_states(|id| live.contains(id) || id == &entry);

        debug!("remove_dead_states: removed {} states", self.states().len() - result.states().len());
        result
    }

    ///
    /// Returns a copy of this automaton whose alphabet only contains the symbols used by its transitions
    ///
    pub fn remove_unused_symbols(&self) -> Automaton {
        let alphabet: Alphabet = self.alphabet().iter()
            .filter(|symbol| self.transitions().iter().any(|transition| &transition.with == *symbol))
            .cloned()
            .collect();

        Automaton::from_parts(self.states().clone(), alphabet, self.transitions().clone(), self.entry_id().clone())
    }

    ///
    /// Keeps the states matching a predicate, along with the transitions between them
    ///
    /// The entry state must match the predicate.
    ///
    fn retain_states<Keep: Fn(&StateId) -> bool>(&self, keep: Keep) -> Automaton {
        let states: IndexMap<StateId, State> = self.states().iter()
            .filter(|(id, _)| keep(*id))
            .map(|(id, state)| (id.clone(), state.clone()))
            .collect();

        let transitions: IndexSet<Transition> = self.transitions().iter()
            .filter(|transition| keep(&transition.from) && keep(&transition.to))
            .cloned()
            .collect();

        Automaton::from_parts(states, self.alphabet().clone(), transitions, self.entry_id().clone())
    }
}

#[cfg(test)]
mod test {
    use super::super::*;

    fn with_unreachable_and_dead() -> Automaton {
        Automaton::new(
            vec![State::with_flags("q0", true, false), State::with_flags("q1", false, true), State::new("q2"), State::new("q3")],
            alphabet(vec!["a", "b"]),
            vec![
                Transition::new("q0", "a", "q1"),
                Transition::new("q0", "b", "q2"),
                Transition::new("q2", "a", "q2"),
                Transition::new("q3", "a", "q1")
            ]).unwrap()
    }

    #[test]
    fn finds_reachable_states() {
        let reached = with_unreachable_and_dead().reachable_states();

        assert!(reached.len() == 3);
        assert!(!reached.contains("q3"));
    }

    #[test]
    fn finds_unreachable_states() {
        let unreachable = with_unreachable_and_dead().unreachable_states();

        assert!(unreachable.len() == 1);
        assert!(unreachable.contains("q3"));
    }

    #[test]
    fn removes_unreachable_states_and_their_transitions() {
        let automaton = with_unreachable_and_dead().remove_unreachable_states();

        assert!(automaton.state("q3").is_none());
        assert!(automaton.transitions().len() == 3);
    }

    #[test]
    fn removes_dead_states() {
        let automaton = with_unreachable_and_dead().remove_dead_states();

        assert!(automaton.state("q2").is_none());
        assert!(automaton.state("q3").is_some());
        assert!(automaton.transitions().len() == 2);
    }

    #[test]
    fn keeps_dead_entry_state() {
        let automaton = Automaton::new(vec![State::with_flags("q0", true, false)], alphabet(vec!["a"]), vec![Transition::new("q0", "a", "q0")]).unwrap();

        assert!(automaton.remove_dead_states().state("q0").is_some());
    }

    #[test]
    fn finds_predecessors_by_symbol() {
        let automaton   = with_unreachable_and_dead();
        let targets     = vec!["q1".to_string()].into_iter().collect();
        let sources     = automaton.states_that_reach_state_in_set_by(&targets, &Symbol::from("a"));

        assert!(sources.len() == 2);
        assert!(sources.contains("q0"));
        assert!(sources.contains("q3"));
    }

    #[test]
    fn removes_unused_symbols() {
        let automaton = with_unreachable_and_dead().remove_dead_states().remove_unreachable_states().remove_unused_symbols();

        assert!(automaton.alphabet() == &alphabet(vec!["a"]));
    }
}
