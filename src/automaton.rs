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
//! # Automaton
//!
//! An `Automaton` is an immutable finite state machine. It is made up of named states, an alphabet and a set of
//! transitions. Exactly one state is the entry state; any number of states may be exit (accepting) states.
//!
//! Automata can be non-deterministic: more than one transition may leave a state for the same symbol, and transitions
//! may be made on `EPSILON`, which consumes no input.
//!
//! ```
//! # use formlang::*;
//! let ends_in_b = Automaton::new(
//!     vec![State::with_flags("q0", true, false), State::with_flags("q1", false, true)],
//!     alphabet(vec!["a", "b"]),
//!     vec![Transition::new("q0", "a", "q0"), Transition::new("q0", "b", "q0"), Transition::new("q0", "b", "q1")]).unwrap();
//!
//! assert!(ends_in_b.accepts(&word("aab")));
//! assert!(!ends_in_b.is_deterministic());
//! ```
//!
//! Every operation on an automaton (determinization, minimization, union and so on) returns a new automaton and leaves
//! its input untouched.
//!

use std::collections::BTreeSet;
use std::fmt;

use indexmap::{IndexMap, IndexSet};

use super::error::*;
use super::state::*;
use super::symbol::*;

///
/// An immutable finite state machine
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Automaton {
    /// The states of this automaton, by name
    states: IndexMap<StateId, State>,

    /// The input alphabet
    alphabet: Alphabet,

    /// The transitions between states
    transitions: IndexSet<Transition>,

    /// The name of the entry state
    entry: StateId,

    /// The names of the exit states (derived from the flags on `states`)
    exit_states: IndexSet<StateId>
}

impl Automaton {
    ///
    /// Creates a new automaton, checking that it is well formed
    ///
    /// Exactly one state must be marked as the entry state, every transition must refer to states in the automaton, and
    /// every transition symbol other than `EPSILON` must be in the alphabet.
    ///
    pub fn new<States, Transitions>(states: States, alphabet: Alphabet, transitions: Transitions) -> Result<Automaton>
    where States: IntoIterator<Item=State>, Transitions: IntoIterator<Item=Transition> {
        let mut state_map   = IndexMap::new();
        let mut entry: Option<StateId> = None;

        for state in states {
            if state.is_entry {
                if let Some(existing) = &entry {
                    return Err(Error::MultipleEntryStates(existing.clone(), state.id.clone()));
                }
                entry = Some(state.id.clone());
            }

            if state_map.contains_key(&state.id) {
                return Err(Error::DuplicateState(state.id.clone()));
            }
            state_map.insert(state.id.clone(), state);
        }

        let entry = entry.ok_or(Error::MissingEntryState)?;

        let mut transition_set = IndexSet::new();
        for transition in transitions {
            if !state_map.contains_key(&transition.from) {
                return Err(Error::UnknownState(transition.from.clone()));
            }
            if !state_map.contains_key(&transition.to) {
                return Err(Error::UnknownState(transition.to.clone()));
            }
            if !transition.is_epsilon() && !alphabet.contains(&transition.with) {
                return Err(Error::UnknownSymbol(transition.with.clone()));
            }

            transition_set.insert(transition);
        }

        Ok(Automaton::from_parts(state_map, alphabet, transition_set, entry))
    }

    ///
    /// Assembles an automaton from parts that are already known to be consistent
    ///
    pub(crate) fn from_parts(states: IndexMap<StateId, State>, alphabet: Alphabet, transitions: IndexSet<Transition>, entry: StateId) -> Automaton {
        let exit_states = states.values()
            .filter(|state| state.is_exit)
            .map(|state| state.id.clone())
            .collect();

        Automaton { states: states, alphabet: alphabet, transitions: transitions, entry: entry, exit_states: exit_states }
    }

    /// The states in this automaton
    #[inline]
    pub fn states(&self) -> &IndexMap<StateId, State> {
        &self.states
    }

    /// Looks up a state by name
    #[inline]
    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.get(id)
    }

    /// The input alphabet of this automaton
    #[inline]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The transitions of this automaton
    #[inline]
    pub fn transitions(&self) -> &IndexSet<Transition> {
        &self.transitions
    }

    /// The entry state
    #[inline]
    pub fn entry(&self) -> &State {
        &self.states[&self.entry]
    }

    /// The name of the entry state
    #[inline]
    pub fn entry_id(&self) -> &StateId {
        &self.entry
    }

    /// The names of the accepting states
    #[inline]
    pub fn exit_states(&self) -> &IndexSet<StateId> {
        &self.exit_states
    }

    /// True if the named state is an accepting state
    #[inline]
    pub fn is_exit(&self, id: &str) -> bool {
        self.exit_states.contains(id)
    }

    ///
    /// Returns the transitions leaving a state
    ///
    pub fn transitions_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item=&'a Transition> + 'a {
        self.transitions.iter().filter(move |transition| transition.from == id)
    }

    ///
    /// Returns the states reached from a state on a particular symbol (without following epsilon transitions)
    ///
    pub fn targets(&self, id: &str, symbol: &Symbol) -> BTreeSet<StateId> {
        self.transitions_from(id)
            .filter(|transition| &transition.with == symbol)
            .map(|transition| transition.to.clone())
            .collect()
    }

    ///
    /// True if any transition in this automaton is made on `EPSILON`
    ///
    pub fn has_epsilon_transitions(&self) -> bool {
        self.transitions.iter().any(|transition| transition.is_epsilon())
    }

    ///
    /// True if this automaton has no epsilon transitions and at most one transition per state and symbol
    ///
    pub fn is_deterministic(&self) -> bool {
        if self.has_epsilon_transitions() {
            return false;
        }

        let mut seen = IndexSet::new();
        self.transitions.iter().all(|transition| seen.insert((&transition.from, &transition.with)))
    }

    ///
    /// Fails with `NotDeterministic` unless this automaton is a DFA
    ///
    pub(crate) fn require_deterministic(&self, operation: &'static str) -> Result<()> {
        if self.is_deterministic() {
            Ok(())
        } else {
            Err(Error::NotDeterministic { operation: operation })
        }
    }

    ///
    /// Returns the states that can be reached from a state using only epsilon transitions, including the state itself
    ///
    pub fn epsilon_closure(&self, id: &str) -> BTreeSet<StateId> {
        let mut result  = BTreeSet::new();
        let mut stack   = vec![id.to_string()];

        while let Some(next_state) = stack.pop() {
            if result.insert(next_state.clone()) {
                for transition in self.transitions_from(&next_state) {
                    if transition.is_epsilon() && !result.contains(&transition.to) {
                        stack.push(transition.to.clone());
                    }
                }
            }
        }

        result
    }

    ///
    /// Computes the epsilon closure of every state in this automaton
    ///
    pub fn epsilon_closure_of_all_states(&self) -> IndexMap<StateId, BTreeSet<StateId>> {
        self.states.keys()
            .map(|id| (id.clone(), self.epsilon_closure(id)))
            .collect()
    }

    ///
    /// Returns the epsilon closure of a set of states
    ///
    pub fn epsilon_closure_of_set<'a, States: IntoIterator<Item=&'a StateId>>(&self, states: States) -> BTreeSet<StateId> {
        let mut result = BTreeSet::new();

        for state in states {
            if !result.contains(state) {
                result.extend(self.epsilon_closure(state));
            }
        }

        result
    }

    ///
    /// True if this automaton accepts the specified word
    ///
    /// Works for any automaton, including ones with epsilon transitions, by tracking every state the machine could be in.
    ///
    pub fn accepts(&self, input: &[Symbol]) -> bool {
        let mut current = self.epsilon_closure(&self.entry);

        for symbol in input {
            let moved: BTreeSet<StateId> = current.iter()
                .flat_map(|state| self.targets(state, symbol))
                .collect();

            current = self.epsilon_closure_of_set(&moved);
            if current.is_empty() {
                return false;
            }
        }

        current.iter().any(|state| self.is_exit(state))
    }
}

impl fmt::Display for Automaton {
    ///
    /// Writes out the states (`>` marks the entry state and `*` an exit state) followed by one transition per line
    ///
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let states: Vec<String> = self.states.values()
            .map(|state| format!("{}{}{}", if state.is_entry { ">" } else { "" }, state.id, if state.is_exit { "*" } else { "" }))
            .collect();
        writeln!(f, "states: {}", states.join(", "))?;

        let symbols: Vec<&str> = self.alphabet.iter().map(|symbol| symbol.as_str()).collect();
        writeln!(f, "alphabet: {}", symbols.join(", "))?;

        for transition in &self.transitions {
            writeln!(f, "{}", transition)?;
        }

        Ok(())
    }
}
