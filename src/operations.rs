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
//! # Automaton algebra
//!
//! Union, intersection and complement of the languages accepted by automata.
//!
//! Union works on any automaton: it adds a new entry state with epsilon transitions to the entry states of both
//! operands. Intersection (a product construction) and complement (completion followed by swapping accepting and
//! non-accepting states) are only correct for DFAs, so they fail with `Error::NotDeterministic` when given anything
//! else. Call `determinize` first.
//!

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use log::*;

use super::automaton::*;
use super::error::*;
use super::name_generator::*;
use super::state::*;
use super::symbol::*;

/// Name of the non-accepting state added when completing a DFA
pub const SINK_STATE: &str = "_DSFC_";

impl Automaton {
    ///
    /// Creates an automaton accepting every word accepted by either this automaton or `other`
    ///
    /// When the two automata share state names, they are renamed by appending `_1` to the names from this automaton and
    /// `_2` to the names from `other`, or `Error::StateCollision` is returned if `rename_states_if_colliding` is false.
    /// The new entry state is the first name generated from `new_entry_prefix` that neither automaton uses.
    ///
    pub fn union(&self, other: &Automaton, rename_states_if_colliding: bool, new_entry_prefix: &str) -> Result<Automaton> {
        let collision = other.states().keys().find(|id| self.states().contains_key(*id));

        let (left_suffix, right_suffix) = match collision {
            None                                    => ("", ""),
            Some(_) if rename_states_if_colliding   => ("_1", "_2"),
            Some(id)                                => return Err(Error::StateCollision(id.clone()))
        };

        let left    = self.with_suffix(left_suffix);
        let right   = other.with_suffix(right_suffix);

        let entry   = StateNameGenerator::new(new_entry_prefix)
            .next_free(|name| left.states().contains_key(name) || right.states().contains_key(name));

        let mut states = IndexMap::new();
        states.insert(entry.clone(), State::with_flags(entry.clone(), true, false));

        for machine in vec![&left, &right] {
            for state in machine.states().values() {
                states.insert(state.id.clone(), State::with_flags(state.id.clone(), false, state.is_exit));
            }
        }

        let mut transitions = IndexSet::new();
        transitions.insert(Transition::epsilon(entry.clone(), left.entry_id().clone()));
        transitions.insert(Transition::epsilon(entry.clone(), right.entry_id().clone()));
        transitions.extend(left.transitions().iter().cloned());
        transitions.extend(right.transitions().iter().cloned());

        let alphabet: Alphabet = left.alphabet().iter().chain(right.alphabet().iter()).cloned().collect();

        Ok(Automaton::from_parts(states, alphabet, transitions, entry))
    }

    ///
    /// Creates a DFA accepting the words accepted by both this DFA and `other`
    ///
    /// The states of the result are the reachable pairs of states, named `left;right`. If that name already belongs to
    /// a different pair (state names can contain `;`), the pair is named `left;right;0`, `left;right;1`, ... instead.
    ///
    pub fn intersect(&self, other: &Automaton) -> Result<Automaton> {
        self.require_deterministic("intersect")?;
        other.require_deterministic("intersect")?;

        let alphabet: Alphabet = self.alphabet().iter().chain(other.alphabet().iter()).cloned().collect();

        let mut names: IndexMap<(StateId, StateId), StateId>   = IndexMap::new();
        let mut states: IndexMap<StateId, State>                = IndexMap::new();
        let mut transitions                                     = IndexSet::new();
        let mut pending                                         = VecDeque::new();

        // Names a pair the first time it is seen, returning the name and whether the pair is new
        let mut name_pair = |left: &StateId, right: &StateId, states: &mut IndexMap<StateId, State>| -> (StateId, bool) {
            let pair = (left.clone(), right.clone());
            if let Some(name) = names.get(&pair) {
                return (name.clone(), false);
            }

            let plain = format!("{};{}", left, right);
            let name  = if states.contains_key(&plain) {
                StateNameGenerator::new(format!("{};", plain)).next_free(|candidate| states.contains_key(candidate))
            } else {
                plain
            };

            // The entry pair is always named first
            let is_entry    = states.is_empty();
            let is_exit     = self.is_exit(left) && other.is_exit(right);
            states.insert(name.clone(), State::with_flags(name.clone(), is_entry, is_exit));
            names.insert(pair, name.clone());

            (name, true)
        };

        let (entry, _) = name_pair(self.entry_id(), other.entry_id(), &mut states);
        pending.push_back((self.entry_id().clone(), other.entry_id().clone(), entry.clone()));

        while let Some((left, right, name)) = pending.pop_front() {
            for left_transition in self.transitions_from(&left) {
                for right_transition in other.transitions_from(&right) {
                    if left_transition.with != right_transition.with {
                        continue;
                    }

                    let (target, is_new) = name_pair(&left_transition.to, &right_transition.to, &mut states);
                    if is_new {
                        pending.push_back((left_transition.to.clone(), right_transition.to.clone(), target.clone()));
                    }

                    transitions.insert(Transition::new(name.clone(), left_transition.with.clone(), target));
                }
            }
        }

        debug!("intersect: {} x {} states became {}", self.states().len(), other.states().len(), states.len());

        Ok(Automaton::from_parts(states, alphabet, transitions, entry))
    }

    ///
    /// Returns a copy of this automaton with a transition for every state and symbol
    ///
    /// Missing transitions are sent to a new non-accepting sink state (`_DSFC_`), which loops to itself on every symbol.
    /// If nothing is missing the automaton is returned unchanged.
    ///
    pub fn complete(&self) -> Automaton {
        let symbols: Vec<&Symbol> = self.alphabet().iter().filter(|symbol| !symbol.is_epsilon()).collect();

        let missing: Vec<(&StateId, &Symbol)> = self.states().keys()
            .flat_map(|id| symbols.iter().map(move |symbol| (id, *symbol)))
            .filter(|(id, symbol)| !self.transitions_from(id).any(|transition| &transition.with == *symbol))
            .collect();

        if missing.is_empty() {
            return self.clone();
        }

        let sink = if self.states().contains_key(SINK_STATE) {
            StateNameGenerator::new(SINK_STATE).next_free(|name| self.states().contains_key(name))
        } else {
            SINK_STATE.to_string()
        };

        let mut states      = self.states().clone();
        let mut transitions = self.transitions().clone();

        states.insert(sink.clone(), State::new(sink.clone()));

        for (id, symbol) in missing {
            transitions.insert(Transition::new(id.clone(), symbol.clone(), sink.clone()));
        }
        for symbol in symbols {
            transitions.insert(Transition::new(sink.clone(), symbol.clone(), sink.clone()));
        }

        Automaton::from_parts(states, self.alphabet().clone(), transitions, self.entry_id().clone())
    }

    ///
    /// Creates a DFA accepting exactly the words over this automaton's alphabet that this DFA rejects
    ///
    pub fn complement(&self) -> Result<Automaton> {
        self.require_deterministic("complement")?;

        let complete = self.complete();
        let states: IndexMap<StateId, State> = complete.states().values()
            .map(|state| (state.id.clone(), State::with_flags(state.id.clone(), state.is_entry, !state.is_exit)))
            .collect();

        Ok(Automaton::from_parts(states, complete.alphabet().clone(), complete.transitions().clone(), complete.entry_id().clone()))
    }

    ///
    /// Appends a suffix to the name of every state
    ///
    fn with_suffix(&self, suffix: &str) -> Automaton {
        if suffix.is_empty() {
            return self.clone();
        }

        let rename = |id: &StateId| format!("{}{}", id, suffix);

        let states = self.states().values()
            .map(|state| (rename(&state.id), state.renamed(rename(&state.id))))
            .collect();

        let transitions = self.transitions().iter()
            .map(|transition| Transition { from: rename(&transition.from), to: rename(&transition.to), ..transition.clone() })
            .collect();

        Automaton::from_parts(states, self.alphabet().clone(), transitions, rename(self.entry_id()))
    }
}
