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
//! # Minimization
//!
//! Two states of a DFA are equivalent if no input word can tell them apart. Minimization merges each class of
//! equivalent states into a single state, producing the smallest DFA for the language.
//!
//! Classes are found by partition refinement. The states start out split into accepting and non-accepting states, and
//! each round splits a class whenever two of its members move to different classes on some symbol. A missing transition
//! counts as a move to an implicit non-accepting sink. The rounds stop when nothing splits.
//!

use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};
use log::*;

use super::automaton::*;
use super::error::*;
use super::state::*;
use super::symbol::*;

impl Automaton {
    ///
    /// Partitions the states of this DFA into classes of equivalent states
    ///
    /// Unlike `minimize`, this works on the automaton as it is: unreachable and dead states are included in the result.
    ///
    pub fn equivalent_classes(&self) -> Result<Vec<BTreeSet<StateId>>> {
        self.require_deterministic("equivalent_classes")?;

        let symbols: Vec<&Symbol> = self.alphabet().iter().filter(|symbol| !symbol.is_epsilon()).collect();

        // Initial partition: accepting and non-accepting states
        let exits: BTreeSet<StateId>    = self.states().keys().filter(|id| self.is_exit(id)).cloned().collect();
        let others: BTreeSet<StateId>   = self.states().keys().filter(|id| !self.is_exit(id)).cloned().collect();

        let mut classes: Vec<BTreeSet<StateId>> = vec![exits, others].into_iter().filter(|class| !class.is_empty()).collect();

        loop {
            let class_of: IndexMap<StateId, usize> = classes.iter()
                .enumerate()
                .flat_map(|(index, class)| class.iter().map(move |id| (id.clone(), index)))
                .collect();

            let mut refined = vec![];
            for class in &classes {
                // Group the members by the classes their transitions lead to (None is the implicit sink)
                let mut groups: IndexMap<Vec<Option<usize>>, BTreeSet<StateId>> = IndexMap::new();

                for id in class {
                    let signature = symbols.iter()
                        .map(|symbol| self.targets(id, symbol).iter().next().map(|target| class_of[target]))
                        .collect();

                    groups.entry(signature).or_insert_with(BTreeSet::new).insert(id.clone());
                }

                refined.extend(groups.into_iter().map(|(_, members)| members));
            }

            trace!("equivalent_classes: {} classes became {}", classes.len(), refined.len());

            let stable  = refined.len() == classes.len();
            classes     = refined;

            if stable {
                break;
            }
        }

        Ok(classes)
    }

    ///
    /// Returns the minimal DFA accepting the same language as this one
    ///
    /// Dead and unreachable states are removed first. Each remaining class of equivalent states becomes a single state,
    /// named after its sorted members (`q1,q3`).
    ///
    pub fn minimize(&self) -> Result<Automaton> {
        self.require_deterministic("minimize")?;

        let trimmed = self.remove_dead_states().remove_unreachable_states();
        let classes = trimmed.equivalent_classes()?;

        let class_name: IndexMap<StateId, String> = classes.iter()
            .flat_map(|class| {
                let name = composite_name(class);
                class.iter().map(move |id| (id.clone(), name.clone()))
            })
            .collect();

        let mut states      = IndexMap::new();
        let mut transitions = IndexSet::new();

        for class in &classes {
            // Every member behaves the same way, so any of them can stand for the class
            let representative  = match class.iter().next() { Some(id) => id, None => continue };
            let name            = class_name[representative].clone();
            let is_entry        = class.contains(trimmed.entry_id());
            let is_exit         = trimmed.is_exit(representative);

            for transition in trimmed.transitions_from(representative) {
                transitions.insert(Transition::new(name.clone(), transition.with.clone(), class_name[&transition.to].clone()));
            }

            states.insert(name.clone(), State::with_flags(name, is_entry, is_exit));
        }

        let entry = class_name[trimmed.entry_id()].clone();

        debug!("minimize: {} states became {}", self.states().len(), states.len());

        Ok(Automaton::from_parts(states, trimmed.alphabet().clone(), transitions, entry))
    }
}
