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
//! # Stepwise execution
//!
//! `next_step` runs a DFA over a word one symbol at a time. Each call to `next` consumes a symbol and produces the
//! transition that was taken. Once the input runs out, the final item says whether the machine stopped in an accepting
//! state. If the machine gets stuck part way through the word, the final item is `Finished(false)`.
//!
//! ```
//! # use formlang::*;
//! let dfa = Automaton::new(
//!     vec![State::with_flags("q0", true, false), State::with_flags("q1", false, true)],
//!     alphabet(vec!["a"]),
//!     vec![Transition::new("q0", "a", "q1")]).unwrap();
//!
//! let steps: Vec<Step> = dfa.next_step(&word("a")).collect();
//! assert!(steps == vec![Step::Transition(Transition::new("q0", "a", "q1")), Step::Finished(true)]);
//! ```
//!
//! Stopping early is just a matter of not calling `next` again; calling `next_step` again starts a new run.
//!

use super::automaton::*;
use super::state::*;
use super::symbol::*;

///
/// One step of running an automaton
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Step {
    /// The machine consumed a symbol by following this transition
    Transition(Transition),

    /// The run is over: true if the word was accepted
    Finished(bool)
}

///
/// Iterator that runs an automaton over a word one symbol at a time
///
pub struct NextStep<'a> {
    /// The automaton being run
    automaton: &'a Automaton,

    /// The word being read
    input: Vec<Symbol>,

    /// Index of the next symbol to read
    position: usize,

    /// The state the machine is in
    current: StateId,

    /// Set once the final step has been produced
    finished: bool
}

impl<'a> NextStep<'a> {
    ///
    /// The state the machine is currently in
    ///
    pub fn current_state(&self) -> &StateId {
        &self.current
    }

    ///
    /// The symbols that have not been read yet
    ///
    pub fn remaining_input(&self) -> &[Symbol] {
        &self.input[self.position..]
    }
}

impl Automaton {
    ///
    /// Starts a stepwise run of this automaton over a word
    ///
    /// The automaton should be deterministic. If more than one transition matches, the first is taken and epsilon
    /// transitions are never followed.
    ///
    pub fn next_step<'a>(&'a self, input: &[Symbol]) -> NextStep<'a> {
        NextStep { automaton: self, input: input.to_vec(), position: 0, current: self.entry_id().clone(), finished: false }
    }
}

impl<'a> Iterator for NextStep<'a> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.finished {
            return None;
        }

        let symbol = match self.input.get(self.position) {
            Some(symbol) => symbol,
            None => {
                self.finished = true;
                return Some(Step::Finished(self.automaton.is_exit(&self.current)));
            }
        };

        let taken = self.automaton.transitions_from(&self.current)
            .find(|transition| &transition.with == symbol)
            .cloned();

        match taken {
            Some(transition) => {
                self.position   += 1;
                self.current    = transition.to.clone();
                Some(Step::Transition(transition))
            },

            None => {
                // Stuck: no way to read the rest of the word
                self.finished = true;
                Some(Step::Finished(false))
            }
        }
    }
}
