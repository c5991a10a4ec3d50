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
//! # States and transitions
//!
//! The building blocks of an `Automaton`. A state is identified by its name; a transition moves from one named state
//! to another on seeing a symbol.
//!

use std::fmt;

use super::symbol::*;

///
/// Identifies a state in an automaton
///
pub type StateId = String;

///
/// A state of an automaton
///
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct State {
    /// The name of this state
    pub id: StateId,

    /// True if the automaton starts in this state
    pub is_entry: bool,

    /// True if this is an accepting state
    pub is_exit: bool
}

impl State {
    ///
    /// Creates a state that is neither an entry nor an exit
    ///
    pub fn new<Id: Into<StateId>>(id: Id) -> State {
        State { id: id.into(), is_entry: false, is_exit: false }
    }

    ///
    /// Creates a state with the specified flags
    ///
    pub fn with_flags<Id: Into<StateId>>(id: Id, is_entry: bool, is_exit: bool) -> State {
        State { id: id.into(), is_entry: is_entry, is_exit: is_exit }
    }

    ///
    /// Returns a copy of this state with a different name
    ///
    pub fn renamed<Id: Into<StateId>>(&self, id: Id) -> State {
        State { id: id.into(), is_entry: self.is_entry, is_exit: self.is_exit }
    }
}

///
/// A transition between two states
///
/// `push` and `pop` are reserved for stack-based machines. They are always `None` for finite state machines, which
/// are the only machines the algorithms in this library work on.
///
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Transition {
    pub from: StateId,
    pub with: Symbol,
    pub to: StateId,
    pub push: Option<Symbol>,
    pub pop: Option<Symbol>
}

impl Transition {
    ///
    /// Creates a finite state machine transition
    ///
    pub fn new<From: Into<StateId>, With: Into<Symbol>, To: Into<StateId>>(from: From, with: With, to: To) -> Transition {
        Transition { from: from.into(), with: with.into(), to: to.into(), push: None, pop: None }
    }

    ///
    /// Creates an epsilon transition
    ///
    pub fn epsilon<From: Into<StateId>, To: Into<StateId>>(from: From, to: To) -> Transition {
        Transition::new(from, Symbol::epsilon(), to)
    }

    /// True if this transition consumes no input
    #[inline]
    pub fn is_epsilon(&self) -> bool {
        self.with.is_epsilon()
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -{}-> {}", self.from, self.with, self.to)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_transition_has_no_stack_operations() {
        let transition = Transition::new("q0", "a", "q1");

        assert!(transition.push == None);
        assert!(transition.pop == None);
        assert!(!transition.is_epsilon());
    }

    #[test]
    fn can_display_transition() {
        assert!(Transition::epsilon("q0", "q1").to_string() == "q0 -ε-> q1");
    }

    #[test]
    fn renaming_keeps_flags() {
        let state = State::with_flags("q0", true, true).renamed("p0");

        assert!(state == State::with_flags("p0", true, true));
    }
}
