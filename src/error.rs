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
//! # Errors
//!
//! Every fallible operation in this library returns `formlang::Result`. Errors are raised as soon as a precondition or
//! invariant is found to be broken: nothing is retried or coerced.
//!

use thiserror::Error;

use super::grammar::GrammarType;
use super::record::MachineType;
use super::state::StateId;
use super::symbol::*;

///
/// Errors raised by the automaton, regex and grammar operations
///
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum Error {
    /// An operation was handed a grammar of a type it can't process
    #[error("{operation} requires a {expected} grammar, but this grammar is {found}")]
    GrammarType { operation: &'static str, expected: GrammarType, found: GrammarType },

    /// An operation that only works on DFAs was given an automaton with epsilon transitions or non-determinism
    #[error("{operation} requires a deterministic automaton without epsilon transitions")]
    NotDeterministic { operation: &'static str },

    /// A record describing something other than a finite state machine was converted to an automaton
    #[error("cannot treat a {0} record as a finite state machine")]
    UnsupportedMachineType(MachineType),

    #[error("the automaton has no entry state")]
    MissingEntryState,

    #[error("the automaton has more than one entry state (`{0}` and `{1}`)")]
    MultipleEntryStates(StateId, StateId),

    #[error("state `{0}` is defined more than once")]
    DuplicateState(StateId),

    #[error("a transition refers to the unknown state `{0}`")]
    UnknownState(StateId),

    #[error("symbol `{0}` is used by a transition but is not in the alphabet")]
    UnknownSymbol(Symbol),

    /// Two automata being combined share a state name and renaming was not allowed
    #[error("state `{0}` exists in both automata")]
    StateCollision(StateId),

    #[error("start symbol `{0}` is not a non-terminal")]
    StartSymbolNotNonTerminal(Symbol),

    #[error("symbol `{0}` is neither a terminal nor a non-terminal")]
    UndeclaredSymbol(Symbol),

    #[error("a production has an empty head")]
    EmptyHead,

    /// A grammar uses a symbol as a terminal that has a special meaning to the operation
    #[error("`{0}` is reserved and can't be used as a terminal")]
    ReservedSymbol(Symbol),

    /// A stored record says one thing about what it describes, but its contents say another
    #[error("record field `{field}` is `{stored}`, but the record describes `{actual}`")]
    RecordMismatch { field: &'static str, stored: String, actual: String },

    /// A cell of an LL(1) analysis table would hold two different productions
    #[error("LL(1) conflict at ({non_terminal}, {terminal}): `{existing}` and `{conflicting}`")]
    Ll1Conflict { non_terminal: Symbol, terminal: Symbol, existing: String, conflicting: String },

    #[error("invalid regular expression at position {position}: {message}")]
    RegexSyntax { position: usize, message: String },

    #[error("invalid grammar on line {line}: {message}")]
    GrammarSyntax { line: usize, message: String },
}

///
/// Result type used throughout this library
///
pub type Result<T> = ::std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn grammar_type_error_names_operation() {
        let error = Error::GrammarType { operation: "grammar_to_machine", expected: GrammarType::Regular, found: GrammarType::ContextFree };

        assert!(error.to_string() == "grammar_to_machine requires a REGULAR grammar, but this grammar is CONTEXT_FREE");
    }

    #[test]
    fn unknown_state_error_names_state() {
        let error = Error::UnknownState("q9".to_string());

        assert!(error.to_string().contains("`q9`"));
    }
}
