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
//! # formlang
//!
//! formlang is a library for working with the objects of formal language theory: finite automata, regular expressions
//! and grammars.
//!
//! * An `Automaton` can be determinized, minimized, combined with others (union, intersection, complement) and run
//!   one step at a time.
//! * A `Regex` compiles straight to a DFA.
//! * A `Grammar` can be classified, analysed for LL(1) parsing and cleaned up (left recursion, left factoring,
//!   epsilon and unit productions, useless symbols).
//! * Regular grammars and finite automata convert into each other.
//!
//! Everything is immutable: each operation returns a new value. Fallible operations return `formlang::Result`.
//!
//! ```
//! # use formlang::*;
//! let dfa = Regex::parse("(a|b)*abb").unwrap().to_automaton().minimize().unwrap();
//!
//! assert!(dfa.states().len() == 4);
//! assert!(dfa.accepts(&word("aabb")));
//! ```
//!

pub use self::symbol::*;
pub use self::name_generator::*;
pub use self::error::*;
pub use self::state::*;
pub use self::automaton::*;
pub use self::operations::*;
pub use self::next_step::*;
pub use self::regex::*;
pub use self::aho_syntax_tree::*;
pub use self::grammar::*;
pub use self::first_follow::*;
pub use self::ll1::*;
pub use self::factorization::*;
pub use self::conversion::*;
pub use self::record::*;

pub mod symbol;
pub mod name_generator;
pub mod error;
pub mod state;
pub mod automaton;
pub mod determinize;
pub mod reachability;
pub mod minimize;
pub mod operations;
pub mod next_step;
pub mod regex;
pub mod aho_syntax_tree;
pub mod grammar;
pub mod first_follow;
pub mod ll1;
pub mod left_recursion;
pub mod factorization;
pub mod simplification;
pub mod conversion;
pub mod record;
