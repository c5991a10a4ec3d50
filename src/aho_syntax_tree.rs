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
//! # Aho-Sethi-Ullman construction
//!
//! Builds a DFA directly from a regular expression, without going through an NFA.
//!
//! The expression is extended with an end marker (`r#`) and turned into a syntax tree whose leaves are numbered with
//! positions, starting at 1. Every node knows whether it can match the empty string (`nullable`), which positions can
//! start a match (`first_pos`) and which can end one (`last_pos`). From these, `follow_pos` is worked out for each
//! position: the positions that can come straight after it in some match.
//!
//! Each state of the DFA is a set of positions, named by joining them with commas (`1,2,3`). The entry state is the
//! `first_pos` of the root; moving on a symbol gathers the `follow_pos` of every position in the state that holds
//! that symbol. A state accepts if it contains the position of the end marker.
//!
//! ```
//! # use formlang::*;
//! let dfa = Regex::parse("(a|b)*abb").unwrap().to_automaton();
//!
//! assert!(dfa.accepts(&word("babb")));
//! assert!(!dfa.accepts(&word("abab")));
//! ```
//!

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use indexmap::{IndexMap, IndexSet};
use log::*;

use super::automaton::*;
use super::error::*;
use super::regex::*;
use super::state::*;
use super::symbol::*;

///
/// Identifies a leaf of the syntax tree
///
pub type PositionId = usize;

///
/// The operator or leaf at a node of the syntax tree
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AhoNodeKind {
    /// A symbol at a numbered position
    Leaf(Symbol, PositionId),

    /// The end marker appended to the expression
    EndMarker(PositionId),

    /// The empty string (has no position)
    Epsilon,

    Concat(usize, usize),
    Or(usize, usize),
    Closure(usize)
}

///
/// A node of the syntax tree, along with its computed properties
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AhoNode {
    pub kind: AhoNodeKind,
    pub nullable: bool,
    pub first_pos: BTreeSet<PositionId>,
    pub last_pos: BTreeSet<PositionId>
}

///
/// The augmented syntax tree of a regular expression
///
/// Nodes are stored in a vector and refer to their children by index. Children always come before their parents.
///
#[derive(Clone, Debug)]
pub struct AhoSyntaxTree {
    nodes: Vec<AhoNode>,

    /// Symbol at each position (the end marker has no entry)
    symbols: BTreeMap<PositionId, Symbol>,

    /// Positions that can follow each position
    follow_pos: BTreeMap<PositionId, BTreeSet<PositionId>>,

    /// Position of the end marker
    end_marker: PositionId
}

impl AhoSyntaxTree {
    ///
    /// Builds the augmented syntax tree for an expression
    ///
    pub fn new(regex: &Regex) -> AhoSyntaxTree {
        let mut tree = AhoSyntaxTree { nodes: vec![], symbols: BTreeMap::new(), follow_pos: BTreeMap::new(), end_marker: 0 };
        let mut next_position = 1;

        let body    = tree.create_node(regex, &mut next_position);
        let marker  = tree.push(AhoNodeKind::EndMarker(next_position));
        tree.end_marker = next_position;
        tree.push(AhoNodeKind::Concat(body, marker));

        tree.update_follow_pos();
        tree
    }

    /// The root of the tree
    #[inline]
    pub fn root(&self) -> &AhoNode {
        &self.nodes[self.nodes.len()-1]
    }

    /// All of the nodes, children before parents
    #[inline]
    pub fn nodes(&self) -> &[AhoNode] {
        &self.nodes
    }

    /// The position of the end marker
    #[inline]
    pub fn end_marker(&self) -> PositionId {
        self.end_marker
    }

    /// The symbol at a position (`None` for the end marker)
    #[inline]
    pub fn symbol_at(&self, position: PositionId) -> Option<&Symbol> {
        self.symbols.get(&position)
    }

    ///
    /// The positions that can follow a position
    ///
    pub fn follow_pos(&self, position: PositionId) -> BTreeSet<PositionId> {
        self.follow_pos.get(&position).cloned().unwrap_or_default()
    }

    ///
    /// Adds the nodes for an expression, returning the index of its top node
    ///
    fn create_node(&mut self, regex: &Regex, next_position: &mut PositionId) -> usize {
        match regex {
            Regex::Epsilon => self.push(AhoNodeKind::Epsilon),

            Regex::Literal(symbol) => {
                let position = *next_position;
                *next_position += 1;

                self.symbols.insert(position, symbol.clone());
                self.push(AhoNodeKind::Leaf(symbol.clone(), position))
            },

            Regex::Concat(first, second) => {
                let first   = self.create_node(first, next_position);
                let second  = self.create_node(second, next_position);
                self.push(AhoNodeKind::Concat(first, second))
            },

            Regex::Or(first, second) => {
                let first   = self.create_node(first, next_position);
                let second  = self.create_node(second, next_position);
                self.push(AhoNodeKind::Or(first, second))
            },

            Regex::Closure(inner) => {
                let inner = self.create_node(inner, next_position);
                self.push(AhoNodeKind::Closure(inner))
            }
        }
    }

    ///
    /// Adds a node, computing `nullable`, `first_pos` and `last_pos` from its children
    ///
    fn push(&mut self, kind: AhoNodeKind) -> usize {
        let node = match kind {
            AhoNodeKind::Leaf(_, position) | AhoNodeKind::EndMarker(position) => {
                let positions: BTreeSet<PositionId> = Some(position).into_iter().collect();
                AhoNode { kind: kind, nullable: false, first_pos: positions.clone(), last_pos: positions }
            },

            AhoNodeKind::Epsilon => {
                AhoNode { kind: kind, nullable: true, first_pos: BTreeSet::new(), last_pos: BTreeSet::new() }
            },

            AhoNodeKind::Concat(first, second) => {
                let (a, b) = (&self.nodes[first], &self.nodes[second]);

                let first_pos   = if a.nullable { a.first_pos.union(&b.first_pos).cloned().collect() } else { a.first_pos.clone() };
                let last_pos    = if b.nullable { a.last_pos.union(&b.last_pos).cloned().collect() } else { b.last_pos.clone() };
                let nullable    = a.nullable && b.nullable;

                AhoNode { kind: kind, nullable: nullable, first_pos: first_pos, last_pos: last_pos }
            },

            AhoNodeKind::Or(first, second) => {
                let (a, b) = (&self.nodes[first], &self.nodes[second]);

                AhoNode {
                    kind:       kind,
                    nullable:   a.nullable || b.nullable,
                    first_pos:  a.first_pos.union(&b.first_pos).cloned().collect(),
                    last_pos:   a.last_pos.union(&b.last_pos).cloned().collect()
                }
            },

            AhoNodeKind::Closure(inner) => {
                let inner = &self.nodes[inner];
                AhoNode { kind: kind, nullable: true, first_pos: inner.first_pos.clone(), last_pos: inner.last_pos.clone() }
            }
        };

        self.nodes.push(node);
        self.nodes.len()-1
    }

    ///
    /// Fills in `follow_pos` from the concatenation and closure nodes
    ///
    fn update_follow_pos(&mut self) {
        let mut follow_pos: BTreeMap<PositionId, BTreeSet<PositionId>> = BTreeMap::new();

        for node in &self.nodes {
            match node.kind {
                AhoNodeKind::Concat(first, second) => {
                    for position in &self.nodes[first].last_pos {
                        follow_pos.entry(*position).or_default().extend(self.nodes[second].first_pos.iter().cloned());
                    }
                },

                AhoNodeKind::Closure(_) => {
                    for position in &node.last_pos {
                        follow_pos.entry(*position).or_default().extend(node.first_pos.iter().cloned());
                    }
                },

                _ => { }
            }
        }

        self.follow_pos = follow_pos;
    }

    ///
    /// Builds the DFA for this tree
    ///
    pub fn to_automaton(&self, alphabet: &Alphabet) -> Automaton {
        fn state_name(positions: &BTreeSet<PositionId>) -> String {
            let parts: Vec<String> = positions.iter().map(|position| position.to_string()).collect();
            parts.join(",")
        }

        let start       = self.root().first_pos.clone();
        let start_name  = state_name(&start);

        let mut seen: IndexMap<String, BTreeSet<PositionId>>    = IndexMap::new();
        let mut transitions                                     = IndexSet::new();
        let mut pending                                         = VecDeque::new();

        seen.insert(start_name.clone(), start.clone());
        pending.push_back((start_name.clone(), start));

        while let Some((name, positions)) = pending.pop_front() {
            for symbol in alphabet {
                let target: BTreeSet<PositionId> = positions.iter()
                    .filter(|position| self.symbol_at(**position) == Some(symbol))
                    .flat_map(|position| self.follow_pos(*position))
                    .collect();

                if target.is_empty() {
                    continue;
                }

                let target_name = state_name(&target);
                if !seen.contains_key(&target_name) {
                    seen.insert(target_name.clone(), target.clone());
                    pending.push_back((target_name.clone(), target));
                }

                transitions.insert(Transition::new(name.clone(), symbol.clone(), target_name));
            }
        }

        let states: IndexMap<StateId, State> = seen.iter()
            .map(|(name, positions)| {
                let is_exit = positions.contains(&self.end_marker);
                (name.clone(), State::with_flags(name.clone(), name == &start_name, is_exit))
            })
            .collect();

        debug!("to_automaton: {} positions produced {} states", self.end_marker, states.len());

        Automaton::from_parts(states, alphabet.clone(), transitions, start_name)
    }
}

impl Regex {
    ///
    /// Compiles this expression into a DFA
    ///
    pub fn to_automaton(&self) -> Automaton {
        AhoSyntaxTree::new(self).to_automaton(&self.alphabet())
    }
}

impl RegularExpression {
    ///
    /// Parses and compiles the stored expression
    ///
    pub fn to_automaton(&self) -> Result<Automaton> {
        Ok(self.regex()?.to_automaton())
    }
}

#[cfg(test)]
mod test {
    use super::super::*;

    fn positions(list: &[usize]) -> std::collections::BTreeSet<usize> {
        list.iter().cloned().collect()
    }

    #[test]
    fn computes_textbook_follow_pos() {
        let tree = AhoSyntaxTree::new(&Regex::parse("(a|b)*abb").unwrap());

        assert!(tree.end_marker() == 6);
        assert!(tree.follow_pos(1) == positions(&[1, 2, 3]));
        assert!(tree.follow_pos(2) == positions(&[1, 2, 3]));
        assert!(tree.follow_pos(3) == positions(&[4]));
        assert!(tree.follow_pos(4) == positions(&[5]));
        assert!(tree.follow_pos(5) == positions(&[6]));
        assert!(tree.follow_pos(6).is_empty());
    }

    #[test]
    fn root_properties() {
        let tree = AhoSyntaxTree::new(&Regex::parse("(a|b)*abb").unwrap());

        assert!(!tree.root().nullable);
        assert!(tree.root().first_pos == positions(&[1, 2, 3]));
        assert!(tree.root().last_pos == positions(&[6]));
    }

    #[test]
    fn epsilon_leaves_have_no_positions() {
        let tree = AhoSyntaxTree::new(&Regex::parse("a|ε").unwrap());

        assert!(tree.end_marker() == 2);
        assert!(tree.root().first_pos == positions(&[1, 2]));
    }

    #[test]
    fn exit_states_contain_end_marker() {
        let dfa = Regex::parse("(a|b)*abb").unwrap().to_automaton();

        assert!(dfa.states().len() == 4);
        assert!(dfa.transitions().len() == 8);
        assert!(dfa.entry().id == "1,2,3");
        assert!(dfa.exit_states().len() == 1);
        assert!(dfa.exit_states().iter().all(|id| id.split(',').any(|position| position == "6")));
        assert!(dfa.is_exit("1,2,3,6"));
    }

    #[test]
    fn compiled_automaton_is_deterministic() {
        let dfa = Regex::parse("(ab|a)*b?").unwrap().to_automaton();

        assert!(dfa.is_deterministic());
        assert!(dfa.accepts(&word("")));
        assert!(dfa.accepts(&word("aab")));
        assert!(dfa.accepts(&word("abab")));
        assert!(!dfa.accepts(&word("bb")));
    }

    #[test]
    fn empty_expression_accepts_only_empty_word() {
        let dfa = Regex::parse("").unwrap().to_automaton();

        assert!(dfa.states().len() == 1);
        assert!(dfa.accepts(&[]));
        assert!(dfa.transitions().is_empty());
    }

    #[test]
    fn plus_requires_one_repetition() {
        let dfa = Regex::parse("a+").unwrap().to_automaton();

        assert!(!dfa.accepts(&word("")));
        assert!(dfa.accepts(&word("a")));
        assert!(dfa.accepts(&word("aaa")));
    }
}
