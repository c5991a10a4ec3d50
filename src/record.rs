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
//! # Stored records
//!
//! Automata, grammars and regular expressions are stored as plain records. `from_db_entry` checks a record and turns it
//! into the in-memory model; `to_db_entry` goes the other way. Field names are camelCase when serialized.
//!
//! ```
//! # use formlang::*;
//! let record: GrammarRecord = serde_json::from_str(r#"{
//!     "id": "g1", "name": "a*", "type": "CONTEXT_FREE", "startSymbol": "S",
//!     "alphabetT": ["a"], "alphabetNT": ["S"],
//!     "transitions": [ { "from": ["S"], "to": [["a", "S"], ["ε"]] } ]
//! }"#).unwrap();
//!
//! let grammar = Grammar::from_db_entry(&record).unwrap();
//! assert!(grammar.to_string() == "S -> a S | ε\n");
//! ```
//!

use std::fmt;

use serde_derive::{Serialize, Deserialize};

use super::automaton::*;
use super::error::*;
use super::grammar::*;
use super::regex::*;
use super::state::*;
use super::symbol::*;

/// Type stored in the records of regular expressions
pub const REGULAR_EXPRESSION_TYPE: &str = "REGULAR_EXPRESSION";

///
/// The kinds of machine a record can describe
///
/// Only finite state machines can be turned into an `Automaton`.
///
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineType {
    FiniteStateMachine,
    PushdownAutomaton,
    TuringMachine
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            MachineType::FiniteStateMachine => "FINITE_STATE_MACHINE",
            MachineType::PushdownAutomaton  => "PUSHDOWN_AUTOMATON",
            MachineType::TuringMachine      => "TURING_MACHINE"
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRecord {
    pub id: String,
    pub is_entry: bool,
    pub is_exit: bool
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRecord {
    pub from: String,
    pub with: Symbol,
    pub to: String,

    #[serde(default)]
    pub push: Option<Symbol>,

    #[serde(default)]
    pub pop: Option<Symbol>
}

///
/// A stored machine
///
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineRecord {
    pub id: String,
    pub name: String,

    #[serde(rename = "type")]
    pub machine_type: MachineType,

    pub deterministic: bool,
    pub states: Vec<StateRecord>,
    pub entry_alphabet: Vec<Symbol>,

    #[serde(default)]
    pub memory_alphabet: Vec<Symbol>,

    pub transitions: Vec<TransitionRecord>
}

///
/// The bodies for one head of a stored grammar (`["ε"]` is the empty body)
///
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub from: Vec<Symbol>,
    pub to: Vec<Vec<Symbol>>
}

///
/// A stored grammar
///
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarRecord {
    pub id: String,
    pub name: String,

    #[serde(rename = "type")]
    pub grammar_type: GrammarType,

    pub start_symbol: Symbol,

    #[serde(rename = "alphabetT")]
    pub alphabet_t: Vec<Symbol>,

    #[serde(rename = "alphabetNT")]
    pub alphabet_nt: Vec<Symbol>,

    pub transitions: Vec<ProductionRecord>
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DefinitionRecord {
    pub name: String,
    pub expression: String
}

///
/// A stored regular expression
///
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegexRecord {
    pub id: String,
    pub name: String,

    #[serde(rename = "type")]
    pub regex_type: String,

    pub expression: String,

    #[serde(default)]
    pub definitions: Vec<DefinitionRecord>,

    #[serde(default)]
    pub global_definitions: Vec<String>
}

impl Automaton {
    ///
    /// Reads a finite state machine from a stored record
    ///
    /// The stored `deterministic` flag must agree with the transitions, and a finite state machine has no memory, so
    /// the memory alphabet must be empty.
    ///
    pub fn from_db_entry(record: &MachineRecord) -> Result<Automaton> {
        if record.machine_type != MachineType::FiniteStateMachine {
            return Err(Error::UnsupportedMachineType(record.machine_type));
        }

        let states = record.states.iter()
            .map(|state| State::with_flags(state.id.clone(), state.is_entry, state.is_exit));

        let transitions = record.transitions.iter()
            .map(|transition| Transition {
                from:   transition.from.clone(),
                with:   transition.with.clone(),
                to:     transition.to.clone(),
                push:   transition.push.clone(),
                pop:    transition.pop.clone()
            });

        let automaton = Automaton::new(states, record.entry_alphabet.iter().cloned().collect(), transitions)?;

        if automaton.is_deterministic() != record.deterministic {
            return Err(Error::RecordMismatch {
                field:  "deterministic",
                stored: record.deterministic.to_string(),
                actual: automaton.is_deterministic().to_string()
            });
        }

        if !record.memory_alphabet.is_empty() {
            let stored: Vec<&str> = record.memory_alphabet.iter().map(|symbol| symbol.as_str()).collect();

            return Err(Error::RecordMismatch {
                field:  "memoryAlphabet",
                stored: stored.join(","),
                actual: String::new()
            });
        }

        Ok(automaton)
    }

    ///
    /// Creates the record that stores this automaton
    ///
    pub fn to_db_entry(&self, id: &str, name: &str) -> MachineRecord {
        MachineRecord {
            id:                 id.to_string(),
            name:               name.to_string(),
            machine_type:       MachineType::FiniteStateMachine,
            deterministic:      self.is_deterministic(),
            states:             self.states().values().map(|state| StateRecord { id: state.id.clone(), is_entry: state.is_entry, is_exit: state.is_exit }).collect(),
            entry_alphabet:     self.alphabet().iter().cloned().collect(),
            memory_alphabet:    vec![],
            transitions:        self.transitions().iter().map(|transition| TransitionRecord {
                from:   transition.from.clone(),
                with:   transition.with.clone(),
                to:     transition.to.clone(),
                push:   transition.push.clone(),
                pop:    transition.pop.clone()
            }).collect()
        }
    }
}

impl Grammar {
    ///
    /// Reads a grammar from a stored record
    ///
    /// The stored type must be the one `check_own_type` works out for the productions.
    ///
    pub fn from_db_entry(record: &GrammarRecord) -> Result<Grammar> {
        let rules = record.transitions.iter()
            .flat_map(|production| production.to.iter().map(move |body| (production.from.clone(), body.clone())));

        let grammar = Grammar::new(
            record.alphabet_nt.iter().cloned().collect(),
            record.alphabet_t.iter().cloned().collect(),
            record.start_symbol.clone(),
            rules)?;

        let actual = grammar.check_own_type();
        if actual != record.grammar_type {
            return Err(Error::RecordMismatch { field: "type", stored: record.grammar_type.to_string(), actual: actual.to_string() });
        }

        Ok(grammar)
    }

    ///
    /// Creates the record that stores this grammar
    ///
    pub fn to_db_entry(&self, id: &str, name: &str) -> GrammarRecord {
        let transitions = self.rules().iter()
            .map(|(head, bodies)| ProductionRecord {
                from:   head.clone(),
                to:     bodies.iter().map(|body| if body.is_empty() { vec![Symbol::epsilon()] } else { body.clone() }).collect()
            })
            .collect();

        GrammarRecord {
            id:             id.to_string(),
            name:           name.to_string(),
            grammar_type:   self.check_own_type(),
            start_symbol:   self.start().clone(),
            alphabet_t:     self.terminals().iter().cloned().collect(),
            alphabet_nt:    self.non_terminals().iter().cloned().collect(),
            transitions:    transitions
        }
    }
}

impl RegularExpression {
    ///
    /// Reads a regular expression from a stored record, checking its type and that the expression parses
    ///
    pub fn from_db_entry(record: &RegexRecord) -> Result<RegularExpression> {
        if record.regex_type != REGULAR_EXPRESSION_TYPE {
            return Err(Error::RecordMismatch { field: "type", stored: record.regex_type.clone(), actual: REGULAR_EXPRESSION_TYPE.to_string() });
        }

        Regex::parse(&record.expression)?;

        Ok(RegularExpression {
            id:                 record.id.clone(),
            name:               record.name.clone(),
            expression:         record.expression.clone(),
            definitions:        record.definitions.iter().map(|definition| (definition.name.clone(), definition.expression.clone())).collect(),
            global_definitions: record.global_definitions.clone()
        })
    }

    ///
    /// Creates the record that stores this regular expression
    ///
    pub fn to_db_entry(&self) -> RegexRecord {
        RegexRecord {
            id:                 self.id.clone(),
            name:               self.name.clone(),
            regex_type:         REGULAR_EXPRESSION_TYPE.to_string(),
            expression:         self.expression.clone(),
            definitions:        self.definitions.iter().map(|(name, expression)| DefinitionRecord { name: name.clone(), expression: expression.clone() }).collect(),
            global_definitions: self.global_definitions.clone()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn machine_record() -> MachineRecord {
        serde_json::from_str(r#"{
            "id": "m1",
            "name": "ends in b",
            "type": "FINITE_STATE_MACHINE",
            "deterministic": false,
            "states": [
                { "id": "q0", "isEntry": true, "isExit": false },
                { "id": "q1", "isEntry": false, "isExit": true }
            ],
            "entryAlphabet": ["a", "b"],
            "memoryAlphabet": [],
            "transitions": [
                { "from": "q0", "with": "a", "to": "q0", "push": null, "pop": null },
                { "from": "q0", "with": "b", "to": "q0", "push": null, "pop": null },
                { "from": "q0", "with": "b", "to": "q1", "push": null, "pop": null }
            ]
        }"#).unwrap()
    }

    #[test]
    fn reads_machine_record() {
        let automaton = Automaton::from_db_entry(&machine_record()).unwrap();

        assert!(automaton.states().len() == 2);
        assert!(automaton.accepts(&word("aab")));
        assert!(!automaton.is_deterministic());
    }

    #[test]
    fn machine_record_round_trips() {
        let record      = machine_record();
        let automaton   = Automaton::from_db_entry(&record).unwrap();

        assert!(automaton.to_db_entry(&record.id, &record.name) == record);
    }

    #[test]
    fn machine_record_json_round_trips() {
        let record  = machine_record();
        let json    = serde_json::to_string(&record).unwrap();

        assert!(serde_json::from_str::<MachineRecord>(&json).unwrap() == record);
        assert!(json.contains("\"entryAlphabet\""));
        assert!(json.contains("\"type\":\"FINITE_STATE_MACHINE\""));
    }

    #[test]
    fn refuses_pushdown_automaton() {
        let mut record = machine_record();
        record.machine_type = MachineType::PushdownAutomaton;

        assert!(Automaton::from_db_entry(&record) == Err(Error::UnsupportedMachineType(MachineType::PushdownAutomaton)));
    }

    #[test]
    fn refuses_record_with_two_entry_states() {
        let mut record = machine_record();
        record.states[1].is_entry = true;

        assert!(Automaton::from_db_entry(&record) == Err(Error::MultipleEntryStates("q0".to_string(), "q1".to_string())));
    }

    #[test]
    fn refuses_wrong_deterministic_flag() {
        let mut record = machine_record();
        record.deterministic = true;

        assert!(Automaton::from_db_entry(&record) == Err(Error::RecordMismatch {
            field:  "deterministic",
            stored: "true".to_string(),
            actual: "false".to_string()
        }));
    }

    #[test]
    fn epsilon_loop_is_not_deterministic() {
        let mut record = machine_record();
        record.transitions = vec![TransitionRecord { from: "q0".to_string(), with: Symbol::epsilon(), to: "q0".to_string(), push: None, pop: None }];
        record.deterministic = true;

        assert!(Automaton::from_db_entry(&record).is_err());

        record.deterministic = false;
        let automaton = Automaton::from_db_entry(&record).unwrap();
        assert!(automaton.to_db_entry(&record.id, &record.name) == record);
    }

    #[test]
    fn refuses_machine_with_memory() {
        let mut record = machine_record();
        record.memory_alphabet = word("Z");

        match Automaton::from_db_entry(&record) {
            Err(Error::RecordMismatch { field, .. }) => assert!(field == "memoryAlphabet"),
            _ => assert!(false)
        }
    }

    fn grammar_record() -> GrammarRecord {
        GrammarRecord {
            id:             "g1".to_string(),
            name:           "a*b".to_string(),
            grammar_type:   GrammarType::Regular,
            start_symbol:   Symbol::from("S"),
            alphabet_t:     word("ab"),
            alphabet_nt:    word("S"),
            transitions:    vec![ProductionRecord { from: word("S"), to: vec![word("aS"), word("b")] }]
        }
    }

    #[test]
    fn grammar_record_round_trips() {
        let record  = grammar_record();
        let grammar = Grammar::from_db_entry(&record).unwrap();

        assert!(grammar.to_db_entry(&record.id, &record.name) == record);
    }

    #[test]
    fn epsilon_body_is_stored_as_epsilon() {
        let grammar: Grammar    = "S -> aS | ε".parse().unwrap();
        let record              = grammar.to_db_entry("g2", "a*");

        assert!(record.transitions[0].to[1] == vec![Symbol::epsilon()]);
        assert!(record.grammar_type == GrammarType::ContextFree);
        assert!(Grammar::from_db_entry(&record).unwrap() == grammar);
    }

    #[test]
    fn refuses_grammar_record_with_wrong_type() {
        let mut record = grammar_record();
        record.grammar_type = GrammarType::ContextSensitive;

        assert!(Grammar::from_db_entry(&record) == Err(Error::RecordMismatch {
            field:  "type",
            stored: "CONTEXT_SENSITIVE".to_string(),
            actual: "REGULAR".to_string()
        }));
    }

    #[test]
    fn grammar_record_uses_stored_field_names() {
        let json = serde_json::to_string(&grammar_record()).unwrap();

        assert!(json.contains("\"alphabetNT\""));
        assert!(json.contains("\"alphabetT\""));
        assert!(json.contains("\"startSymbol\""));
    }

    #[test]
    fn regex_record_round_trips() {
        let record = RegexRecord {
            id:                 "r1".to_string(),
            name:               "digits".to_string(),
            regex_type:         REGULAR_EXPRESSION_TYPE.to_string(),
            expression:         "(0|1)+".to_string(),
            definitions:        vec![DefinitionRecord { name: "bit".to_string(), expression: "0|1".to_string() }],
            global_definitions: vec![]
        };

        let regex = RegularExpression::from_db_entry(&record).unwrap();

        assert!(regex.to_db_entry() == record);
        assert!(regex.to_automaton().unwrap().accepts(&word("0110")));
    }

    #[test]
    fn refuses_regex_record_of_other_type() {
        let record = RegexRecord {
            id:                 "r3".to_string(),
            name:               "a or b".to_string(),
            regex_type:         "REGEX".to_string(),
            expression:         "a|b".to_string(),
            definitions:        vec![],
            global_definitions: vec![]
        };

        assert!(RegularExpression::from_db_entry(&record) == Err(Error::RecordMismatch {
            field:  "type",
            stored: "REGEX".to_string(),
            actual: REGULAR_EXPRESSION_TYPE.to_string()
        }));
    }

    #[test]
    fn refuses_malformed_regex_record() {
        let record = RegexRecord {
            id:                 "r2".to_string(),
            name:               "broken".to_string(),
            regex_type:         REGULAR_EXPRESSION_TYPE.to_string(),
            expression:         "(a|b".to_string(),
            definitions:        vec![],
            global_definitions: vec![]
        };

        assert!(RegularExpression::from_db_entry(&record).is_err());
    }
}
