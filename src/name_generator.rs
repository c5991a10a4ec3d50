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
//! # Name generators
//!
//! Several operations need to invent names: union needs a new entry state, grammar conversions need an accepting
//! state, and the grammar transformations need new non-terminals. The generators here produce an endless stream of
//! candidate names. Each generator owns its counter, so creating a new generator starts the sequence again.
//!
//! ```
//! # use formlang::*;
//! let names: Vec<String> = StateNameGenerator::new("q").take(3).collect();
//! assert!(names == vec!["q0", "q1", "q2"]);
//! ```
//!

use indexmap::IndexSet;

use super::symbol::*;

/// Prefix used for states invented by this library
pub const DEFAULT_STATE_PREFIX: &str = "q";

/// Symbols used, in order, for invented non-terminals
pub const FRESH_SYMBOL_POOL: &[&str] = &["Δ", "Γ", "Θ", "Λ", "Ξ", "Π", "Σ", "Φ", "Ψ", "Ω"];

///
/// Generates the names `prefix0`, `prefix1`, `prefix2`, ...
///
#[derive(Clone, Debug)]
pub struct StateNameGenerator {
    prefix: String,
    next: usize
}

impl StateNameGenerator {
    ///
    /// Creates a generator for names starting with a particular prefix
    ///
    pub fn new<Prefix: Into<String>>(prefix: Prefix) -> StateNameGenerator {
        StateNameGenerator { prefix: prefix.into(), next: 0 }
    }

    ///
    /// Returns the first generated name for which `is_taken` returns false
    ///
    pub fn next_free<IsTaken: Fn(&str) -> bool>(&mut self, is_taken: IsTaken) -> String {
        loop {
            let candidate = format!("{}{}", self.prefix, self.next);
            self.next += 1;

            if !is_taken(&candidate) {
                return candidate;
            }
        }
    }
}

impl Iterator for StateNameGenerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let name = format!("{}{}", self.prefix, self.next);
        self.next += 1;

        Some(name)
    }
}

///
/// Produces symbols that have not been used before
///
/// The generator draws from `FRESH_SYMBOL_POOL`, skipping any symbol that is already in use. Once the pool is exhausted
/// it starts again with numbered variants (`Δ1`, `Γ1`, ...) so it never runs dry.
///
#[derive(Clone, Debug)]
pub struct SymbolPool {
    /// Symbols that must not be produced
    used: IndexSet<Symbol>,

    /// Index of the next candidate
    next: usize
}

impl SymbolPool {
    ///
    /// Creates a pool that avoids the specified symbols
    ///
    pub fn new<'a, Used: IntoIterator<Item=&'a Symbol>>(used: Used) -> SymbolPool {
        SymbolPool { used: used.into_iter().cloned().collect(), next: 0 }
    }

    ///
    /// Returns a symbol that is neither in the original set of used symbols nor returned by a previous call
    ///
    pub fn fresh(&mut self) -> Symbol {
        loop {
            let base        = FRESH_SYMBOL_POOL[self.next % FRESH_SYMBOL_POOL.len()];
            let round       = self.next / FRESH_SYMBOL_POOL.len();
            self.next += 1;

            let candidate   = if round == 0 { Symbol::from(base) } else { Symbol::new(format!("{}{}", base, round)) };

            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

impl Iterator for SymbolPool {
    type Item = Symbol;

    fn next(&mut self) -> Option<Symbol> {
        Some(self.fresh())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn state_names_count_up() {
        let names: Vec<String> = StateNameGenerator::new("s").take(3).collect();

        assert!(names == vec!["s0", "s1", "s2"]);
    }

    #[test]
    fn new_generator_restarts() {
        let mut first = StateNameGenerator::new("q");
        first.next();
        first.next();

        assert!(StateNameGenerator::new("q").next() == Some("q0".to_string()));
    }

    #[test]
    fn next_free_skips_taken_names() {
        let mut generator = StateNameGenerator::new("q");

        assert!(generator.next_free(|name| name == "q0" || name == "q1") == "q2");
    }

    #[test]
    fn pool_skips_used_symbols() {
        let used        = vec![Symbol::from("Δ"), Symbol::from("S")];
        let mut pool    = SymbolPool::new(&used);

        assert!(pool.fresh() == Symbol::from("Γ"));
        assert!(pool.fresh() == Symbol::from("Θ"));
    }

    #[test]
    fn pool_never_runs_dry() {
        let pool        = SymbolPool::new(&vec![]);
        let symbols: IndexSet<Symbol> = pool.take(FRESH_SYMBOL_POOL.len() + 2).collect();

        assert!(symbols.len() == FRESH_SYMBOL_POOL.len() + 2);
        assert!(symbols.contains("Δ1"));
    }
}
