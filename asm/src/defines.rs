use indexmap::IndexMap;
use std::collections::HashSet;

/// Maximum number of substitutions followed for one token.
pub const MAX_CHAIN: usize = 16;

/// `#define` / `.equ` table: name to raw replacement text.
#[derive(Debug, Clone, Default)]
pub struct Defines(IndexMap<String, String>);

impl Defines {
    pub fn new() -> Self {
        Defines(IndexMap::new())
    }

    pub fn insert(&mut self, name: String, value: String) -> Option<String> {
        self.0.insert(name, value)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|s| s.as_str())
    }

    /// Follow the substitution chain starting at `token`.
    ///
    /// Stops after [`MAX_CHAIN`] hops, on a name that was already visited, or on a
    /// name that is not defined. The text reached at that point is returned as is.
    pub fn resolve<'a>(&'a self, token: &'a str) -> &'a str {
        let mut seen = HashSet::new();
        let mut val = token;
        for _ in 0..MAX_CHAIN {
            match self.0.get(val) {
                Some(next) if seen.insert(val) => val = next.as_str(),
                _ => break,
            }
        }
        val
    }
}

impl FromIterator<(String, String)> for Defines {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Defines(iter.into_iter().collect())
    }
}
