use indexmap::{map::Entry, IndexMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub addr: u16,
    pub file: String,
    pub line: usize,
}

impl Label {
    pub fn pos(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

/// Label name to address, in definition order.
#[derive(Debug, Clone, Default)]
pub struct Labels(IndexMap<String, Label>);

impl Labels {
    pub fn new() -> Self {
        Labels(IndexMap::new())
    }

    /// Insert a new label. If the name is taken, the first definition is kept and returned.
    pub fn insert(&mut self, name: &str, label: Label) -> Option<&Label> {
        match self.0.entry(name.to_string()) {
            Entry::Occupied(prev) => Some(&*prev.into_mut()),
            Entry::Vacant(slot) => {
                slot.insert(label);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Label> {
        self.0.get(name)
    }

    pub fn get_val(&self, name: &str) -> Option<u16> {
        self.0.get(name).map(|label| label.addr)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Label)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}
