// Shopping list model representing the items a shopper asked for

/// Free-text item names matched case-insensitively as substrings of item descriptions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    /// Requested names as given (trimmed)
    items: Vec<String>,

    /// Lowercased copies used for matching, parallel to `items`
    needles: Vec<String>,
}

impl ShoppingList {
    /// Creates a new empty shopping list
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item; blank names and case-insensitive duplicates are ignored
    pub fn add_item(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let needle = name.to_lowercase();
        if !self.needles.contains(&needle) {
            self.items.push(name.to_string());
            self.needles.push(needle);
        }
    }

    /// Requested item names in insertion order
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checks whether an already lowercased description satisfies any requested item
    pub fn matches_any(&self, lowered_description: &str) -> bool {
        self.needles
            .iter()
            .any(|needle| lowered_description.contains(needle.as_str()))
    }

    /// Indices of requested items that an already lowercased description satisfies
    pub fn matching_indices<'a>(
        &'a self,
        lowered_description: &'a str,
    ) -> impl Iterator<Item = usize> + 'a {
        self.needles
            .iter()
            .enumerate()
            .filter(move |(_, needle)| lowered_description.contains(needle.as_str()))
            .map(|(i, _)| i)
    }

    /// Returns the requested items not satisfied by any of the lowercased descriptions
    pub fn uncovered_by<'a, I>(&self, lowered_descriptions: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut covered = vec![false; self.needles.len()];
        for description in lowered_descriptions {
            for i in self.matching_indices(description) {
                covered[i] = true;
            }
        }

        self.items
            .iter()
            .zip(covered)
            .filter(|(_, is_covered)| !is_covered)
            .map(|(item, _)| item.clone())
            .collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ShoppingList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut list = ShoppingList::new();
        for item in iter {
            list.add_item(item.as_ref());
        }
        list
    }
}
