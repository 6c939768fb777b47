use crate::ast::Number;
use crate::error::{CalcError, Result};
use std::collections::{BTreeMap, HashMap};

/// Interned variable names and their optionally bound values.
///
/// Indexes are handed out in first-seen order and stay valid for the life of
/// the table.
#[derive(Debug, Clone)]
pub struct VariableTable<N> {
    indexes: BTreeMap<String, usize>,
    values: Vec<Option<N>>,
}

impl<N> Default for VariableTable<N> {
    fn default() -> Self {
        Self {
            indexes: BTreeMap::new(),
            values: Vec::new(),
        }
    }
}

impl<N: Number> VariableTable<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for `name`, appending an unbound one on first sight.
    pub fn intern(&mut self, name: &str) -> usize {
        if let Some(&index) = self.indexes.get(name) {
            return index;
        }
        let index = self.values.len();
        self.values.push(None);
        self.indexes.insert(name.to_string(), index);
        index
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indexes.get(name).copied()
    }

    /// Binds `name` if the expression references it; unknown names are ignored.
    pub fn bind(&mut self, name: &str, value: N) {
        if let Some(&index) = self.indexes.get(name) {
            self.values[index] = Some(value);
        }
    }

    /// Binds every interned name from `bindings`.
    ///
    /// Nothing is written unless every interned name has an entry.
    pub fn bind_all(&mut self, bindings: &HashMap<String, N>) -> Result<()> {
        self.values = self.resolve(bindings)?;
        Ok(())
    }

    /// Slot values for `bindings`, indexed like this table's own slots.
    ///
    /// The table is left untouched. Fails on the first missing name, in
    /// name order.
    pub fn resolve(&self, bindings: &HashMap<String, N>) -> Result<Vec<Option<N>>> {
        let mut values = vec![None; self.values.len()];
        for (name, &index) in &self.indexes {
            let value = bindings
                .get(name)
                .ok_or_else(|| CalcError::UnknownVariable(name.clone()))?;
            values[index] = Some(*value);
        }
        Ok(values)
    }

    pub(crate) fn values(&self) -> &[Option<N>] {
        &self.values
    }

    pub fn clear_all(&mut self) {
        self.values.iter_mut().for_each(|value| *value = None);
    }

    pub fn read(&self, index: usize) -> Result<N> {
        self.read_slot(&self.values, index)
    }

    /// Reads slot `index` of `values`, naming the variable if it is unbound.
    pub(crate) fn read_slot(&self, values: &[Option<N>], index: usize) -> Result<N> {
        values
            .get(index)
            .copied()
            .flatten()
            .ok_or_else(|| CalcError::UnknownVariable(self.name_of(index).to_string()))
    }

    /// Fails on the first unbound name, in name order.
    pub fn ensure_bound(&self) -> Result<()> {
        match self
            .indexes
            .iter()
            .find(|&(_, &index)| self.values[index].is_none())
        {
            Some((name, _)) => Err(CalcError::UnknownVariable(name.clone())),
            None => Ok(()),
        }
    }

    pub fn name_of(&self, index: usize) -> &str {
        self.indexes
            .iter()
            .find(|&(_, &i)| i == index)
            .map(|(name, _)| name.as_str())
            .unwrap_or_default()
    }

    /// Names in slot order.
    pub fn names(&self) -> Vec<&str> {
        let mut names = vec![""; self.values.len()];
        for (name, &index) in &self.indexes {
            names[index] = name.as_str();
        }
        names
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
