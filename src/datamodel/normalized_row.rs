use serde::ser::{Serialize, SerializeMap, Serializer};

/// A flat row of string values keyed by normalized column name.
///
/// Column order is preserved and serialized as-is, so tabular renderings
/// show columns in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRow {
    cells: Vec<(String, String)>,
}

impl NormalizedRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    /// Row from cells whose columns are already distinct, skipping the lookup `insert` does.
    pub(crate) fn from_unique_cells(cells: Vec<(String, String)>) -> Self {
        Self { cells }
    }

    /// Sets a cell. An existing column keeps its position.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.cells.iter().any(|(c, _)| c == column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NormalizedRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut row = NormalizedRow::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

impl Serialize for NormalizedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_keeps_order() {
        let row: NormalizedRow = [("Zona", "Norte"), ("Año", "2023"), ("Valor", "1,5")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"Zona":"Norte","Año":"2023","Valor":"1,5"}"#);
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut row = NormalizedRow::new();
        row.insert("A", "1");
        row.insert("B", "2");
        row.insert("A", "3");
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(row.get("A"), Some("3"));
        assert!(row.contains_column("B"));
        assert!(!row.contains_column("C"));
    }
}
