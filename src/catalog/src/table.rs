use data::{DataType, Datum};

/// A named, ordered mapping from column name to column type, plus the
/// ordered rows that live under that schema. Column
/// names are unique within a table, case-sensitive; rows are positionally
/// aligned with `columns` and no row is shorter than the schema.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<(String, DataType)>,
    rows: Vec<Vec<Datum>>,
}

impl Table {
    pub fn new(columns: Vec<(String, DataType)>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<(String, DataType)>, rows: Vec<Vec<Datum>>) -> Self {
        Table { columns, rows }
    }

    pub fn columns(&self) -> &[(String, DataType)] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Datum>] {
        &self.rows
    }

    pub fn push_row(&mut self, row: Vec<Datum>) {
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|(n, _)| n == name)
    }

    pub fn column_type(&self, name: &str) -> Option<DataType> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| *t)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index_and_type() {
        let table = Table::new(vec![
            ("a".to_string(), DataType::Int),
            ("b".to_string(), DataType::String),
        ]);
        assert_eq!(table.column_index("b"), Some(1));
        assert_eq!(table.column_type("a"), Some(DataType::Int));
        assert_eq!(table.column_index("missing"), None);
    }

    #[test]
    fn test_push_row_increments_len() {
        let mut table = Table::new(vec![("a".to_string(), DataType::Int)]);
        assert!(table.is_empty());
        table.push_row(vec![Datum::from(1_i64)]);
        assert_eq!(table.len(), 1);
    }
}
