//! Plain-text tables for log messages and error reports.

use core::fmt;

/// Right-aligned text table with a positional row index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let w = cell.chars().count();
                match widths.get_mut(i) {
                    Some(current) => *current = (*current).max(w),
                    None => widths.push(w),
                }
            }
        }
        widths
    }
}

impl fmt::Display for TextTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        let index_width = self.rows.len().saturating_sub(1).to_string().len();

        write!(f, "{:index_width$}", "")?;
        for (i, header) in self.headers.iter().enumerate() {
            write!(f, "  {:>w$}", header, w = widths[i])?;
        }
        for (n, row) in self.rows.iter().enumerate() {
            write!(f, "\n{n:<index_width$}")?;
            for (i, cell) in row.iter().enumerate() {
                write!(f, "  {:>w$}", cell, w = widths[i])?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_aligned_rows() {
        let mut table = TextTable::new(["model", "scenario", "region", "year"]);
        table.push_row(["model_a", "scen_a", "reg_b", "2005"]);
        table.push_row(["model_a", "scen_a", "reg_b", "2010"]);

        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "     model  scenario  region  year");
        assert_eq!(lines[1], "0  model_a    scen_a   reg_b  2005");
        assert!(lines[2].starts_with("1  model_a"));
    }

    #[test]
    fn empty_table_has_only_headers() {
        let table = TextTable::new(["a"]);
        assert!(table.is_empty());
        assert_eq!(table.to_string(), "   a");
    }
}
