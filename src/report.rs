// Report rendering
// Turns query results into the box-drawn tables the CLI prints

use crate::records::{GoodsGmv, OrderView, UserRecord};

/// A record that can be laid out as one table row
pub trait Tabular {
    /// Column headers, in the same order as `cells`
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl Tabular for UserRecord {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "TEL", "ADDRESS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.tel.clone(),
            self.address.clone(),
        ]
    }
}

impl Tabular for GoodsGmv {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "GMV"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.goods_id.to_string(),
            self.goods_name.clone(),
            self.gmv.to_string(),
        ]
    }
}

impl Tabular for OrderView {
    const HEADERS: &'static [&'static str] = &["ORDER_ID", "USER_NAME", "GOODS_NAME", "TOTAL_PRICE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            null_or(&self.user_name),
            null_or(&self.goods_name),
            self.total_price.to_string(),
        ]
    }
}

fn null_or(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NULL.to_string())
}

/// How SQL NULL is shown in a cell
pub const NULL: &str = "NULL";

/// A fully rendered result set: header names plus string cells
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub column_names: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn new(column_names: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { column_names, rows }
    }

    /// Build a table from typed records
    pub fn from_records<T: Tabular>(records: &[T]) -> Self {
        Self {
            column_names: T::HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: records.iter().map(Tabular::cells).collect(),
        }
    }

    /// Format the result as a string for display
    pub fn format(&self) -> String {
        if self.rows.is_empty() {
            return "No rows found".to_string();
        }

        // Column widths are counted in chars so non-ASCII names line up
        let mut widths: Vec<usize> = self
            .column_names
            .iter()
            .map(|c| c.chars().count())
            .collect();

        for row in &self.rows {
            for (i, value) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(value.chars().count());
                }
            }
        }

        let mut result = String::new();

        result.push_str(&Self::border(&widths, '┌', '┬', '┐'));
        result.push_str(&Self::line(&self.column_names, &widths));
        result.push_str(&Self::border(&widths, '├', '┼', '┤'));
        for row in &self.rows {
            result.push_str(&Self::line(row, &widths));
        }
        result.push_str(&Self::border(&widths, '└', '┴', '┘'));

        result.push_str(&format!("\n{} row(s) returned", self.rows.len()));

        result
    }

    fn border(widths: &[usize], left: char, middle: char, right: char) -> String {
        let mut line = String::new();
        line.push(left);
        for (i, width) in widths.iter().enumerate() {
            line.push_str(&"─".repeat(width + 2));
            if i < widths.len() - 1 {
                line.push(middle);
            }
        }
        line.push(right);
        line.push('\n');
        line
    }

    fn line(cells: &[String], widths: &[usize]) -> String {
        let mut line = String::from("│");
        for (value, width) in cells.iter().zip(widths) {
            line.push_str(&format!(" {:<width$} ", value, width = width));
            line.push('│');
        }
        line.push('\n');
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_format_orders_with_nulls() {
        let orders = vec![OrderView {
            id: 8,
            user_name: None,
            goods_name: None,
            total_price: Decimal::from(60),
        }];

        let text = ResultTable::from_records(&orders).format();

        let expected = "\
┌──────────┬───────────┬────────────┬─────────────┐
│ ORDER_ID │ USER_NAME │ GOODS_NAME │ TOTAL_PRICE │
├──────────┼───────────┼────────────┼─────────────┤
│ 8        │ NULL      │ NULL       │ 60          │
└──────────┴───────────┴────────────┴─────────────┘

1 row(s) returned";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_format_widens_to_longest_cell() {
        let users = vec![UserRecord {
            id: 1,
            name: "zhangsan".to_string(),
            tel: "tel1".to_string(),
            address: "beijing".to_string(),
        }];

        let text = ResultTable::from_records(&users).format();
        assert!(text.contains("│ ID │ NAME     │ TEL  │ ADDRESS │"));
        assert!(text.contains("│ 1  │ zhangsan │ tel1 │ beijing │"));
    }

    #[test]
    fn test_format_empty() {
        let goods: Vec<GoodsGmv> = Vec::new();
        assert_eq!(ResultTable::from_records(&goods).format(), "No rows found");
    }
}
