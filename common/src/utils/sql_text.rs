//! SQL text helpers.
//!
//! Identifier quoting, clause assembly and statement labelling for logs.
//! Values never pass through here; they are always bound as parameters.

/// Builds and inspects SQL statement text.
pub struct SqlText;

impl SqlText {
    /// Quotes a MySQL identifier with backticks, doubling embedded backticks.
    pub fn quote_ident(name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    /// `?, ?, ?` for `count` parameters.
    pub fn placeholders(count: usize) -> String {
        vec!["?"; count].join(", ")
    }

    /// Comma-separated quoted column list.
    pub fn column_list<'a, I>(columns: I) -> String
    where
        I: IntoIterator<Item = &'a String>,
    {
        columns
            .into_iter()
            .map(|c| Self::quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `` `a` = ?, `b` = ? `` for a SET clause.
    pub fn assignments<'a, I>(columns: I) -> String
    where
        I: IntoIterator<Item = &'a String>,
    {
        Self::equalities(columns, ", ")
    }

    /// `` `a` = ? AND `b` = ? `` for a WHERE clause.
    pub fn conjunction<'a, I>(columns: I) -> String
    where
        I: IntoIterator<Item = &'a String>,
    {
        Self::equalities(columns, " AND ")
    }

    fn equalities<'a, I>(columns: I, separator: &str) -> String
    where
        I: IntoIterator<Item = &'a String>,
    {
        columns
            .into_iter()
            .map(|c| format!("{} = ?", Self::quote_ident(c)))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// First keyword of the statement, uppercased.
    ///
    /// Skips whitespace, `--`/`#` line comments, `/* */` block comments and
    /// opening parentheses.
    pub fn leading_keyword(sql: &str) -> Option<String> {
        let mut rest = sql;
        loop {
            rest = rest.trim_start();
            if let Some(stripped) = rest.strip_prefix('(') {
                rest = stripped;
            } else if rest.starts_with("--") || rest.starts_with('#') {
                rest = rest.find('\n').map_or("", move |i| &rest[i + 1..]);
            } else if let Some(stripped) = rest.strip_prefix("/*") {
                rest = stripped.find("*/").map_or("", move |i| &stripped[i + 2..]);
            } else {
                break;
            }
        }

        let keyword: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        (!keyword.is_empty()).then(|| keyword.to_ascii_uppercase())
    }
}
