use std::fmt;

use rust_decimal::Decimal;

/// A value destined for a bind placeholder in dynamically assembled SQL.
///
/// Runtime-built queries carry a mixed bag of column types, so values are
/// collected behind one tag and bound positionally when the statement runs.
/// Values never end up interpolated into the SQL text itself.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i32),
    Numeric(Decimal),
}

/// A `SET` clause plus its bind values, ready to splice into an UPDATE.
#[derive(Debug, PartialEq)]
pub struct PartialUpdate {
    /// Comma-joined assignments: `"title"=$1, "salary"=$2`
    pub set_clause: String,
    /// Bind values, in assignment order
    pub params: Vec<SqlParam>,
}

/// Error returned when a partial update carries no fields at all.
#[derive(Debug, PartialEq, Eq)]
pub struct EmptyUpdateError;

impl fmt::Display for EmptyUpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no fields provided to update")
    }
}

impl std::error::Error for EmptyUpdateError {}

/// Build a parameterized `SET` clause from a caller-supplied set of fields.
///
/// `fields` is ordered: the i-th field becomes `"<column>"=$<i>` (1-indexed)
/// and its value lands at position i of the returned params. Column names come
/// from `column_overrides` where a logical field name differs from its storage
/// column; fields without an override use their name unchanged.
///
/// An empty `fields` slice is an error so a zero-field update surfaces to the
/// caller instead of silently no-opping.
pub fn sql_for_partial_update(
    fields: &[(&str, SqlParam)],
    column_overrides: &[(&str, &str)],
) -> Result<PartialUpdate, EmptyUpdateError> {
    if fields.is_empty() {
        return Err(EmptyUpdateError);
    }

    let assignments: Vec<String> = fields
        .iter()
        .enumerate()
        .map(|(idx, (name, _))| {
            let column = column_overrides
                .iter()
                .find(|(logical, _)| logical == name)
                .map(|(_, column)| *column)
                .unwrap_or(name);
            format!("\"{}\"=${}", column, idx + 1)
        })
        .collect();

    Ok(PartialUpdate {
        set_clause: assignments.join(", "),
        params: fields.iter().map(|(_, value)| value.clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_fields_to_indexed_assignments() {
        let fields = [
            ("firstname", SqlParam::Text("testy".to_string())),
            ("lastname", SqlParam::Text("testerson".to_string())),
            ("age", SqlParam::Int(23)),
        ];
        let overrides = [("firstname", "first_name"), ("lastname", "last_name")];

        let update = sql_for_partial_update(&fields, &overrides).unwrap();

        assert_eq!(
            update.set_clause,
            "\"first_name\"=$1, \"last_name\"=$2, \"age\"=$3"
        );
        assert_eq!(
            update.params,
            vec![
                SqlParam::Text("testy".to_string()),
                SqlParam::Text("testerson".to_string()),
                SqlParam::Int(23),
            ]
        );
    }

    #[test]
    fn produces_one_fragment_per_field_with_increasing_indexes() {
        let fields = [
            ("title", SqlParam::Text("engineer".to_string())),
            ("salary", SqlParam::Int(90000)),
            ("equity", SqlParam::Numeric("0.05".parse().unwrap())),
        ];

        let update = sql_for_partial_update(&fields, &[]).unwrap();
        let fragments: Vec<&str> = update.set_clause.split(", ").collect();

        assert_eq!(fragments.len(), fields.len());
        assert_eq!(update.params.len(), fields.len());
        for (idx, fragment) in fragments.iter().enumerate() {
            assert!(
                fragment.ends_with(&format!("=${}", idx + 1)),
                "fragment {:?} should bind placeholder ${}",
                fragment,
                idx + 1
            );
        }
    }

    #[test]
    fn fails_on_empty_field_map() {
        assert_eq!(sql_for_partial_update(&[], &[]), Err(EmptyUpdateError));
    }

    #[test]
    fn fails_on_empty_field_map_even_with_overrides() {
        let overrides = [("firstname", "first_name")];
        assert_eq!(
            sql_for_partial_update(&[], &overrides),
            Err(EmptyUpdateError)
        );
    }
}
