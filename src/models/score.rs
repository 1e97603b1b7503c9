use super::Cell;

/// Raw risk score as it appears in the dirty input
///
/// Built at the reconciler's boundary so the channels match on an explicit
/// variant instead of inspecting cell contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawScore {
    Integer(i64),
    Text(String),
    Absent,
}

impl From<&Cell> for RawScore {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Absent => RawScore::Absent,
            Cell::Integer(n) => RawScore::Integer(*n),
            Cell::Text(s) => match cell.as_integer() {
                Some(n) => RawScore::Integer(n),
                None => RawScore::Text(s.clone()),
            },
            Cell::Date(_) => RawScore::Text(cell.to_string()),
        }
    }
}

/// Which channel settled a row's score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
    Numeric,
    Label,
}
