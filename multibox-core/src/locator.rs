use crate::Field;
use crate::display::SEPARATOR;

/// Which field the caret sits in: the number of separators strictly before
/// `caret` (a char offset), capped at the last field.
pub fn locate(text: &str, caret: usize) -> Field {
    let separators = text
        .chars()
        .take(caret)
        .filter(|&c| c == SEPARATOR)
        .count();

    Field::from_index(separators).unwrap_or(Field::Z)
}
