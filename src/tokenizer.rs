//! Quote-aware field splitting for one logical line.
//!
//! The quoting model is deliberately small: a `"` toggles quoted mode and is
//! never emitted, and the delimiter only separates fields outside quotes.
//! Doubled quotes (`""`) do not produce a literal quote character.

/// Split `line` into trimmed field values
pub fn tokenize_row(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}
