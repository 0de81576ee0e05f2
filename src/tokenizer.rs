//! Quote-aware splitting of a single comma-delimited line.

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Splits one line into trimmed fields.
///
/// A `"` toggles quoted mode and is dropped; commas inside quotes are kept
/// literally. Doubled quotes (`""`) are not treated as an escaped quote, they
/// simply toggle twice. An unterminated quote leaves the rest of the line in
/// the last field. Never fails: an empty line yields a single empty field.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            QUOTE => in_quotes = !in_quotes,
            DELIMITER if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    fields.push(current.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_comma_stays_in_field() {
        assert_eq!(tokenize("a,\"b,c\",d"), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn test_empty_line_is_one_empty_field() {
        assert_eq!(tokenize(""), vec![""]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        assert_eq!(tokenize("  a , b\t,c \r"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_trailing_delimiter_yields_empty_last_field() {
        assert_eq!(tokenize("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_unterminated_quote_keeps_remainder() {
        assert_eq!(tokenize("a,\"b,c,d"), vec!["a", "b,c,d"]);
    }

    #[test]
    fn test_doubled_quote_is_not_an_escape() {
        // `""` toggles twice, so nothing survives of the quotes themselves
        assert_eq!(tokenize("\"say \"\"hi\"\"\",x"), vec!["say hi", "x"]);
    }

    #[test]
    fn test_multibyte_characters_survive() {
        assert_eq!(tokenize("₹1,\"₹2,399\""), vec!["₹1", "₹2,399"]);
    }
}
