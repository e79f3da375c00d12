/// Lower-cases `text`, blanks out everything that is not ASCII alphanumeric,
/// CJK unified ideograph or whitespace, then splits on whitespace runs.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_token_char(c) || c.is_whitespace() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().map(str::to_owned).collect()
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || ('\u{4e00}'..='\u{9fff}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(tokenize("Hello, World! 42x"), vec!["hello", "world", "42x"]);
    }

    #[test]
    fn keeps_han_and_drops_other_scripts() {
        assert_eq!(tokenize("巴黎是法国的首都。Café"), vec!["巴黎是法国的首都", "caf"]);
    }

    #[test]
    fn empty_and_symbol_only_inputs_have_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \n\t").is_empty());
        assert!(tokenize("--- ... !!!").is_empty());
    }
}
