use crate::core::VizType;

pub const DEFAULT_LEGACY_CLASS_PREFIX: &str = "superset-chart-";

/// Maps visualization types to container class names.
///
/// Unprefixed class names can clash with legacy stylesheets, so listed types
/// get a namespace prefix; every other type uses its snake-cased tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartClassNamer {
    prefix: String,
    prefixed_types: Vec<String>,
}

impl ChartClassNamer {
    #[must_use]
    pub fn new(prefix: impl Into<String>, prefixed_types: Vec<String>) -> Self {
        Self {
            prefix: prefix.into(),
            prefixed_types,
        }
    }

    #[must_use]
    pub fn class_name(&self, viz_type: &VizType) -> String {
        let snake = snake_case(viz_type.as_str());
        if self.prefixed_types.iter().any(|tag| tag == viz_type.as_str()) {
            format!("{}{snake}", self.prefix)
        } else {
            snake
        }
    }
}

impl Default for ChartClassNamer {
    fn default() -> Self {
        Self::new(DEFAULT_LEGACY_CLASS_PREFIX, vec!["table".to_owned()])
    }
}

#[must_use]
pub fn chart_class_name(viz_type: &VizType) -> String {
    ChartClassNamer::default().class_name(viz_type)
}

/// Lowercase words joined by `_`.
///
/// Words break on any non-alphanumeric character, on lower-to-upper case
/// transitions, before the last capital of an acronym run, and between
/// letters and digits.
#[must_use]
pub fn snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (index, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            flush_word(&mut words, &mut current);
            continue;
        }
        if let Some(&prev) = index.checked_sub(1).and_then(|i| chars.get(i)) {
            let next = chars.get(index + 1).copied();
            if prev.is_alphanumeric() && starts_new_word(prev, ch, next) {
                flush_word(&mut words, &mut current);
            }
        }
        current.extend(ch.to_lowercase());
    }
    flush_word(&mut words, &mut current);
    words.join("_")
}

fn starts_new_word(prev: char, ch: char, next: Option<char>) -> bool {
    if prev.is_numeric() != ch.is_numeric() {
        return true;
    }
    if prev.is_lowercase() && ch.is_uppercase() {
        return true;
    }
    prev.is_uppercase() && ch.is_uppercase() && next.is_some_and(char::is_lowercase)
}

fn flush_word(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartClassNamer, chart_class_name, snake_case};
    use crate::core::VizType;

    #[test]
    fn table_gets_legacy_prefix() {
        assert_eq!(chart_class_name(&VizType::new("table")), "superset-chart-table");
    }

    #[test]
    fn other_types_use_snake_case_tag() {
        assert_eq!(
            chart_class_name(&VizType::new("big_number_total")),
            "big_number_total"
        );
        assert_eq!(chart_class_name(&VizType::new("DualLine")), "dual_line");
    }

    #[test]
    fn snake_case_splits_case_digits_and_separators() {
        assert_eq!(snake_case("box_plot_300_cap"), "box_plot_300_cap");
        assert_eq!(snake_case("fooBar"), "foo_bar");
        assert_eq!(snake_case("--foo-bar--"), "foo_bar");
        assert_eq!(snake_case("HTMLParser"), "html_parser");
        assert_eq!(snake_case("box300"), "box_300");
        assert_eq!(snake_case("deck.gl arc"), "deck_gl_arc");
        assert_eq!(snake_case(""), "");
    }

    #[test]
    fn custom_prefix_applies_to_configured_types() {
        let namer = ChartClassNamer::new("legacy-", vec!["pivot_table".to_owned()]);
        assert_eq!(namer.class_name(&VizType::new("pivot_table")), "legacy-pivot_table");
        assert_eq!(namer.class_name(&VizType::new("table")), "table");
    }
}
