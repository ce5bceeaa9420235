//! Value/label tables for enum fields

/// One labelled value of an [`EnumTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumEntry {
    pub value: i32,
    pub label: &'static str,
}

/// A static table mapping enum values to console labels
///
/// ```ignore
/// static BLEND_MODES: EnumTable = EnumTable::new(&[
///     EnumEntry { value: 0, label: "Normal" },
///     EnumEntry { value: 1, label: "Additive" },
/// ]);
/// ```
#[derive(Debug)]
pub struct EnumTable {
    entries: &'static [EnumEntry],
}

impl EnumTable {
    pub const fn new(entries: &'static [EnumEntry]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [EnumEntry] {
        self.entries
    }

    /// Label for `value`, if the table has one
    pub fn label(&self, value: i32) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|entry| entry.value == value)
            .map(|entry| entry.label)
    }

    /// Value for `label`, compared case-insensitively
    pub fn value(&self, label: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|entry| entry.label.eq_ignore_ascii_case(label))
            .map(|entry| entry.value)
    }

    /// Convert a console string to a value
    ///
    /// Accepts either a label or a raw integer.
    pub fn parse(&self, s: &str) -> Option<i32> {
        let s = s.trim();
        self.value(s).or_else(|| s.parse().ok())
    }

    /// Convert a value to its console string
    ///
    /// Values without a label fall back to their integer form.
    pub fn format(&self, value: i32) -> String {
        self.label(value)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static MODES: EnumTable = EnumTable::new(&[
        EnumEntry { value: 0, label: "Normal" },
        EnumEntry { value: 4, label: "Additive" },
    ]);

    #[test]
    fn test_label_lookup() {
        assert_eq!(MODES.label(4), Some("Additive"));
        assert_eq!(MODES.value("additive"), Some(4));
        assert_eq!(MODES.value("Subtract"), None);
    }

    #[test]
    fn test_parse_and_format() {
        assert_eq!(MODES.parse("NORMAL"), Some(0));
        assert_eq!(MODES.parse("7"), Some(7));
        assert_eq!(MODES.parse("bogus"), None);
        assert_eq!(MODES.format(4), "Additive");
        assert_eq!(MODES.format(9), "9");
    }
}
