use std::collections::HashMap;

use crate::models::CheckResult;

/// Settings parsed from a .vmx file, kept in first-seen order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VmxConfig {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

/// Output of a single parse: the lookup map plus any duplicate-key findings.
#[derive(Debug, Default)]
pub struct ParsedVmx {
    pub config: VmxConfig,
    pub diagnostics: Vec<CheckResult>,
}

impl VmxConfig {
    /// Insert or overwrite a setting. Returns true if the key was already present.
    fn insert(&mut self, key: String, value: String) -> bool {
        match self.index.get(&key) {
            Some(&i) => {
                self.entries[i].1 = value;
                true
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                false
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_str())
    }

    /// Value of `key`, or the empty string when absent.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Evidence line for a single key; absent keys render with an empty value.
    pub fn evidence(&self, key: &str) -> String {
        render_line(key, self.value(key))
    }

    /// Evidence for every setting whose key satisfies `pred`, in file order.
    pub fn evidence_where<F>(&self, pred: F) -> String
    where
        F: Fn(&str, &str) -> bool,
    {
        render_lines(self.iter().filter(|(k, v)| pred(*k, *v)))
    }
}

/// Render a setting back into canonical `key = "value"` form.
pub fn render_line(key: &str, value: &str) -> String {
    format!("{} = \"{}\"", key, value)
}

pub fn render_lines<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| render_line(k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip one pair of enclosing double quotes, if present.
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parse .vmx text into a settings map.
/// Lines without `=` are ignored; a repeated key is reported and the later value wins.
pub fn parse(text: &str) -> ParsedVmx {
    let mut parsed = ParsedVmx::default();

    for line in text.split('\n') {
        let Some((raw_key, raw_value)) = line.split_once('=') else {
            continue;
        };
        let key = raw_key.trim().to_string();
        let value = unquote(raw_value.trim()).to_string();

        if parsed.config.insert(key.clone(), value) {
            parsed.diagnostics.push(CheckResult::fail(
                format!("Duplicate setting found: {}", key),
                line.trim(),
            ));
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    #[test]
    fn test_parse_basic() {
        let parsed = parse(
            ".encoding = \"UTF-8\"\nvirtualHW.version = \"19\"\ndisplayName = \"Win 11 Lab\"\n",
        );
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(parsed.config.len(), 3);
        assert_eq!(parsed.config.get("virtualHW.version"), Some("19"));
        assert_eq!(parsed.config.get("displayName"), Some("Win 11 Lab"));
    }

    #[test]
    fn test_parse_empty_input() {
        let parsed = parse("");
        assert!(parsed.config.is_empty());
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_lines_without_equals_ignored() {
        let parsed = parse("# comment\n\nnot a setting\nfloppy0.present = \"FALSE\"\n");
        assert_eq!(parsed.config.len(), 1);
        assert_eq!(parsed.config.get("floppy0.present"), Some("FALSE"));
    }

    #[test]
    fn test_split_on_first_equals_only() {
        let parsed = parse("annotation = \"user=admin pass=x\"");
        assert_eq!(parsed.config.get("annotation"), Some("user=admin pass=x"));
    }

    #[test]
    fn test_strips_one_quote_layer_and_whitespace() {
        let parsed = parse("  a =   \"\"quoted\"\"  \nb = bare\r\nc = \"half");
        assert_eq!(parsed.config.get("a"), Some("\"quoted\""));
        assert_eq!(parsed.config.get("b"), Some("bare"));
        assert_eq!(parsed.config.get("c"), Some("\"half"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let parsed = parse("guestOS = \"a\"\nguestos = \"b\"");
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(parsed.config.get("guestOS"), Some("a"));
        assert_eq!(parsed.config.get("guestos"), Some("b"));
    }

    #[test]
    fn test_duplicate_key_flagged_and_last_wins() {
        let parsed = parse("foo = \"1\"\nbar = \"x\"\n  foo = \"2\"  \n");
        assert_eq!(parsed.diagnostics.len(), 1);
        let diag = &parsed.diagnostics[0];
        assert_eq!(diag.status, Status::Fail);
        assert_eq!(diag.message, "Duplicate setting found: foo");
        assert_eq!(diag.evidence, "foo = \"2\"");
        assert_eq!(parsed.config.get("foo"), Some("2"));
        // first-seen position is kept
        let keys: Vec<_> = parsed.config.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["foo", "bar"]);
    }

    #[test]
    fn test_each_repeat_is_flagged() {
        let parsed = parse("k = 1\nk = 2\nk = 3");
        assert_eq!(parsed.diagnostics.len(), 2);
        assert_eq!(parsed.config.get("k"), Some("3"));
    }

    #[test]
    fn test_value_defaults_to_empty() {
        let parsed = parse("present = \"\"");
        assert_eq!(parsed.config.value("missing"), "");
        assert_eq!(parsed.config.get("missing"), None);
        assert_eq!(parsed.config.get("present"), Some(""));
        assert_eq!(parsed.config.evidence("missing"), "missing = \"\"");
    }

    #[test]
    fn test_reparse_of_rendered_evidence_is_stable() {
        let parsed = parse("a = \"1\"\nb=2\n c = \" spaced \" \n");
        let rendered = render_lines(parsed.config.iter());
        let reparsed = parse(&rendered);
        assert_eq!(reparsed.config, parsed.config);
        assert!(reparsed.diagnostics.is_empty());
    }

    #[test]
    fn test_evidence_where_keeps_file_order() {
        let parsed = parse("sharedFolder0.present = \"TRUE\"\nx = 1\nsharedFolder.maxNum = \"1\"");
        let evidence = parsed.config.evidence_where(|k, _| k.starts_with("shared"));
        assert_eq!(
            evidence,
            "sharedFolder0.present = \"TRUE\"\nsharedFolder.maxNum = \"1\""
        );
    }
}
