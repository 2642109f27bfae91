use regex::Regex;
use thiserror::Error;

use crate::comparison::record::ConfigKeyInfo;

#[derive(Error, Debug)]
pub enum VariableParserError {
    #[error("no variable prefixes configured")]
    NoPrefixes,
    #[error("invalid variable pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Finds `[<prefix><name>]` references in configuration file text.
#[derive(Debug, Clone)]
pub struct VariableParser {
    pattern: Regex,
}

impl VariableParser {
    pub fn new<S: AsRef<str>>(prefixes: &[S]) -> Result<Self, VariableParserError> {
        let mut prefixes = prefixes
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>();
        if prefixes.is_empty() {
            return Err(VariableParserError::NoPrefixes);
        }
        // longest first, so "!!" wins over "!"
        prefixes.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        prefixes.dedup();

        let alternatives = prefixes
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\[({alternatives})([^\[\]\s]+)\]"))?;

        Ok(Self { pattern })
    }

    pub fn parse(&self, content: &str) -> Vec<ConfigKeyInfo> {
        content
            .lines()
            .enumerate()
            .flat_map(|(index, line)| {
                self.pattern.captures_iter(line).map(move |captures| ConfigKeyInfo {
                    line: index + 1,
                    name: captures[2].to_string(),
                    kind: captures[1].to_string(),
                })
            })
            .collect()
    }

    pub fn parse_bytes(&self, content: &[u8]) -> Vec<ConfigKeyInfo> {
        self.parse(&String::from_utf8_lossy(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> VariableParser {
        VariableParser::new(&["!", "^", "@"]).unwrap()
    }

    #[test]
    fn finds_prefixed_variables_with_lines() {
        let content = "db.host=[^db_host]\n# nothing here\ndb.password=[!db_password] user=[@user]\n";
        let keys = parser().parse(content);

        let found = keys
            .iter()
            .map(|k| (k.line, k.kind.as_str(), k.name.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            found,
            [(1, "^", "db_host"), (3, "!", "db_password"), (3, "@", "user")]
        );
    }

    #[test]
    fn ignores_unprefixed_and_malformed_tokens() {
        let keys = parser().parse("[section]\nvalue=[^]\nother=[^has space]\narr[0]=1");
        assert!(keys.is_empty());
    }

    #[test]
    fn longer_prefix_wins() {
        let parser = VariableParser::new(&["!", "!!"]).unwrap();
        let keys = parser.parse("[!!secret]");
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].kind, "!!");
        assert_eq!(keys[0].name, "secret");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let keys = parser().parse_bytes(b"\xff\xfe=[^name]");
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn empty_prefix_list_is_rejected() {
        assert!(matches!(
            VariableParser::new::<&str>(&[" "]),
            Err(VariableParserError::NoPrefixes)
        ));
    }
}
