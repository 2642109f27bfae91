use serde::Deserialize;

use crate::comparison::variables::{VariableParser, VariableParserError};

fn default_encrypt_prefix() -> Vec<String> {
    vec!["!".to_string()]
}

fn default_file_prefix() -> Vec<String> {
    vec!["^".to_string()]
}

fn default_special_replace() -> Vec<String> {
    vec!["@".to_string()]
}

/// Prefixes that mark variable references inside diff-config files.
#[derive(Deserialize, Debug, Clone)]
pub struct VariablesConfiguration {
    #[serde(rename = "encrypt-prefix", default = "default_encrypt_prefix")]
    pub encrypt_prefix: Vec<String>,
    #[serde(rename = "file-prefix", default = "default_file_prefix")]
    pub file_prefix: Vec<String>,
    #[serde(rename = "special-replace", default = "default_special_replace")]
    pub special_replace: Vec<String>,
}

impl Default for VariablesConfiguration {
    fn default() -> Self {
        Self {
            encrypt_prefix: default_encrypt_prefix(),
            file_prefix: default_file_prefix(),
            special_replace: default_special_replace(),
        }
    }
}

impl VariablesConfiguration {
    pub fn prefixes(&self) -> Vec<&str> {
        self.encrypt_prefix
            .iter()
            .chain(&self.file_prefix)
            .chain(&self.special_replace)
            .map(String::as_str)
            .collect()
    }

    pub fn parser(&self) -> Result<VariableParser, VariableParserError> {
        VariableParser::new(self.prefixes().as_slice())
    }
}
