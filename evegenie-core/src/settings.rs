//! Renders the Eve `settings.py` module around the inferred endpoint schemas.

use std::collections::HashSet;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::format::python_str;
use crate::genie::EveGenie;

/// Fixed boilerplate written alongside the endpoint schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    pub mongo_host: String,
    pub mongo_dbname: String,
    /// HTTP methods allowed on every resource endpoint
    pub resource_methods: Vec<String>,
    pub bandwidth_saver: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            mongo_host: "localhost".to_string(),
            mongo_dbname: "testing".to_string(),
            resource_methods: vec!["GET".to_string(), "POST".to_string(), "DELETE".to_string()],
            bandwidth_saver: false,
        }
    }
}

/// Name of the top-level settings dict in the generated module.
const SETTINGS_VAR: &str = "eve_settings";

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Turn an endpoint name into a Python identifier (`power-up` -> `power_up`,
/// `class` -> `class_`).
pub fn python_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if PYTHON_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Assign each endpoint a distinct variable name, in order.
///
/// A name already taken by an earlier endpoint (or by `eve_settings`) gets the
/// first free `_2`, `_3`, ... suffix, so `power-up` and `power_up` stay apart.
pub fn endpoint_identifiers<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::from([SETTINGS_VAR.to_string()]);
    names
        .into_iter()
        .map(|name| {
            let base = python_identifier(name);
            let mut ident = base.clone();
            let mut n = 2;
            while used.contains(&ident) {
                ident = format!("{}_{}", base, n);
                n += 1;
            }
            used.insert(ident.clone());
            ident
        })
        .collect()
}

/// Render the complete settings module.
///
/// Each endpoint schema is bound to its own variable, and `eve_settings['DOMAIN']`
/// refers to those variables by endpoint name.
pub fn render_settings(genie: &EveGenie, config: &SettingsConfig) -> String {
    let idents = endpoint_identifiers(genie.iter().map(|(name, _)| name.as_str()));

    let mut out = String::from("\n");
    for (ident, formatted) in idents.iter().zip(genie.formatted_endpoints().values()) {
        let _ = write!(out, "{} = {}\n\n", ident, formatted);
    }
    out.push_str("\n\n");

    let methods = config
        .resource_methods
        .iter()
        .map(|m| python_str(m))
        .collect::<Vec<_>>()
        .join(", ");

    let _ = writeln!(out, "{} = {{", SETTINGS_VAR);
    let _ = writeln!(out, "    'MONGO_HOST': {},", python_str(&config.mongo_host));
    let _ = writeln!(out, "    'MONGO_DBNAME': {},", python_str(&config.mongo_dbname));
    let _ = writeln!(out, "    'RESOURCE_METHODS': [{}],", methods);
    let _ = writeln!(
        out,
        "    'BANDWIDTH_SAVER': {},",
        if config.bandwidth_saver { "True" } else { "False" }
    );
    out.push_str("    'DOMAIN': {\n");
    for ((name, _), ident) in genie.iter().zip(&idents) {
        let _ = writeln!(out, "        {}: {},", python_str(name), ident);
    }
    out.push_str("    },\n}\n");
    out
}
