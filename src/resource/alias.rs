//! Declarative field aliases
//!
//! Backend records carry the same field under different names depending on the
//! resource (`description` vs `info.description`, `title` vs `name`). An alias table
//! copies the first non-blank source into the target once, at ingestion.

use serde_json::Value;

/// One target field and the dotted source paths tried in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRule {
    pub target: String,
    pub sources: Vec<String>,
}

/// Alias table for one resource type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldAliases {
    rules: Vec<AliasRule>,
}

impl FieldAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule
    pub fn alias(mut self, target: &str, sources: &[&str]) -> Self {
        self.rules.push(AliasRule {
            target: target.to_string(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Build from a static table
    pub fn from_table(table: &[(&str, &[&str])]) -> Self {
        table
            .iter()
            .fold(Self::new(), |aliases, (target, sources)| aliases.alias(target, sources))
    }

    pub fn rules(&self) -> &[AliasRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply to a record, or to each record of an array
    pub fn apply(&self, value: &mut Value) {
        if self.rules.is_empty() {
            return;
        }
        match value {
            Value::Array(items) => items.iter_mut().for_each(|item| self.apply_record(item)),
            Value::Object(_) => self.apply_record(value),
            _ => {}
        }
    }

    fn apply_record(&self, record: &mut Value) {
        for rule in &self.rules {
            if !is_blank(record.get(&rule.target)) {
                continue;
            }
            let found = rule
                .sources
                .iter()
                .filter_map(|path| lookup(record, path))
                .find(|v| !is_blank(Some(v)))
                .cloned();
            if let (Some(found), Some(map)) = (found, record.as_object_mut()) {
                map.insert(rule.target.clone(), found);
            }
        }
    }
}

/// Resolve a dotted path such as `info.description`
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}
