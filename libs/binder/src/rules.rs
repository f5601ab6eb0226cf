//! Named validation rules
//!
//! A field declares rules by name plus a parameter bag. The decoder resolves
//! names through a [`RuleRegistry`], so new rules plug in without touching
//! the walk.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::value::FieldValue;

/// Parameter key carrying the space-separated allow-list of the `in` rule
pub const IN_PARAMS: &str = "params";

/// A rule reference attached to a schema field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    pub name: String,
    pub params: BTreeMap<String, String>,
}

impl RuleSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// What a rule knows about the field it checks
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Annotation key (or key plus field name) the field is reported under
    pub subject: &'a str,
    pub params: &'a BTreeMap<String, String>,
    /// Declared default literal, if any
    pub default: Option<&'a str>,
}

impl RuleContext<'_> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

pub trait Rule: Send + Sync {
    /// `Err` carries the failure message
    fn check(&self, value: &dyn FieldValue, ctx: &RuleContext<'_>) -> Result<(), String>;
}

/// Fails when the value is the zero value of its kind
pub struct Required;

impl Rule for Required {
    fn check(&self, value: &dyn FieldValue, ctx: &RuleContext<'_>) -> Result<(), String> {
        if value.is_zero() {
            Err(format!("{}: required", ctx.subject))
        } else {
            Ok(())
        }
    }
}

/// Fails when the value is not in the allow-list
///
/// An unset value is compared as the declared default, or as the empty
/// string when none is declared. The default is only substituted for the
/// comparison; the field itself is left unset.
pub struct OneOf;

impl Rule for OneOf {
    fn check(&self, value: &dyn FieldValue, ctx: &RuleContext<'_>) -> Result<(), String> {
        let allowed: Vec<&str> = ctx
            .param(IN_PARAMS)
            .map(|p| p.split_whitespace().collect())
            .unwrap_or_default();

        let text = if value.is_zero() {
            ctx.default.unwrap_or_default().to_string()
        } else {
            value.as_text().unwrap_or_default()
        };

        if allowed.iter().any(|a| *a == text) {
            Ok(())
        } else {
            Err(format!(
                "{}: value {:?} is not one of [{}]",
                ctx.subject,
                text,
                allowed.join(" ")
            ))
        }
    }
}

/// Explicit rule table handed to every decoder that needs it
#[derive(Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<dyn Rule>>,
}

impl RuleRegistry {
    /// A registry without any rule
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, rule: impl Rule + 'static) -> &mut Self {
        self.rules.insert(name.into(), Arc::new(rule));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.rules.get(name).map(|r| r.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// `required` and `in`
impl Default for RuleRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("required", Required).register("in", OneOf);
        registry
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}
