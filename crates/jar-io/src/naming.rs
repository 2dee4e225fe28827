use std::sync::LazyLock;

use regex::Regex;

use crate::engine::ParameterNamer;

/// Obfuscated method names embed a numeric id: `func_<id>_<anything>`.
static METHOD_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"func_(\d+)_.*").expect("method id pattern"));

/// Input to the naming function. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodParameterKey<'a> {
    pub method: &'a str,
    pub index: usize,
    pub is_abstract: bool,
    /// Name the engine would use on its own, if it has one.
    pub proposed: Option<&'a str>,
}

/// Naming rule used when the id convention does not apply.
pub trait FallbackNaming {
    fn fallback_name(&self, key: &MethodParameterKey<'_>) -> String;
}

impl<F> FallbackNaming for F
where
    F: Fn(&MethodParameterKey<'_>) -> String,
{
    fn fallback_name(&self, key: &MethodParameterKey<'_>) -> String {
        self(key)
    }
}

/// Default fallback: the engine's proposed name unchanged, or `var<index>`
/// when the engine proposed none.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProposedName;

impl FallbackNaming for ProposedName {
    fn fallback_name(&self, key: &MethodParameterKey<'_>) -> String {
        match key.proposed {
            Some(name) => name.to_string(),
            None => format!("var{}", key.index),
        }
    }
}

/// Gives parameters of abstract `func_<id>_*` methods a name derived only
/// from the method name and parameter position, so the declaration and every
/// independently decompiled override agree.
#[derive(Debug, Default, Clone)]
pub struct ParameterNamingStrategy<F = ProposedName> {
    fallback: F,
}

impl ParameterNamingStrategy<ProposedName> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: FallbackNaming> ParameterNamingStrategy<F> {
    pub fn with_fallback(fallback: F) -> Self {
        Self { fallback }
    }

    pub fn name(&self, method: &str, index: usize, is_abstract: bool) -> String {
        self.name_key(&MethodParameterKey {
            method,
            index,
            is_abstract,
            proposed: None,
        })
    }

    /// Like [`name`](Self::name), with the engine's own proposal passed on
    /// to the fallback.
    pub fn name_key(&self, key: &MethodParameterKey<'_>) -> String {
        if key.is_abstract {
            if let Some(found) = METHOD_ID.find(key.method) {
                return format!("p_{}_{}_", found.as_str(), key.index);
            }
        }
        self.fallback.fallback_name(key)
    }
}

impl<F: FallbackNaming> ParameterNamer for ParameterNamingStrategy<F> {
    fn parameter_name(&self, key: &MethodParameterKey<'_>) -> String {
        self.name_key(key)
    }
}
