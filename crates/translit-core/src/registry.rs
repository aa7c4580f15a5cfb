//! Provider directory.
//!
//! Providers, default chains and schemes are registered once on a
//! [`RegistryBuilder`]; [`RegistryBuilder::build`] validates everything and
//! returns an immutable [`Registry`] that can be shared behind an `Arc`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Error;
use crate::pipeline::{Options, Pipeline, Provider, ProviderKind, SCHEME_OPTION};

/// Creates a fresh, unconfigured provider instance.
pub type ProviderFactory = Arc<dyn Fn() -> Box<dyn Provider> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate {what} registration for {language}: {name}")]
    Duplicate {
        what: &'static str,
        language: String,
        name: String,
    },
    #[error("unknown {kind} {name} for language {language}")]
    UnknownProvider {
        language: String,
        kind: ProviderKind,
        name: String,
    },
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    #[error("no default chain for language {0}")]
    NoDefaultChain(String),
    #[error("default scheme {scheme} is not registered for {language}")]
    UnknownDefaultScheme { language: String, scheme: String },
    #[error(transparent)]
    Pipeline(#[from] Error),
}

/// A named provider implementation.
#[derive(Clone, Serialize)]
pub struct ProviderEntry {
    pub language: String,
    pub name: String,
    pub kind: ProviderKind,
    pub capabilities: Vec<&'static str>,
    #[serde(skip)]
    factory: ProviderFactory,
}

impl fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("language", &self.language)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

impl ProviderEntry {
    pub fn new<F>(
        language: &str,
        name: &str,
        kind: ProviderKind,
        capabilities: &[&'static str],
        factory: F,
    ) -> Self
    where
        F: Fn() -> Box<dyn Provider> + Send + Sync + 'static,
    {
        Self {
            language: language.to_string(),
            name: name.to_string(),
            kind,
            capabilities: capabilities.to_vec(),
            factory: Arc::new(factory),
        }
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn instantiate(&self) -> Box<dyn Provider> {
        (self.factory)()
    }
}

/// A named preset: which transliterator to use and the style it gets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scheme {
    pub name: String,
    pub description: String,
    /// Transliterator provider name.
    pub provider: String,
    /// Value passed as the `scheme` option.
    pub param: String,
}

impl Scheme {
    pub fn new(name: &str, description: &str, provider: &str, param: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            provider: provider.to_string(),
            param: param.to_string(),
        }
    }
}

type EntryKey = (String, ProviderKind, String);

#[derive(Default)]
pub struct RegistryBuilder {
    entries: BTreeMap<EntryKey, ProviderEntry>,
    chains: BTreeMap<String, Vec<(ProviderKind, String)>>,
    schemes: BTreeMap<String, Vec<Scheme>>,
    default_schemes: BTreeMap<String, String>,
    error: Option<RegistryError>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn duplicate(&mut self, what: &'static str, language: &str, name: &str) {
        self.error.get_or_insert(RegistryError::Duplicate {
            what,
            language: language.to_string(),
            name: name.to_string(),
        });
    }

    pub fn provider(mut self, entry: ProviderEntry) -> Self {
        let key = (entry.language.clone(), entry.kind, entry.name.clone());
        if self.entries.contains_key(&key) {
            self.duplicate("provider", &key.0, &key.2);
        } else {
            self.entries.insert(key, entry);
        }
        self
    }

    /// Stages instantiated, in order, by [`Registry::default_pipeline`].
    pub fn default_chain(mut self, language: &str, chain: &[(ProviderKind, &str)]) -> Self {
        if self.chains.contains_key(language) {
            self.duplicate("default chain", language, language);
        } else {
            let chain = chain.iter().map(|&(k, n)| (k, n.to_string())).collect();
            self.chains.insert(language.to_string(), chain);
        }
        self
    }

    pub fn scheme(mut self, language: &str, scheme: Scheme) -> Self {
        let list = self.schemes.entry(language.to_string()).or_default();
        if list.iter().any(|s| s.name.eq_ignore_ascii_case(&scheme.name)) {
            let name = scheme.name;
            self.duplicate("scheme", language, &name);
        } else {
            list.push(scheme);
        }
        self
    }

    pub fn default_scheme(mut self, language: &str, scheme: &str) -> Self {
        if self.default_schemes.contains_key(language) {
            self.duplicate("default scheme", language, scheme);
        } else {
            self.default_schemes
                .insert(language.to_string(), scheme.to_string());
        }
        self
    }

    /// Validate and freeze.
    pub fn build(self) -> Result<Registry, RegistryError> {
        if let Some(e) = self.error {
            return Err(e);
        }

        let known = |language: &str, kind: ProviderKind, name: &str| {
            self.entries
                .contains_key(&(language.to_string(), kind, name.to_string()))
        };
        let unknown = |language: &str, kind: ProviderKind, name: &str| RegistryError::UnknownProvider {
            language: language.to_string(),
            kind,
            name: name.to_string(),
        };

        for (language, chain) in &self.chains {
            for (kind, name) in chain {
                if !known(language, *kind, name) {
                    return Err(unknown(language, *kind, name));
                }
            }
        }
        for (language, schemes) in &self.schemes {
            for scheme in schemes {
                if !known(language, ProviderKind::Transliterator, &scheme.provider) {
                    return Err(unknown(
                        language,
                        ProviderKind::Transliterator,
                        &scheme.provider,
                    ));
                }
            }
        }
        for (language, default) in &self.default_schemes {
            let found = self
                .schemes
                .get(language)
                .is_some_and(|list| list.iter().any(|s| s.name.eq_ignore_ascii_case(default)));
            if !found {
                return Err(RegistryError::UnknownDefaultScheme {
                    language: language.clone(),
                    scheme: default.clone(),
                });
            }
        }

        debug!(
            providers = self.entries.len(),
            languages = self.chains.len(),
            "registry frozen"
        );
        Ok(Registry {
            entries: self.entries,
            chains: self.chains,
            schemes: self.schemes,
            default_schemes: self.default_schemes,
        })
    }
}

/// Frozen provider directory. Lookups never mutate.
pub struct Registry {
    entries: BTreeMap<EntryKey, ProviderEntry>,
    chains: BTreeMap<String, Vec<(ProviderKind, String)>>,
    schemes: BTreeMap<String, Vec<Scheme>>,
    default_schemes: BTreeMap<String, String>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("providers", &self.entries.len())
            .field("languages", &self.languages())
            .finish()
    }
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Languages with a provider, chain or scheme.
    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self
            .entries
            .keys()
            .map(|(l, _, _)| l.as_str())
            .chain(self.chains.keys().map(String::as_str))
            .chain(self.schemes.keys().map(String::as_str))
            .collect();
        langs.sort_unstable();
        langs.dedup();
        langs
    }

    /// Exact lookup.
    pub fn provider(&self, language: &str, kind: ProviderKind, name: &str) -> Option<&ProviderEntry> {
        self.entries
            .get(&(language.to_string(), kind, name.to_string()))
    }

    pub fn providers<'a>(&'a self, language: &'a str) -> impl Iterator<Item = &'a ProviderEntry> + 'a {
        self.entries
            .values()
            .filter(move |e| e.language == language)
    }

    /// Providers of `language` carrying `capability`.
    pub fn providers_with<'a>(
        &'a self,
        language: &'a str,
        capability: &'a str,
    ) -> impl Iterator<Item = &'a ProviderEntry> + 'a {
        self.providers(language)
            .filter(move |e| e.has_capability(capability))
    }

    pub fn schemes(&self, language: &str) -> &[Scheme] {
        self.schemes.get(language).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Case-insensitive scheme lookup, without fallback.
    pub fn scheme(&self, language: &str, name: &str) -> Option<&Scheme> {
        let name = name.trim();
        self.schemes(language)
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn default_scheme(&self, language: &str) -> Option<&Scheme> {
        let name = self.default_schemes.get(language)?;
        self.scheme(language, name)
    }

    /// Scheme lookup falling back to the language's default scheme.
    pub fn resolve_scheme(&self, language: &str, name: &str) -> Result<&Scheme, RegistryError> {
        if let Some(s) = self.scheme(language, name) {
            return Ok(s);
        }
        let fallback = self
            .default_scheme(language)
            .ok_or_else(|| RegistryError::UnknownLanguage(language.to_string()))?;
        warn!(language, scheme = name, fallback = fallback.name.as_str(), "unknown scheme");
        Ok(fallback)
    }

    /// Fresh instances of the language's default chain.
    pub fn default_pipeline(&self, language: &str) -> Result<Pipeline, RegistryError> {
        self.pipeline_with(language, None)
    }

    /// The default chain with its transliterator replaced by the scheme's
    /// provider and configured with the scheme's style.
    pub fn pipeline_for_scheme(&self, language: &str, scheme: &str) -> Result<Pipeline, RegistryError> {
        let scheme = self.resolve_scheme(language, scheme)?;
        let mut pipeline = self.pipeline_with(language, Some(scheme.provider.as_str()))?;
        let options = Options::from([(SCHEME_OPTION.to_string(), scheme.param.clone())]);
        pipeline.configure(&options)?;
        Ok(pipeline)
    }

    fn pipeline_with(&self, language: &str, transliterator: Option<&str>) -> Result<Pipeline, RegistryError> {
        let chain = self.chains.get(language).ok_or_else(|| {
            if self.languages().contains(&language) {
                RegistryError::NoDefaultChain(language.to_string())
            } else {
                RegistryError::UnknownLanguage(language.to_string())
            }
        })?;

        let mut pipeline = Pipeline::new(language);
        for (kind, name) in chain {
            let name = match (kind, transliterator) {
                (ProviderKind::Transliterator, Some(t)) => t,
                _ => name.as_str(),
            };
            let entry = self
                .provider(language, *kind, name)
                .ok_or_else(|| RegistryError::UnknownProvider {
                    language: language.to_string(),
                    kind: *kind,
                    name: name.to_string(),
                })?;
            pipeline.push_stage(entry.instantiate());
        }
        Ok(pipeline)
    }
}
