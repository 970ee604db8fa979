//! Mesh base and mesh object identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Error)]
pub enum IdentifierError {
    #[error("invalid mesh base identifier `{text}`")]
    InvalidBase {
        text: String,
        #[source]
        source: url::ParseError,
    },
    #[error("cannot resolve mesh object identifier `{text}`")]
    Unresolvable { text: String },
}

/// Identifies a mesh base / data source. Always an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeshBaseIdentifier(Url);

impl MeshBaseIdentifier {
    pub fn new(url: Url) -> Self {
        Self(url)
    }

    pub fn parse(text: &str) -> Result<Self, IdentifierError> {
        Url::parse(text.trim())
            .map(Self)
            .map_err(|source| IdentifierError::InvalidBase {
                text: text.to_string(),
                source,
            })
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn external_form(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MeshBaseIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Identifies one mesh object: a base plus a local fragment.
///
/// External form is `<base>#<local>`; the home object of a base has the
/// empty local part and its external form is the bare base URL.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MeshObjectIdentifier {
    base: MeshBaseIdentifier,
    local: String,
}

impl MeshObjectIdentifier {
    pub fn new(base: MeshBaseIdentifier, local: impl Into<String>) -> Self {
        Self {
            base,
            local: local.into(),
        }
    }

    /// The home object of a base.
    pub fn home(base: MeshBaseIdentifier) -> Self {
        Self {
            base,
            local: String::new(),
        }
    }

    /// Resolve an identifier as external documents write it:
    ///
    /// - `""`: the home object of `context`
    /// - `#local`: a local object of `context`
    /// - `<url>#local`: an object of another base
    /// - `<url>`: the home object of another base
    pub fn from_external_form(
        context: &MeshBaseIdentifier,
        text: &str,
    ) -> Result<Self, IdentifierError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::home(context.clone()));
        }
        if let Some(local) = text.strip_prefix('#') {
            return Ok(Self::new(context.clone(), local));
        }
        if let Some((base, local)) = text.split_once('#') {
            let base = MeshBaseIdentifier::parse(base)?;
            return Ok(Self::new(base, local));
        }
        let base = MeshBaseIdentifier::parse(text).map_err(|_| IdentifierError::Unresolvable {
            text: text.to_string(),
        })?;
        Ok(Self::home(base))
    }

    pub fn base(&self) -> &MeshBaseIdentifier {
        &self.base
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    pub fn is_home(&self) -> bool {
        self.local.is_empty()
    }

    pub fn external_form(&self) -> String {
        if self.local.is_empty() {
            self.base.external_form().to_string()
        } else {
            format!("{}#{}", self.base.external_form(), self.local)
        }
    }
}

impl fmt::Display for MeshObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.external_form())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> MeshBaseIdentifier {
        MeshBaseIdentifier::parse("https://data.example.org/set").expect("base url")
    }

    #[test]
    fn resolves_external_forms_against_a_context() {
        let ctx = base();

        let home = MeshObjectIdentifier::from_external_form(&ctx, "").expect("home");
        assert!(home.is_home());
        assert_eq!(home.external_form(), "https://data.example.org/set");

        let local = MeshObjectIdentifier::from_external_form(&ctx, "#abc").expect("local");
        assert_eq!(local.local(), "abc");
        assert_eq!(local.external_form(), "https://data.example.org/set#abc");

        let remote =
            MeshObjectIdentifier::from_external_form(&ctx, "https://other.example.org/x#y")
                .expect("remote");
        assert_eq!(remote.base().external_form(), "https://other.example.org/x");
        assert_eq!(remote.local(), "y");

        assert!(MeshObjectIdentifier::from_external_form(&ctx, "not a url").is_err());
    }
}
