use crate::error::InvokerError;
use crate::kind::{format_signature, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const SPEC_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SymbolSignature {
    #[serde(default)]
    pub args: Vec<ValueKind>,
    #[serde(default = "void")]
    pub returns: ValueKind,
}

fn void() -> ValueKind {
    ValueKind::Void
}

impl SymbolSignature {
    pub fn new(args: Vec<ValueKind>, returns: ValueKind) -> Self {
        Self { args, returns }
    }
}

impl std::fmt::Display for SymbolSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_signature(&self.args, self.returns))
    }
}

/// A descriptor shipped alongside a library, listing the signatures of its exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureFile {
    #[serde(rename = "spec-version")]
    pub spec_version: String,
    #[serde(default)]
    pub symbols: BTreeMap<String, SymbolSignature>,
}

impl SignatureFile {
    pub fn parse(s: &str, origin: &str) -> Result<Self, InvokerError> {
        let res: SignatureFile = serde_json::from_str(s).map_err(|e| InvokerError::Descriptor {
            origin: origin.to_string(),
            reason: e.to_string(),
        })?;

        if res.spec_version != SPEC_VERSION {
            return Err(InvokerError::Descriptor {
                origin: origin.to_string(),
                reason: format!("unsupported spec version: {}", res.spec_version),
            });
        }

        Ok(res)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, InvokerError> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let s = std::fs::read_to_string(path).map_err(|e| InvokerError::Descriptor {
            origin: origin.clone(),
            reason: e.to_string(),
        })?;

        Self::parse(&s, &origin)
    }

    /// `libfoo.so` is described by `libfoo.so.signatures.json` in the same directory.
    pub fn sidecar_path(library_path: &Path) -> PathBuf {
        let mut name = library_path.as_os_str().to_os_string();
        name.push(".signatures.json");
        PathBuf::from(name)
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolSignature> {
        self.symbols.get(symbol)
    }

    /// Compares a declared signature against the descriptor's entry for `symbol`.
    ///
    /// Returns `Ok(false)` when the descriptor does not list the symbol at all.
    pub fn check(&self, symbol: &str, declared: &SymbolSignature) -> Result<bool, InvokerError> {
        let Some(expected) = self.get(symbol) else {
            return Ok(false);
        };

        if expected != declared {
            return Err(InvokerError::SignatureMismatch {
                symbol: symbol.to_string(),
                declared: declared.to_string(),
                expected: expected.to_string(),
            });
        }

        Ok(true)
    }
}
