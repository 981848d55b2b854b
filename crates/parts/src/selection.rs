//! Record selection criteria.
//!
//! The host expresses selections as a semicolon-separated criteria string,
//! e.g. `such=NN;nummer=10010!10015;@autostart=(Yes)`. This module parses the
//! terms the toolkit needs: `such` matches the search word exactly, `nummer`
//! matches the code exactly or as an inclusive `lo!hi` range. `@`-prefixed
//! directives address the host's selection dialog; they are collected
//! verbatim and not interpreted here.

use serde::{Deserialize, Serialize};

use kontor_core::{DomainError, DomainResult};

use crate::part::Product;

/// A code term: exact value or inclusive range.
///
/// Codes are fixed-width digit strings, so range comparison is lexicographic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeTerm {
    Exact(String),
    Range { lo: String, hi: String },
}

impl CodeTerm {
    fn matches(&self, idno: &str) -> bool {
        match self {
            CodeTerm::Exact(value) => idno == value,
            CodeTerm::Range { lo, hi } => idno >= lo.as_str() && idno <= hi.as_str(),
        }
    }
}

/// Parsed selection criteria for products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    swd: Option<String>,
    idno: Option<CodeTerm>,
    directives: Vec<(String, String)>,
}

impl SelectionCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_swd(mut self, swd: impl Into<String>) -> Self {
        self.swd = Some(swd.into());
        self
    }

    pub fn with_idno(mut self, idno: impl Into<String>) -> Self {
        self.idno = Some(CodeTerm::Exact(idno.into()));
        self
    }

    pub fn with_idno_range(mut self, lo: impl Into<String>, hi: impl Into<String>) -> Self {
        self.idno = Some(CodeTerm::Range {
            lo: lo.into(),
            hi: hi.into(),
        });
        self
    }

    /// Parse the host's criteria string form.
    pub fn parse(input: &str) -> DomainResult<Self> {
        let mut criteria = Self::default();
        for term in input.split(';').filter(|t| !t.trim().is_empty()) {
            let Some((key, value)) = term.split_once('=') else {
                return Err(DomainError::validation(format!(
                    "criteria term without '=': '{term}'"
                )));
            };
            if value.is_empty() {
                return Err(DomainError::validation(format!(
                    "criteria term '{key}' has no value"
                )));
            }
            if let Some(directive) = key.strip_prefix('@') {
                criteria
                    .directives
                    .push((directive.to_string(), value.to_string()));
                continue;
            }
            match key {
                "such" => criteria.swd = Some(value.to_string()),
                "nummer" => {
                    criteria.idno = Some(match value.split_once('!') {
                        Some((lo, hi)) => {
                            if lo.is_empty() || hi.is_empty() {
                                return Err(DomainError::validation(format!(
                                    "code range needs both bounds: '{value}'"
                                )));
                            }
                            CodeTerm::Range {
                                lo: lo.to_string(),
                                hi: hi.to_string(),
                            }
                        }
                        None => CodeTerm::Exact(value.to_string()),
                    });
                }
                other => {
                    return Err(DomainError::validation(format!(
                        "unsupported criteria key: '{other}'"
                    )));
                }
            }
        }
        Ok(criteria)
    }

    pub fn swd(&self) -> Option<&str> {
        self.swd.as_deref()
    }

    pub fn idno(&self) -> Option<&CodeTerm> {
        self.idno.as_ref()
    }

    /// Dialog directives (`@autostart` and friends), collected verbatim.
    pub fn directives(&self) -> &[(String, String)] {
        &self.directives
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(swd) = &self.swd {
            if product.swd() != swd {
                return false;
            }
        }
        if let Some(term) = &self.idno {
            if !term.matches(product.idno()) {
                return false;
            }
        }
        true
    }
}
