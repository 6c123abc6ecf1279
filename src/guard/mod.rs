//! XML security guard.
//!
//! Pure checks applied to any XML crossing a trust boundary — inbound
//! re-validation, or the final defense on generator output. The guard
//! deliberately does not parse: it scans the raw text, so it cannot be
//! confused by the very constructs it rejects.
//!
//! Checks run in fixed order and the first failure wins:
//! 1. byte-size ceiling (`XSG-01`)
//! 2. any DOCTYPE declaration (`XSG-02`) — no supported schema needs one
//! 3. SYSTEM/PUBLIC external-entity patterns, DOCTYPE or not (`XSG-03`)
//! 4. custom entity-reference count above the ceiling (`XSG-04`)
//! 5. any declared namespace outside the closed allow-list (`XSG-05`)
//!
//! Violations are typed errors, never silently repaired — a caller that
//! wants to tolerate-but-neutralize untrusted input uses
//! [`sanitize_xml`] instead.

use thiserror::Error;

use crate::syntax::{cii_ns, ubl_ns};

/// Trust-boundary policy. [`Default`] gives the production ceilings.
#[derive(Debug, Clone)]
pub struct GuardPolicy {
    /// Maximum document size in bytes.
    pub max_bytes: usize,
    /// Maximum number of non-built-in entity references.
    pub max_entity_refs: usize,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            max_entity_refs: 500,
        }
    }
}

/// A rejected trust boundary, with a stable rule code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardViolation {
    #[error("document size {size} bytes exceeds the {limit}-byte ceiling")]
    OversizedDocument { size: usize, limit: usize },

    #[error("DOCTYPE declarations are not allowed")]
    DoctypeForbidden,

    #[error("external entity declaration with a {0} identifier")]
    ExternalEntity(String),

    #[error("{count} custom entity references exceed the limit of {limit}")]
    EntityExpansion { count: usize, limit: usize },

    #[error("namespace '{0}' is not on the allow-list")]
    ForbiddenNamespace(String),
}

impl GuardViolation {
    /// Stable rule identifier, assertable across releases.
    pub fn rule_id(&self) -> &'static str {
        match self {
            Self::OversizedDocument { .. } => "XSG-01",
            Self::DoctypeForbidden => "XSG-02",
            Self::ExternalEntity(_) => "XSG-03",
            Self::EntityExpansion { .. } => "XSG-04",
            Self::ForbiddenNamespace(_) => "XSG-05",
        }
    }
}

/// Namespace URIs a document may declare: the two base syntaxes, the
/// schema-instance and signature namespaces, and each national schema.
pub const ALLOWED_NAMESPACES: &[&str] = &[
    ubl_ns::INVOICE,
    ubl_ns::CREDIT_NOTE,
    ubl_ns::CAC,
    ubl_ns::CBC,
    cii_ns::RSM,
    cii_ns::RAM,
    cii_ns::QDT,
    cii_ns::UDT,
    "http://www.w3.org/2001/XMLSchema-instance",
    "http://www.w3.org/2000/09/xmldsig#",
    crate::fatturapa::FATTURAPA_NS,
    crate::ksef::KSEF_NS,
];

/// Run all checks against `xml`. First failure wins.
pub fn inspect_xml(xml: &str, policy: &GuardPolicy) -> Result<(), GuardViolation> {
    if xml.len() > policy.max_bytes {
        return Err(GuardViolation::OversizedDocument {
            size: xml.len(),
            limit: policy.max_bytes,
        });
    }

    let upper = xml.to_ascii_uppercase();

    if upper.contains("<!DOCTYPE") {
        return Err(GuardViolation::DoctypeForbidden);
    }

    // Entity declarations smuggled in without a DOCTYPE wrapper.
    for (pos, _) in upper.match_indices("<!ENTITY") {
        let decl_end = upper[pos..].find('>').map_or(upper.len(), |e| pos + e);
        let decl = &upper[pos..decl_end];
        if decl.contains("SYSTEM") {
            return Err(GuardViolation::ExternalEntity("SYSTEM".into()));
        }
        if decl.contains("PUBLIC") {
            return Err(GuardViolation::ExternalEntity("PUBLIC".into()));
        }
    }

    let count = count_custom_entity_refs(xml);
    if count > policy.max_entity_refs {
        return Err(GuardViolation::EntityExpansion {
            count,
            limit: policy.max_entity_refs,
        });
    }

    for ns in declared_namespaces(xml) {
        if !ALLOWED_NAMESPACES.contains(&ns) {
            return Err(GuardViolation::ForbiddenNamespace(ns.to_string()));
        }
    }

    Ok(())
}

/// Strip DOCTYPE blocks instead of rejecting — for flows that must
/// tolerate-but-neutralize untrusted input. Internal subsets
/// (`[ ... ]`) are consumed along with the declaration.
pub fn sanitize_xml(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;

    loop {
        let upper = rest.to_ascii_uppercase();
        let Some(start) = upper.find("<!DOCTYPE") else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..start]);

        let mut bracket_depth = 0usize;
        let mut end = rest.len();
        for (i, c) in rest[start..].char_indices() {
            match c {
                '[' => bracket_depth += 1,
                ']' => bracket_depth = bracket_depth.saturating_sub(1),
                '>' if bracket_depth == 0 => {
                    end = start + i + 1;
                    break;
                }
                _ => {}
            }
        }
        rest = &rest[end..];
    }
}

/// The five predefined XML entities.
const BUILTIN_ENTITIES: [&str; 5] = ["amp", "lt", "gt", "apos", "quot"];

/// Count entity references that are neither built-in nor numeric.
fn count_custom_entity_refs(xml: &str) -> usize {
    let bytes = xml.as_bytes();
    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'&' {
            if let Some(rel_end) = bytes[i + 1..].iter().take(64).position(|&b| b == b';') {
                let name = &xml[i + 1..i + 1 + rel_end];
                let is_numeric = name.starts_with('#');
                let is_name = !name.is_empty()
                    && name
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');
                if !is_numeric && is_name && !BUILTIN_ENTITIES.contains(&name) {
                    count += 1;
                }
                i += rel_end + 2;
                continue;
            }
        }
        i += 1;
    }
    count
}

/// Extract every namespace URI declared via `xmlns` or `xmlns:prefix`.
fn declared_namespaces(xml: &str) -> Vec<&str> {
    let mut namespaces = Vec::new();
    for (pos, _) in xml.match_indices("xmlns") {
        let rest = &xml[pos + "xmlns".len()..];
        // Skip an optional prefix (and any whitespace) up to '='.
        let after_prefix = match rest.find('=') {
            Some(eq)
                if rest[..eq]
                    .chars()
                    .all(|c| c == ':' || c.is_ascii_alphanumeric() || c.is_ascii_whitespace()) =>
            {
                rest[eq + 1..].trim_start()
            }
            _ => continue,
        };
        let mut chars = after_prefix.chars();
        let Some(quote @ ('"' | '\'')) = chars.next() else {
            continue;
        };
        let value = chars.as_str();
        if let Some(end) = value.find(quote) {
            namespaces.push(&value[..end]);
        }
    }
    namespaces
}
