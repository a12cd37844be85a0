//! Ontology identifiers and annotation resource parsing

use serde::{Deserialize, Serialize};

/// A `(namespace, accession)` reference into an external ontology or
/// database, e.g. `hgnc:6010`.
///
/// Namespaces are case-normalized at construction; accessions are kept
/// verbatim because some namespaces are case-sensitive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    /// Lower-cased registry namespace (e.g. `hgnc`, `uniprot`)
    pub namespace: String,
    /// Accession within the namespace, verbatim
    pub accession: String,
}

impl Identifier {
    /// Create an identifier, normalizing the namespace
    pub fn new(namespace: impl Into<String>, accession: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into().trim().to_lowercase(),
            accession: accession.into().trim().to_string(),
        }
    }

    /// Compact CURIE form, `namespace:accession`
    pub fn curie(&self) -> String {
        format!("{}:{}", self.namespace, self.accession)
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.accession)
    }
}

/// How an identifier came to be attached to an entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Embedded in the source file's annotation block
    Explicit,
    /// Inferred from the entity label by the grounding service
    Grounded,
}

/// A candidate identifier returned by the grounding service for a label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundingCandidate {
    pub namespace: String,
    pub accession: String,
    /// Confidence in [0, 1]
    pub confidence: f32,
}

impl GroundingCandidate {
    pub fn identifier(&self) -> Identifier {
        Identifier::new(&self.namespace, &self.accession)
    }
}

/// Why a resource string failed to parse
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MalformReason {
    /// No `scheme://` prefix
    NotAUri,
    /// URI has no host or no path segments after the host
    MissingPath,
    /// Namespace or accession segment is empty
    EmptySegment,
}

impl std::fmt::Display for MalformReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformReason::NotAUri => write!(f, "not a URI"),
            MalformReason::MissingPath => write!(f, "missing namespace/accession path"),
            MalformReason::EmptySegment => write!(f, "empty namespace or accession"),
        }
    }
}

/// Outcome of parsing a single annotation resource string.
///
/// Malformed strings are preserved with their reason so the diagnostic
/// can be surfaced in the run report instead of silently coerced away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResource {
    Valid(Identifier),
    Malformed { raw: String, reason: MalformReason },
}

/// Parse an annotation resource string of the shape
/// `scheme://host/namespace/accession`.
///
/// The identifiers.org CURIE path form (`https://identifiers.org/hgnc:6010`)
/// is accepted as well. Anything else is reported as malformed, never an
/// error: annotation blocks in the wild are noisy.
pub fn parse_resource_uri(raw: &str) -> ParsedResource {
    let trimmed = raw.trim();

    let rest = match trimmed.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() => rest,
        _ => {
            return ParsedResource::Malformed {
                raw: trimmed.to_string(),
                reason: MalformReason::NotAUri,
            }
        }
    };

    let mut segments = rest.split('/').filter(|s| !s.is_empty());
    let _host = match segments.next() {
        Some(host) => host,
        None => {
            return ParsedResource::Malformed {
                raw: trimmed.to_string(),
                reason: MalformReason::MissingPath,
            }
        }
    };

    let path: Vec<&str> = segments.collect();
    let (namespace, accession) = match path.as_slice() {
        // identifiers.org CURIE path form: /hgnc:6010
        [single] => match single.split_once(':') {
            Some((ns, acc)) => (ns, acc),
            None => {
                return ParsedResource::Malformed {
                    raw: trimmed.to_string(),
                    reason: MalformReason::MissingPath,
                }
            }
        },
        // plain path form: /hgnc/6010 (accession may itself contain slashes,
        // e.g. CHEBI ids exported with an embedded path; keep the tail intact)
        [ns, acc @ ..] => {
            let joined = acc.join("/");
            if joined.is_empty() {
                return ParsedResource::Malformed {
                    raw: trimmed.to_string(),
                    reason: MalformReason::MissingPath,
                };
            }
            return finish(trimmed, ns, &joined);
        }
        [] => {
            return ParsedResource::Malformed {
                raw: trimmed.to_string(),
                reason: MalformReason::MissingPath,
            }
        }
    };

    finish(trimmed, namespace, accession)
}

fn finish(raw: &str, namespace: &str, accession: &str) -> ParsedResource {
    if namespace.trim().is_empty() || accession.trim().is_empty() {
        return ParsedResource::Malformed {
            raw: raw.to_string(),
            reason: MalformReason::EmptySegment,
        };
    }
    ParsedResource::Valid(Identifier::new(namespace, accession))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_is_normalized() {
        let a = Identifier::new("HGNC", "6010");
        let b = Identifier::new("hgnc", "6010");

        assert_eq!(a, b);
        assert_eq!(a.namespace, "hgnc");
        assert_eq!(a.curie(), "hgnc:6010");
    }

    #[test]
    fn test_accession_is_case_sensitive() {
        let upper = Identifier::new("uniprot", "P04637");
        let lower = Identifier::new("uniprot", "p04637");

        assert_ne!(upper, lower);
        assert_eq!(upper.accession, "P04637");
    }

    #[test]
    fn test_parse_identifiers_org_uri() {
        let parsed = parse_resource_uri("http://identifiers.org/hgnc/6010");
        assert_eq!(parsed, ParsedResource::Valid(Identifier::new("hgnc", "6010")));

        let parsed = parse_resource_uri("https://identifiers.org/HGNC/6010");
        assert_eq!(parsed, ParsedResource::Valid(Identifier::new("hgnc", "6010")));
    }

    #[test]
    fn test_parse_curie_path_form() {
        let parsed = parse_resource_uri("https://identifiers.org/hgnc:6010");
        assert_eq!(parsed, ParsedResource::Valid(Identifier::new("hgnc", "6010")));
    }

    #[test]
    fn test_parse_keeps_accession_tail() {
        let parsed = parse_resource_uri("http://identifiers.org/ec-code/2.7.11.1");
        assert_eq!(
            parsed,
            ParsedResource::Valid(Identifier::new("ec-code", "2.7.11.1"))
        );
    }

    #[test]
    fn test_malformed_resources() {
        assert!(matches!(
            parse_resource_uri("not a uri at all"),
            ParsedResource::Malformed {
                reason: MalformReason::NotAUri,
                ..
            }
        ));
        assert!(matches!(
            parse_resource_uri("http://identifiers.org/"),
            ParsedResource::Malformed {
                reason: MalformReason::MissingPath,
                ..
            }
        ));
        assert!(matches!(
            parse_resource_uri("http://identifiers.org/hgnc"),
            ParsedResource::Malformed {
                reason: MalformReason::MissingPath,
                ..
            }
        ));
    }
}
