/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Static checks over translator manifests: naming conventions and
//! agreement between what a translator declares and its schema.

use crate::adapters;
use crate::schema::Schema;
use crate::translator::TranslatorManifest;
use log::debug;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

const TRANSLATOR_PREFIX: &str = "opent2t-translator-com-";
const SCHEMA_PREFIX: &str = "org.opent2t.sample.";
const SCHEMA_SUFFIX: &str = ".superpopular";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub translator: String,
    pub message: String,
}

impl Finding {
    fn error(translator: &str, message: String) -> Self {
        Finding { severity: Severity::Error, translator: translator.to_owned(), message: message }
    }

    fn warning(translator: &str, message: String) -> Self {
        Finding { severity: Severity::Warning, translator: translator.to_owned(), message: message }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}: {}", level, self.translator, self.message)
    }
}

fn is_slug(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// `opent2t-translator-com-<vendor>-<device>`, where `<vendor>` is the
/// manifest's vendor.
pub fn check_translator_name(manifest: &TranslatorManifest) -> Vec<Finding> {
    let name = manifest.name;
    let rest = match name.strip_prefix(TRANSLATOR_PREFIX) {
        Some(rest) => rest,
        None => return vec![Finding::error(name, format!("name must start with {}", TRANSLATOR_PREFIX))],
    };
    let mut findings = Vec::new();
    let segments: Vec<&str> = rest.split('-').collect();
    if segments.len() < 2 || !segments.iter().all(|s| is_slug(s)) {
        findings.push(Finding::error(name,
            "name must end in <vendor>-<device> using lowercase letters and digits".to_owned()));
    }
    if segments[0] != manifest.vendor {
        findings.push(Finding::error(name,
            format!("vendor segment `{}` does not match vendor `{}`", segments[0], manifest.vendor)));
    }
    findings
}

/// `org.opent2t.sample.<name>.superpopular`, naming a known schema.
pub fn check_schema_name(translator: &str, schema_id: &str) -> Vec<Finding> {
    let middle = schema_id.strip_prefix(SCHEMA_PREFIX).and_then(|s| s.strip_suffix(SCHEMA_SUFFIX));
    match middle {
        Some(m) if is_slug(m) => {
            if Schema::from_id(schema_id).is_none() {
                vec![Finding::error(translator, format!("unknown schema {}", schema_id))]
            } else {
                Vec::new()
            }
        },
        _ => vec![Finding::error(translator, format!(
            "schema {} must be {}<name>{}", schema_id, SCHEMA_PREFIX, SCHEMA_SUFFIX))],
    }
}

/// Compares the declared resources with the schema's interface.
pub fn check_interface(manifest: &TranslatorManifest) -> Vec<Finding> {
    let name = manifest.name;
    let specs = manifest.schema.resources();
    let mut findings = Vec::new();

    for id in manifest.resources {
        if !specs.iter().any(|s| s.id == *id) {
            findings.push(Finding::error(name, format!("resource {} is not part of {}", id, manifest.schema)));
        }
    }
    for id in manifest.writable {
        if !manifest.resources.contains(id) {
            findings.push(Finding::error(name, format!("writable resource {} is not declared", id)));
        }
        match specs.iter().find(|s| s.id == *id) {
            Some(spec) if !spec.writable => {
                findings.push(Finding::error(name, format!("resource {} is read-only in {}", id, manifest.schema)));
            },
            _ => {},
        }
    }
    for spec in specs {
        if !manifest.resources.contains(&spec.id) {
            findings.push(Finding::warning(name, format!("does not implement {}", spec.id)));
        }
    }
    findings
}

/// Runs every check over `manifests`. Duplicate translator names are errors.
pub fn verify(manifests: &[&TranslatorManifest]) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut seen = HashSet::new();
    for manifest in manifests {
        debug!("Verifying {}", manifest.name);
        if !seen.insert(manifest.name) {
            findings.push(Finding::error(manifest.name, "duplicate translator name".to_owned()));
        }
        findings.extend(check_translator_name(manifest));
        findings.extend(check_schema_name(manifest.name, manifest.schema.id()));
        findings.extend(check_interface(manifest));
    }
    findings
}

/// Verifies every translator the crate ships.
pub fn verify_all() -> Vec<Finding> {
    verify(&adapters::manifests())
}
