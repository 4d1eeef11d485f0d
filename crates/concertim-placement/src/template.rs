//! Template selection — maps a requested vCPU count to a device template.
//!
//! The match is textual: a template is a candidate when its description
//! contains `"<vcpus> VCPU"`. When several templates match, the last one in
//! listing order wins. When none match, the template at
//! [`DEFAULT_TEMPLATE_INDEX`] is used regardless of its size.

use concertim_core::Template;
use tracing::debug;

use crate::error::{PlacementError, PlacementResult};

/// Listing index of the fallback template ("small" in a stock Concertim).
pub const DEFAULT_TEMPLATE_INDEX: usize = 1;

/// Pick the template for a device requesting `vcpus` virtual CPUs.
pub fn select_template(templates: &[Template], vcpus: u32) -> PlacementResult<&Template> {
    let needle = format!("{vcpus} VCPU");

    if let Some(template) = templates.iter().rev().find(|t| t.description.contains(&needle)) {
        debug!(vcpus, template = %template.id, "template matched by description");
        return Ok(template);
    }

    let fallback = templates
        .get(DEFAULT_TEMPLATE_INDEX)
        .ok_or(PlacementError::TooFewTemplates {
            available: templates.len(),
        })?;
    debug!(vcpus, template = %fallback.id, "no template matched, using default");
    Ok(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: &str, name: &str, description: &str) -> Template {
        Template {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    fn stock() -> Vec<Template> {
        vec![
            template("0", "Xlarge", "8 VCPU, 32GB"),
            template("1", "Small", "1 VCPU, 2GB"),
            template("2", "Medium", "2 VCPU, 4GB"),
            template("3", "Large", "4 VCPU, 8GB"),
        ]
    }

    #[test]
    fn exact_description_match() {
        let templates = stock();
        assert_eq!(select_template(&templates, 4).unwrap().id, "3");
        assert_eq!(select_template(&templates, 2).unwrap().id, "2");
    }

    #[test]
    fn last_match_wins() {
        let templates = vec![
            template("a", "Small", "1 VCPU"),
            template("b", "Medium", "2 VCPU"),
            template("c", "Large", "2 VCPU"),
        ];
        assert_eq!(select_template(&templates, 2).unwrap().id, "c");
    }

    #[test]
    fn falls_back_to_second_template() {
        let templates = vec![
            template("a", "Large", "4 VCPU"),
            template("b", "Medium", "2 VCPU"),
        ];
        assert_eq!(select_template(&templates, 8).unwrap().id, "b");
    }

    #[test]
    fn fallback_needs_two_templates() {
        let templates = vec![template("a", "Small", "1 VCPU")];
        assert_eq!(
            select_template(&templates, 8).unwrap_err(),
            PlacementError::TooFewTemplates { available: 1 }
        );
        assert_eq!(
            select_template(&[], 1).unwrap_err(),
            PlacementError::TooFewTemplates { available: 0 }
        );
    }

    #[test]
    fn single_template_still_matches() {
        let templates = vec![template("a", "Small", "1 VCPU")];
        assert_eq!(select_template(&templates, 1).unwrap().id, "a");
    }

    #[test]
    fn substring_semantics_are_kept() {
        // "12 VCPU" contains "2 VCPU"; the match is textual, not numeric.
        let templates = vec![
            template("a", "Small", "1 VCPU"),
            template("b", "Medium", "2 VCPU"),
            template("c", "Xlarge", "12 VCPU"),
        ];
        assert_eq!(select_template(&templates, 2).unwrap().id, "c");
    }

    #[test]
    fn selection_is_repeatable() {
        let templates = stock();
        let first = select_template(&templates, 2).unwrap().id.clone();
        let second = select_template(&templates, 2).unwrap().id.clone();
        assert_eq!(first, second);
    }
}
