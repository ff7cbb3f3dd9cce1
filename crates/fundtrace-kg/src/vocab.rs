//! Fixed vocabulary for flavor text: authors, journals and title templates.

use fundtrace_common::{NetworkTemplate, ResearchPhase};
use rand::seq::SliceRandom;
use rand::Rng;

pub const AUTHORS: &[&str] = &[
    "Dr. Sarah Johnson", "Dr. Michael Chen", "Dr. Emily Rodriguez", "Dr. David Kim",
    "Dr. Jennifer Martinez", "Dr. Robert Thompson", "Dr. Lisa Anderson", "Dr. James Wilson",
    "Dr. Maria Garcia", "Dr. Christopher Lee", "Dr. Amanda Taylor", "Dr. Daniel Brown",
    "Dr. Jessica Davis", "Dr. Matthew Miller", "Dr. Rachel White", "Dr. Andrew Jackson",
    "Dr. Stephanie Thomas", "Dr. Kevin Martinez", "Dr. Nicole Johnson", "Dr. Brandon Lee",
];

pub const JOURNALS: &[&str] = &[
    "Nature", "Science", "Cell", "Nature Medicine", "Science Translational Medicine",
    "New England Journal of Medicine", "The Lancet", "Nature Biotechnology", "PNAS",
    "Cell Metabolism", "Nature Immunology", "Journal of Clinical Investigation",
];

/// Number of title templates per research phase.
pub const TITLES_PER_PHASE: usize = 3;

/// Title `variant` (0..TITLES_PER_PHASE) for a phase, filled from the template keywords.
pub fn title_variant(template: &NetworkTemplate, phase: ResearchPhase, variant: usize) -> String {
    let k0 = template.keyword(0);
    let k1 = template.keyword(1);
    let k2 = template.keyword(2);
    match (phase, variant % TITLES_PER_PHASE) {
        (ResearchPhase::Basic, 0) => format!("{} research: Novel therapeutic targets and mechanisms", title_case(k0)),
        (ResearchPhase::Basic, 1) => format!("Molecular mechanisms of {k1} in {k0} pathogenesis"),
        (ResearchPhase::Basic, _) => format!("Identification of {k2} pathways in {k0} development"),
        (ResearchPhase::Translational, 0) => format!("Translational {k0} research: From bench to bedside"),
        (ResearchPhase::Translational, 1) => format!("Clinical implications of {k1} in {k0} treatment"),
        (ResearchPhase::Translational, _) => format!("Biomarker discovery for {k0} using {k2} approaches"),
        (ResearchPhase::Treatment, 0) => format!("Clinical trial results for {k0} treatment using {k1}"),
        (ResearchPhase::Treatment, 1) => format!("Phase II study of {k2} in {k0} patients"),
        (ResearchPhase::Treatment, _) => format!("Efficacy and safety of novel {k1} therapy for {k0}"),
    }
}

/// Random title for a phase.
pub fn title<R: Rng + ?Sized>(template: &NetworkTemplate, phase: ResearchPhase, rng: &mut R) -> String {
    title_variant(template, phase, rng.gen_range(0..TITLES_PER_PHASE))
}

/// `min..=max` distinct authors, bounded by the pool size.
pub fn authors<R: Rng + ?Sized>(bounds: (usize, usize), rng: &mut R) -> Vec<String> {
    let hi = bounds.1.min(AUTHORS.len());
    let lo = bounds.0.min(hi);
    let count = rng.gen_range(lo..=hi);
    AUTHORS
        .choose_multiple(rng, count)
        .map(|a| a.to_string())
        .collect()
}

pub fn journal<R: Rng + ?Sized>(rng: &mut R) -> String {
    JOURNALS.choose(rng).copied().unwrap_or(JOURNALS[0]).to_string()
}

pub fn principal_investigator<R: Rng + ?Sized>(rng: &mut R) -> String {
    AUTHORS.choose(rng).copied().unwrap_or(AUTHORS[0]).to_string()
}

/// Capitalise the first letter of every alphabetic run ("t-cell" → "T-Cell").
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundtrace_common::TemplateSpec;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn template(keywords: &[&str]) -> NetworkTemplate {
        NetworkTemplate::try_from(TemplateSpec::new("Cancer", "CAR-T", keywords, 2024, 1)).unwrap()
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("immunotherapy"), "Immunotherapy");
        assert_eq!(title_case("t-cell"), "T-Cell");
        assert_eq!(title_case("CAR-T"), "Car-T");
    }

    #[test]
    fn test_titles_use_keywords() {
        let t = template(&["immunotherapy", "T-cell", "cancer"]);
        assert_eq!(
            title_variant(&t, ResearchPhase::Treatment, 1),
            "Phase II study of cancer in immunotherapy patients"
        );
        assert_eq!(
            title_variant(&t, ResearchPhase::Basic, 0),
            "Immunotherapy research: Novel therapeutic targets and mechanisms"
        );
    }

    #[test]
    fn test_single_keyword_cycles() {
        let t = template(&["insulin"]);
        assert_eq!(
            title_variant(&t, ResearchPhase::Basic, 1),
            "Molecular mechanisms of insulin in insulin pathogenesis"
        );
    }

    #[test]
    fn test_authors_are_distinct_and_bounded() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let names = authors((2, 8), &mut rng);
            assert!((2..=8).contains(&names.len()));
            let mut sorted = names.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), names.len());
        }
    }

    #[test]
    fn test_same_seed_same_title() {
        let t = template(&["alzheimer", "amyloid", "brain"]);
        let a = title(&t, ResearchPhase::Translational, &mut StdRng::seed_from_u64(9));
        let b = title(&t, ResearchPhase::Translational, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
