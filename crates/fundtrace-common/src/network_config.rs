//! Network templates and synthesis settings.
//!
//! A `TemplateSpec` is what users write (TOML/YAML/JSON); every field is
//! optional at the serde level so a missing field surfaces as a
//! configuration error from `NetworkTemplate::try_from` instead of an opaque
//! parse failure. The tuning constants of the citation model live in
//! `CitationRules` and can be overridden from config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FundtraceError, Result};

/// Minimum gap between the last possible grant year and the approval year.
/// Below this the ecosystem window (`grant+2 ..= approval-2`) can be empty.
pub const MIN_RESEARCH_SPAN: i32 = 4;

/// Calendar years a template may name. Keeps year arithmetic far from `i32` limits.
pub const YEAR_BOUNDS: (i32, i32) = (1800, 2500);

// ── Template Specification ───────────────────────────────────────────────────

/// User-facing network template, as read from a config or catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub disease: Option<String>,

    pub treatment_name: Option<String>,

    /// Research focus used in the grant title; defaults to "<disease> Research".
    pub grant_focus: Option<String>,

    #[serde(default)]
    pub keywords: Vec<String>,

    pub approval_year: Option<i32>,

    /// Inclusive range the grant award year is drawn from.
    #[serde(default = "default_grant_year_range")]
    pub grant_year_range: (i32, i32),

    /// Minimum number of pathway → bridge → funded chains.
    #[serde(default = "default_guaranteed_chains")]
    pub guaranteed_chains: i64,
}

fn default_grant_year_range() -> (i32, i32) { (2015, 2019) }
fn default_guaranteed_chains() -> i64 { 1 }

impl TemplateSpec {
    /// Convenience constructor with the default grant-year range.
    pub fn new(
        disease: &str,
        treatment_name: &str,
        keywords: &[&str],
        approval_year: i32,
        guaranteed_chains: i64,
    ) -> Self {
        Self {
            disease: Some(disease.to_string()),
            treatment_name: Some(treatment_name.to_string()),
            grant_focus: None,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            approval_year: Some(approval_year),
            grant_year_range: default_grant_year_range(),
            guaranteed_chains,
        }
    }

    pub fn with_grant_focus(mut self, focus: &str) -> Self {
        self.grant_focus = Some(focus.to_string());
        self
    }
}

/// A validated template. Only constructible through `TryFrom<TemplateSpec>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkTemplate {
    disease: String,
    treatment_name: String,
    grant_focus: String,
    keywords: Vec<String>,
    approval_year: i32,
    grant_year_start: i32,
    grant_year_end: i32,
    guaranteed_chains: usize,
}

impl NetworkTemplate {
    pub fn disease(&self) -> &str { &self.disease }
    pub fn treatment_name(&self) -> &str { &self.treatment_name }
    pub fn grant_focus(&self) -> &str { &self.grant_focus }
    pub fn keywords(&self) -> &[String] { &self.keywords }
    pub fn approval_year(&self) -> i32 { self.approval_year }
    pub fn grant_years(&self) -> (i32, i32) { (self.grant_year_start, self.grant_year_end) }
    pub fn guaranteed_chains(&self) -> usize { self.guaranteed_chains }

    /// Keyword by position, cycling when the list is shorter than `index`.
    pub fn keyword(&self, index: usize) -> &str {
        &self.keywords[index % self.keywords.len()]
    }
}

fn required(value: Option<String>, field: &str, label: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(FundtraceError::config(format!("network template {label} is missing `{field}`"))),
    }
}

impl TryFrom<TemplateSpec> for NetworkTemplate {
    type Error = FundtraceError;

    fn try_from(spec: TemplateSpec) -> Result<Self> {
        let label = spec
            .disease
            .as_deref()
            .map(|d| format!("'{d}'"))
            .unwrap_or_else(|| "<unnamed>".to_string());

        let disease = required(spec.disease, "disease", &label)?;
        let treatment_name = required(spec.treatment_name, "treatment_name", &label)?;

        if spec.keywords.is_empty() {
            return Err(FundtraceError::config(format!(
                "network template {label} has an empty keyword list"
            )));
        }
        if spec.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(FundtraceError::config(format!(
                "network template {label} contains a blank keyword"
            )));
        }

        let approval_year = spec.approval_year.ok_or_else(|| {
            FundtraceError::config(format!("network template {label} is missing `approval_year`"))
        })?;

        let (start, end) = spec.grant_year_range;
        let (min_year, max_year) = YEAR_BOUNDS;
        let named_years = [
            ("grant_year_range", start),
            ("grant_year_range", end),
            ("approval_year", approval_year),
        ];
        for (field, year) in named_years {
            if !(min_year..=max_year).contains(&year) {
                return Err(FundtraceError::config(format!(
                    "network template {label}: `{field}` year {year} is outside {min_year}..={max_year}"
                )));
            }
        }
        if start > end {
            return Err(FundtraceError::config(format!(
                "network template {label} has an inverted grant year range {start}..{end}"
            )));
        }
        if approval_year - end < MIN_RESEARCH_SPAN {
            return Err(FundtraceError::config(format!(
                "network template {label}: approval year {approval_year} must be at least \
                 {MIN_RESEARCH_SPAN} years after the last grant year {end}"
            )));
        }

        let guaranteed_chains = usize::try_from(spec.guaranteed_chains).map_err(|_| {
            FundtraceError::config(format!(
                "network template {label} has negative guaranteed_chains ({})",
                spec.guaranteed_chains
            ))
        })?;

        let grant_focus = spec
            .grant_focus
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| format!("{disease} Research"));

        Ok(Self {
            disease,
            treatment_name,
            grant_focus,
            keywords: spec.keywords.into_iter().map(|k| k.trim().to_string()).collect(),
            approval_year,
            grant_year_start: start,
            grant_year_end: end,
            guaranteed_chains,
        })
    }
}

/// Load a list of template specs from a YAML, JSON or TOML file.
/// TOML catalogs hold the list under a `[[networks]]` array.
pub fn load_catalog(path: &Path) -> Result<Vec<TemplateSpec>> {
    #[derive(Deserialize)]
    struct TomlCatalog {
        networks: Vec<TemplateSpec>,
    }

    let content = std::fs::read_to_string(path)?;
    match extension(path).as_str() {
        "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
        "json" => Ok(serde_json::from_str(&content)?),
        "toml" => Ok(toml::from_str::<TomlCatalog>(&content)?.networks),
        other => Err(FundtraceError::config(format!(
            "unsupported catalog format '{other}' for {}",
            path.display()
        ))),
    }
}

/// Load a single template spec from a YAML, JSON or TOML file.
pub fn load_template(path: &Path) -> Result<TemplateSpec> {
    let content = std::fs::read_to_string(path)?;
    match extension(path).as_str() {
        "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
        "json" => Ok(serde_json::from_str(&content)?),
        "toml" => Ok(toml::from_str(&content)?),
        other => Err(FundtraceError::config(format!(
            "unsupported template format '{other}' for {}",
            path.display()
        ))),
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// The three demo networks the dashboards were built around.
pub fn default_catalog() -> Vec<TemplateSpec> {
    vec![
        TemplateSpec::new(
            "Cancer",
            "CAR-T Cell Therapy",
            &["immunotherapy", "T-cell", "cancer", "oncology", "CAR-T"],
            2024,
            1,
        )
        .with_grant_focus("Immunotherapy Research"),
        TemplateSpec::new(
            "Alzheimer's Disease",
            "Aducanumab Plus",
            &["alzheimer", "amyloid", "neurodegenerative", "dementia", "brain"],
            2023,
            2,
        )
        .with_grant_focus("Neurodegenerative Disease Research"),
        TemplateSpec::new(
            "Diabetes",
            "Smart Insulin Patch",
            &["diabetes", "insulin", "glucose", "metabolic", "endocrine"],
            2025,
            3,
        )
        .with_grant_focus("Metabolic Disease Innovation"),
    ]
}

// ── Network Shape ─────────────────────────────────────────────────────────────

/// How many nodes of each kind a network gets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkShape {
    #[serde(default = "default_funded")]
    pub funded_publications: usize,

    #[serde(default = "default_ecosystem")]
    pub ecosystem_publications: usize,

    #[serde(default = "default_pathway")]
    pub pathway_publications: usize,

    /// Inclusive bounds on authors per publication.
    #[serde(default = "default_authors_per_paper")]
    pub authors_per_paper: (usize, usize),

    /// Share of ecosystem papers tagged `translational` (rest are `basic`).
    #[serde(default = "default_translational_share")]
    pub translational_share: f64,
}

fn default_funded() -> usize { 4 }
fn default_ecosystem() -> usize { 25 }
fn default_pathway() -> usize { 3 }
fn default_authors_per_paper() -> (usize, usize) { (2, 8) }
fn default_translational_share() -> f64 { 0.3 }

impl Default for NetworkShape {
    fn default() -> Self {
        Self {
            funded_publications: default_funded(),
            ecosystem_publications: default_ecosystem(),
            pathway_publications: default_pathway(),
            authors_per_paper: default_authors_per_paper(),
            translational_share: default_translational_share(),
        }
    }
}

impl NetworkShape {
    pub fn validate(&self) -> Result<()> {
        if self.funded_publications == 0 {
            return Err(FundtraceError::config("network shape needs at least one funded publication"));
        }
        if self.ecosystem_publications == 0 {
            return Err(FundtraceError::config("network shape needs at least one ecosystem publication"));
        }
        // The treatment needs an incoming enables_treatment edge.
        if self.pathway_publications == 0 {
            return Err(FundtraceError::config("network shape needs at least one pathway publication"));
        }
        let (lo, hi) = self.authors_per_paper;
        if lo == 0 || lo > hi {
            return Err(FundtraceError::config(format!("invalid authors_per_paper range {lo}..={hi}")));
        }
        check_probability("translational_share", self.translational_share)
    }
}

// ── Grant Parameters ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantParams {
    #[serde(default = "default_funding_min")]
    pub funding_min: u64,

    #[serde(default = "default_funding_max")]
    pub funding_max: u64,

    #[serde(default = "default_grant_prefixes")]
    pub id_prefixes: Vec<String>,
}

fn default_funding_min() -> u64 { 1_500_000 }
fn default_funding_max() -> u64 { 3_000_000 }
fn default_grant_prefixes() -> Vec<String> {
    ["INST-R01", "INST-U01", "INST-R21", "INST-P01"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

impl Default for GrantParams {
    fn default() -> Self {
        Self {
            funding_min: default_funding_min(),
            funding_max: default_funding_max(),
            id_prefixes: default_grant_prefixes(),
        }
    }
}

impl GrantParams {
    pub fn validate(&self) -> Result<()> {
        if self.funding_min == 0 || self.funding_min > self.funding_max {
            return Err(FundtraceError::config(format!(
                "invalid funding range {}..={}",
                self.funding_min, self.funding_max
            )));
        }
        if self.id_prefixes.is_empty() {
            return Err(FundtraceError::config("grant id_prefixes must not be empty"));
        }
        Ok(())
    }
}

// ── Citation Rules ────────────────────────────────────────────────────────────

/// Tuning constants of the citation model. The defaults are the values the
/// demo dashboards were calibrated with; none has a deeper derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationRules {
    /// Year gap up to which `recent_probability` applies.
    #[serde(default = "default_recent_gap")]
    pub recent_gap_years: i32,

    #[serde(default = "default_recent_probability")]
    pub recent_probability: f64,

    /// Year gap up to which `mid_probability` applies.
    #[serde(default = "default_mid_gap")]
    pub mid_gap_years: i32,

    #[serde(default = "default_mid_probability")]
    pub mid_probability: f64,

    #[serde(default = "default_distant_probability")]
    pub distant_probability: f64,

    /// Upper bound of the 0..=n citations an ecosystem paper makes per earlier layer.
    #[serde(default = "default_max_layer_citations")]
    pub max_layer_citations: usize,

    /// Inclusive bounds on ecosystem targets per pathway paper.
    #[serde(default = "default_pathway_citations")]
    pub pathway_citations: (usize, usize),

    /// How many of the most recent ecosystem papers join the pathway target pool.
    #[serde(default = "default_recent_pool")]
    pub recent_pool_size: usize,

    #[serde(default = "default_ecosystem_to_grant")]
    pub ecosystem_to_grant_probability: f64,

    /// Bridges selected per guaranteed chain.
    #[serde(default = "default_bridge_multiplier")]
    pub bridge_multiplier: usize,

    /// Inclusive bounds of the synthetic citation count given to bridges.
    #[serde(default = "default_bridge_citations")]
    pub bridge_citation_count: (u32, u32),
}

fn default_recent_gap() -> i32 { 2 }
fn default_recent_probability() -> f64 { 0.4 }
fn default_mid_gap() -> i32 { 4 }
fn default_mid_probability() -> f64 { 0.2 }
fn default_distant_probability() -> f64 { 0.1 }
fn default_max_layer_citations() -> usize { 3 }
fn default_pathway_citations() -> (usize, usize) { (3, 8) }
fn default_recent_pool() -> usize { 10 }
fn default_ecosystem_to_grant() -> f64 { 0.15 }
fn default_bridge_multiplier() -> usize { 2 }
fn default_bridge_citations() -> (u32, u32) { (50, 150) }

impl Default for CitationRules {
    fn default() -> Self {
        Self {
            recent_gap_years: default_recent_gap(),
            recent_probability: default_recent_probability(),
            mid_gap_years: default_mid_gap(),
            mid_probability: default_mid_probability(),
            distant_probability: default_distant_probability(),
            max_layer_citations: default_max_layer_citations(),
            pathway_citations: default_pathway_citations(),
            recent_pool_size: default_recent_pool(),
            ecosystem_to_grant_probability: default_ecosystem_to_grant(),
            bridge_multiplier: default_bridge_multiplier(),
            bridge_citation_count: default_bridge_citations(),
        }
    }
}

impl CitationRules {
    /// Citation probability between two layers `gap` years apart.
    pub fn probability_for_gap(&self, gap: i32) -> f64 {
        if gap <= self.recent_gap_years {
            self.recent_probability
        } else if gap <= self.mid_gap_years {
            self.mid_probability
        } else {
            self.distant_probability
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_probability("recent_probability", self.recent_probability)?;
        check_probability("mid_probability", self.mid_probability)?;
        check_probability("distant_probability", self.distant_probability)?;
        check_probability("ecosystem_to_grant_probability", self.ecosystem_to_grant_probability)?;

        if self.recent_gap_years > self.mid_gap_years {
            return Err(FundtraceError::config(format!(
                "recent_gap_years ({}) must not exceed mid_gap_years ({})",
                self.recent_gap_years, self.mid_gap_years
            )));
        }
        let (lo, hi) = self.pathway_citations;
        if lo > hi {
            return Err(FundtraceError::config(format!("invalid pathway_citations range {lo}..={hi}")));
        }
        let (lo, hi) = self.bridge_citation_count;
        if lo > hi {
            return Err(FundtraceError::config(format!("invalid bridge_citation_count range {lo}..={hi}")));
        }
        Ok(())
    }
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(FundtraceError::config(format!("{name} must be within [0, 1], got {p}")))
    }
}

// ── Synthesis Configuration ───────────────────────────────────────────────────

/// Everything the synthesizer needs besides the templates themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Run seed. `None` draws from OS entropy and the run is not reproducible.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub shape: NetworkShape,

    #[serde(default)]
    pub grant: GrantParams,

    #[serde(default)]
    pub rules: CitationRules,
}

impl SynthesisConfig {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed), ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        self.shape.validate()?;
        self.grant.validate()?;
        self.rules.validate()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
