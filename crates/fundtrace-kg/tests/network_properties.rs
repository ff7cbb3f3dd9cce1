//! End-to-end properties of generated catalogs.

use fundtrace_common::{EdgeType, FundtraceError, NodeType, PublicationKind, SynthesisConfig};
use fundtrace_kg::{check_dataset, check_network, Degradation, SeedMode, Synthesizer, Violation};
use fundtrace_test_utils::{
    assert_eq, cancer_spec, cancer_template, seeded_config, three_network_catalog, REFERENCE_SEED,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_reference_cancer_network() {
    let synth = Synthesizer::new(seeded_config(REFERENCE_SEED)).unwrap();
    let catalog = synth.generate_catalog(&[cancer_spec()]).unwrap();
    let graph = &catalog.networks[0];

    assert!(graph.grant().is_some());
    assert_eq!(graph.publications(PublicationKind::Funded).count(), 4);
    let treatment = graph.treatment().unwrap();
    assert_eq!(treatment.year, 2024);
    assert!(graph.edges_of(EdgeType::EnablesTreatment).any(|e| e.target == treatment.id));

    // Two-hop pathway → bridge → funded path.
    let chain = &graph.chains()[0];
    assert!(graph.node(&chain.bridge).unwrap().is_publication_of(PublicationKind::Ecosystem));
    assert!(graph
        .edges()
        .iter()
        .any(|e| e.source == chain.pathway && e.target == chain.bridge && e.kind == EdgeType::LeadsToTreatment));
    assert!(graph
        .edges()
        .iter()
        .any(|e| e.source == chain.bridge && e.target == chain.funded && e.kind == EdgeType::Cites));

    let violations = check_network(graph);
    assert!(violations.is_empty(), "{violations:?}");
}

#[test]
fn test_same_seed_same_tables() {
    let synth = Synthesizer::new(seeded_config(7)).unwrap();
    let a = synth.generate_catalog(&three_network_catalog()).unwrap().to_dataset().unwrap();
    let b = synth.generate_catalog(&three_network_catalog()).unwrap().to_dataset().unwrap();
    assert_eq!(a.nodes, b.nodes);
    assert_eq!(a.edges, b.edges);
    assert_eq!(a.summary, b.summary);
}

#[test]
fn test_different_seeds_differ() {
    let a = Synthesizer::new(seeded_config(1)).unwrap().generate_catalog(&[cancer_spec()]).unwrap();
    let b = Synthesizer::new(seeded_config(2)).unwrap().generate_catalog(&[cancer_spec()]).unwrap();
    assert_ne!(a.to_dataset().unwrap().nodes, b.to_dataset().unwrap().nodes);
}

#[test]
fn test_catalog_invariants_hold_across_seeds() {
    for seed in 0..25 {
        let synth = Synthesizer::new(seeded_config(seed)).unwrap();
        let catalog = synth.generate_catalog(&three_network_catalog()).unwrap();
        for graph in &catalog.networks {
            let violations = check_network(graph);
            assert!(violations.is_empty(), "seed {seed}, network {}: {violations:?}", graph.network_id());
        }
        let dataset = catalog.to_dataset().unwrap();
        assert!(check_dataset(&dataset, 1).is_empty());
        assert_eq!(dataset.summary.len(), 3);
        for row in &dataset.summary {
            assert!(row.grant_year < row.approval_year);
            assert_eq!(row.total_publications, 32);
        }
    }
}

#[test]
fn test_every_node_row_has_its_columns() {
    let synth = Synthesizer::new(seeded_config(3)).unwrap();
    let dataset = synth.generate_catalog(&three_network_catalog()).unwrap().to_dataset().unwrap();
    for row in &dataset.nodes {
        assert!(row.missing_fields().is_empty(), "{} missing {:?}", row.node_id, row.missing_fields());
    }
    let treatments = dataset.nodes.iter().filter(|n| n.node_type == NodeType::Treatment).count();
    assert_eq!(treatments, 3);
    assert_eq!(dataset.metadata.total_networks, 3);
    assert_eq!(dataset.metadata.seed, Some(3));
}

#[test]
fn test_chains_clamped_to_pathway_count() {
    let mut config = seeded_config(9);
    config.shape.pathway_publications = 1;
    let synth = Synthesizer::new(config).unwrap();
    let mut spec = cancer_spec();
    spec.guaranteed_chains = 4;
    let catalog = synth.generate_catalog(&[spec]).unwrap();
    let graph = &catalog.networks[0];

    assert_eq!(graph.chains().len(), 1);
    assert!(graph
        .degradations()
        .contains(&Degradation::PathwayShort { requested: 4, available: 1 }));
    let violations = check_network(graph);
    assert!(violations.is_empty(), "{violations:?}");
}

#[test]
fn test_sparse_ecosystem_still_builds_chain_when_any_pair_fits() {
    let mut built = 0;
    for seed in 0..300 {
        let mut config = seeded_config(seed);
        config.shape.ecosystem_publications = 2;
        let synth = Synthesizer::new(config).unwrap();
        let catalog = synth.generate_catalog(&[cancer_spec()]).unwrap();
        let graph = &catalog.networks[0];

        let latest_ecosystem = graph
            .publications(PublicationKind::Ecosystem)
            .map(|n| n.year)
            .max()
            .unwrap();
        let buildable = graph
            .publications(PublicationKind::Funded)
            .any(|n| n.year <= latest_ecosystem);

        let violations = check_network(graph);
        if buildable {
            built += 1;
            assert_eq!(graph.chains().len(), 1, "seed {seed}: {:?}", graph.degradations());
            assert!(violations.is_empty(), "seed {seed}: {violations:?}");
        } else {
            assert!(graph.chains().is_empty());
            assert!(
                violations.iter().any(|v| matches!(v, Violation::ChainShortfall { required: 1, realized: 0, .. })),
                "seed {seed}: {violations:?}"
            );
        }
    }
    assert!(built > 0);
}

#[test]
fn test_bridge_fallback_only_when_no_bridge_fits_any_funded_paper() {
    for seed in 0..100 {
        let synth = Synthesizer::new(seeded_config(seed)).unwrap();
        let catalog = synth.generate_catalog(&three_network_catalog()).unwrap();
        for graph in &catalog.networks {
            for degradation in graph.degradations() {
                let Degradation::BridgeFallback { pathway, .. } = degradation else {
                    continue;
                };
                let pathway_year = graph.node(pathway).unwrap().year;
                let pair_fits = graph.bridges().iter().any(|b| {
                    let bridge_year = graph.node(b).unwrap().year;
                    bridge_year <= pathway_year
                        && graph.publications(PublicationKind::Funded).any(|f| f.year <= bridge_year)
                });
                assert!(!pair_fits, "seed {seed}, network {}: fallback for {pathway}", graph.network_id());
            }
            for chain in graph.chains() {
                let bridge = graph.node(&chain.bridge).unwrap();
                let funded = graph.node(&chain.funded).unwrap();
                assert!(funded.year <= bridge.year);
            }
        }
    }
}

#[test]
fn test_pathway_papers_never_cite_funded_papers_directly() {
    for seed in 0..25 {
        let synth = Synthesizer::new(seeded_config(seed)).unwrap();
        let catalog = synth.generate_catalog(&three_network_catalog()).unwrap();
        for graph in &catalog.networks {
            for edge in graph.edges() {
                let source = graph.node(&edge.source).unwrap();
                if !source.is_publication_of(PublicationKind::Pathway) {
                    continue;
                }
                let target = graph.node(&edge.target).unwrap();
                assert!(
                    !target.is_publication_of(PublicationKind::Funded),
                    "seed {seed}: {} -> {}",
                    edge.source,
                    edge.target
                );
                if edge.kind == EdgeType::LeadsToTreatment {
                    assert!(target.is_publication_of(PublicationKind::Ecosystem));
                }
            }
        }
    }
}

#[test]
fn test_independent_mode_parallel_matches_sequential() {
    let synth = Synthesizer::new(seeded_config(11)).unwrap();
    let sequential = synth
        .generate(&three_network_catalog(), SeedMode::Independent { parallel: false })
        .unwrap()
        .to_dataset()
        .unwrap();
    let parallel = synth
        .generate(&three_network_catalog(), SeedMode::Independent { parallel: true })
        .unwrap()
        .to_dataset()
        .unwrap();
    assert_eq!(sequential.nodes, parallel.nodes);
    assert_eq!(sequential.edges, parallel.edges);
}

#[test]
fn test_independent_network_does_not_depend_on_neighbours() {
    let synth = Synthesizer::new(seeded_config(11)).unwrap();
    let alone = synth
        .generate(&[cancer_spec()], SeedMode::Independent { parallel: false })
        .unwrap();
    let with_others = synth
        .generate(&three_network_catalog(), SeedMode::Independent { parallel: false })
        .unwrap();
    assert_eq!(alone.networks[0].node_rows(), with_others.networks[0].node_rows());
}

#[test]
fn test_generate_network_with_explicit_rng() {
    let synth = Synthesizer::new(SynthesisConfig::default()).unwrap();
    let template = cancer_template();
    let a = synth.generate_network(&template, 5, &mut StdRng::seed_from_u64(99));
    let b = synth.generate_network(&template, 5, &mut StdRng::seed_from_u64(99));
    assert_eq!(a.node_rows(), b.node_rows());
    assert_eq!(a.grant().unwrap().id, "GRANT_5");
}

#[test]
fn test_missing_approval_year_is_config_error() {
    let synth = Synthesizer::new(seeded_config(1)).unwrap();
    let mut spec = cancer_spec();
    spec.approval_year = None;
    let err = synth.generate_catalog(&[spec]).unwrap_err();
    assert!(matches!(err, FundtraceError::Config(_)));
}
