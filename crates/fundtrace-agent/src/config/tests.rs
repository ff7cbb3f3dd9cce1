#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_empty_file_uses_builtin_catalog() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.networks.len(), 3);
        assert_eq!(config.networks[0].disease.as_deref(), Some("Cancer"));
        assert_eq!(config.output.formats.len(), 3);
        assert!(config.generator.seed.is_none());
    }

    #[test]
    fn test_networks_and_output_override() {
        let config = Config::from_toml(
            r#"
            [generator]
            seed = 42

            [output]
            dir = "/tmp/fundtrace"
            formats = ["json"]
            file_prefix = "demo_"

            [[networks]]
            disease = "Cystic Fibrosis"
            treatment_name = "CFTR Modulator"
            keywords = ["CFTR", "lung"]
            approval_year = 2022
            guaranteed_chains = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.generator.seed, Some(42));
        assert_eq!(config.output.formats, vec![OutputFormat::Json]);
        assert_eq!(config.output.file_prefix, "demo_");
        assert_eq!(config.networks.len(), 1);
        assert_eq!(config.networks[0].grant_year_range, (2015, 2019));
    }

    #[test]
    fn test_invalid_generator_settings_are_rejected() {
        let result = Config::from_toml(
            r#"
            [generator.shape]
            funded_publications = 0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_default_output_writes_every_format() {
        let output = OutputConfig::default();
        assert_eq!(output.dir, PathBuf::from("./output"));
        assert!(output.formats.contains(&OutputFormat::Sqlite));
        assert!(output.file_prefix.is_empty());
    }
}
