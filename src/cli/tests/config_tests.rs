use super::args::CliArgs;
use super::config::*;
use clap::Parser;

#[test]
fn test_empty_config_uses_defaults() {
    let config = BridgegenConfig::parse("{}").unwrap();
    assert_eq!(config, BridgegenConfig::default());
    assert_eq!(config.marker_attribute, "Bridgegen.DynamicBridgeAttribute");
    assert_eq!(
        config.method_marker_attribute,
        "Bridgegen.DynamicBridgeMethodAttribute"
    );
    assert_eq!(config.indent, 4);
    assert!(config.hide_targets);
    assert!(config.parallel);
}

#[test]
fn test_config_fields_are_camel_case() {
    let config = BridgegenConfig::parse(
        r#"{ "markerAttribute": "My.Late", "indent": 2, "hideTargets": false,
             "nullableDirective": false }"#,
    )
    .unwrap();
    assert_eq!(config.marker_attribute, "My.Late");
    assert_eq!(config.indent, 2);
    assert!(!config.hide_targets);
    assert!(!config.nullable_directive);
    assert!(config.trimming_attributes);
}

#[test]
fn test_boolean_options_accept_strings() {
    let config =
        BridgegenConfig::parse(r#"{ "parallel": "false", "trimmingAttributes": "yes" }"#).unwrap();
    assert!(!config.parallel);
    assert!(config.trimming_attributes);

    assert!(BridgegenConfig::parse(r#"{ "parallel": "sometimes" }"#).is_err());
}

#[test]
fn test_args_override_config() {
    let mut config = BridgegenConfig::parse(r#"{ "indent": 2 }"#).unwrap();
    let args = CliArgs::try_parse_from([
        "bridgegen",
        "graph.json",
        "--indent",
        "0",
        "--method-marker-attribute",
        "My.Method",
        "--no-nullable-directive",
        "--single-threaded",
    ])
    .unwrap();
    config.apply_args(&args);

    let options = config.generator_options();
    assert_eq!(options.emit.indent, 0);
    assert!(!options.emit.nullable_directive);
    assert!(options.emit.hide_targets);
    assert_eq!(options.solver.method_marker_attribute, "My.Method");
    assert!(!options.parallel);
}

#[test]
fn test_find_config_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(find_config(None, dir.path()), None);

    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "{}").unwrap();
    assert_eq!(find_config(None, dir.path()), Some(path.clone()));
    assert_eq!(find_config(Some(dir.path()), dir.path()), Some(path));
}

#[test]
fn test_load_config_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "{ not json").unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains(CONFIG_FILE_NAME));
}
