//! Property-based tests for name resolution, config and durations.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::time::Duration;

use proptest::prelude::*;
use tempfile::TempDir;

use atomix_cli::core::config::{Config, ConfigFile, ConfigKey};
use atomix_cli::core::naming::{
    resolve_group, resolve_primitive, NameError, Overrides, DEFAULT_APP, DEFAULT_GROUP,
    DEFAULT_NAMESPACE,
};
use atomix_cli::core::timeout::{format_duration, parse_duration};

/// Strategy for generating valid name segments.
fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,16}"
}

fn optional_segment() -> impl Strategy<Value = Option<String>> {
    prop::option::of(segment())
}

fn config_with(namespace: Option<String>, group: Option<String>, app: Option<String>) -> Config {
    Config::in_memory(ConfigFile {
        namespace,
        group,
        app,
        ..Default::default()
    })
}

proptest! {
    /// Flags beat config, config beats the built-in default.
    #[test]
    fn bare_name_precedence(
        name in segment(),
        flag_ns in optional_segment(),
        flag_group in optional_segment(),
        flag_app in optional_segment(),
        cfg_ns in optional_segment(),
        cfg_group in optional_segment(),
        cfg_app in optional_segment(),
    ) {
        let overrides = Overrides {
            controller: None,
            namespace: flag_ns.clone(),
            app: flag_app.clone(),
            group: flag_group.clone(),
        };
        let config = config_with(cfg_ns.clone(), cfg_group.clone(), cfg_app.clone());

        let resolved = resolve_primitive(&name, &overrides, &config).unwrap();

        let expect = |flag: &Option<String>, cfg: &Option<String>, default: &str| {
            flag.clone().or_else(|| cfg.clone()).unwrap_or_else(|| default.to_string())
        };
        prop_assert_eq!(&resolved.primitive.name, &name);
        prop_assert_eq!(&resolved.primitive.namespace, &expect(&flag_ns, &cfg_ns, DEFAULT_NAMESPACE));
        prop_assert_eq!(&resolved.primitive.app, &expect(&flag_app, &cfg_app, DEFAULT_APP));
        prop_assert_eq!(&resolved.group.name, &expect(&flag_group, &cfg_group, DEFAULT_GROUP));
        prop_assert_eq!(&resolved.group.namespace, &resolved.primitive.namespace);
    }

    /// A qualifier embedded in the name beats config, and must agree with a flag.
    #[test]
    fn embedded_group_beats_config(
        group in segment(),
        name in segment(),
        cfg_group in optional_segment(),
        flag_group in optional_segment(),
    ) {
        let overrides = Overrides {
            group: flag_group.clone(),
            ..Default::default()
        };
        let config = config_with(None, cfg_group, None);
        let raw = format!("{}.{}", group, name);

        match resolve_primitive(&raw, &overrides, &config) {
            Ok(resolved) => {
                prop_assert!(flag_group.as_deref().map_or(true, |f| f == group));
                prop_assert_eq!(resolved.group.name, group);
                prop_assert_eq!(resolved.primitive.name, name);
            }
            Err(NameError::Conflict { field, .. }) => {
                prop_assert_eq!(field, "group");
                prop_assert!(flag_group.is_some() && flag_group.as_deref() != Some(group.as_str()));
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    /// An explicit group name wins over the --group flag for group commands.
    #[test]
    fn explicit_group_reference(
        group in segment(),
        flag_group in optional_segment(),
        cfg_group in optional_segment(),
    ) {
        let overrides = Overrides {
            group: flag_group,
            ..Default::default()
        };
        let config = config_with(None, cfg_group, None);

        let reference = resolve_group(Some(group.as_str()), &overrides, &config).unwrap();
        prop_assert_eq!(reference.name, group);
        prop_assert_eq!(reference.namespace, DEFAULT_NAMESPACE);
    }

    /// More than three segments is always rejected.
    #[test]
    fn too_many_segments_rejected(parts in prop::collection::vec(segment(), 4..7)) {
        let raw = parts.join(".");
        let result = resolve_primitive(&raw, &Overrides::default(), &config_with(None, None, None));
        prop_assert!(matches!(result, Err(NameError::TooManySegments(_))));
    }

    /// Values written to the config file read back unchanged.
    #[test]
    fn config_round_trip(
        controller in prop::option::of("[a-z0-9.-]{1,20}:[0-9]{1,5}"),
        namespace in optional_segment(),
        group in optional_segment(),
        app in optional_segment(),
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::load(Some(&path)).unwrap();
        let values = [
            (ConfigKey::Controller, &controller),
            (ConfigKey::Namespace, &namespace),
            (ConfigKey::Group, &group),
            (ConfigKey::App, &app),
        ];
        for (key, value) in values {
            if let Some(value) = value {
                config.set(key, value.as_str()).unwrap();
            }
        }
        let written = config.flush().unwrap();
        prop_assert_eq!(&written, &path);

        let reloaded = Config::load(Some(&path)).unwrap();
        for (key, value) in values {
            prop_assert_eq!(reloaded.get(key), value.as_deref());
        }
    }

    /// Formatting a whole-millisecond duration parses back to the same value.
    #[test]
    fn duration_round_trip(millis in 1u64..36_000_000) {
        let duration = Duration::from_millis(millis);
        let text = format_duration(duration);
        prop_assert_eq!(parse_duration(&text), Ok(duration));
    }
}
