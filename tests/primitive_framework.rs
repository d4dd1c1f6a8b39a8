//! Integration tests for the primitive command framework.
//!
//! These tests drive the typed primitive handles and the command handlers
//! against `MockController` and verify:
//! - Operation results for each primitive kind
//! - Sessions are closed on success, failure and timeout
//! - Version preconditions are enforced remotely
//! - Errors map to the documented exit statuses
//! - An interrupt still closes the session

use std::sync::Arc;
use std::time::{Duration, Instant};

use atomix_cli::cli::{self, Cli};
use atomix_cli::client::mock::{FailOn, MockController, MockOperation};
use atomix_cli::client::{ClientError, Resolver};
use atomix_cli::core::config::{Config, ConfigFile};
use atomix_cli::core::naming::Overrides;
use atomix_cli::core::types::PrimitiveKind;
use atomix_cli::error::{exit_status, CliError, ExitStatus};
use atomix_cli::primitive::{self, Counter, Election, List, Lock, Map, PrimitiveHandle, Set};
use clap::Parser;
use tempfile::TempDir;

fn default_mock() -> MockController {
    MockController::new().with_group("default", "default", 1, 1)
}

fn config() -> Config {
    Config::in_memory(ConfigFile::default())
}

mod set_scenario {
    use super::*;

    #[tokio::test]
    async fn add_contains_size() {
        let mock = default_mock();
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));

        let added = primitive::run::<Set, _, _, _>(&resolver, "s1", |set| async move {
            Ok(set.add("foo").await?)
        })
        .await
        .unwrap();
        let contains = primitive::run::<Set, _, _, _>(&resolver, "s1", |set| async move {
            Ok(set.contains("foo").await?)
        })
        .await
        .unwrap();
        let size = primitive::run::<Set, _, _, _>(&resolver, "s1", |set| async move {
            Ok(set.size().await?)
        })
        .await
        .unwrap();

        assert!(added);
        assert!(contains);
        assert_eq!(size, 1);
        assert_eq!(mock.sessions_opened(), 3);
        assert_eq!(mock.sessions_closed(), 3);
    }

    #[tokio::test]
    async fn duplicate_add_reports_false() {
        let mock = default_mock();
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));

        let (first, second) = primitive::run::<Set, _, _, _>(&resolver, "s1", |set| async move {
            let first = set.add("foo").await?;
            let second = set.add("foo").await?;
            Ok((first, second))
        })
        .await
        .unwrap();

        assert!(first);
        assert!(!second);
    }
}

mod lock_scenario {
    use super::*;

    #[tokio::test]
    async fn versions_increase_and_unlock_checks_version() {
        let mock = default_mock();
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));

        let (version, stale, released, locked) =
            primitive::run::<Lock, _, _, _>(&resolver, "mylock", |lock| async move {
                let version = lock.lock().await?;
                let stale = lock.unlock(Some(version + 1)).await?;
                let released = lock.unlock(Some(version)).await?;
                let locked = lock.is_locked(None).await?;
                Ok((version, stale, released, locked))
            })
            .await
            .unwrap();

        assert!(version >= 1);
        assert!(!stale);
        assert!(released);
        assert!(!locked);
    }

    #[tokio::test]
    async fn held_lock_times_out_and_session_closes() {
        let mock = default_mock();
        let config = config();
        let overrides = Overrides::default();
        let holder = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));
        let waiter = Resolver::new(&mock, &config, &overrides, Duration::from_millis(50));

        let group = holder.resolve_group(None).unwrap();
        let name = holder.resolve_name("mylock").unwrap().primitive;
        let err = holder
            .with_session(&group, |session| async move {
                let held = PrimitiveHandle::<Lock>::open(session, name, Duration::from_secs(5)).await?;
                held.lock().await?;

                primitive::run::<Lock, _, _, _>(&waiter, "mylock", |lock| async move {
                    Ok(lock.lock().await?)
                })
                .await
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::Timeout(_)));
        assert_eq!(mock.sessions_opened(), mock.sessions_closed());
    }
}

mod map_scenario {
    use super::*;

    #[tokio::test]
    async fn put_get_remove() {
        let mock = default_mock();
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));

        let (put, got, removed, after) =
            primitive::run::<Map, _, _, _>(&resolver, "m", |map| async move {
                let put = map.put("k", "v", None).await?;
                let got = map.get("k").await?;
                let removed = map.remove("k", None).await?;
                let after = map.get("k").await?;
                Ok((put, got, removed, after))
            })
            .await
            .unwrap();

        assert_eq!(put.value, "v");
        assert_eq!(got.map(|e| e.value).as_deref(), Some("v"));
        assert_eq!(removed.map(|e| e.value).as_deref(), Some("v"));
        assert!(after.is_none());
    }

    #[tokio::test]
    async fn stale_version_is_rejected_remotely() {
        let mock = default_mock();
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));

        let err = primitive::run::<Map, _, _, _>(&resolver, "m", |map| async move {
            let entry = map.put("k", "v1", None).await?;
            map.put("k", "v2", Some(entry.version + 10)).await?;
            Ok(())
        })
        .await
        .unwrap_err();

        assert!(matches!(err, CliError::Remote(ref m) if m.starts_with("precondition failed")));
        assert_eq!(err.status(), ExitStatus::Error);
    }
}

mod counter_list_election {
    use super::*;

    #[tokio::test]
    async fn counter_arithmetic() {
        let mock = default_mock();
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));

        let values = primitive::run::<Counter, _, _, _>(&resolver, "c", |counter| async move {
            let set = counter.set(10).await?;
            let inc = counter.increment(5).await?;
            let dec = counter.decrement(20).await?;
            let get = counter.get().await?;
            Ok(vec![set, inc, dec, get])
        })
        .await
        .unwrap();

        assert_eq!(values, vec![10, 15, -5, -5]);
    }

    #[tokio::test]
    async fn list_keeps_order() {
        let mock = default_mock();
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));

        let (items, removed, size) =
            primitive::run::<List, _, _, _>(&resolver, "l", |list| async move {
                list.append("a").await?;
                list.append("c").await?;
                list.insert(1, "b").await?;
                let items = list.items().await?;
                let removed = list.remove(0).await?;
                let size = list.size().await?;
                Ok((items, removed, size))
            })
            .await
            .unwrap();

        assert_eq!(items, vec!["a", "b", "c"]);
        assert_eq!(removed.as_deref(), Some("a"));
        assert_eq!(size, 2);
    }

    #[tokio::test]
    async fn election_enter_makes_session_leader() {
        let mock = default_mock();
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));

        let term = primitive::run::<Election, _, _, _>(&resolver, "e", |election| async move {
            let session = election.session().id().to_string();
            let term = election.enter().await?;
            assert_eq!(term.leader.as_deref(), Some(session.as_str()));
            Ok(term)
        })
        .await
        .unwrap();
        assert!(term.term >= 1);

        // Closing the session evicts it.
        let after = primitive::run::<Election, _, _, _>(&resolver, "e", |election| async move {
            Ok(election.term().await?)
        })
        .await
        .unwrap();
        assert_eq!(after.leader, None);
    }

    #[tokio::test]
    async fn kind_mismatch_is_rejected() {
        let mock = default_mock();
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));

        primitive::create::<Set>(&resolver, "shared").await.unwrap();
        let err = primitive::create::<Map>(&resolver, "shared").await.unwrap_err();

        assert!(matches!(err, CliError::Remote(_)));
        let group = resolver.resolve_group(None).unwrap();
        let name = resolver.resolve_name("shared").unwrap().primitive;
        assert_eq!(mock.primitive_kind(&group, &name), Some(PrimitiveKind::Set));
    }
}

mod unresponsive_backend {
    use super::*;

    #[tokio::test]
    async fn call_times_out_within_margin() {
        let mock = default_mock().unresponsive();
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_millis(1));

        let started = Instant::now();
        let err = primitive::run::<Lock, _, _, _>(&resolver, "mylock", |lock| async move {
            Ok(lock.lock().await?)
        })
        .await
        .unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(err.to_string(), "operation timed out after 1ms");
        assert_eq!(mock.sessions_closed(), 1);
    }

    #[tokio::test]
    async fn injected_failure_surfaces_verbatim() {
        let mock = default_mock().fail_on(FailOn::Execute(ClientError::Remote(
            "partition unavailable".into(),
        )));
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));

        let err = primitive::run::<Counter, _, _, _>(&resolver, "c", |counter| async move {
            Ok(counter.get().await?)
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "partition unavailable");
        assert_eq!(mock.sessions_closed(), 1);
        assert_eq!(
            mock.operations()
                .iter()
                .filter(|op| matches!(op, MockOperation::Execute { .. }))
                .count(),
            1
        );
    }
}

mod interruption {
    use super::*;

    #[tokio::test]
    async fn interrupt_during_body_closes_session() {
        let mock = default_mock();
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));
        let group = resolver.resolve_group(None).unwrap();

        let err = resolver
            .with_session_until(
                &group,
                tokio::time::sleep(Duration::from_millis(20)),
                |_session| std::future::pending::<Result<(), CliError>>(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::Interrupted));
        assert_eq!(err.status(), ExitStatus::Interrupted);
        assert_eq!(mock.sessions_opened(), 1);
        assert_eq!(mock.sessions_closed(), 1);
    }

    #[tokio::test]
    async fn interrupt_while_opening_still_closes_late_session() {
        let mock = default_mock().slow_open(Duration::from_millis(100));
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));
        let group = resolver.resolve_group(None).unwrap();

        let err = resolver
            .with_session_until(
                &group,
                tokio::time::sleep(Duration::from_millis(10)),
                |_session| async { Ok(()) },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::Interrupted));
        assert_eq!(mock.sessions_opened(), 1);
        assert_eq!(mock.sessions_closed(), 1);
        assert!(!mock
            .operations()
            .iter()
            .any(|op| matches!(op, MockOperation::OpenPrimitive { .. })));
    }

    #[tokio::test]
    async fn signal_after_completion_is_ignored() {
        let mock = default_mock();
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));
        let group = resolver.resolve_group(None).unwrap();

        let value = resolver
            .with_session_until(
                &group,
                tokio::time::sleep(Duration::from_secs(10)),
                |session| async move { Ok(session.id().to_string()) },
            )
            .await
            .unwrap();

        assert_eq!(value, "session-1");
        assert_eq!(mock.sessions_closed(), 1);
    }
}

/// Command handlers run through `cli::run_with` with an isolated config.
mod commands {
    use super::*;

    fn run(mock: &MockController, args: &[&str]) -> anyhow::Result<()> {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        let mut argv = vec!["atomix", "--config", config.to_str().unwrap()];
        argv.extend_from_slice(args);

        let cli = Cli::try_parse_from(argv).unwrap();
        cli::run_with(cli, Arc::new(mock.clone()))
    }

    #[test]
    fn group_create_then_get() {
        let mock = MockController::new();

        run(
            &mock,
            &["group", "create", "mygroup", "--protocol", "raft", "-p", "3", "-s", "1"],
        )
        .unwrap();
        run(&mock, &["group", "get", "mygroup"]).unwrap();

        let group = mock.group("default", "mygroup").unwrap();
        assert_eq!(group.partitions, 3);
        assert_eq!(group.partition_size, 1);
    }

    #[test]
    fn lock_timeout_exit_status() {
        let mock = default_mock().unresponsive();

        let err = run(&mock, &["lock", "lock", "--name", "mylock", "--timeout", "1ms"])
            .unwrap_err();

        assert_eq!(exit_status(&err), ExitStatus::Error);
        assert!(format!("{:#}", err).contains("timed out"));
        assert_eq!(mock.sessions_opened(), mock.sessions_closed());
    }

    #[test]
    fn invalid_name_exit_status() {
        let mock = default_mock();
        let err = run(&mock, &["set", "add", "--name", "a..b", "foo"]).unwrap_err();
        assert_eq!(exit_status(&err), ExitStatus::InvalidInput);
        assert!(mock.operations().is_empty());
    }

    #[test]
    fn connection_failure_exit_status() {
        let mock = default_mock().fail_on(FailOn::Connect(ClientError::Connection {
            endpoint: "localhost:5679".into(),
            message: "connection refused".into(),
        }));
        let err = run(&mock, &["counter", "get", "-n", "c"]).unwrap_err();
        assert_eq!(exit_status(&err), ExitStatus::BadConnection);
    }

    #[test]
    fn unsupported_feature_exit_status() {
        let mock = MockController::new().fail_on(FailOn::CreateGroup(ClientError::Unsupported(
            "log protocol".into(),
        )));
        let err = run(&mock, &["group", "create", "g", "--protocol", "log"]).unwrap_err();
        assert_eq!(exit_status(&err), ExitStatus::BadFeature);
    }

    #[test]
    fn group_flag_selects_session_group() {
        let mock = default_mock().with_group("default", "raft", 1, 1);
        run(&mock, &["map", "put", "-n", "m", "k", "v", "-g", "raft"]).unwrap();

        assert!(mock.operations().iter().any(|op| matches!(
            op,
            MockOperation::SessionOpened { group, .. } if group == "default.raft"
        )));
    }

    #[test]
    fn empty_group_flag_is_invalid_input() {
        let mock = default_mock();
        let err = run(&mock, &["set", "size", "-n", "s1", "--group", ""]).unwrap_err();
        assert_eq!(exit_status(&err), ExitStatus::InvalidInput);
        assert!(mock.operations().is_empty());
    }

    #[test]
    fn slashed_namespace_flag_is_invalid_input() {
        let mock = default_mock();
        let err = run(&mock, &["set", "size", "-n", "s1", "--namespace", "a/b"]).unwrap_err();
        assert_eq!(exit_status(&err), ExitStatus::InvalidInput);

        let err = run(&mock, &["groups", "--namespace", "a/b"]).unwrap_err();
        assert_eq!(exit_status(&err), ExitStatus::InvalidInput);
        assert!(mock.operations().is_empty());
    }

    #[test]
    fn qualified_default_group_is_split() {
        let mock = MockController::new().with_group("prod", "raft", 1, 1);
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        let path = config.to_str().unwrap();

        for args in [
            vec!["atomix", "--config", path, "group", "set", "prod.raft"],
            vec!["atomix", "--config", path, "set", "add", "-n", "s1", "foo"],
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            cli::run_with(cli, Arc::new(mock.clone())).unwrap();
        }

        assert!(mock.operations().iter().any(|op| matches!(
            op,
            MockOperation::SessionOpened { group, .. } if group == "prod.raft"
        )));
    }
}
