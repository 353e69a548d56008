//! Command tests against a temporary ledger and a mock node

use chrono::{TimeZone, Utc};
use serde_json::json;
use solar_cli::args::{ConfirmArgs, StatusArgs};
use solar_cli::commands::{confirm, status};
use solar_cli::{Settings, Solar};
use solar_config::{RetryConfig, RpcConfig};
use solar_events::{Event, RecordingSink, Reporter};
use solar_ledger::{DeploymentRecord, Ledger};
use std::path::Path;
use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod commands_tests {
    use super::*;

    fn settings(ledger_path: &Path, rpc_url: Option<String>) -> Settings {
        Settings {
            environment: "test".to_string(),
            ledger_path: ledger_path.to_path_buf(),
            rpc: RpcConfig {
                url: rpc_url,
                ..RpcConfig::default()
            },
            retry: RetryConfig {
                base_delay_ms: 1,
                jitter_ms: 0,
                max_attempts: Some(3),
                timeout_secs: None,
            },
            log_level: "info".to_string(),
        }
    }

    fn seed_ledger(path: &Path) {
        let mut ledger = Ledger::new(path);
        let pending = DeploymentRecord::new("Token", "Token", vec![0xaa], vec![0x01])
            .with_created_at(Utc.with_ymd_and_hms(2018, 1, 2, 3, 4, 5).unwrap());
        let confirmed = DeploymentRecord::new("Registry", "Registry", vec![0xbb], vec![0x02])
            .with_created_at(Utc.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap());
        ledger.set("Token", pending);
        ledger.set("Registry", confirmed);
        ledger.confirm("Registry").unwrap();
        ledger.commit().unwrap();
    }

    /// Status lists records oldest first with their state
    #[test]
    fn test_status_render() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solar.test.json");
        seed_ledger(&path);

        let ledger = Ledger::open(&path).unwrap();
        let out = status::render(&ledger, false);
        let registry = out.find("Registry").unwrap();
        let token = out.find("Token").unwrap();
        assert!(registry < token);
        assert!(out.contains("\u{2705}  Registry"));
        assert!(out.contains("\u{23f3}  Token"));
        assert!(out.contains("txid: 01"));
        assert!(out.contains("address: aa"));

        let pending = status::render(&ledger, true);
        assert!(!pending.contains("Registry"));
        assert!(pending.contains("Token"));
    }

    /// Status on a missing ledger reports an empty repository
    #[test]
    fn test_status_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let mut solar = Solar::new(settings(&dir.path().join("none.json"), None));
        status::run(&mut solar, &StatusArgs::default()).unwrap();

        let ledger = Ledger::open(dir.path().join("none.json")).unwrap();
        assert!(status::render(&ledger, false).starts_with("No contracts"));
    }

    /// Confirm without an RPC url fails before touching the ledger
    #[tokio::test]
    async fn test_confirm_requires_rpc_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solar.test.json");
        seed_ledger(&path);
        let before = std::fs::read(&path).unwrap();

        let (sink, _log) = RecordingSink::new();
        let mut solar =
            Solar::new(settings(&path, None)).with_reporter(Reporter::spawn(sink));
        let err = confirm::run(&mut solar, &ConfirmArgs::default(), CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("QTUM_RPC"));
        assert_eq!(std::fs::read(&path).unwrap(), before);
        solar.shutdown().await;
    }

    /// Confirm marks visible contracts and persists the ledger
    #[tokio::test]
    async fn test_confirm_against_node() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(mockito::Matcher::PartialJson(json!({
                "method": "getaccountinfo",
                "params": ["aa"]
            })))
            .with_status(200)
            .with_body(r#"{"result":{"address":"aa"},"error":null,"id":1}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solar.test.json");
        seed_ledger(&path);

        let (sink, log) = RecordingSink::new();
        let mut solar = Solar::new(settings(&path, Some(server.url())))
            .with_reporter(Reporter::spawn(sink));
        let report = confirm::run(&mut solar, &ConfirmArgs::default(), CancellationToken::new())
            .await
            .unwrap();
        solar.shutdown().await;

        mock.assert_async().await;
        assert_eq!(report.confirmed, vec!["Token".to_string()]);
        assert!(report.is_complete());
        assert!(Ledger::open(&path).unwrap().get("Token").unwrap().is_confirmed());
        assert_eq!(
            log.events().last(),
            Some(&Event::complete("\u{1f680}  All contracts confirmed"))
        );
    }

    /// A contract the node never sees fails only in strict mode
    #[tokio::test]
    async fn test_confirm_strict_mode() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(500)
            .with_body(r#"{"result":null,"error":{"code":-5,"message":"Address does not exist"},"id":1}"#)
            .expect_at_least(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solar.test.json");
        seed_ledger(&path);

        let (sink, log) = RecordingSink::new();
        let mut solar = Solar::new(settings(&path, Some(server.url())))
            .with_reporter(Reporter::spawn(sink));

        let report = confirm::run(&mut solar, &ConfirmArgs::default(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(report.failed.len(), 1);

        let strict = ConfirmArgs {
            strict: true,
            ..ConfirmArgs::default()
        };
        let err = confirm::run(&mut solar, &strict, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("1 of 1 contracts not confirmed"));

        solar.shutdown().await;
        assert!(log
            .events()
            .iter()
            .any(|event| matches!(event, Event::Status { message } if message.contains("Token"))));
        assert!(!Ledger::open(&path).unwrap().get("Token").unwrap().is_confirmed());
    }
}
