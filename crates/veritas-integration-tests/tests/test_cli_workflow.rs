//! # CLI Workflow
//!
//! Drives the `veritas` subcommand handlers through a full issuer and
//! verifier session against a temporary registry snapshot.

use std::path::Path;

use veritas_cli::issue::{run_issue, EmploymentArgs, IssueArgs, IssueCommand};
use veritas_cli::key::{run_key, KeyArgs, KeyCommand};
use veritas_cli::status::{run_status, BitArgs, StatusArgs, StatusCommand};
use veritas_cli::verify::{run_verify, verify_file, VerifyArgs, EXIT_REJECTED};
use veritas_cli::CliConfig;
use veritas_verifier::ErrorKind;

fn config(dir: &Path) -> CliConfig {
    CliConfig {
        registry_path: dir.join("registry.json"),
        ..CliConfig::default()
    }
}

#[test]
fn issue_verify_revoke_reinstate() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let key_path = dir.path().join("acme.key");
    let vc_path = dir.path().join("vc.json");

    let keygen = KeyArgs {
        command: KeyCommand::Generate {
            output: dir.path().to_path_buf(),
            prefix: "acme".into(),
        },
    };
    assert_eq!(run_key(&keygen, &cfg).unwrap(), 0);

    let issue = IssueArgs {
        key: Some(key_path.clone()),
        output: Some(vc_path.clone()),
        command: IssueCommand::Employment(EmploymentArgs {
            holder: "did:ethr:polygon:0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF".into(),
            employer: "Acme".into(),
            role: "Engineer".into(),
            start_date: "2023-01-01".into(),
            end_date: None,
            expires_in_days: Some(30),
            list_index: Some(0),
            bit_index: Some(7),
        }),
    };
    assert_eq!(run_issue(&issue, &cfg).unwrap(), 0);

    let verify = VerifyArgs {
        file: vc_path.clone(),
        registry: None,
        no_revocation: false,
        strict_did_key: false,
    };
    assert_eq!(run_verify(&verify, &cfg).unwrap(), 0);

    let bit = BitArgs {
        key: Some(key_path),
        list: 0,
        bit: 7,
    };
    let revoke = StatusArgs {
        registry: None,
        command: StatusCommand::Revoke(bit.clone()),
    };
    assert_eq!(run_status(&revoke, &cfg).unwrap(), 0);
    assert!(cfg.registry_path.exists());

    assert_eq!(run_verify(&verify, &cfg).unwrap(), EXIT_REJECTED);
    assert_eq!(
        verify_file(&verify, &cfg).unwrap().error_kinds(),
        vec![ErrorKind::Revoked]
    );

    let reinstate = StatusArgs {
        registry: None,
        command: StatusCommand::Reinstate(bit),
    };
    assert_eq!(run_status(&reinstate, &cfg).unwrap(), 0);
    assert_eq!(run_verify(&verify, &cfg).unwrap(), 0);
}

#[test]
fn other_key_cannot_revoke() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());

    for prefix in ["issuer", "rival"] {
        let keygen = KeyArgs {
            command: KeyCommand::Generate {
                output: dir.path().to_path_buf(),
                prefix: prefix.into(),
            },
        };
        run_key(&keygen, &cfg).unwrap();
    }

    let issue = IssueArgs {
        key: Some(dir.path().join("issuer.key")),
        output: Some(dir.path().join("vc.json")),
        command: IssueCommand::Employment(EmploymentArgs {
            holder: "did:ethr:polygon:0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF".into(),
            employer: "Acme".into(),
            role: "Engineer".into(),
            start_date: "2023-01-01".into(),
            end_date: Some("2024-06-30".into()),
            expires_in_days: None,
            list_index: Some(2),
            bit_index: Some(200),
        }),
    };
    run_issue(&issue, &cfg).unwrap();

    // The rival only flips bits in its own list.
    let revoke = StatusArgs {
        registry: None,
        command: StatusCommand::Revoke(BitArgs {
            key: Some(dir.path().join("rival.key")),
            list: 2,
            bit: 200,
        }),
    };
    run_status(&revoke, &cfg).unwrap();

    let verify = VerifyArgs {
        file: dir.path().join("vc.json"),
        registry: None,
        no_revocation: false,
        strict_did_key: false,
    };
    assert_eq!(run_verify(&verify, &cfg).unwrap(), 0);
}
