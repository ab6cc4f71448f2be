//! # Issue-to-Verify Flows
//!
//! A credential is built and signed by an issuer, crosses the wire as JSON
//! and is verified by a party holding only the document and, optionally,
//! a revocation query.

use std::sync::Arc;

use serde_json::json;
use veritas_core::Timestamp;
use veritas_crypto::SecpKeyPair;
use veritas_did::{encode_ethr, DidRecord};
use veritas_status::{RevocationRegistry, UnavailableQuery};
use veritas_vc::{
    build, issue_credential, ClaimPayload, EmploymentClaim, RevocationStatus,
    VerifiableCredential,
};
use veritas_verifier::{verify, ErrorKind, Verifier};

const STATUS_BASE: &str = "https://veritas.id/credentials/status";

fn employment_claim() -> ClaimPayload {
    ClaimPayload::Employment(EmploymentClaim {
        id: String::new(),
        employer: "Acme".into(),
        role: "Engineer".into(),
        start_date: "2023-01-01".into(),
        end_date: None,
    })
}

struct Parties {
    issuer_key: SecpKeyPair,
    issuer_did: String,
    holder_did: String,
}

fn parties() -> Parties {
    let issuer_key = SecpKeyPair::generate();
    let holder_key = SecpKeyPair::generate();
    Parties {
        issuer_did: encode_ethr("polygon", &issuer_key.address().to_checksum()).unwrap(),
        holder_did: encode_ethr("polygon", &holder_key.address().to_lower_hex()).unwrap(),
        issuer_key,
    }
}

fn revocable_credential(p: &Parties, list: u64, bit: u64) -> VerifiableCredential {
    let mut vc = build(employment_claim(), &p.issuer_did, &p.holder_did, Some(365)).unwrap();
    vc.credential_status = Some(RevocationStatus::new(STATUS_BASE, list, bit).unwrap());
    vc.sign(&p.issuer_key, None).unwrap();
    vc
}

#[test]
fn employment_credential_end_to_end() {
    let p = parties();
    let vc = issue_credential(
        employment_claim(),
        &p.holder_did,
        &p.issuer_key,
        &p.issuer_did,
        Some(365),
    )
    .unwrap();

    let wire = vc.to_json().unwrap();
    let received = VerifiableCredential::from_json(&wire).unwrap();
    let result = verify(&received, None);

    assert!(result.verified, "{:?}", result.errors);
    assert_eq!(result.issuer.as_deref(), Some(p.issuer_did.as_str()));
    let subject = result.subject.unwrap();
    assert_eq!(subject["role"], "Engineer");
    assert_eq!(subject["employer"], "Acme");
    assert_eq!(subject["startDate"], "2023-01-01");
    assert_eq!(subject["id"], json!(p.holder_did));
}

#[test]
fn revoked_credential_reports_revoked() {
    let p = parties();
    let vc = revocable_credential(&p, 0, 7);
    let status = vc.credential_status.as_ref().unwrap();
    assert_eq!(status.status_type, "StatusList2021Entry");
    assert_eq!(status.status_list_index, "7");
    assert_eq!(status.status_list_credential, format!("{STATUS_BASE}/0"));

    let registry = Arc::new(RevocationRegistry::new());
    let issuer = p.issuer_key.address();
    registry.set_bit(&issuer, &issuer, 0, 7, true).unwrap();

    let result = Verifier::new().with_revocation(registry).verify(&vc);
    assert!(!result.verified);
    assert_eq!(result.error_kinds(), vec![ErrorKind::Revoked]);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["errors"][0]["kind"], "Revoked");
}

#[test]
fn neighbouring_bits_do_not_revoke() {
    let p = parties();
    let vc = revocable_credential(&p, 0, 7);
    let registry = Arc::new(RevocationRegistry::new());
    let issuer = p.issuer_key.address();
    registry.set_bits(&issuer, &issuer, 0, &[6, 8], true).unwrap();
    registry.set_bit(&issuer, &issuer, 1, 7, true).unwrap();

    assert!(Verifier::new().with_revocation(registry).verify(&vc).verified);
}

#[test]
fn another_issuers_bit_does_not_revoke() {
    let p = parties();
    let vc = revocable_credential(&p, 0, 7);
    let registry = Arc::new(RevocationRegistry::new());
    let other = SecpKeyPair::generate().address();
    registry.set_bit(&other, &other, 0, 7, true).unwrap();

    assert!(Verifier::new().with_revocation(registry).verify(&vc).verified);
}

#[test]
fn unreachable_registry_fails_open() {
    let p = parties();
    let vc = revocable_credential(&p, 0, 7);
    let result = Verifier::new()
        .with_revocation(Arc::new(UnavailableQuery::new("connection refused")))
        .verify(&vc);
    assert!(result.verified);
}

#[test]
fn expiration_boundary() {
    let p = parties();
    let now = Timestamp::parse("2025-06-01T12:00:00Z").unwrap();
    let mut vc = build(employment_claim(), &p.issuer_did, &p.holder_did, None).unwrap();

    vc.expiration_date = Some(now.plus_secs(-1).unwrap());
    vc.sign(&p.issuer_key, None).unwrap();
    assert_eq!(
        Verifier::new().verify_at(&vc, now).error_kinds(),
        vec![ErrorKind::Expired]
    );

    vc.expiration_date = Some(now.plus_secs(1).unwrap());
    vc.sign(&p.issuer_key, None).unwrap();
    assert!(Verifier::new().verify_at(&vc, now).verified);

    vc.expiration_date = Some(now);
    vc.sign(&p.issuer_key, None).unwrap();
    assert!(Verifier::new().verify_at(&vc, now).verified);
}

#[test]
fn tampering_any_signed_field_is_detected() {
    let p = parties();
    let signed = revocable_credential(&p, 0, 7);

    let mut tampered = Vec::new();

    let mut vc = signed.clone();
    vc.credential_subject["role"] = json!("CTO");
    tampered.push(vc);

    let mut vc = signed.clone();
    vc.credential_subject["employer"] = json!("Globex");
    tampered.push(vc);

    let mut vc = signed.clone();
    vc.id = "urn:uuid:00000000000000000000000000000000".into();
    tampered.push(vc);

    let mut vc = signed.clone();
    vc.issuance_date = vc.issuance_date.plus_secs(1).unwrap();
    tampered.push(vc);

    let mut vc = signed.clone();
    vc.expiration_date = None;
    tampered.push(vc);

    let mut vc = signed.clone();
    vc.credential_status = Some(RevocationStatus::new(STATUS_BASE, 0, 8).unwrap());
    tampered.push(vc);

    for vc in tampered {
        assert_eq!(
            verify(&vc, None).error_kinds(),
            vec![ErrorKind::InvalidSignature]
        );
    }
    assert!(verify(&signed, None).verified);
}

#[test]
fn issuer_mismatch_is_invalid_signature() {
    let p = parties();
    let impostor = SecpKeyPair::generate();
    let vc = issue_credential(
        employment_claim(),
        &p.holder_did,
        &impostor,
        &p.issuer_did,
        None,
    )
    .unwrap();
    assert_eq!(
        verify(&vc, None).error_kinds(),
        vec![ErrorKind::InvalidSignature]
    );
}

#[test]
fn did_key_issuer_round_trip() {
    let key = SecpKeyPair::generate();
    let issuer = DidRecord::did_key(&key).id;
    let vc = issue_credential(
        employment_claim(),
        "did:ethr:polygon:0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF",
        &key,
        &issuer,
        Some(30),
    )
    .unwrap();
    let result = Verifier::new()
        .with_did_key_policy(veritas_vc::DidKeyPolicy::RequireEmbeddedKey)
        .verify(&vc);
    assert!(result.verified, "{:?}", result.errors);
}

#[test]
fn malformed_wire_document_is_rejected_without_error() {
    let result = Verifier::new().verify_json("{\"not\": \"a credential\"}");
    assert!(!result.verified);
    assert_eq!(result.error_kinds(), vec![ErrorKind::MalformedCredential]);
}
