// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Integration tests for record operations against an in-memory nameserver.
//!
//! The in-memory zone applies the update sections the orchestrator produces, so
//! these tests check the resulting zone state rather than message layout.
//!
//! The test at the bottom talks to a real BIND server and is ignored by default:
//!
//! ```text
//! BINDER_TEST_SERVER=127.0.0.1 BINDER_TEST_PORT=53 BINDER_TEST_ZONE=example.com \
//! BINDER_TEST_KEY_FILE=/etc/bind/update.key \
//!     cargo test --test update_integration -- --ignored
//! ```

mod common;

use common::{keyring, name, servers, InMemoryZone, KEY_NAME, SERVER};

use binder::orchestrator::UpdateOrchestrator;
use binder::update::{Keyring, ServerTable, UpdateAction};
use hickory_client::rr::{RData, RecordType};

fn orchestrator(zone: &InMemoryZone) -> UpdateOrchestrator<Keyring, ServerTable, &InMemoryZone> {
    UpdateOrchestrator::new(keyring(), servers(), zone)
}

fn address(rdata: &RData) -> String {
    match rdata {
        RData::A(a) => a.0.to_string(),
        RData::AAAA(aaaa) => aaaa.0.to_string(),
        other => panic!("not an address record: {other:?}"),
    }
}

#[test]
fn test_add_with_reverse_creates_forward_and_ptr() {
    let zone = InMemoryZone::serving(&["example.com", "0.20.10.in-addr.arpa"]);

    let report = orchestrator(&zone)
        .add_record(
            SERVER,
            "example.com",
            "www",
            RecordType::A,
            "10.20.0.5",
            3600,
            KEY_NAME,
            true,
            false,
        )
        .unwrap();

    assert_eq!(report.len(), 2);
    assert!(report.all_succeeded());

    let a = zone.rrset("www.example.com", RecordType::A);
    assert_eq!(a.iter().map(address).collect::<Vec<_>>(), vec!["10.20.0.5"]);

    let ptr = zone.rrset("5.0.20.10.in-addr.arpa", RecordType::PTR);
    assert_eq!(ptr, vec![RData::PTR(hickory_client::rr::rdata::PTR(name("www.example.com")))]);
}

#[test]
fn test_add_appends_and_replace_overwrites() {
    let zone = InMemoryZone::serving(&["example.com"]);
    let orchestrator = orchestrator(&zone);
    let add = |data: &str, replace: bool| {
        orchestrator
            .add_record(
                SERVER,
                "example.com",
                "pool",
                RecordType::A,
                data,
                300,
                KEY_NAME,
                false,
                replace,
            )
            .unwrap()
    };

    add("10.0.0.1", false);
    add("10.0.0.2", false);
    assert_eq!(zone.rrset("pool.example.com", RecordType::A).len(), 2);

    add("10.0.0.3", true);
    let after_first = zone.rrset("pool.example.com", RecordType::A);
    add("10.0.0.3", true);
    let after_second = zone.rrset("pool.example.com", RecordType::A);

    assert_eq!(after_first.iter().map(address).collect::<Vec<_>>(), vec!["10.0.0.3"]);
    assert_eq!(after_first, after_second);
}

#[test]
fn test_reverse_ptr_is_always_replaced() {
    let zone = InMemoryZone::serving(&["example.com", "0.20.10.in-addr.arpa"]);
    let orchestrator = orchestrator(&zone);

    for host in ["old", "new"] {
        orchestrator
            .add_record(
                SERVER,
                "example.com",
                host,
                RecordType::A,
                "10.20.0.9",
                300,
                KEY_NAME,
                true,
                false,
            )
            .unwrap();
    }

    let ptr = zone.rrset("9.0.20.10.in-addr.arpa", RecordType::PTR);
    assert_eq!(ptr.len(), 1);
    assert_eq!(ptr[0], RData::PTR(hickory_client::rr::rdata::PTR(name("new.example.com"))));
}

#[test]
fn test_ipv6_reverse() {
    // The reverse zone of an address is everything but its last nibble.
    let reverse_zone = "0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.8.b.d.0.1.0.0.2.ip6.arpa";
    let zone = InMemoryZone::serving(&["example.com", reverse_zone]);

    let report = orchestrator(&zone)
        .add_record(
            SERVER,
            "example.com",
            "v6",
            RecordType::AAAA,
            "2001:db8::1",
            300,
            KEY_NAME,
            true,
            false,
        )
        .unwrap();

    assert_eq!(report.len(), 2);
    assert_eq!(
        zone.rrset(&format!("1.{reverse_zone}"), RecordType::PTR).len(),
        1
    );
}

#[test]
fn test_reverse_zone_not_served_fails_after_forward() {
    let zone = InMemoryZone::serving(&["example.com"]);

    let err = orchestrator(&zone)
        .add_record(
            SERVER,
            "example.com",
            "www",
            RecordType::A,
            "10.20.0.5",
            300,
            KEY_NAME,
            true,
            false,
        )
        .unwrap_err();

    assert!(err.to_string().ends_with("NOTAUTH"));
    assert_eq!(zone.sent().len(), 2);
    assert_eq!(zone.rrset("www.example.com", RecordType::A).len(), 1);
}

#[test]
fn test_txt_is_stored_as_one_string() {
    let zone = InMemoryZone::serving(&["example.com"]);

    let report = orchestrator(&zone)
        .add_record(
            SERVER,
            "example.com",
            "@",
            RecordType::TXT,
            "v=spf1 mx -all",
            300,
            KEY_NAME,
            true,
            false,
        )
        .unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(zone.sent().len(), 1);
    match zone.rrset("example.com", RecordType::TXT).as_slice() {
        [RData::TXT(txt)] => {
            assert_eq!(txt.txt_data().len(), 1);
            assert_eq!(&*txt.txt_data()[0], b"v=spf1 mx -all");
        }
        other => panic!("unexpected TXT rrset {other:?}"),
    }
}

#[test]
fn test_forward_failure_leaves_zone_untouched() {
    let zone = InMemoryZone::serving(&["example.com", "0.20.10.in-addr.arpa"])
        .refuse("www.example.com");

    let err = orchestrator(&zone)
        .add_record(
            SERVER,
            "example.com",
            "www",
            RecordType::A,
            "10.20.0.5",
            300,
            KEY_NAME,
            true,
            false,
        )
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error when requesting DNS server ns1.example.com: REFUSED"
    );
    assert_eq!(zone.sent().len(), 1);
    assert!(!zone.has_records_at("5.0.20.10.in-addr.arpa"));
}

#[test]
fn test_zone_not_served_is_notauth() {
    let zone = InMemoryZone::serving(&["example.org"]);

    let err = orchestrator(&zone)
        .add_cname_record(SERVER, "example.com", "alias", "www.example.com", 300, KEY_NAME)
        .unwrap_err();

    assert!(err.to_string().ends_with("NOTAUTH"));
}

#[test]
fn test_cname_replaces_existing_cname() {
    let zone = InMemoryZone::serving(&["example.com"]);
    let orchestrator = orchestrator(&zone);

    orchestrator
        .add_cname_record(SERVER, "example.com", "alias", "one.example.com", 300, KEY_NAME)
        .unwrap();
    let report = orchestrator
        .add_cname_record(SERVER, "example.com", "alias", "two.example.com", 300, KEY_NAME)
        .unwrap();

    assert_eq!(
        report.steps()[0].description,
        "CNAME alias.example.com points to two.example.com"
    );
    assert_eq!(
        zone.rrset("alias.example.com", RecordType::CNAME),
        vec![RData::CNAME(hickory_client::rr::rdata::CNAME(name("two.example.com")))]
    );
}

#[test]
fn test_delete_batch_isolates_failures() {
    let zone = InMemoryZone::serving(&["example.com"]).refuse("locked.example.com");
    let orchestrator = orchestrator(&zone);
    for (record_type, data) in [(RecordType::A, "10.0.0.7"), (RecordType::TXT, "remove me")] {
        orchestrator
            .add_record(
                SERVER,
                "example.com",
                "stale",
                record_type,
                data,
                300,
                KEY_NAME,
                false,
                false,
            )
            .unwrap();
    }
    assert!(zone.has_records_at("stale.example.com"));

    let report = orchestrator
        .delete_record(SERVER, &["locked.example.com", "stale.example.com"], KEY_NAME)
        .unwrap();

    assert_eq!(report.len(), 2);
    assert!(!report.steps()[0].success);
    assert_eq!(report.steps()[0].record.as_deref(), Some("locked.example.com"));
    assert!(report.steps()[1].success);
    assert!(!zone.has_records_at("stale.example.com"));

    let deletes: Vec<_> = zone
        .sent()
        .into_iter()
        .filter(|op| op.action() == UpdateAction::Delete)
        .collect();
    assert_eq!(deletes.len(), 2);
}

#[test]
fn test_delete_unknown_key_sends_nothing() {
    let zone = InMemoryZone::serving(&["example.com"]);

    let err = orchestrator(&zone)
        .delete_record(SERVER, &["a.example.com"], "missing-key")
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "The specified TSIG key 'missing-key' does not exist in the configured keyring"
    );
    assert!(zone.sent().is_empty());
}

#[test]
fn test_delete_unknown_server_sends_nothing() {
    let zone = InMemoryZone::serving(&["example.com"]);

    let err = orchestrator(&zone)
        .delete_record("ns9.example.com", &["a.example.com"], KEY_NAME)
        .unwrap_err();

    assert_eq!(err.reason(), "UnknownServer");
    assert!(zone.sent().is_empty());
}

mod live {
    //! Exercises a real nameserver; configured through environment variables.

    use std::env;
    use std::fs;

    use binder::orchestrator::UpdateOrchestrator;
    use binder::update::{parse_key_file, FixedPort, Keyring, TcpTransport};
    use hickory_client::rr::RecordType;

    #[test]
    #[ignore = "requires a BIND server accepting TSIG-signed updates"]
    fn test_add_and_delete_against_bind() {
        let server = env::var("BINDER_TEST_SERVER").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("BINDER_TEST_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(53);
        let zone = env::var("BINDER_TEST_ZONE").unwrap_or_else(|_| "example.com".to_string());
        let key_file = env::var("BINDER_TEST_KEY_FILE").expect("BINDER_TEST_KEY_FILE is not set");

        let credentials = parse_key_file(&fs::read_to_string(key_file).unwrap()).unwrap();
        let key_name = credentials[0].name.clone();
        let keys: Keyring = credentials.into_iter().collect();
        let orchestrator = UpdateOrchestrator::new(keys, FixedPort(port), TcpTransport::default());

        let report = orchestrator
            .add_record(
                &server,
                &zone,
                "binder-live-test",
                RecordType::TXT,
                "created by binder",
                60,
                &key_name,
                false,
                true,
            )
            .unwrap();
        assert!(report.all_succeeded());

        let report = orchestrator
            .delete_record(&server, &[format!("binder-live-test.{zone}")], &key_name)
            .unwrap();
        assert!(report.all_succeeded(), "{report:?}");
    }
}
