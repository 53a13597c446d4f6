// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tests for update types and name helpers.

#[cfg(test)]
mod tests {
    use crate::update::types::*;
    use hickory_client::rr::RecordType;
    use std::str::FromStr;

    #[test]
    fn test_zone_fqdn_appends_root() {
        assert_eq!(zone_fqdn("example.com"), "example.com.");
        assert_eq!(zone_fqdn("example.com."), "example.com.");
        assert_eq!(zone_fqdn(" example.com "), "example.com.");
    }

    #[test]
    fn test_owner_fqdn() {
        assert_eq!(owner_fqdn("www", "example.com"), "www.example.com.");
        assert_eq!(owner_fqdn("@", "example.com."), "example.com.");
        assert_eq!(owner_fqdn("", "example.com"), "example.com.");
        assert_eq!(owner_fqdn("mail.other.org.", "example.com"), "mail.other.org.");
    }

    #[test]
    fn test_resource_record_any() {
        let record = ResourceRecord::any("www");

        assert_eq!(record.record_type, RecordType::ANY);
        assert!(record.rdata.is_empty());
        assert_eq!(record.fqdn("example.com"), "www.example.com.");
    }

    #[test]
    fn test_is_address_type() {
        assert!(is_address_type(RecordType::A));
        assert!(is_address_type(RecordType::AAAA));
        assert!(!is_address_type(RecordType::TXT));
        assert!(!is_address_type(RecordType::CNAME));
    }

    #[test]
    fn test_tsig_algorithm_round_trip_names() {
        for algorithm in [
            TsigAlgorithm::HmacMd5,
            TsigAlgorithm::HmacSha1,
            TsigAlgorithm::HmacSha224,
            TsigAlgorithm::HmacSha256,
            TsigAlgorithm::HmacSha384,
            TsigAlgorithm::HmacSha512,
        ] {
            assert_eq!(TsigAlgorithm::from_str(algorithm.as_str()), Ok(algorithm));
        }
    }

    #[test]
    fn test_tsig_algorithm_parsing_variants() {
        assert_eq!(
            TsigAlgorithm::from_str("HMAC-SHA512"),
            Ok(TsigAlgorithm::HmacSha512)
        );
        assert_eq!(
            TsigAlgorithm::from_str("hmac-md5.sig-alg.reg.int."),
            Ok(TsigAlgorithm::HmacMd5)
        );

        let err = TsigAlgorithm::from_str("hmac-sha3").unwrap_err();
        assert!(err.contains("Unsupported TSIG algorithm 'hmac-sha3'"));
    }

    #[test]
    fn test_tsig_algorithm_serde_names() {
        let json = serde_json::to_string(&TsigAlgorithm::HmacSha256).unwrap();
        assert_eq!(json, "\"hmac-sha256\"");

        let parsed: TsigAlgorithm = serde_json::from_str("\"hmac-sha384\"").unwrap();
        assert_eq!(parsed, TsigAlgorithm::HmacSha384);
    }

    #[test]
    fn test_credential_debug_redacts_secret() {
        let credential = TsigCredential {
            name: "update-key".to_string(),
            algorithm: TsigAlgorithm::HmacSha256,
            secret: "c2VjcmV0".to_string(),
        };

        let debug = format!("{credential:?}");
        assert!(debug.contains("update-key"));
        assert!(!debug.contains("c2VjcmV0"));
    }

    #[test]
    fn test_server_endpoint_display() {
        let endpoint = ServerEndpoint::new("ns1.example.com", 5353);
        assert_eq!(endpoint.to_string(), "ns1.example.com:5353");
    }

    #[test]
    fn test_update_action_display() {
        assert_eq!(UpdateAction::Add.to_string(), "ADD");
        assert_eq!(UpdateAction::Replace.to_string(), "REPLACE");
        assert_eq!(UpdateAction::Delete.to_string(), "DELETE");
    }
}
