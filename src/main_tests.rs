// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `main.rs` - command-line parsing and registry selection

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;
    use clap::Parser;
    use hickory_client::rr::RecordType;

    use crate::{server_registry, Cli, Command, OutputFormat};
    use binder::update::{ServerRegistry, ServerTable};

    #[test]
    fn test_add_accepts_lowercase_type() {
        let cli = Cli::try_parse_from([
            "binder", "add", "--server", "ns1.example.com", "--zone", "example.com", "--key",
            "update-key", "--name", "@", "--type", "txt", "--data", "v=spf1 mx -all",
        ])
        .unwrap();

        match cli.command {
            Command::Add {
                target,
                name,
                record_type,
                data,
                reverse,
                replace,
                ..
            } => {
                assert_eq!(target.zone, "example.com");
                assert_eq!(name, "@");
                assert_eq!(record_type, RecordType::TXT);
                assert_eq!(data, "v=spf1 mx -all");
                assert!(!reverse);
                assert!(!replace);
            }
            other => panic!("expected add, got {other:?}"),
        }
    }

    #[test]
    fn test_add_rejects_unknown_type() {
        let err = Cli::try_parse_from([
            "binder", "add", "--server", "ns1", "--zone", "example.com", "--key", "k", "--name",
            "www", "--type", "bogus", "--data", "x",
        ])
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_port_overrides_configured_servers() {
        let cli = Cli::try_parse_from([
            "binder", "delete", "--server", "ns9.example.com", "--key", "update-key", "--port",
            "5353", "old.example.com",
        ])
        .unwrap();
        assert_eq!(cli.global.port, Some(5353));

        let mut table = ServerTable::new();
        table.insert("ns9.example.com", 53);
        let endpoint = server_registry(cli.global.port, table)
            .lookup("ns9.example.com")
            .unwrap();

        assert_eq!(endpoint.port, 5353);
    }

    #[test]
    fn test_without_port_only_configured_servers_resolve() {
        let mut table = ServerTable::new();
        table.insert("ns1.example.com", 5300);
        let servers = server_registry(None, table);

        assert_eq!(servers.lookup("ns1.example.com").unwrap().port, 5300);
        assert!(servers.lookup("ns9.example.com").is_err());
    }

    #[test]
    fn test_delete_requires_a_record() {
        let err = Cli::try_parse_from(["binder", "delete", "--server", "ns1", "--key", "k"])
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_delete_collects_every_record() {
        let cli = Cli::try_parse_from([
            "binder", "--output", "json", "delete", "--server", "ns1", "--key", "k",
            "a.example.com", "b.example.com",
        ])
        .unwrap();

        assert_eq!(cli.global.output, OutputFormat::Json);
        match cli.command {
            Command::Delete { records, .. } => {
                assert_eq!(records, vec!["a.example.com", "b.example.com"]);
            }
            other => panic!("expected delete, got {other:?}"),
        }
    }
}
