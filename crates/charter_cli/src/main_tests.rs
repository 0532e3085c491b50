//! Tests for argument parsing and exit-code selection.

use super::*;

#[test]
fn parse_key_val_splits_on_the_first_equals() {
    assert_eq!(
        parse_key_val("replicas=3"),
        Ok(("replicas".to_string(), "3".to_string()))
    );
    assert_eq!(
        parse_key_val("flags=a=b"),
        Ok(("flags".to_string(), "a=b".to_string()))
    );
}

#[test]
fn parse_key_val_rejects_input_without_equals() {
    assert!(parse_key_val("replicas").is_err());
}

#[test]
fn render_arguments_parse_with_repeated_overlays_and_sets() {
    let cli = Cli::try_parse_from([
        "charter",
        "render",
        "deploy/api",
        "-f",
        "base.yaml",
        "-f",
        "production.yaml",
        "--release",
        "prod",
        "--namespace",
        "payments",
        "--set",
        "replicas=3",
        "--set",
        "type=service",
        "-o",
        "out.nomad",
    ])
    .unwrap();

    match cli.command {
        Commands::Render(args) => {
            assert_eq!(args.build.project_dir.to_str(), Some("deploy/api"));
            assert_eq!(args.build.overlays.len(), 2);
            assert_eq!(args.build.release.as_deref(), Some("prod"));
            assert_eq!(args.build.namespace.as_deref(), Some("payments"));
            assert_eq!(
                args.build.set,
                vec![
                    ("replicas".to_string(), "3".to_string()),
                    ("type".to_string(), "service".to_string()),
                ]
            );
            assert_eq!(args.output.map(|p| p.to_str().unwrap().to_string()), Some("out.nomad".to_string()));
        }
        _ => panic!("expected the render command"),
    }
}

#[test]
fn deploy_arguments_default_the_address() {
    let cli = Cli::try_parse_from(["charter", "deploy", "deploy/api"]).unwrap();
    match cli.command {
        Commands::Deploy(args) => {
            assert_eq!(args.address, "http://127.0.0.1:4646");
            assert!(!args.create_namespace);
        }
        _ => panic!("expected the deploy command"),
    }
}

#[test]
fn unresolved_references_select_the_dedicated_exit_code() {
    let error = Error::Build(BuildError::MissingReferences {
        names: vec!["PRISM_HOST".to_string()],
    });
    assert_eq!(report(&error), 2);

    let wrapped = Error::Deploy(DeployError::Build(BuildError::MissingReferences {
        names: vec!["PRISM_HOST".to_string()],
    }));
    assert_eq!(report(&wrapped), 2);
}

#[test]
fn other_failures_exit_with_one() {
    let error = Error::Deploy(DeployError::Remote {
        message: "connection refused".to_string(),
    });
    assert_eq!(report(&error), 1);
}
