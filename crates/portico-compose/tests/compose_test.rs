use portico_compose::document::WATCHTOWER_DISABLE_LABEL;
use portico_compose::output::Destination;
use portico_compose::yaml::to_yaml;
use portico_compose::{ComposeDocument, DocumentAssembler};
use portico_core::{
    Error, PorticoConfig, RestartPolicy, SecretsSource, ServiceDescriptor, ServicesFile,
    StaticSecrets,
};
use tempfile::TempDir;

struct FailingSecrets;

impl SecretsSource for FailingSecrets {
    async fn fetch_secrets(&self) -> portico_core::Result<Vec<String>> {
        Err(Error::SecretsRetrievalFailed {
            source: "doppler exited with status 1".into(),
        })
    }
}

fn services(src: &str) -> ServicesFile {
    ServicesFile::from_table(toml::from_str(src).unwrap()).unwrap()
}

async fn assemble(src: &str) -> portico_core::Result<ComposeDocument> {
    let config = PorticoConfig::default();
    let secrets = StaticSecrets::default();
    DocumentAssembler::new(&config, &secrets)
        .assemble_file(&services(src))
        .await
}

fn yaml_value(document: &ComposeDocument) -> serde_yaml::Value {
    serde_yaml::from_str(&to_yaml(document).unwrap()).unwrap()
}

// ── End-to-end ──

#[tokio::test]
async fn public_service_end_to_end() {
    let doc = assemble(
        r#"
[app]
image = "ghcr.io/acme/app:latest"
public = "app.test@80"
"#,
    )
    .await
    .unwrap();

    let app = doc.service("app").unwrap();
    assert_eq!(app.networks, vec!["traefik"]);
    assert!(app.labels.contains(&"traefik.enable=true".to_owned()));
    assert!(
        app.labels
            .contains(&"traefik.http.services.app.loadbalancer.server.port=80".to_owned())
    );
    assert!(
        app.labels
            .contains(&"traefik.http.routers.app.rule=Host(`app.test`)".to_owned())
    );
    assert!(
        app.labels
            .contains(&"traefik.http.routers.app-http.rule=Host(`app.test`)".to_owned())
    );
    assert_eq!(app.labels.last().unwrap(), WATCHTOWER_DISABLE_LABEL);
    assert_eq!(doc.shared_network.as_deref(), Some("traefik"));

    let yaml = yaml_value(&doc);
    assert_eq!(yaml["version"].as_str(), Some("3.8"));
    assert_eq!(yaml["networks"]["traefik"]["external"].as_bool(), Some(true));
    assert_eq!(
        yaml["services"]["app"]["image"].as_str(),
        Some("ghcr.io/acme/app:latest")
    );
    assert_eq!(yaml["services"]["app"]["restart"].as_str(), Some("always"));
}

#[tokio::test]
async fn path_scoped_service_has_single_router() {
    let doc = assemble(
        r#"
[api]
public = "app.test/api"
watchtower = true
"#,
    )
    .await
    .unwrap();

    let api = doc.service("api").unwrap();
    assert!(api.labels.iter().all(|l| !l.contains("api-http")));
    assert!(api.labels.iter().all(|l| !l.contains("certresolver")));
    assert!(
        api.labels
            .contains(&"traefik.http.routers.api.middlewares=api-pathfix@docker".to_owned())
    );
    assert!(api.watchtower);
}

#[tokio::test]
async fn host_scoped_certresolver_only_on_tls_router() {
    let doc = assemble("[web]\npublic = \"web.test\"\n").await.unwrap();

    let resolver: Vec<&String> = doc
        .service("web")
        .unwrap()
        .labels
        .iter()
        .filter(|l| l.contains("certresolver"))
        .collect();
    assert_eq!(
        resolver,
        vec!["traefik.http.routers.web.tls.certresolver=default"]
    );
}

// ── Field rendering ──

#[tokio::test]
async fn falsy_fields_are_omitted() {
    let doc = assemble(
        r#"
[worker]
image = "busybox"
watchtower = true
"#,
    )
    .await
    .unwrap();

    let yaml = yaml_value(&doc);
    let worker = yaml["services"]["worker"].as_mapping().unwrap();
    let keys: Vec<&str> = worker.keys().filter_map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["image", "restart", "watchtower"]);
}

#[tokio::test]
async fn private_service_labels_are_dropped() {
    let doc = assemble(
        r#"
[db]
image = "postgres:16"
labels = ["com.example.team=data"]
restart = "unless-stopped"
"#,
    )
    .await
    .unwrap();

    let db = doc.service("db").unwrap();
    assert_eq!(db.labels, vec![WATCHTOWER_DISABLE_LABEL]);
    assert!(db.networks.is_empty());
    assert_eq!(db.restart, RestartPolicy::UnlessStopped);
}

#[tokio::test]
async fn public_service_keeps_user_labels_and_networks_first() {
    let doc = assemble(
        r#"
[app]
public = "app.test"
labels = { com.example.team = "web" }
networks = "backend"
"#,
    )
    .await
    .unwrap();

    let app = doc.service("app").unwrap();
    assert_eq!(app.labels[0], "com.example.team=web");
    assert_eq!(app.labels[1], "traefik.enable=true");
    assert_eq!(app.networks, vec!["backend", "traefik"]);
}

#[tokio::test]
async fn rendered_fields_follow_compose_order() {
    let doc = assemble(
        r#"
[app]
image = "nginx"
public = "app.test"
ports = ["8080:80"]
volumes = ["./html:/usr/share/nginx/html"]
envs = ["TZ=UTC"]
"#,
    )
    .await
    .unwrap();

    let yaml = yaml_value(&doc);
    let app = yaml["services"]["app"].as_mapping().unwrap();
    let keys: Vec<&str> = app.keys().filter_map(|k| k.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "image",
            "labels",
            "volumes",
            "ports",
            "restart",
            "networks",
            "environment"
        ]
    );
}

// ── Secrets ──

#[tokio::test]
async fn doppler_secrets_precede_envs() {
    let config = PorticoConfig::default();
    let secrets = StaticSecrets(vec!["API_KEY".to_owned(), "DB_URL".to_owned()]);
    let file = services(
        r#"
[app]
doppler = true
envs = ["TZ=UTC"]
"#,
    );

    let doc = DocumentAssembler::new(&config, &secrets)
        .assemble_file(&file)
        .await
        .unwrap();

    let app = doc.service("app").unwrap();
    assert_eq!(app.environment, vec!["API_KEY", "DB_URL", "TZ=UTC"]);
}

#[tokio::test]
async fn secrets_failure_aborts_with_service_name() {
    let config = PorticoConfig::default();
    let file = services(
        r#"
[plain]
image = "busybox"

[app]
doppler = true
"#,
    );

    let err = DocumentAssembler::new(&config, &FailingSecrets)
        .assemble_file(&file)
        .await
        .unwrap_err();

    assert!(err.is_domain());
    assert!(matches!(err, Error::Service { ref service, .. } if service == "app"));
}

#[tokio::test]
async fn services_without_doppler_never_query_secrets() {
    let config = PorticoConfig::default();
    let doc = DocumentAssembler::new(&config, &FailingSecrets)
        .assemble_file(&services("[web]\nimage = \"nginx\"\n"))
        .await
        .unwrap();
    assert!(doc.service("web").unwrap().environment.is_empty());
}

// ── Errors ──

#[tokio::test]
async fn invalid_restart_names_the_service() {
    let err = assemble("[web]\nrestart = \"maybe\"\n").await.unwrap_err();

    assert!(err.is_domain());
    assert!(matches!(err, Error::Service { ref service, .. } if service == "web"));
    let source = std::error::Error::source(&err).unwrap().to_string();
    assert!(source.contains("maybe"), "got: {source}");
}

// ── Shared network aggregation ──

#[tokio::test]
async fn network_block_dropped_without_public_services() {
    let doc = assemble("[db]\nimage = \"postgres\"\n").await.unwrap();
    assert!(doc.shared_network.is_none());

    let yaml = to_yaml(&doc).unwrap();
    assert!(!yaml.contains("networks:"), "got: {yaml}");
}

#[tokio::test]
async fn network_block_kept_when_first_service_is_public() {
    let doc = assemble(
        r#"
[app]
public = "app.test"

[db]
image = "postgres"
"#,
    )
    .await
    .unwrap();
    assert_eq!(doc.shared_network.as_deref(), Some("traefik"));
}

#[tokio::test]
async fn network_block_not_restored_after_private_first_service() {
    let doc = assemble(
        r#"
[db]
image = "postgres"

[app]
public = "app.test"
"#,
    )
    .await
    .unwrap();

    assert_eq!(doc.service("app").unwrap().networks, vec!["traefik"]);
    assert!(doc.shared_network.is_none());
}

#[tokio::test]
async fn empty_document_keeps_network_block() {
    let doc = assemble("").await.unwrap();
    assert!(doc.services.is_empty());
    assert_eq!(doc.shared_network.as_deref(), Some("traefik"));
}

#[tokio::test]
async fn prebuilt_descriptors_render_in_given_order() {
    let config = PorticoConfig::default();
    let secrets = StaticSecrets::default();
    let descriptors = vec![
        ServiceDescriptor {
            name: "zeta".to_owned(),
            ..Default::default()
        },
        ServiceDescriptor {
            name: "alpha".to_owned(),
            ..Default::default()
        },
    ];

    let doc = DocumentAssembler::new(&config, &secrets)
        .assemble(descriptors)
        .await
        .unwrap();
    let names: Vec<&str> = doc.services.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha"]);
}

// ── YAML layout ──

#[tokio::test]
async fn yaml_blocks_are_separated_and_ordered() {
    let doc = assemble("[app]\npublic = \"app.test\"\n").await.unwrap();
    let yaml = to_yaml(&doc).unwrap();

    let version = yaml.find("version:").unwrap();
    let services = yaml.find("\nservices:").unwrap();
    let networks = yaml.find("\nnetworks:").unwrap();
    assert!(version < services && services < networks);
    assert!(yaml.contains("\n\nservices:"), "got: {yaml}");
    assert!(yaml.contains("\n\nnetworks:"), "got: {yaml}");
}

#[tokio::test]
async fn restart_no_is_quoted_for_yaml_1_1_readers() {
    let doc = assemble("[worker]\nimage = \"busybox\"\nrestart = \"no\"\nwatchtower = true\n")
        .await
        .unwrap();
    assert_eq!(doc.service("worker").unwrap().restart, RestartPolicy::No);

    let yaml = to_yaml(&doc).unwrap();
    assert!(yaml.contains("    restart: 'no'\n"), "got: {yaml}");
    assert!(!yaml.contains("restart: no\n"), "got: {yaml}");
    assert_eq!(yaml_value(&doc)["services"]["worker"]["restart"].as_str(), Some("no"));
}

// ── Output destination ──

#[test]
fn dash_means_stdout() {
    assert_eq!(Destination::parse("-"), Destination::Stdout);
    assert_eq!(
        Destination::parse("compose.yml"),
        Destination::File("compose.yml".into())
    );
}

#[test]
fn missing_output_is_not_up_to_date() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("services.toml");
    std::fs::write(&source, "").unwrap();

    let dest = Destination::File(tmp.path().join("docker-compose.yml"));
    assert!(!dest.is_up_to_date(&source).unwrap());
    assert!(!Destination::Stdout.is_up_to_date(&source).unwrap());
}

#[test]
fn newer_output_is_up_to_date() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("services.toml");
    let output = tmp.path().join("docker-compose.yml");
    std::fs::write(&source, "").unwrap();
    std::fs::write(&output, "").unwrap();

    let past = std::time::SystemTime::now() - std::time::Duration::from_secs(3600);
    std::fs::File::options()
        .write(true)
        .open(&source)
        .unwrap()
        .set_modified(past)
        .unwrap();

    assert!(Destination::File(output).is_up_to_date(&source).unwrap());
}

#[test]
fn write_creates_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("docker-compose.yml");

    Destination::File(output.clone())
        .write("version: '3.8'\n")
        .unwrap();
    assert_eq!(std::fs::read_to_string(output).unwrap(), "version: '3.8'\n");
}
