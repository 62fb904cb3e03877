use serde::Serialize;

use crate::document::{ComposeDocument, NetworksBlock, ServicesBlock};

#[derive(Debug, thiserror::Error)]
#[error("failed to serialize `{block}` block")]
pub struct YamlError {
    pub block: &'static str,
    pub source: serde_yaml::Error,
}

/// Render the document as docker-compose YAML.
///
/// `version`, `services` and `networks` are emitted as separate top-level
/// blocks separated by a blank line; `networks` only when it was retained.
pub fn to_yaml(document: &ComposeDocument) -> Result<String, YamlError> {
    let services = block("services", &ServicesBlock(&document.services))?;
    let mut blocks = vec![
        block("version", &document.version)?,
        quote_restart_no(services),
    ];
    if let Some(network) = &document.shared_network {
        blocks.push(block("networks", &NetworksBlock(network))?);
    }
    Ok(blocks.join("\n"))
}

fn block<T: Serialize>(key: &'static str, value: &T) -> Result<String, YamlError> {
    let wrap = |source: serde_yaml::Error| YamlError { block: key, source };
    let mut mapping = serde_yaml::Mapping::new();
    mapping.insert(key.into(), serde_yaml::to_value(value).map_err(wrap)?);
    serde_yaml::to_string(&mapping).map_err(wrap)
}

/// YAML 1.1 readers (docker compose among them) take a bare `no` as `false`.
/// serde_yaml only quotes YAML 1.2 ambiguities, so the policy is quoted here.
fn quote_restart_no(services: String) -> String {
    const BARE: &str = "restart: no";
    if !services.contains(BARE) {
        return services;
    }
    let mut out = String::with_capacity(services.len() + 2);
    for line in services.split_inclusive('\n') {
        let body = line.trim_end_matches('\n');
        let field = body.trim_start();
        if field == BARE {
            out.push_str(&body[..body.len() - field.len()]);
            out.push_str("restart: 'no'");
            out.push_str(&line[body.len()..]);
        } else {
            out.push_str(line);
        }
    }
    out
}
