use std::path::PathBuf;

use portico_compose::{Destination, DocumentAssembler, yaml};
use portico_core::{Error, PorticoConfig, ServicesFile};
use portico_doppler::DopplerClient;

pub struct GenerateArgs {
    pub source: PathBuf,
    pub output: Destination,
    pub config: Option<PathBuf>,
    pub force: bool,
}

/// What a successful run did.
#[derive(Debug, PartialEq, Eq)]
pub enum Generated {
    Written,
    UpToDate,
}

/// Generate the compose file from the services file.
///
/// Nothing is written unless every service renders.
pub async fn generate(args: &GenerateArgs) -> anyhow::Result<Generated> {
    if !args.source.exists() {
        return Err(Error::SourceNotFound {
            path: args.source.clone(),
        }
        .into());
    }

    if !args.force && args.output.is_up_to_date(&args.source)? {
        tracing::debug!(output = %args.output, "output newer than source, skipping");
        return Ok(Generated::UpToDate);
    }

    let config = match &args.config {
        Some(path) => PorticoConfig::load_file(path)?,
        None => PorticoConfig::load(source_dir(&args.source))?,
    };
    let services = ServicesFile::load(&args.source)?;

    let secrets = DopplerClient::new(&config.secrets);
    let document = DocumentAssembler::new(&config, &secrets)
        .assemble_file(&services)
        .await?;

    let rendered = yaml::to_yaml(&document)?;
    args.output.write(&rendered)?;
    Ok(Generated::Written)
}

fn source_dir(source: &std::path::Path) -> &std::path::Path {
    source.parent().unwrap_or(std::path::Path::new("."))
}
