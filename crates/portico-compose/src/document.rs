use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use portico_core::{PorticoConfig, RestartPolicy, SecretsSource, ServiceDescriptor, ServicesFile};

use crate::routing::RoutingLabels;
use crate::secrets::SecretsInjector;

/// Label that opts a container out of watchtower auto-updates.
pub const WATCHTOWER_DISABLE_LABEL: &str = "com.centurylinklabs.watchtower.enable=false";

/// One rendered entry of the `services:` block. Empty fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposeService {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    pub restart: RestartPolicy,
    #[serde(skip_serializing_if = "is_false")]
    pub watchtower: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<String>,
}

/// A complete docker-compose document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeDocument {
    pub version: String,
    /// Services in source order.
    pub services: Vec<(String, ComposeService)>,
    /// Name of the external proxy network, when the `networks:` block is kept.
    pub shared_network: Option<String>,
}

impl ComposeDocument {
    pub fn service(&self, name: &str) -> Option<&ComposeService> {
        self.services
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, svc)| svc)
    }
}

/// Serializes as `{ name: service, ... }` in source order.
pub struct ServicesBlock<'a>(pub &'a [(String, ComposeService)]);

impl Serialize for ServicesBlock<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, service) in self.0 {
            map.serialize_entry(name, service)?;
        }
        map.end()
    }
}

/// Serializes as `{ network: { external: true } }`.
pub struct NetworksBlock<'a>(pub &'a str);

#[derive(Serialize)]
struct ExternalNetwork {
    external: bool,
}

impl Serialize for NetworksBlock<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0, &ExternalNetwork { external: true })?;
        map.end()
    }
}

/// Tracks whether the top-level `networks:` block survives.
///
/// The block starts present. `needed` latches once any service joins the
/// proxy network; while it is unset, every processed service clears the
/// block, and a cleared block is never restored. In effect the block is kept
/// only when the first service is public.
#[derive(Debug, Clone, Copy)]
pub struct SharedNetworkTracker {
    needed: bool,
    retained: bool,
}

impl Default for SharedNetworkTracker {
    fn default() -> Self {
        Self {
            needed: false,
            retained: true,
        }
    }
}

impl SharedNetworkTracker {
    pub fn observe(&mut self, networks: &[String], shared: &str) {
        if networks.iter().any(|n| n == shared) {
            self.needed = true;
        }
        if !self.needed {
            self.retained = false;
        }
    }

    pub fn retained(&self) -> bool {
        self.retained
    }
}

/// Folds service descriptors into a [`ComposeDocument`].
pub struct DocumentAssembler<'a, S: SecretsSource> {
    config: &'a PorticoConfig,
    routing: RoutingLabels<'a>,
    secrets: SecretsInjector<'a, S>,
}

impl<'a, S: SecretsSource> DocumentAssembler<'a, S> {
    pub fn new(config: &'a PorticoConfig, secrets: &'a S) -> Self {
        Self {
            config,
            routing: RoutingLabels::new(&config.proxy),
            secrets: SecretsInjector::new(secrets),
        }
    }

    /// Build and render every entry of a services file, in order.
    ///
    /// Stops at the first failing service; errors name that service.
    pub async fn assemble_file(
        &self,
        file: &ServicesFile,
    ) -> portico_core::Result<ComposeDocument> {
        let mut builder = self.begin();
        for (name, entry) in &file.entries {
            let descriptor =
                ServiceDescriptor::build(name, entry).map_err(|e| e.for_service(name))?;
            builder.push(self, descriptor).await?;
        }
        Ok(builder.finish())
    }

    /// Render already built descriptors, in order.
    pub async fn assemble(
        &self,
        services: Vec<ServiceDescriptor>,
    ) -> portico_core::Result<ComposeDocument> {
        let mut builder = self.begin();
        for descriptor in services {
            builder.push(self, descriptor).await?;
        }
        Ok(builder.finish())
    }

    /// Render one descriptor into its compose form.
    pub async fn render(
        &self,
        mut service: ServiceDescriptor,
    ) -> portico_core::Result<ComposeService> {
        self.routing.apply(&mut service);

        let mut environment = self.secrets.environment(&service).await?.unwrap_or_default();

        if !service.watchtower {
            service.labels.push(WATCHTOWER_DISABLE_LABEL.to_owned());
        }

        environment.extend(service.envs);

        Ok(ComposeService {
            image: service.image,
            labels: service.labels,
            volumes: service.volumes,
            ports: service.ports,
            restart: service.restart,
            watchtower: service.watchtower,
            networks: service.networks,
            environment,
        })
    }

    fn begin(&self) -> DocumentBuilder {
        DocumentBuilder {
            version: self.config.compose.version.clone(),
            network: self.config.proxy.network.clone(),
            services: Vec::new(),
            tracker: SharedNetworkTracker::default(),
        }
    }
}

struct DocumentBuilder {
    version: String,
    network: String,
    services: Vec<(String, ComposeService)>,
    tracker: SharedNetworkTracker,
}

impl DocumentBuilder {
    async fn push<S: SecretsSource>(
        &mut self,
        assembler: &DocumentAssembler<'_, S>,
        descriptor: ServiceDescriptor,
    ) -> portico_core::Result<()> {
        let name = descriptor.name.clone();
        let rendered = assembler
            .render(descriptor)
            .await
            .map_err(|e| e.for_service(&name))?;
        self.tracker.observe(&rendered.networks, &self.network);
        self.services.push((name, rendered));
        Ok(())
    }

    fn finish(self) -> ComposeDocument {
        tracing::info!(
            services = self.services.len(),
            shared_network = self.tracker.retained(),
            "assembled compose document"
        );
        ComposeDocument {
            version: self.version,
            services: self.services,
            shared_network: self.tracker.retained().then_some(self.network),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}
