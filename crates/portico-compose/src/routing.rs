use portico_core::{ProxyConfig, PublicUrl, ServiceDescriptor};

/// How a public service is exposed through Traefik.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteShape {
    /// Mounted under a path prefix of a host whose TLS and redirects are
    /// handled elsewhere. The prefix is stripped before forwarding.
    PathScoped,
    /// Owns the whole host: gets its own certificate and an HTTP→HTTPS
    /// redirect router.
    HostScoped,
}

impl RouteShape {
    pub fn of(url: &PublicUrl) -> Self {
        if url.has_prefix() {
            RouteShape::PathScoped
        } else {
            RouteShape::HostScoped
        }
    }
}

/// Generates Traefik docker labels for services with a `public` URL.
pub struct RoutingLabels<'a> {
    proxy: &'a ProxyConfig,
}

impl<'a> RoutingLabels<'a> {
    pub fn new(proxy: &'a ProxyConfig) -> Self {
        Self { proxy }
    }

    /// Attach routing to a service in place.
    ///
    /// Public services join the proxy network and get the router labels
    /// appended after their own labels. Private services lose all labels.
    pub fn apply(&self, service: &mut ServiceDescriptor) {
        if !service.is_public() {
            if !service.labels.is_empty() {
                tracing::debug!(
                    service = %service.name,
                    dropped = service.labels.len(),
                    "service has no public url, dropping labels"
                );
            }
            service.labels.clear();
            return;
        }

        service.networks.push(self.proxy.network.clone());
        let labels = self.labels(&service.name, &service.url);
        tracing::debug!(
            service = %service.name,
            shape = ?RouteShape::of(&service.url),
            labels = labels.len(),
            "generated routing labels"
        );
        service.labels.extend(labels);
    }

    /// Namespaced labels routing `url` to the service `name`.
    pub fn labels(&self, name: &str, url: &PublicUrl) -> Vec<String> {
        let secure = &self.proxy.secure_entrypoint;
        let mut labels = vec!["enable=true".to_owned()];

        if url.expose != 0 {
            labels.push(format!(
                "http.services.{name}.loadbalancer.server.port={}",
                url.expose
            ));
        }

        let rule = rule(url);
        labels.push(format!("http.routers.{name}.rule={rule}"));
        labels.push(format!("http.routers.{name}.entrypoints={secure}"));
        labels.push(format!("http.routers.{name}.tls=true"));

        match RouteShape::of(url) {
            RouteShape::PathScoped => {
                let prefix = &url.prefix;
                labels.push(format!(
                    "http.middlewares.{name}-pathfix.stripprefix.prefixes={prefix}"
                ));
                labels.push(format!(
                    "http.routers.{name}.middlewares={name}-pathfix@docker"
                ));
            }
            RouteShape::HostScoped => {
                let plain = &self.proxy.plain_entrypoint;
                let resolver = &self.proxy.cert_resolver;
                labels.push(format!(
                    "http.middlewares.{name}-https.redirectscheme.scheme=https"
                ));
                labels.push(format!("http.routers.{name}-http.entrypoints={plain}"));
                labels.push(format!("http.routers.{name}-http.rule={rule}"));
                labels.push(format!(
                    "http.routers.{name}-http.middlewares={name}-https@docker"
                ));
                labels.push(format!("http.routers.{name}.tls.certresolver={resolver}"));
            }
        }

        let namespace = &self.proxy.label_namespace;
        labels
            .into_iter()
            .map(|label| format!("{namespace}.{label}"))
            .collect()
    }
}

fn rule(url: &PublicUrl) -> String {
    let host = format!("Host(`{}`)", url.host);
    if url.has_prefix() {
        format!("{host} && PathPrefix(`{}`)", url.prefix)
    } else {
        host
    }
}
