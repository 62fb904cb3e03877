/// A parsed `public = "host[@port][/prefix]"` value.
///
/// `expose` is 0 when no port was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicUrl {
    pub host: String,
    pub prefix: String,
    pub expose: u16,
}

impl PublicUrl {
    /// Split the shorthand into host, path prefix and backend port.
    ///
    /// `@` is split off first (from the right), then the path prefix is split
    /// at the first `/`, on the host side for `host/prefix@port` or on the
    /// port side for `host@port/prefix`. A literal `@` inside the prefix is
    /// therefore not supported.
    pub fn parse(raw: &str) -> crate::Result<Self> {
        let mut url = Self::default();
        if raw.is_empty() {
            return Ok(url);
        }

        let (mut host, mut port) = match raw.rsplit_once('@') {
            Some((host, port)) => (host.trim(), Some(port.trim())),
            None => (raw.trim(), None),
        };

        if let Some((h, prefix)) = host.split_once('/') {
            host = h.trim();
            url.prefix = format!("/{}", prefix.trim());
        } else if let Some((p, prefix)) = port.and_then(|p| p.split_once('/')) {
            port = Some(p.trim());
            url.prefix = format!("/{}", prefix.trim());
        }

        url.host = host.to_owned();
        if let Some(port) = port {
            url.expose = parse_port(raw, port)?;
        }
        Ok(url)
    }

    pub fn has_prefix(&self) -> bool {
        !self.prefix.is_empty()
    }
}

fn parse_port(raw: &str, port: &str) -> crate::Result<u16> {
    let invalid = |reason: String| crate::Error::InvalidPublicUrl {
        value: raw.to_owned(),
        reason,
    };
    if port.is_empty() {
        return Err(invalid("missing port after `@`".to_owned()));
    }
    port.parse::<u16>()
        .map_err(|e| invalid(format!("port {port:?} is not valid: {e}")))
}
