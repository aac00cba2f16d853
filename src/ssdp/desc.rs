/*!
The `DESC.<vendor>` compound header value: a colon-delimited keyed bag,
`:name:<displayName>:devices:<n>:services:<m>:puuid:<uuid>:`.

Key presence, not key order, distinguishes entity kind: a root carries `devices`
and `services`, an embedded device carries `services` and `puuid`, a service
carries only `puuid`.
*/

/// Recognized keys within a `DESC` value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Key {
    /// `:name:<displayName>:`
    Name,
    /// `:devices:<n>:`
    Devices,
    /// `:services:<m>:`
    Services,
    /// `:puuid:<uuid>:`
    Puuid,
}

impl Key {
    fn token(self) -> &'static str {
        match self {
            Key::Name => "name",
            Key::Devices => "devices",
            Key::Services => "services",
            Key::Puuid => "puuid",
        }
    }
}

/// The value bound to `key` within `desc`, if present: everything between
/// `:<key>:` and the next `:`.
pub fn field(desc: &str, key: &str) -> Option<&str> {
    let needle = format!(":{}:", key);
    let start = desc.find(&needle)? + needle.len();
    let rest = &desc[start..];
    let end = rest.find(':').unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Convenience wrapper over [`field`] for the [`Key`] enum.
pub fn field_of(desc: &str, key: Key) -> Option<&str> {
    field(desc, key.token())
}

/// Which kind of node a `DESC` value describes, by key presence.
///
/// Per the malformed-input invariant: if both `puuid` and `devices` are present,
/// the value is treated as an embedded device and `devices` is ignored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Shape {
    /// Has `devices` and `services`, no `puuid`.
    Root,
    /// Has `services` and `puuid`.
    Device,
    /// Has only `puuid`.
    Service,
}

/// Classify a `DESC` value by which of `devices`/`services`/`puuid` it carries.
/// Returns `None` if none of the three distinguishing keys is present.
pub fn shape(desc: &str) -> Option<Shape> {
    let has_puuid = field_of(desc, Key::Puuid).is_some();
    let has_devices = field_of(desc, Key::Devices).is_some();
    let has_services = field_of(desc, Key::Services).is_some();

    if has_puuid && (has_devices || has_services) {
        Some(Shape::Device)
    } else if has_puuid {
        Some(Shape::Service)
    } else if has_devices || has_services {
        Some(Shape::Root)
    } else {
        None
    }
}

/// Format a root's `DESC` value.
pub fn format_root(display_name: &str, num_devices: usize, num_services: usize) -> String {
    format!(
        ":name:{}:devices:{}:services:{}:",
        display_name, num_devices, num_services
    )
}

/// Format an embedded device's `DESC` value.
pub fn format_device(display_name: &str, num_services: usize, parent_uuid: &str) -> String {
    format!(
        ":name:{}:services:{}:puuid:{}:",
        display_name, num_services, parent_uuid
    )
}

/// Format a service's `DESC` value.
pub fn format_service(display_name: &str, parent_uuid: &str) -> String {
    format!(":name:{}:puuid:{}:", display_name, parent_uuid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_root_fields() {
        let desc = format_root("R", 1, 1);
        assert_eq!(field(&desc, "name"), Some("R"));
        assert_eq!(field(&desc, "devices"), Some("1"));
        assert_eq!(field(&desc, "services"), Some("1"));
        assert_eq!(field(&desc, "puuid"), None);
        assert_eq!(shape(&desc), Some(Shape::Root));
    }

    #[test]
    fn reads_device_fields() {
        let desc = format_device("Clock", 1, "R");
        assert_eq!(field(&desc, "puuid"), Some("R"));
        assert_eq!(field(&desc, "devices"), None);
        assert_eq!(shape(&desc), Some(Shape::Device));
    }

    #[test]
    fn malformed_puuid_and_devices_is_treated_as_device() {
        let desc = ":name:Weird:devices:2:puuid:R:";
        assert_eq!(shape(desc), Some(Shape::Device));
    }

    #[test]
    fn service_has_only_puuid() {
        let desc = format_service("Time", "D1");
        assert_eq!(field(&desc, "devices"), None);
        assert_eq!(field(&desc, "services"), None);
        assert_eq!(shape(&desc), Some(Shape::Service));
    }
}
