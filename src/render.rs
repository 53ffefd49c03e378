//! Plain-text output for the config and manager commands.

use std::fmt::Write;

use crate::redfish::ManagerSnapshot;
use crate::registry::Registry;

const UNKNOWN: &str = "unknown";

/// Lists configured manager names, with connection details when `all` is set.
///
/// Names are sorted for display; the registry itself keeps no order.
pub fn managers(registry: &Registry, all: bool) -> String {
    let mut entries: Vec<_> = registry.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut out = String::from("Managers configured :");
    for (name, record) in entries {
        let _ = write!(out, "\n{}", name);
        if all {
            let _ = write!(out, "\n\tUrl : {}", record.url);
            let _ = write!(out, "\n\tLogin : {}", record.login);
            let _ = write!(out, "\n\tPassword : {}", record.password);
        }
    }
    out
}

fn or_unknown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(UNKNOWN)
}

pub fn snapshot(name: &str, snapshot: &ManagerSnapshot) -> String {
    let service = &snapshot.service;
    let mut out = String::new();

    let _ = writeln!(out, "Redfish API version : {}", or_unknown(&service.redfish_version));
    let _ = writeln!(out, "Service : {}", or_unknown(&service.name));
    let _ = writeln!(out, "UUID : {}", or_unknown(&service.uuid));
    let _ = write!(out, "Managers of '{}' : {}", name, snapshot.managers.len());

    for manager in &snapshot.managers {
        let _ = write!(out, "\n\nManager id {}:", or_unknown(&manager.id));
        let _ = write!(out, "\n\tName : {}", or_unknown(&manager.name));
        let _ = write!(out, "\n\tType : {}", or_unknown(&manager.manager_type));
        let _ = write!(out, "\n\tModel : {}", or_unknown(&manager.model));
        let _ = write!(out, "\n\tFirmware version : {}", or_unknown(&manager.firmware_version));
        if let Some(uuid) = &manager.uuid {
            let _ = write!(out, "\n\tUUID : {}", uuid);
        }
        if let Some(status) = &manager.status {
            let _ = write!(
                out,
                "\n\tStatus : State {} / Health {}",
                or_unknown(&status.state),
                or_unknown(&status.health)
            );
        }
    }

    out
}
