use std::time::Duration;

use rquest::Client;
use rquest_util::EmulationOption;

use super::identity::Identity;
use crate::error::Result;

/// Build an rquest client whose TLS handshake matches the identity's
/// fingerprint. Built per attempt so every retry starts a fresh TLS
/// session; nothing about a blocked identity survives into the next one.
pub(crate) fn build_client(identity: &Identity, timeout: Duration) -> Result<Client> {
    let emulation = EmulationOption::builder()
        .emulation(identity.emulation.clone())
        .emulation_os(identity.os.emulation_os())
        .build();

    let client = Client::builder()
        .emulation(emulation)
        .timeout(timeout)
        .build()?;
    Ok(client)
}
