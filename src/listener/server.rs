/*
 * Copyright 2023 Google LLC
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use crate::{
    listener::{Error, InboundListenerConfig, ListenerUpdate},
    proto::envoy::config::{
        core::v3::{address, socket_address::PortSpecifier},
        listener::v3::Listener,
    },
};

/// Validates a listener accepting inbound connections.
pub(crate) fn process(listener: Listener) -> Result<ListenerUpdate, Error> {
    if !listener.listener_filters.is_empty() {
        return Err(Error::UnsupportedField {
            field: "listener_filters",
            reason: format!("contains {} entries", listener.listener_filters.len()),
        });
    }

    if listener.use_original_dst == Some(true) {
        return Err(Error::UnsupportedField {
            field: "use_original_dst",
            reason: "is present and set to true".into(),
        });
    }

    let Some(address) = listener.address else {
        return Err(Error::MissingAddress {
            listener: listener.name,
        });
    };

    let Some(address::Address::SocketAddress(socket)) = address.address else {
        return Err(Error::MissingSocketAddress {
            listener: listener.name,
        });
    };

    let port = match socket.port_specifier {
        Some(PortSpecifier::PortValue(port)) => port,
        Some(PortSpecifier::NamedPort(_)) | None => 0,
    };

    Ok(ListenerUpdate {
        inbound_listener_config: Some(InboundListenerConfig {
            address: socket.address,
            port: port.to_string(),
            filter_chains: None,
        }),
        ..<_>::default()
    })
}
