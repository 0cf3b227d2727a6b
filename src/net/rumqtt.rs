//! MQTT transport backed by rumqttc
//!
//! Each connect launches a fresh synchronous client plus a pump thread that
//! drains the connection's event iterator and forwards what the session
//! cares about (CONNACK, loss) onto the daemon channel. The pump stops at
//! the first connection error instead of letting the client retry
//! internally: reconnect policy belongs to the session state machine.

use crate::config::BrokerConfig;
use crate::domain::{PacketId, Qos};
use crate::error::SessionError;
use crate::net::session::MqttTransport;
use crate::services::scheduler::Event;

use rumqttc::{Client, ConnectReturnCode, Event as ClientEvent, Incoming, MqttOptions, QoS};

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Outgoing request queue depth handed to the client
const REQUEST_CAPACITY: usize = 10;

/// Messaging transport over a rumqttc synchronous client
pub struct RumqttTransport {
    options: MqttOptions,
    events: mpsc::Sender<Event>,
    client: Option<Client>,
    next_pkid: u16,
}

impl RumqttTransport {
    /// Create a transport for the configured broker
    pub fn new(broker: &BrokerConfig, events: mpsc::Sender<Event>) -> Self {
        let mut options = MqttOptions::new(&broker.client_id, &broker.host, broker.port);
        options.set_keep_alive(Duration::from_secs(broker.keepalive_secs));
        if let (Some(user), Some(pass)) = (&broker.username, &broker.password) {
            options.set_credentials(user, pass);
        }

        Self {
            options,
            events,
            client: None,
            next_pkid: 0,
        }
    }
}

impl MqttTransport for RumqttTransport {
    fn connect(&mut self) -> Result<(), SessionError> {
        let (client, mut connection) = Client::new(self.options.clone(), REQUEST_CAPACITY);
        let tx = self.events.clone();

        thread::Builder::new()
            .name("tempmon-mqtt".to_string())
            .spawn(move || {
                for notification in connection.iter() {
                    match notification {
                        Ok(ClientEvent::Incoming(Incoming::ConnAck(ack))) => {
                            if ack.code == ConnectReturnCode::Success {
                                if tx.send(Event::SessionUp).is_err() {
                                    break;
                                }
                            } else {
                                let _ = tx.send(Event::SessionDown(format!(
                                    "broker refused connection: {:?}",
                                    ack.code
                                )));
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(e) => {
                            let _ = tx.send(Event::SessionDown(e.to_string()));
                            break;
                        }
                    }
                }
            })?;

        self.client = Some(client);
        Ok(())
    }

    fn publish(
        &mut self,
        topic: &str,
        qos: Qos,
        retain: bool,
        payload: &[u8],
    ) -> Result<PacketId, SessionError> {
        let client = self.client.as_ref().ok_or(SessionError::NotConnected)?;
        client.try_publish(topic, map_qos(qos), retain, payload)?;

        // Log-correlation id; the client does not surface broker packet ids
        self.next_pkid = if self.next_pkid == u16::MAX {
            1
        } else {
            self.next_pkid + 1
        };
        Ok(PacketId::new(self.next_pkid))
    }
}

fn map_qos(qos: Qos) -> QoS {
    match qos {
        Qos::AtMostOnce => QoS::AtMostOnce,
        Qos::AtLeastOnce => QoS::AtLeastOnce,
        Qos::ExactlyOnce => QoS::ExactlyOnce,
    }
}
