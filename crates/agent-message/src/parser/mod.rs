//! Inbound command messages: envelope decoding and parameter resolution.

use tracing::{debug, warn};

use crate::error::{MessageError, MessageResult};
use crate::log::MessageLog;
use crate::model::CommandPayload;
use crate::params;

/// Decode a command message and resolve every parameter reference in its
/// document content.
///
/// Parameters the message omits are taken from the defaults the document
/// declares; the returned payload carries the completed set.
///
/// Fails with `MalformedMessage` when the bytes are not a command envelope
/// and with `UnresolvedParameter` when a reference has no value.
pub fn parse_message_with_params(log: &MessageLog, raw: &[u8]) -> MessageResult<CommandPayload> {
    log.scope(|| {
        let payload = CommandPayload::decode(raw).map_err(|err| {
            warn!(error = %err, bytes = raw.len(), "rejecting command message");
            err
        })?;
        debug!(
            command_id = %payload.command_id,
            document_name = %payload.document_name,
            parameters = payload.parameters.len(),
            "decoded command message"
        );

        let sent = payload.parameters.len();
        let parameters = payload
            .parameters
            .clone()
            .with_document_defaults(&payload.document_content);
        if parameters.len() > sent {
            debug!(
                command_id = %payload.command_id,
                defaults = parameters.len() - sent,
                "filled parameters from document defaults"
            );
        }

        let document_content = params::substitute(&payload.document_content, &parameters)
            .map_err(|err| {
                warn!(
                    command_id = %payload.command_id,
                    error = %err,
                    "parameter substitution failed"
                );
                err
            })?;
        debug!(command_id = %payload.command_id, "resolved document parameters");

        Ok(CommandPayload {
            document_content,
            parameters,
            ..payload
        })
    })
}

/// Decode a command message without touching its parameter references.
pub fn decode_command_message(log: &MessageLog, raw: &[u8]) -> MessageResult<CommandPayload> {
    log.scope(|| {
        CommandPayload::decode(raw).map_err(|err| {
            warn!(error = %err, bytes = raw.len(), "rejecting command message");
            err
        })
    })
}

/// [`parse_message_with_params`] over text.
pub fn parse_message_str(log: &MessageLog, message: &str) -> MessageResult<CommandPayload> {
    parse_message_with_params(log, message.as_bytes())
}

/// Wire form of a payload, with the envelope's field names and order.
pub fn encode_command_payload(payload: &CommandPayload) -> MessageResult<Vec<u8>> {
    serde_json::to_vec(payload)
        .map_err(|err| MessageError::malformed(format!("failed to encode command payload: {err}")))
}
