use rollcall_models::SessionId;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid QR code format")]
pub struct InvalidQrPayload;

/// What a decoded QR code carries.
///
/// Session QR codes hold either the bare token or a JSON object
/// `{"qrCodeId": "...", "sessionId": "..."}`; `qrCode` is accepted in place
/// of `qrCodeId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    pub qr_code_id: String,
    pub session_id: Option<SessionId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonPayload {
    #[serde(default, alias = "qrCode")]
    qr_code_id: Option<String>,
    #[serde(default)]
    session_id: Option<SessionId>,
}

impl QrPayload {
    pub fn parse(text: &str) -> Result<Self, InvalidQrPayload> {
        let text = text.trim();
        if text.is_empty() {
            return Err(InvalidQrPayload);
        }

        if !text.starts_with('{') {
            if text.contains(char::is_whitespace) {
                return Err(InvalidQrPayload);
            }
            return Ok(Self {
                qr_code_id: text.to_string(),
                session_id: None,
            });
        }

        let json: JsonPayload = serde_json::from_str(text).map_err(|_| InvalidQrPayload)?;
        let qr_code_id = json
            .qr_code_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(InvalidQrPayload)?;

        Ok(Self {
            qr_code_id,
            session_id: json.session_id.filter(|id| !id.is_empty()),
        })
    }
}
