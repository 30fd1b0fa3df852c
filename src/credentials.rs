use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    #[error("no ':' separator in credential payload")]
    MissingSeparator,
    #[error("credential payload is not valid ASCII")]
    NotAscii,
}

/// Network credentials carried as the ASCII payload `SSID:PASSWORD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub ssid: String,
    pub password: String,
}

impl Credentials {
    /// Split a decoded payload on the first colon. The password may
    /// itself contain colons; the SSID may not.
    pub fn parse(payload: &[u8]) -> Result<Self, CredentialError> {
        if !payload.is_ascii() {
            return Err(CredentialError::NotAscii);
        }
        let text = std::str::from_utf8(payload).map_err(|_| CredentialError::NotAscii)?;
        let (ssid, password) = text
            .split_once(':')
            .ok_or(CredentialError::MissingSeparator)?;
        Ok(Self {
            ssid: ssid.to_string(),
            password: password.to_string(),
        })
    }
}
