// Frame format: [Signature:4] [Length:1] [Payload:N] [Checksum:1]

use crate::utils::consts::{MAX_PAYLOAD_BYTES, SIGNATURE};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid packet signature")]
    SignatureMismatch,
    #[error("frame truncated: need {needed} bytes, have {got}")]
    Truncated { needed: usize, got: usize },
    #[error("checksum mismatch: transmitted {transmitted:#04x}, computed {computed:#04x}")]
    ChecksumMismatch { transmitted: u8, computed: u8 },
    #[error("payload of {0} bytes does not fit the one-byte length field")]
    PayloadTooLong(usize),
}

/// One validated unit of data exchanged over the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    payload: Vec<u8>,
    checksum: u8,
}

impl Frame {
    /// Assemble a frame around `payload`, computing the XOR checksum.
    pub fn build(payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_PAYLOAD_BYTES {
            return Err(FrameError::PayloadTooLong(payload.len()));
        }
        Ok(Self {
            payload: payload.to_vec(),
            checksum: xor_checksum(payload),
        })
    }

    /// Parse and validate a frame from raw decoded bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < SIGNATURE.len() + 1 {
            return Err(FrameError::Truncated {
                needed: SIGNATURE.len() + 1,
                got: bytes.len(),
            });
        }

        if bytes[..SIGNATURE.len()] != SIGNATURE {
            return Err(FrameError::SignatureMismatch);
        }

        let length = bytes[SIGNATURE.len()] as usize;
        let needed = SIGNATURE.len() + 1 + length + 1;
        if bytes.len() < needed {
            return Err(FrameError::Truncated {
                needed,
                got: bytes.len(),
            });
        }

        let payload = &bytes[SIGNATURE.len() + 1..SIGNATURE.len() + 1 + length];
        let transmitted = bytes[SIGNATURE.len() + 1 + length];
        let computed = xor_checksum(payload);
        if transmitted != computed {
            return Err(FrameError::ChecksumMismatch {
                transmitted,
                computed,
            });
        }

        Ok(Self {
            payload: payload.to_vec(),
            checksum: transmitted,
        })
    }

    /// Serialize: signature, length, payload, checksum.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SIGNATURE.len() + 2 + self.payload.len());
        bytes.extend_from_slice(&SIGNATURE);
        bytes.push(self.payload.len() as u8);
        bytes.extend_from_slice(&self.payload);
        bytes.push(self.checksum);
        bytes
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn checksum(&self) -> u8 {
        self.checksum
    }
}

/// Bitwise XOR over all payload bytes.
pub fn xor_checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, &b| acc ^ b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let frame = Frame::build(b"Hello").unwrap();
        let parsed = Frame::parse(&frame.to_bytes()).unwrap();
        assert_eq!(parsed.payload(), b"Hello");
        assert_eq!(parsed.checksum(), frame.checksum());
    }

    #[test]
    fn test_hello_wire_bytes() {
        let frame = Frame::build(b"Hello").unwrap();
        let bytes = frame.to_bytes();
        assert_eq!(&bytes[..4], &[0x63, 0xF9, 0x5C, 0x1B]);
        assert_eq!(bytes[4], 5);
        assert_eq!(&bytes[5..10], b"Hello");
        assert_eq!(bytes[10], b'H' ^ b'e' ^ b'l' ^ b'l' ^ b'o');
    }

    #[test]
    fn test_empty_payload() {
        let frame = Frame::build(&[]).unwrap();
        let parsed = Frame::parse(&frame.to_bytes()).unwrap();
        assert!(parsed.payload().is_empty());
        assert_eq!(parsed.checksum(), 0);
    }

    #[test]
    fn test_signature_mismatch() {
        let mut bytes = Frame::build(b"Hello").unwrap().to_bytes();
        bytes[0] = 0x00;
        assert_eq!(Frame::parse(&bytes), Err(FrameError::SignatureMismatch));
    }

    #[test]
    fn test_checksum_detects_single_bit_flip() {
        let frame = Frame::build(b"myssid:mypassword").unwrap();
        let clean = frame.to_bytes();
        for bit in 0..8 {
            let mut corrupted = clean.clone();
            corrupted[7] ^= 1 << bit;
            match Frame::parse(&corrupted) {
                Err(FrameError::ChecksumMismatch { .. }) => {}
                other => panic!("flip of bit {bit} not caught: {other:?}"),
            }
        }
    }

    #[test]
    fn test_truncated() {
        let bytes = Frame::build(b"Hello").unwrap().to_bytes();
        assert_eq!(
            Frame::parse(&bytes[..bytes.len() - 2]),
            Err(FrameError::Truncated { needed: 11, got: 9 })
        );
        assert!(matches!(
            Frame::parse(&[0x63, 0xF9]),
            Err(FrameError::Truncated { .. })
        ));
    }

    #[test]
    fn test_payload_too_long() {
        let payload = vec![0u8; 256];
        assert_eq!(
            Frame::build(&payload),
            Err(FrameError::PayloadTooLong(256))
        );
    }

    #[test]
    fn test_max_payload() {
        let payload = vec![0x5A; 255];
        let parsed = Frame::parse(&Frame::build(&payload).unwrap().to_bytes()).unwrap();
        assert_eq!(parsed.payload(), payload.as_slice());
    }
}
