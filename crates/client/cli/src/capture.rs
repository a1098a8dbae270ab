//! JSON-lines capture format for recorded exchanges.
//!
//! One exchange per line, payloads hex encoded:
//!
//! ```text
//! {"requests":[{"type":"GET_INVENTORY","payload":"0a0b"}],"responses":["0801"]}
//! ```

use anyhow::Result;
use protocol::{Envelope, Request, RequestType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedRequest {
    #[serde(rename = "type")]
    pub request_type: RequestType,
    #[serde(with = "hex_bytes", default)]
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedExchange {
    pub requests: Vec<CapturedRequest>,
    #[serde(with = "hex_list")]
    pub responses: Vec<Vec<u8>>,
}

impl CapturedExchange {
    pub fn parse(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Validates the positional invariant and builds an [`Envelope`].
    pub fn into_envelope(self) -> Result<Envelope> {
        let requests = self
            .requests
            .into_iter()
            .map(|r| Request::new(r.request_type, r.payload))
            .collect();
        Ok(Envelope::new(requests, self.responses)?)
    }

    pub fn from_envelope(envelope: Envelope) -> Self {
        let (requests, responses) = envelope.into_parts();
        Self {
            requests: requests
                .into_iter()
                .map(|r| CapturedRequest {
                    request_type: r.request_type,
                    payload: r.payload,
                })
                .collect(),
            responses,
        }
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        hex::decode(text).map_err(serde::de::Error::custom)
    }
}

mod hex_list {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(list: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(list.len()))?;
        for bytes in list {
            seq.serialize_element(&hex::encode(bytes))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .into_iter()
            .map(|text| hex::decode(text).map_err(serde::de::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_validates() {
        let line = r#"{"requests":[{"type":"GET_PLAYER","payload":"01"},{"type":"GET_INVENTORY"}],"responses":["ff",""]}"#;
        let envelope = CapturedExchange::parse(line).unwrap().into_envelope().unwrap();

        assert_eq!(envelope.requests()[0].request_type, RequestType::GetPlayer);
        assert_eq!(envelope.requests()[0].payload, vec![1]);
        assert_eq!(envelope.responses(), &[vec![0xff], vec![]]);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let line = r#"{"requests":[{"type":"GET_PLAYER"}],"responses":[]}"#;
        assert!(CapturedExchange::parse(line).unwrap().into_envelope().is_err());
    }

    #[test]
    fn bad_hex_is_rejected() {
        let line = r#"{"requests":[],"responses":["zz"]}"#;
        assert!(CapturedExchange::parse(line).is_err());
    }

    #[test]
    fn writes_the_same_shape() {
        let line = r#"{"requests":[{"type":"GET_MAP_OBJECTS","payload":"0a"}],"responses":["0b0c"]}"#;
        let exchange = CapturedExchange::parse(line).unwrap();
        assert_eq!(exchange.to_line().unwrap(), line);
    }
}
