//! Request/response envelope exchanged once per client round trip.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Server method carried by a request.
///
/// Only [`RequestType::GetInventory`] and [`RequestType::GetMapObjects`] are
/// interpreted by the runtime; the remaining methods pass through untouched.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    MethodUnset,
    PlayerUpdate,
    GetPlayer,
    GetInventory,
    DownloadSettings,
    DownloadItemTemplates,
    DownloadRemoteConfigVersion,
    FortSearch,
    Encounter,
    CatchPokemon,
    FortDetails,
    GetMapObjects,
    ReleasePokemon,
    UseItemPotion,
    UseItemCapture,
    EvolvePokemon,
    GetHatchedEggs,
    LevelUpRewards,
    CheckAwardedBadges,
    NicknamePokemon,
    UpgradePokemon,
    SetFavoritePokemon,
    GetAssetDigest,
    GetDownloadUrls,
}

/// One typed request as sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub request_type: RequestType,
    pub payload: Vec<u8>,
}

impl Request {
    pub fn new(request_type: RequestType, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            request_type,
            payload: payload.into(),
        }
    }
}

/// Violations of the envelope's positional invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("envelope has {requests} requests but {responses} responses")]
    LengthMismatch { requests: usize, responses: usize },

    #[error("response index {index} out of bounds for envelope of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// One exchange: ordered requests and their index-aligned response payloads.
///
/// `responses[i]` always answers `requests[i]`. The fields are private so the
/// invariant can only be established by [`Envelope::new`] and preserved by the
/// index-wise replacement in [`Envelope::with_response`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    requests: Vec<Request>,
    responses: Vec<Vec<u8>>,
}

impl Envelope {
    pub fn new(requests: Vec<Request>, responses: Vec<Vec<u8>>) -> Result<Self, EnvelopeError> {
        if requests.len() != responses.len() {
            return Err(EnvelopeError::LengthMismatch {
                requests: requests.len(),
                responses: responses.len(),
            });
        }
        Ok(Self {
            requests,
            responses,
        })
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn responses(&self) -> &[Vec<u8>] {
        &self.responses
    }

    pub fn response(&self, index: usize) -> Option<&[u8]> {
        self.responses.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Indices of every request with the given type, in envelope order.
    pub fn positions(&self, request_type: RequestType) -> impl Iterator<Item = usize> + '_ {
        self.requests
            .iter()
            .enumerate()
            .filter(move |(_, request)| request.request_type == request_type)
            .map(|(index, _)| index)
    }

    pub fn contains(&self, request_type: RequestType) -> bool {
        self.positions(request_type).next().is_some()
    }

    /// Returns a copy of this envelope with only `responses[index]` replaced.
    pub fn with_response(&self, index: usize, bytes: Vec<u8>) -> Result<Self, EnvelopeError> {
        if index >= self.responses.len() {
            return Err(EnvelopeError::IndexOutOfBounds {
                index,
                len: self.responses.len(),
            });
        }
        let mut responses = self.responses.clone();
        responses[index] = bytes;
        Ok(Self {
            requests: self.requests.clone(),
            responses,
        })
    }

    pub fn into_parts(self) -> (Vec<Request>, Vec<Vec<u8>>) {
        (self.requests, self.responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope() -> Envelope {
        Envelope::new(
            vec![
                Request::new(RequestType::GetPlayer, vec![]),
                Request::new(RequestType::GetInventory, vec![1]),
                Request::new(RequestType::GetInventory, vec![2]),
            ],
            vec![vec![0xa], vec![0xb], vec![0xc]],
        )
        .expect("valid envelope")
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = Envelope::new(vec![Request::new(RequestType::GetPlayer, vec![])], vec![])
            .unwrap_err();
        assert_eq!(
            err,
            EnvelopeError::LengthMismatch {
                requests: 1,
                responses: 0
            }
        );
    }

    #[test]
    fn positions_follow_request_order() {
        let positions: Vec<_> = envelope().positions(RequestType::GetInventory).collect();
        assert_eq!(positions, vec![1, 2]);
        assert!(!envelope().contains(RequestType::GetMapObjects));
    }

    #[test]
    fn with_response_replaces_single_index() {
        let original = envelope();
        let replaced = original.with_response(1, vec![0xff]).expect("in bounds");

        assert_eq!(replaced.response(0), Some(&[0xa][..]));
        assert_eq!(replaced.response(1), Some(&[0xff][..]));
        assert_eq!(replaced.response(2), Some(&[0xc][..]));
        assert_eq!(replaced.requests(), original.requests());
        // Source value is left intact.
        assert_eq!(original.response(1), Some(&[0xb][..]));
    }

    #[test]
    fn with_response_out_of_bounds() {
        let err = envelope().with_response(3, vec![]).unwrap_err();
        assert_eq!(err, EnvelopeError::IndexOutOfBounds { index: 3, len: 3 });
    }

    #[test]
    fn request_type_names_are_screaming_snake_case() {
        assert_eq!(RequestType::GetMapObjects.to_string(), "GET_MAP_OBJECTS");
        assert_eq!(
            "GET_INVENTORY".parse::<RequestType>().expect("known method"),
            RequestType::GetInventory
        );
    }
}
