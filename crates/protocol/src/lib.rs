//! Wire-level data types shared by the interception runtime and its clients.
//!
//! `protocol` defines the [`Envelope`] exchanged once per client round trip,
//! the typed response messages the runtime knows how to interpret, and the
//! [`Message`] codec that turns opaque payload bytes into those types. The
//! crate is pure data: no I/O, no logging, no shared state.
pub mod codec;
pub mod envelope;
pub mod inventory;
pub mod map;
pub mod pokemon;

pub use codec::{CodecError, MAX_MESSAGE_LEN, Message};
pub use envelope::{Envelope, EnvelopeError, Request, RequestType};
pub use inventory::{GetInventoryResponse, InventoryDelta, InventoryItem, InventoryItemData, ItemStack};
pub use map::{GetMapObjectsResponse, MapCell, MapObjectsStatus, NearbyPokemon, WildPokemon};
pub use pokemon::{PokemonData, PokemonId};
