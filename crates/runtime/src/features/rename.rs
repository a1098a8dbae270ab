//! Rewrites creature nicknames in inventory responses.

use std::sync::Arc;

use protocol::{Envelope, GetInventoryResponse, InventoryItem, Message, Request, RequestType};
use tracing::debug;

use super::{Attachment, Feature, FeatureKind, Preferences};
use crate::error::Result;
use crate::format::Template;
use crate::intercept::{InterceptionProvider, Mutation, ResponseMutator};
use crate::stats::StatProvider;

/// Mutator behind [`Rename`]: for every `GET_INVENTORY` response, replaces the
/// nickname of each creature with the user's rename format rendered against
/// its derived stats.
pub struct RenameMutator {
    stats: Arc<dyn StatProvider>,
    preferences: Arc<dyn Preferences>,
}

impl RenameMutator {
    pub fn new(stats: Arc<dyn StatProvider>, preferences: Arc<dyn Preferences>) -> Self {
        Self { stats, preferences }
    }

    /// Re-encoded response, or `None` when no nickname changed.
    fn rename_inventory(&self, bytes: &[u8], template: &Template) -> Result<Option<Vec<u8>>> {
        let response = GetInventoryResponse::decode(bytes)?;
        if !response.success {
            return Ok(None);
        }
        let Some(delta) = response.inventory_delta.as_ref() else {
            return Ok(None);
        };

        let mut changed = false;
        let items = delta
            .inventory_items
            .iter()
            .map(|item| match self.rename_item(item, template) {
                Some(renamed) => {
                    changed = true;
                    renamed
                }
                None => item.clone(),
            })
            .collect();

        if !changed {
            return Ok(None);
        }
        let renamed = response.with_inventory_delta(delta.with_inventory_items(items));
        Ok(Some(renamed.encode()?))
    }

    fn rename_item(&self, item: &InventoryItem, template: &Template) -> Option<InventoryItem> {
        let pokemon = item.pokemon()?;
        if pokemon.pokemon_id.is_missingno() {
            return None;
        }

        let stats = match self.stats.compute(pokemon) {
            Ok(stats) => stats,
            Err(error) => {
                debug!(
                    target: "runtime::rename",
                    pokemon = pokemon.id,
                    %error,
                    "Cannot derive stats, keeping nickname"
                );
                return None;
            }
        };

        let nickname = template.render(&stats);
        if nickname == pokemon.nickname {
            return None;
        }
        Some(item.with_pokemon(pokemon.with_nickname(nickname)))
    }
}

impl ResponseMutator for RenameMutator {
    fn name(&self) -> &'static str {
        "rename"
    }

    fn mutate(&self, requests: &[Request], envelope: &Envelope) -> Result<Mutation> {
        if !self.preferences.is_enabled(FeatureKind::Rename) {
            return Ok(Mutation::Unchanged);
        }

        let template = Template::parse(&self.preferences.rename_format());
        let mut current: Option<Envelope> = None;

        for (index, request) in requests.iter().enumerate() {
            if request.request_type != RequestType::GetInventory {
                continue;
            }
            let source = current.as_ref().unwrap_or(envelope);
            let Some(bytes) = source.response(index) else {
                continue;
            };

            match self.rename_inventory(bytes, &template) {
                Ok(Some(renamed)) => current = Some(source.with_response(index, renamed)?),
                Ok(None) => {}
                Err(error) => {
                    debug!(
                        target: "runtime::rename",
                        index,
                        %error,
                        "Skipping inventory response"
                    );
                }
            }
        }

        Ok(current.map_or(Mutation::Unchanged, Mutation::Replaced))
    }
}

/// Mutating feature that renames creatures in the client's inventory.
pub struct Rename {
    provider: Arc<InterceptionProvider>,
    mutator: Arc<RenameMutator>,
    attachment: Attachment,
}

impl Rename {
    pub fn new(
        provider: Arc<InterceptionProvider>,
        stats: Arc<dyn StatProvider>,
        preferences: Arc<dyn Preferences>,
    ) -> Self {
        Self {
            provider,
            mutator: Arc::new(RenameMutator::new(stats, preferences)),
            attachment: Attachment::default(),
        }
    }
}

impl Feature for Rename {
    fn kind(&self) -> FeatureKind {
        FeatureKind::Rename
    }

    fn activate(&self) {
        self.attachment.replace(
            || self.provider.attach(self.mutator.clone()),
            |token| self.provider.detach(token),
        );
    }

    fn deactivate(&self) {
        self.attachment.release(|token| self.provider.detach(token));
    }

    fn is_active(&self) -> bool {
        self.attachment.is_attached()
    }
}
