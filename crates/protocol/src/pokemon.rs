//! Per-creature snapshot carried inside inventory and map responses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// National pokédex number.
///
/// `0` is the sentinel the server uses for entries that are not creatures
/// (eggs, placeholder slots).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PokemonId(pub u32);

impl PokemonId {
    pub const MISSINGNO: PokemonId = PokemonId(0);

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn is_missingno(self) -> bool {
        self.0 == 0
    }

    /// English species name, if the id is a known species.
    pub fn name(self) -> Option<&'static str> {
        let index = usize::try_from(self.0).ok()?.checked_sub(1)?;
        SPECIES_NAMES.get(index).copied()
    }
}

impl fmt::Display for PokemonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "#{}", self.0),
        }
    }
}

/// Raw stat block of one creature as delivered by the server.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PokemonData {
    pub id: u64,
    pub pokemon_id: PokemonId,
    pub cp: i32,
    pub stamina: i32,
    pub stamina_max: i32,
    pub individual_attack: i32,
    pub individual_defense: i32,
    pub individual_stamina: i32,
    pub cp_multiplier: f32,
    pub additional_cp_multiplier: f32,
    pub nickname: String,
    pub is_egg: bool,
}

impl PokemonData {
    pub fn with_nickname(&self, nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            ..self.clone()
        }
    }

    /// Total CP multiplier including power-up increments.
    pub fn total_cp_multiplier(&self) -> f32 {
        self.cp_multiplier + self.additional_cp_multiplier
    }
}

impl Default for PokemonId {
    fn default() -> Self {
        Self::MISSINGNO
    }
}

const SPECIES_NAMES: [&str; 151] = [
    "Bulbasaur",
    "Ivysaur",
    "Venusaur",
    "Charmander",
    "Charmeleon",
    "Charizard",
    "Squirtle",
    "Wartortle",
    "Blastoise",
    "Caterpie",
    "Metapod",
    "Butterfree",
    "Weedle",
    "Kakuna",
    "Beedrill",
    "Pidgey",
    "Pidgeotto",
    "Pidgeot",
    "Rattata",
    "Raticate",
    "Spearow",
    "Fearow",
    "Ekans",
    "Arbok",
    "Pikachu",
    "Raichu",
    "Sandshrew",
    "Sandslash",
    "Nidoran♀",
    "Nidorina",
    "Nidoqueen",
    "Nidoran♂",
    "Nidorino",
    "Nidoking",
    "Clefairy",
    "Clefable",
    "Vulpix",
    "Ninetales",
    "Jigglypuff",
    "Wigglytuff",
    "Zubat",
    "Golbat",
    "Oddish",
    "Gloom",
    "Vileplume",
    "Paras",
    "Parasect",
    "Venonat",
    "Venomoth",
    "Diglett",
    "Dugtrio",
    "Meowth",
    "Persian",
    "Psyduck",
    "Golduck",
    "Mankey",
    "Primeape",
    "Growlithe",
    "Arcanine",
    "Poliwag",
    "Poliwhirl",
    "Poliwrath",
    "Abra",
    "Kadabra",
    "Alakazam",
    "Machop",
    "Machoke",
    "Machamp",
    "Bellsprout",
    "Weepinbell",
    "Victreebel",
    "Tentacool",
    "Tentacruel",
    "Geodude",
    "Graveler",
    "Golem",
    "Ponyta",
    "Rapidash",
    "Slowpoke",
    "Slowbro",
    "Magnemite",
    "Magneton",
    "Farfetch'd",
    "Doduo",
    "Dodrio",
    "Seel",
    "Dewgong",
    "Grimer",
    "Muk",
    "Shellder",
    "Cloyster",
    "Gastly",
    "Haunter",
    "Gengar",
    "Onix",
    "Drowzee",
    "Hypno",
    "Krabby",
    "Kingler",
    "Voltorb",
    "Electrode",
    "Exeggcute",
    "Exeggutor",
    "Cubone",
    "Marowak",
    "Hitmonlee",
    "Hitmonchan",
    "Lickitung",
    "Koffing",
    "Weezing",
    "Rhyhorn",
    "Rhydon",
    "Chansey",
    "Tangela",
    "Kangaskhan",
    "Horsea",
    "Seadra",
    "Goldeen",
    "Seaking",
    "Staryu",
    "Starmie",
    "Mr. Mime",
    "Scyther",
    "Jynx",
    "Electabuzz",
    "Magmar",
    "Pinsir",
    "Tauros",
    "Magikarp",
    "Gyarados",
    "Lapras",
    "Ditto",
    "Eevee",
    "Vaporeon",
    "Jolteon",
    "Flareon",
    "Porygon",
    "Omanyte",
    "Omastar",
    "Kabuto",
    "Kabutops",
    "Aerodactyl",
    "Snorlax",
    "Articuno",
    "Zapdos",
    "Moltres",
    "Dratini",
    "Dragonair",
    "Dragonite",
    "Mewtwo",
    "Mew",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn species_names_cover_first_generation() {
        assert_eq!(PokemonId(1).name(), Some("Bulbasaur"));
        assert_eq!(PokemonId(16).name(), Some("Pidgey"));
        assert_eq!(PokemonId(143).name(), Some("Snorlax"));
        assert_eq!(PokemonId(151).name(), Some("Mew"));
        assert_eq!(PokemonId(152).name(), None);
        assert_eq!(PokemonId::MISSINGNO.name(), None);
    }

    #[test]
    fn display_falls_back_to_number() {
        assert_eq!(PokemonId(25).to_string(), "Pikachu");
        assert_eq!(PokemonId(999).to_string(), "#999");
    }

    #[test]
    fn with_nickname_leaves_source_untouched() {
        let original = PokemonData {
            id: 7,
            pokemon_id: PokemonId(16),
            nickname: "birb".into(),
            ..Default::default()
        };
        let renamed = original.with_nickname("Pidgey 91");

        assert_eq!(renamed.nickname, "Pidgey 91");
        assert_eq!(renamed.id, 7);
        assert_eq!(original.nickname, "birb");
    }
}
