//! Catalog entities and the wire-level request/response shapes (spec §3, §6).

use bson::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque tag carrying the exact numeric value IGDB issues for a game's
/// category. Not a closed Rust enum: spec §3 is explicit that these are
/// "opaque tags, not branches of logic" except for the fixed
/// `default_search_categories` filter set below, so an unrecognized upstream
/// value must still round-trip cleanly instead of failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameCategory(pub i32);

impl GameCategory {
    pub const MAIN_GAME: GameCategory = GameCategory(0);
    pub const DLC_ADDON: GameCategory = GameCategory(1);
    pub const EXPANSION: GameCategory = GameCategory(2);
    pub const BUNDLE: GameCategory = GameCategory(3);
    pub const STANDALONE_EXPANSION: GameCategory = GameCategory(4);
    pub const MOD: GameCategory = GameCategory(5);
    pub const EPISODE: GameCategory = GameCategory(6);
    pub const SEASON: GameCategory = GameCategory(7);
    pub const REMAKE: GameCategory = GameCategory(8);
    pub const REMASTER: GameCategory = GameCategory(9);
    pub const EXPANDED_GAME: GameCategory = GameCategory(10);
    pub const PORT: GameCategory = GameCategory(11);
    pub const FORK: GameCategory = GameCategory(12);
    pub const PACK: GameCategory = GameCategory(13);
    pub const UPDATE: GameCategory = GameCategory(14);
}

/// The fixed filter set applied to the primary-name search (spec §3, §4.5.1).
pub const DEFAULT_SEARCH_CATEGORIES: [GameCategory; 4] = [
    GameCategory::MAIN_GAME,
    GameCategory::REMAKE,
    GameCategory::REMASTER,
    GameCategory::STANDALONE_EXPANSION,
];

/// Opaque tag for the storefront an `ExternalGame` row maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalGameCategory(pub i32);

impl ExternalGameCategory {
    pub const STEAM: ExternalGameCategory = ExternalGameCategory(1);
    pub const GOG: ExternalGameCategory = ExternalGameCategory(5);
    pub const EPIC_GAME_STORE: ExternalGameCategory = ExternalGameCategory(26);
    pub const ITCH_IO: ExternalGameCategory = ExternalGameCategory(30);
}

/// The four library UUIDs the metadata request's `LibraryId` hint is matched
/// against (spec §6). Returns the `ExternalGame.category` to filter on.
pub fn library_id_category(library_id: &Uuid) -> Option<ExternalGameCategory> {
    const STEAM_UUID: Uuid = Uuid::from_u128(0xCB91DFC9_B977_43BF_8E70_55F46E410FAB);
    const GOG_UUID: Uuid = Uuid::from_u128(0xAEBE8B7C_6DC3_4A66_AF31_E7375C6B5E9E);
    const EPIC_UUID: Uuid = Uuid::from_u128(0x00000002_DBD1_46C6_B5D0_B1BA559D10E4);
    const ITCH_UUID: Uuid = Uuid::from_u128(0x00000001_EBB2_4EEC_ABCB_7C89937A42BB);

    if *library_id == STEAM_UUID {
        Some(ExternalGameCategory::STEAM)
    } else if *library_id == GOG_UUID {
        Some(ExternalGameCategory::GOG)
    } else if *library_id == EPIC_UUID {
        Some(ExternalGameCategory::EPIC_GAME_STORE)
    } else if *library_id == ITCH_UUID {
        Some(ExternalGameCategory::ITCH_IO)
    } else {
        None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    #[serde(rename = "_id")]
    pub id: u64,
    pub name: String,
    pub category: GameCategory,
    /// Signed seconds since Unix epoch; `0` means unknown (spec §3).
    pub first_release_date: i64,
    /// Opaque passthrough attributes mirrored verbatim from upstream.
    #[serde(flatten)]
    pub extra: Document,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeName {
    #[serde(rename = "_id")]
    pub id: u64,
    pub name: String,
    pub game: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalGame {
    #[serde(rename = "_id")]
    pub id: u64,
    pub uid: String,
    pub category: ExternalGameCategory,
    pub game: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameLocalization {
    #[serde(rename = "_id")]
    pub id: u64,
    pub name: String,
    pub game: u64,
}

/// Catch-all for passthrough entity classes (Company, …): id-indexed only,
/// every other field carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassthroughEntity {
    #[serde(rename = "_id")]
    pub id: u64,
    #[serde(flatten)]
    pub extra: Document,
}

pub type Company = PassthroughEntity;

/// `POST /igdb/search` body (spec §6).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchRequest {
    pub search_term: String,
}

/// `POST /igdb/metadata` body (spec §6).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetadataRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub library_id: Option<Uuid>,
    #[serde(default)]
    pub game_id: Option<String>,
}

/// `{data}` half of the discriminated response envelope (spec §6).
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// `{error}` half of the discriminated response envelope (spec §6, §7).
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_id_table_has_exactly_four_entries() {
        let steam: Uuid = "CB91DFC9-B977-43BF-8E70-55F46E410FAB".parse().unwrap();
        let gog: Uuid = "AEBE8B7C-6DC3-4A66-AF31-E7375C6B5E9E".parse().unwrap();
        let epic: Uuid = "00000002-DBD1-46C6-B5D0-B1BA559D10E4".parse().unwrap();
        let itch: Uuid = "00000001-EBB2-4EEC-ABCB-7C89937A42BB".parse().unwrap();
        let unknown = Uuid::nil();

        assert_eq!(library_id_category(&steam), Some(ExternalGameCategory::STEAM));
        assert_eq!(library_id_category(&gog), Some(ExternalGameCategory::GOG));
        assert_eq!(
            library_id_category(&epic),
            Some(ExternalGameCategory::EPIC_GAME_STORE)
        );
        assert_eq!(library_id_category(&itch), Some(ExternalGameCategory::ITCH_IO));
        assert_eq!(library_id_category(&unknown), None);
    }

    #[test]
    fn default_search_categories_matches_spec_fixed_set() {
        assert_eq!(
            DEFAULT_SEARCH_CATEGORIES,
            [
                GameCategory::MAIN_GAME,
                GameCategory::REMAKE,
                GameCategory::REMASTER,
                GameCategory::STANDALONE_EXPANSION,
            ]
        );
    }
}
