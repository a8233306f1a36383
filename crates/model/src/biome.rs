use std::fmt;

/// Number of paintable biomes. Code 0 is reserved for [`BiomeId::NONE`].
pub const BIOME_COUNT: u8 = 10;

/// Territory code stored in every grid cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct BiomeId(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownBiome(pub u8);

impl fmt::Display for UnknownBiome {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "biome code {} is outside 0..={BIOME_COUNT}",
            self.0
        )
    }
}

impl std::error::Error for UnknownBiome {}

const BIOME_NAMES: [&str; BIOME_COUNT as usize + 1] = [
    "none",
    "water",
    "land",
    "mountains",
    "forest",
    "swamp",
    "desert",
    "snow",
    "hills",
    "lava",
    "dead",
];

impl BiomeId {
    pub const NONE: Self = Self(0);
    pub const WATER: Self = Self(1);
    pub const LAND: Self = Self(2);
    pub const MOUNTAINS: Self = Self(3);
    pub const FOREST: Self = Self(4);
    pub const SWAMP: Self = Self(5);
    pub const DESERT: Self = Self(6);
    pub const SNOW: Self = Self(7);
    pub const HILLS: Self = Self(8);
    pub const LAVA: Self = Self(9);
    pub const DEAD: Self = Self(10);

    pub const fn new(raw: u8) -> Result<Self, UnknownBiome> {
        if raw > BIOME_COUNT {
            Err(UnknownBiome(raw))
        } else {
            Ok(Self(raw))
        }
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    pub fn name(self) -> &'static str {
        BIOME_NAMES[self.index()]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        BIOME_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|index| Self(index as u8))
    }

    /// Every code including [`BiomeId::NONE`], in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=BIOME_COUNT).map(Self)
    }
}

impl fmt::Display for BiomeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl TryFrom<u8> for BiomeId {
    type Error = UnknownBiome;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_codes_past_last_biome() {
        assert_eq!(BiomeId::new(BIOME_COUNT), Ok(BiomeId::DEAD));
        assert_eq!(BiomeId::new(BIOME_COUNT + 1), Err(UnknownBiome(11)));
    }

    #[test]
    fn names_round_trip() {
        for biome in BiomeId::all() {
            assert_eq!(BiomeId::from_name(biome.name()), Some(biome));
        }
        assert_eq!(BiomeId::from_name("ocean"), None);
    }
}
