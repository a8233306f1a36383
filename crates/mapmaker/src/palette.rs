use editor::{BiomePalette, Rgb};
use model::{BIOME_COUNT, BiomeId};

type BiomeColors = [Rgb; BIOME_COUNT as usize + 1];

/// Colors used for codes a style does not list.
const FALLBACK: BiomeColors = [
    Rgb::new(235, 235, 235),
    Rgb::new(142, 194, 255),
    Rgb::new(191, 246, 147),
    Rgb::new(206, 178, 125),
    Rgb::new(137, 238, 120),
    Rgb::new(140, 227, 186),
    Rgb::new(255, 239, 155),
    Rgb::new(255, 255, 255),
    Rgb::new(231, 227, 133),
    Rgb::new(248, 112, 54),
    Rgb::new(149, 140, 138),
];

const STANDARD: BiomeColors = [
    Rgb::new(196, 196, 196),
    Rgb::new(76, 179, 253),
    Rgb::new(186, 236, 155),
    Rgb::new(206, 178, 125),
    Rgb::new(127, 211, 113),
    Rgb::new(112, 170, 128),
    Rgb::new(255, 240, 159),
    Rgb::new(250, 254, 255),
    Rgb::new(231, 227, 133),
    FALLBACK[9],
    FALLBACK[10],
];

const PARCHMENT: BiomeColors = [
    Rgb::new(198, 181, 138),
    Rgb::new(151, 138, 111),
    Rgb::new(225, 199, 114),
    Rgb::new(185, 148, 60),
    Rgb::new(209, 181, 94),
    Rgb::new(168, 125, 44),
    Rgb::new(231, 205, 117),
    Rgb::new(237, 225, 200),
    Rgb::new(194, 162, 83),
    FALLBACK[9],
    FALLBACK[10],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapStyle {
    pub name: &'static str,
    pub colors: &'static BiomeColors,
}

pub const STYLES: [MapStyle; 3] = [
    MapStyle {
        name: "default",
        colors: &STANDARD,
    },
    MapStyle {
        name: "parchment",
        colors: &PARCHMENT,
    },
    MapStyle {
        name: "without",
        colors: &STANDARD,
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct StylePalette;

impl StylePalette {
    pub fn style(&self, style_index: usize) -> MapStyle {
        STYLES.get(style_index).copied().unwrap_or(STYLES[0])
    }

    pub fn style_index(&self, name: &str) -> Option<usize> {
        STYLES.iter().position(|style| style.name == name)
    }

    /// Color of `biome` on the finished map.
    pub fn map_color(&self, style_index: usize, biome: BiomeId) -> Rgb {
        self.style(style_index).colors[biome.index()]
    }
}

impl BiomePalette for StylePalette {
    fn style_count(&self) -> usize {
        STYLES.len()
    }

    fn drawing_color(&self, style_index: usize, biome: BiomeId) -> Rgb {
        self.map_color(style_index, biome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styles_cover_every_biome() {
        let palette = StylePalette;
        assert_eq!(palette.style_count(), 3);
        assert_eq!(
            palette.drawing_color(0, BiomeId::WATER),
            Rgb::new(76, 179, 253)
        );
        assert_eq!(
            palette.drawing_color(1, BiomeId::LAVA),
            Rgb::new(248, 112, 54)
        );
        assert_eq!(palette.style_index("parchment"), Some(1));
        assert_eq!(palette.style(9).name, "default");
    }
}
