/// Handle into the scene's texture store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureId(pub u32);

/// Surface appearance of a drawable.
///
/// Plain data consumed by whatever backend renders the command stream; the
/// scene never interprets these values beyond carrying them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub texture: Option<TextureId>,
    pub base_color: [f32; 4],
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    /// Render the inside faces (atmosphere shell).
    pub back_side: bool,
}

impl Material {
    /// Textured surface with the matte finish used for the planet itself.
    pub fn textured(texture: TextureId) -> Self {
        Self {
            texture: Some(texture),
            base_color: [1.0, 1.0, 1.0, 1.0],
            roughness: 0.9,
            metalness: 0.1,
            opacity: 1.0,
            back_side: false,
        }
    }

    /// Untextured translucent tint (atmosphere, selection glow).
    pub fn tinted(base_color: [f32; 4], opacity: f32) -> Self {
        Self {
            texture: None,
            base_color,
            roughness: 1.0,
            metalness: 0.0,
            opacity,
            back_side: false,
        }
    }

    /// Flat unlit color (pin markers, stars).
    pub fn flat(base_color: [f32; 4]) -> Self {
        Self {
            texture: None,
            base_color,
            roughness: 1.0,
            metalness: 0.0,
            opacity: 1.0,
            back_side: false,
        }
    }

    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_back_side(mut self) -> Self {
        self.back_side = true;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Material, TextureId};

    #[test]
    fn textured_material_is_matte() {
        let m = Material::textured(TextureId(0));
        assert_eq!(m.texture, Some(TextureId(0)));
        assert_eq!(m.roughness, 0.9);
        assert_eq!(m.metalness, 0.1);
        assert!(!m.back_side);
    }

    #[test]
    fn builders_compose() {
        let m = Material::tinted([0.2, 0.6, 1.0, 1.0], 0.3).with_back_side();
        assert!(m.back_side);
        assert_eq!(m.opacity, 0.3);
        assert!(m.texture.is_none());
    }
}
