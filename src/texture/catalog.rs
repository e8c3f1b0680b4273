//! Texture decoding and the material catalog

use std::collections::HashMap;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::world::TextureRef;

/// Decoded RGBA8 texture
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<[u8; 4]>,
    pub name: String,
}

impl Texture {
    /// Load texture from a PNG file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        use image::GenericImageView;

        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;

        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();
        let pixels: Vec<[u8; 4]> = rgba.pixels().map(|p| p.0).collect();

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        })
    }

    /// Load texture from raw PNG bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, String> {
        use image::GenericImageView;

        let img = image::load_from_memory(bytes)
            .map_err(|e| format!("Failed to decode image: {}", e))?;

        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();
        let pixels: Vec<[u8; 4]> = rgba.pixels().map(|p| p.0).collect();

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        })
    }

    /// Create a checkerboard test texture (also the missing-texture fallback)
    pub fn checkerboard(width: usize, height: usize) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                pixels.push(if checker {
                    [255, 0, 255, 255]
                } else {
                    [0, 0, 0, 255]
                });
            }
        }
        Self {
            width,
            height,
            pixels,
            name: "checkerboard".to_string(),
        }
    }

    /// Load all PNG textures from a directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_directory<P: AsRef<Path>>(dir: P) -> Vec<Self> {
        use indicatif::{ProgressBar, ProgressStyle};

        let dir = dir.as_ref();
        let mut textures = Vec::new();

        if let Ok(entries) = std::fs::read_dir(dir) {
            let mut paths: Vec<_> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.extension()
                        .map(|ext| ext.to_ascii_lowercase() == "png")
                        .unwrap_or(false)
                })
                .collect();

            paths.sort();

            let total = paths.len() as u64;
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("Loading textures [{bar:30}] {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("█▓░"),
            );

            for path in paths {
                match Self::from_file(&path) {
                    Ok(tex) => {
                        pb.set_message(format!("{} ({}x{})", tex.name, tex.width, tex.height));
                        textures.push(tex);
                    }
                    Err(e) => {
                        pb.set_message(format!("Error: {}", e));
                    }
                }
                pb.inc(1);
            }

            pb.finish_with_message(format!("Loaded {} textures", textures.len()));
        }

        textures
    }

    /// Load all PNG textures from a directory (WASM - no progress bar)
    #[cfg(target_arch = "wasm32")]
    pub fn load_directory<P: AsRef<Path>>(dir: P) -> Vec<Self> {
        let dir = dir.as_ref();
        let mut textures = Vec::new();

        if let Ok(entries) = std::fs::read_dir(dir) {
            let mut paths: Vec<_> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.extension()
                        .map(|ext| ext.to_ascii_lowercase() == "png")
                        .unwrap_or(false)
                })
                .collect();

            paths.sort();

            for path in paths {
                if let Ok(tex) = Self::from_file(&path) {
                    textures.push(tex);
                }
            }
        }

        textures
    }
}

/// Decoded textures keyed by "pack/name"
#[derive(Debug, Default)]
pub struct TextureCatalog {
    textures: HashMap<String, Texture>,
}

impl TextureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every PNG in a directory into the given pack
    pub fn load_pack<P: AsRef<Path>>(&mut self, pack: &str, dir: P) {
        for texture in Texture::load_directory(dir) {
            let key = format!("{}/{}", pack, texture.name);
            self.textures.insert(key, texture);
        }
    }

    pub fn insert(&mut self, pack: &str, texture: Texture) {
        let key = format!("{}/{}", pack, texture.name);
        self.textures.insert(key, texture);
    }

    pub fn get(&self, texture: &TextureRef) -> Option<&Texture> {
        self.textures.get(&texture.key())
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Names of all loaded textures, as refs
    pub fn texture_refs(&self) -> Vec<TextureRef> {
        self.textures
            .keys()
            .filter_map(|key| {
                key.split_once('/')
                    .map(|(pack, name)| TextureRef::new(pack, name))
            })
            .collect()
    }
}

/// Per-instance render material.
///
/// A material is an ordinary value: cloning one produces an independent
/// instance, so mutating a mesh's material (e.g. a switch flipping its
/// texture) never affects another object built from the same template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub texture: TextureRef,
    /// Blend with the scene instead of overwriting (screen/switch quads)
    pub transparent: bool,
    /// Draw on top of coplanar wall geometry without z-fighting
    pub overlay: bool,
}

impl Material {
    /// Standard opaque surface material
    pub fn textured(texture: TextureRef) -> Self {
        Self {
            texture,
            transparent: false,
            overlay: false,
        }
    }

    /// Transparent overlay material for quads mounted flush on walls
    pub fn overlay(texture: TextureRef) -> Self {
        Self {
            texture,
            transparent: true,
            overlay: true,
        }
    }

    /// Fallback material for unresolved texture references
    pub fn fallback() -> Self {
        Self::textured(TextureRef::none())
    }
}

/// Material templates, one per cataloged texture.
///
/// `instantiate` hands out clones; unresolved references fall back to the
/// checkerboard material rather than failing, matching the texture
/// catalog's fallback behavior.
#[derive(Debug, Default)]
pub struct MaterialCatalog {
    materials: HashMap<String, Material>,
}

impl MaterialCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one material template per texture in the catalog
    pub fn from_catalog(catalog: &TextureCatalog) -> Self {
        let mut materials = HashMap::new();
        for texture in catalog.texture_refs() {
            materials.insert(texture.key(), Material::textured(texture));
        }
        Self { materials }
    }

    /// Register a material template directly
    pub fn register(&mut self, material: Material) {
        self.materials.insert(material.texture.key(), material);
    }

    /// Clone a per-object material instance for the given texture
    pub fn instantiate(&self, texture: &TextureRef) -> Material {
        self.materials
            .get(&texture.key())
            .cloned()
            .unwrap_or_else(|| {
                if texture.is_valid() {
                    // Uncataloged but well-formed ref: keep it, the renderer
                    // resolves to its own fallback at bind time
                    Material::textured(texture.clone())
                } else {
                    Material::fallback()
                }
            })
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
