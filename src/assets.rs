//! Sprite asset table
//!
//! Each sprite loads on its own. Nothing in the frame path waits for a load:
//! the renderer reads an [`AssetSnapshot`] and falls back to procedural
//! geometry for any key that is not ready yet (or never will be).

use crate::sim::{CollectibleKind, EntityKind, ObstacleKind, PowerupKind};

/// Every sprite the game knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    Truck,
    Ufo,
    TrashBag,
    Coin,
    Banana,
    StickerPill,
    Sticker3,
    Wallet,
    Incinerator,
    JumpConsole,
    Health,
}

impl SpriteKey {
    pub const COUNT: usize = 11;

    pub const ALL: [SpriteKey; Self::COUNT] = [
        SpriteKey::Truck,
        SpriteKey::Ufo,
        SpriteKey::TrashBag,
        SpriteKey::Coin,
        SpriteKey::Banana,
        SpriteKey::StickerPill,
        SpriteKey::Sticker3,
        SpriteKey::Wallet,
        SpriteKey::Incinerator,
        SpriteKey::JumpConsole,
        SpriteKey::Health,
    ];

    /// URL relative to the page
    pub fn path(self) -> &'static str {
        match self {
            SpriteKey::Truck => "./assets/gorbage-truck-2.png",
            SpriteKey::Ufo => "./assets/UFO.png",
            SpriteKey::TrashBag => "./assets/trashbag.png",
            SpriteKey::Coin => "./assets/trashcoinlogo.png",
            SpriteKey::Banana => "./assets/gorbagana.jpg",
            SpriteKey::StickerPill => "./assets/stickerpill.webp",
            SpriteKey::Sticker3 => "./assets/sticker3.webp",
            SpriteKey::Wallet => "./assets/gorbagwallet-removebg-preview.png",
            SpriteKey::Incinerator => "./assets/Logo-gor-incinerator.jpg",
            SpriteKey::JumpConsole => "./assets/Gorboyconsole.png",
            SpriteKey::Health => "./assets/gorbillions.png",
        }
    }

    /// Whether near-black pixels should be made transparent after decode
    pub fn keys_out_black(self) -> bool {
        !matches!(
            self,
            SpriteKey::Ufo | SpriteKey::TrashBag | SpriteKey::StickerPill | SpriteKey::Sticker3
        )
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl From<EntityKind> for SpriteKey {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Obstacle(ObstacleKind::TrashBag) => SpriteKey::TrashBag,
            EntityKind::Collectible(c) => match c {
                CollectibleKind::Coin => SpriteKey::Coin,
                CollectibleKind::Banana => SpriteKey::Banana,
                CollectibleKind::StickerPill => SpriteKey::StickerPill,
                CollectibleKind::Sticker3 => SpriteKey::Sticker3,
                CollectibleKind::Wallet => SpriteKey::Wallet,
            },
            EntityKind::Powerup(p) => match p {
                PowerupKind::Incinerator => SpriteKey::Incinerator,
                PowerupKind::Jump => SpriteKey::JumpConsole,
                PowerupKind::Health => SpriteKey::Health,
            },
        }
    }
}

/// A texture the renderer can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteHandle {
    /// Renderer-side texture slot
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

/// Decoded RGBA8 pixels waiting for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Make near-black pixels fully transparent (r, g and b all below 30)
pub fn key_out_black(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        if px[0] < 30 && px[1] < 30 && px[2] < 30 {
            px[3] = 0;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Pending,
    /// Pixels are in, texture not created yet
    Decoded(DecodedImage),
    Ready(SpriteHandle),
    Failed,
}

/// Load state for every sprite
#[derive(Debug)]
pub struct AssetTable {
    slots: Vec<Slot>,
}

impl Default for AssetTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetTable {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::Pending; SpriteKey::COUNT],
        }
    }

    pub fn slot(&self, key: SpriteKey) -> &Slot {
        &self.slots[key.index()]
    }

    /// Record the outcome of one load. Failures are logged and final.
    pub fn resolve(&mut self, key: SpriteKey, result: crate::Result<DecodedImage>) {
        self.slots[key.index()] = match result {
            Ok(mut image) => {
                if key.keys_out_black() {
                    key_out_black(&mut image.rgba);
                }
                Slot::Decoded(image)
            }
            Err(e) => {
                log::warn!("{}; using fallback graphics", e);
                Slot::Failed
            }
        };
    }

    /// Hand decoded images to the uploader. Their slots go back to pending
    /// until [`AssetTable::mark_ready`] or [`AssetTable::mark_failed`].
    pub fn take_decoded(&mut self) -> Vec<(SpriteKey, DecodedImage)> {
        let mut out = Vec::new();
        for key in SpriteKey::ALL {
            let slot = &mut self.slots[key.index()];
            if matches!(slot, Slot::Decoded(_)) {
                if let Slot::Decoded(image) = std::mem::replace(slot, Slot::Pending) {
                    out.push((key, image));
                }
            }
        }
        out
    }

    pub fn mark_ready(&mut self, key: SpriteKey, handle: SpriteHandle) {
        log::debug!("Sprite {:?} ready ({}x{})", key, handle.width, handle.height);
        self.slots[key.index()] = Slot::Ready(handle);
    }

    pub fn mark_failed(&mut self, key: SpriteKey) {
        self.slots[key.index()] = Slot::Failed;
    }

    /// True once no slot is still waiting on a load or an upload
    pub fn settled(&self) -> bool {
        self.slots
            .iter()
            .all(|s| matches!(s, Slot::Ready(_) | Slot::Failed))
    }

    /// Per-frame view: ready sprites only
    pub fn snapshot(&self) -> AssetSnapshot {
        let mut handles = [None; SpriteKey::COUNT];
        for (out, slot) in handles.iter_mut().zip(&self.slots) {
            if let Slot::Ready(handle) = slot {
                *out = Some(*handle);
            }
        }
        AssetSnapshot { handles }
    }
}

/// Drawable handles as of one frame; anything not ready is `None`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetSnapshot {
    handles: [Option<SpriteHandle>; SpriteKey::COUNT],
}

impl AssetSnapshot {
    /// No sprites at all
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: SpriteKey) -> Option<SpriteHandle> {
        self.handles[key.index()]
    }
}

/// Browser image loading
#[cfg(target_arch = "wasm32")]
pub mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

    use super::{AssetTable, DecodedImage, SpriteKey};
    use crate::{Error, Result};

    /// Start one independent fetch per sprite
    pub fn load_all(table: Rc<RefCell<AssetTable>>) {
        for key in SpriteKey::ALL {
            let table = table.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = load(key).await;
                table.borrow_mut().resolve(key, result);
            });
        }
    }

    async fn load(key: SpriteKey) -> Result<DecodedImage> {
        let fail = |reason: String| Error::AssetLoad { key, reason };

        let img = HtmlImageElement::new().map_err(|e| fail(format!("{:?}", e)))?;
        img.set_cross_origin(Some("anonymous"));
        img.set_src(key.path());
        JsFuture::from(img.decode())
            .await
            .map_err(|e| fail(format!("decode: {:?}", e)))?;

        let (width, height) = (img.natural_width(), img.natural_height());
        if width == 0 || height == 0 {
            return Err(fail("empty image".into()));
        }

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| fail("no document".into()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| fail(format!("{:?}", e)))?
            .dyn_into()
            .map_err(|_| fail("not a canvas".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|e| fail(format!("{:?}", e)))?
            .ok_or_else(|| fail("no 2d context".into()))?
            .dyn_into()
            .map_err(|_| fail("not a 2d context".into()))?;
        ctx.draw_image_with_html_image_element(&img, 0.0, 0.0)
            .map_err(|e| fail(format!("{:?}", e)))?;
        let data = ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .map_err(|e| fail(format!("pixels: {:?}", e)))?;

        Ok(DecodedImage {
            width,
            height,
            rgba: data.data().0,
        })
    }
}
