//! QR code generation for equipment lookup URLs

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageBuffer, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;

use crate::{
    config::RegistryConfig,
    error::{AppError, AppResult},
    models::equipment::REGISTRY_COLLECTION,
};

const DATA_URL_PREFIX: &str = "data:image/png;base64,";
/// Pixels per module when the configured width cannot hold the symbol
const FALLBACK_SCALE: u32 = 4;

#[derive(Debug, Clone)]
pub struct QrGenerator {
    base_url: String,
    width: u32,
    margin: u32,
}

impl QrGenerator {
    pub fn new(base_url: impl Into<String>, width: u32, margin: u32) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            width,
            margin,
        }
    }

    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(config.lookup_base_url.clone(), config.qr_width, config.qr_margin)
    }

    /// `<base>/equipmentRegistry/<id>`
    pub fn lookup_url(&self, id: i64) -> String {
        format!("{}/{}/{}", self.base_url, REGISTRY_COLLECTION, id)
    }

    /// Encode the lookup URL for `id` as a PNG data URL
    pub fn generate(&self, id: i64) -> AppResult<String> {
        let url = self.lookup_url(id);
        let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::M)
            .map_err(|e| AppError::QrEncode(e.to_string()))?;

        let png = self.render_png(&code)?;
        Ok(format!("{}{}", DATA_URL_PREFIX, STANDARD.encode(png)))
    }

    fn render_png(&self, code: &QrCode) -> AppResult<Vec<u8>> {
        let layout = Layout::new(code.width() as u32, self.margin, self.width);

        let image = ImageBuffer::from_fn(layout.size, layout.size, |x, y| {
            match (layout.module_at(x), layout.module_at(y)) {
                (Some(mx), Some(my)) if code[(mx as usize, my as usize)] == Color::Dark => Luma([0u8]),
                _ => Luma([255u8]),
            }
        });

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| AppError::QrEncode(e.to_string()))?;
        Ok(png)
    }
}

/// Maps image pixels onto symbol modules
#[derive(Debug, Clone, Copy)]
struct Layout {
    modules: u32,
    margin: u32,
    /// Modules per side including the margin on both sides
    total: u32,
    /// Image side in pixels
    size: u32,
}

impl Layout {
    fn new(modules: u32, margin: u32, width: u32) -> Self {
        let total = modules + margin * 2;
        let size = if width >= total {
            width
        } else {
            total * FALLBACK_SCALE
        };
        Self {
            modules,
            margin,
            total,
            size,
        }
    }

    fn module_at(&self, pixel: u32) -> Option<u32> {
        let index = (pixel as u64 * self.total as u64 / self.size as u64) as u32;
        index
            .checked_sub(self.margin)
            .filter(|module| *module < self.modules)
    }
}

/// Strip the data URL prefix and decode the PNG bytes
pub fn decode_data_url(data_url: &str) -> AppResult<Vec<u8>> {
    let encoded = data_url
        .strip_prefix(DATA_URL_PREFIX)
        .ok_or_else(|| AppError::BadRequest("Not a PNG data URL".to_string()))?;
    STANDARD
        .decode(encoded)
        .map_err(|e| AppError::BadRequest(e.to_string()))
}
