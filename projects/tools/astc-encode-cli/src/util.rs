#![cfg(not(tarpaulin_include))]

#[cfg(feature = "astcenc")]
use astc_encode_api::{CompressQuality, TextureKind};
use astc_encode_common::block::{BlockFootprint, BlockSize};
use astc_encode_common::texel::PixelFormat;

/// Parses a block footprint such as `6x6`, `6x5` or `3x3x3`. A single number is a square preset.
pub fn parse_footprint(value: &str) -> Result<BlockFootprint, String> {
    let dims = value
        .to_lowercase()
        .split('x')
        .map(|dim| {
            dim.trim()
                .parse::<u8>()
                .map_err(|e| format!("Invalid block dimension '{dim}': {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let footprint = match dims.as_slice() {
        [edge] => BlockSize::from_edge(*edge)
            .map(BlockSize::footprint)
            .ok_or_else(|| format!("No square block preset with edge {edge}"))?,
        [x, y] => BlockFootprint::new_2d(*x, *y).map_err(|e| e.to_string())?,
        [x, y, z] => BlockFootprint::new(*x, *y, *z).map_err(|e| e.to_string())?,
        _ => return Err(format!("Invalid block footprint: {value}. Expected e.g. 6x6")),
    };

    Ok(footprint)
}

/// Parses a square block preset such as `6x6` or `6`.
#[cfg(feature = "astcenc")]
pub fn parse_block_size(value: &str) -> Result<BlockSize, String> {
    let footprint = parse_footprint(value)?;
    BlockSize::all_values()
        .iter()
        .copied()
        .find(|size| size.footprint() == footprint)
        .ok_or_else(|| {
            let valid = BlockSize::all_values()
                .iter()
                .map(|size| size.footprint().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("Invalid block size: {value}. Valid sizes are: {valid}")
        })
}

/// Parses a pixel format by name (e.g. `rgba8unorm`) or numeric id.
pub fn parse_pixel_format(value: &str) -> Result<PixelFormat, String> {
    if let Ok(id) = value.parse::<u32>() {
        return PixelFormat::from_id(id).map_err(|e| e.to_string());
    }

    let name = value.to_lowercase().replace(['_', '-'], "");
    PixelFormat::all_values()
        .iter()
        .copied()
        .find(|format| format!("{format:?}").to_lowercase() == name)
        .ok_or_else(|| format!("Invalid pixel format: {value}. Use a name such as rgba8unorm or an id"))
}

/// Parses a quality preset name.
#[cfg(feature = "astcenc")]
pub fn parse_quality(value: &str) -> Result<CompressQuality, String> {
    let name = value.to_lowercase().replace(['_', '-'], "");
    CompressQuality::all_values()
        .iter()
        .copied()
        .find(|quality| format!("{quality:?}").to_lowercase() == name)
        .ok_or_else(|| {
            format!(
                "Invalid quality: {value}. Valid presets are: fastest, fast, medium, thorough, verythorough, exhaustive"
            )
        })
}

/// Texture kind for the `--normal-map` switch.
#[cfg(feature = "astcenc")]
pub fn texture_kind(normal_map: bool) -> TextureKind {
    if normal_map {
        TextureKind::NormalMap
    } else {
        TextureKind::Color
    }
}
