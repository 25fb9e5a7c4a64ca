use crate::error::CliError;
use crate::util::texture_kind;
use argh::FromArgs;
use astc_encode_api::{compress_texture, CompressOptions, CompressQuality, SourceTexture};
use astc_encode_astcenc::AstcencCodec;
use astc_encode_common::block::BlockSize;
use astc_encode_common::texel::PixelFormat;
use astc_encode_file_formats_api::file_io::{write_compressed_output, LightweightMmapError};
use bytesize::ByteSize;
use lightweight_mmap::handles::*;
use lightweight_mmap::mmap::*;
use std::{path::PathBuf, time::Instant};
use tracing::info;

#[derive(FromArgs, Debug)]
/// Compress raw texels to an .astc file with astcenc
#[argh(subcommand, name = "encode")]
pub struct EncodeCmd {
    /// raw texel file: every mip level, row-major, level 0 first
    #[argh(option)]
    pub input: PathBuf,

    /// output .astc file path
    #[argh(option)]
    pub output: PathBuf,

    /// width of the base level in texels
    #[argh(option)]
    pub width: u32,

    /// height of the base level in texels
    #[argh(option)]
    pub height: u32,

    /// number of mip levels in the input [default: 1]
    #[argh(option, default = "1")]
    pub mips: u32,

    /// source pixel format name or id, e.g. rgba8unorm
    #[argh(option, from_str_fn(crate::util::parse_pixel_format))]
    pub format: PixelFormat,

    /// square block size, e.g. 6x6 [default: 6x6]
    #[argh(option, from_str_fn(crate::util::parse_block_size))]
    pub block: Option<BlockSize>,

    /// quality preset (fastest, fast, medium, thorough, verythorough, exhaustive) [default: medium]
    #[argh(option, from_str_fn(crate::util::parse_quality))]
    pub quality: Option<CompressQuality>,

    /// compress as a two component normal map
    #[argh(switch)]
    pub normal_map: bool,
}

pub fn handle_encode_command(cmd: EncodeCmd) -> Result<(), Box<dyn std::error::Error>> {
    let defaults = CompressOptions::for_container();
    let options = CompressOptions {
        kind: texture_kind(cmd.normal_map),
        block_size: cmd.block.unwrap_or(defaults.block_size),
        quality: cmd.quality.unwrap_or(defaults.quality),
    };

    let input_handle = ReadOnlyFileHandle::open(cmd.input.as_path())
        .map_err(|e| CliError::from(LightweightMmapError::from(e)))?;
    let input_size = input_handle
        .size()
        .map_err(|e| CliError::from(LightweightMmapError::from(e)))? as usize;
    if input_size == 0 {
        return Err(CliError::InvalidInput(format!("{} is empty", cmd.input.display())).into());
    }

    let input_mapping = ReadOnlyMmap::new(&input_handle, 0, input_size)
        .map_err(|e| CliError::from(LightweightMmapError::from(e)))?;

    let texture = SourceTexture::new(
        cmd.format,
        cmd.width,
        cmd.height,
        cmd.mips,
        input_mapping.as_slice(),
    );

    let start = Instant::now();
    let output = compress_texture(&AstcencCodec, &texture, &options).map_err(CliError::from)?;
    let header = write_compressed_output(&cmd.output, &output).map_err(CliError::from)?;
    let elapsed = start.elapsed();

    info!(
        input = %cmd.input.display(),
        output = %cmd.output.display(),
        block = %header.block(),
        quality = ?options.quality,
        "encoded"
    );
    println!("\n=== Encode Complete ===");
    println!("Time taken: {elapsed:.2?}");
    println!("Source: {}", ByteSize(input_size as u64));
    println!("Compressed: {}", ByteSize(output.len() as u64));
    println!("Extent: {}", header.extent());
    Ok(())
}
