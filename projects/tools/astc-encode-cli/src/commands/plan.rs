use argh::FromArgs;
use astc_encode_common::block::{BlockFootprint, BlockSize};
use astc_encode_common::mip::MipChain;
use astc_encode_common::texel::{canonical_len, PixelFormat};
use bytesize::ByteSize;

#[derive(FromArgs, Debug)]
/// Print the block layout of a mip chain
#[argh(subcommand, name = "plan")]
pub struct PlanCmd {
    /// width of the base level in texels
    #[argh(option)]
    pub width: u32,

    /// height of the base level in texels
    #[argh(option)]
    pub height: u32,

    /// number of mip levels [default: full chain]
    #[argh(option)]
    pub mips: Option<u32>,

    /// block footprint, e.g. 6x6 [default: 6x6]
    #[argh(option, from_str_fn(crate::util::parse_footprint))]
    pub block: Option<BlockFootprint>,

    /// source pixel format, to also report source and staging sizes
    #[argh(option, from_str_fn(crate::util::parse_pixel_format))]
    pub format: Option<PixelFormat>,
}

pub fn handle_plan_command(cmd: PlanCmd) -> Result<(), Box<dyn std::error::Error>> {
    let footprint = cmd
        .block
        .unwrap_or_else(|| BlockSize::default().footprint());
    let mip_count = cmd
        .mips
        .unwrap_or_else(|| MipChain::max_mip_count(cmd.width, cmd.height));
    let chain = MipChain::new(cmd.width, cmd.height, mip_count, footprint)?;

    println!(
        "{}x{} texture, {} mip level(s), {} blocks ({:.2} bits per texel)",
        cmd.width,
        cmd.height,
        chain.mip_count(),
        footprint,
        footprint.bits_per_texel()
    );
    println!("level  size         blocks      offset      bytes");
    for mip in chain.levels() {
        println!(
            "{:<6} {:<12} {:<11} {:<11} {}",
            mip.level,
            format!("{}x{}", mip.width, mip.height),
            format!("{}x{}", mip.blocks_x, mip.blocks_y),
            mip.byte_offset,
            mip.byte_len()
        );
    }

    println!(
        "Compressed: {} ({} bytes, {} with .astc header)",
        ByteSize(chain.total_bytes() as u64),
        chain.total_bytes(),
        astc_encode_file_formats_api::container::container_len(chain.total_bytes())
    );

    if let Some(format) = cmd.format {
        let source = chain.total_texels() * format.bytes_per_texel();
        let staging = chain
            .levels()
            .iter()
            .map(|mip| canonical_len(format, mip.texel_count()))
            .max()
            .unwrap_or(0);
        println!("Source ({format:?}): {}", ByteSize(source as u64));
        println!("Largest staging buffer: {}", ByteSize(staging as u64));
    }

    Ok(())
}
