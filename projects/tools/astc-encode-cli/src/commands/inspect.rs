use argh::FromArgs;
use astc_encode_file_formats_api::container::infer_mip_count;
use astc_encode_file_formats_api::file_io::read_astc_header;
use bytesize::ByteSize;
use std::path::PathBuf;
use tracing::warn;

#[derive(FromArgs, Debug)]
/// Print the header of an .astc file
#[argh(subcommand, name = "inspect")]
pub struct InspectCmd {
    /// path to the .astc file
    #[argh(positional)]
    pub input: PathBuf,
}

pub fn handle_inspect_command(cmd: InspectCmd) -> Result<(), Box<dyn std::error::Error>> {
    let (decoded, payload_len) = read_astc_header(&cmd.input)?;
    if !decoded.magic_valid {
        warn!(path = %cmd.input.display(), "file does not start with the .astc magic");
    }

    println!("File: {}", cmd.input.display());
    println!("Magic valid: {}", decoded.magic_valid);
    println!("Block: {}", decoded.block);
    println!("Extent: {}", decoded.extent);
    println!("Payload: {} ({payload_len} bytes)", ByteSize(payload_len as u64));

    let header = decoded.into_header()?;
    println!("Bits per texel: {:.2}", header.block().bits_per_texel());
    match infer_mip_count(&header, payload_len) {
        Some(mip_count) => println!("Mip levels: {mip_count}"),
        None => warn!(
            payload_len,
            "payload length does not match any mip chain of this extent"
        ),
    }

    Ok(())
}
