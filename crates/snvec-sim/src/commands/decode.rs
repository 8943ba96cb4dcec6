use std::error::Error;

use clap::Args;
use snvec_core::ReactionChannel;

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Packed reaction identifier.
    pub id: u32,
}

pub fn run(args: &DecodeArgs) -> Result<(), Box<dyn Error>> {
    let channel = ReactionChannel::decode(args.id)?;
    let payload = serde_json::json!({
        "id": args.id,
        "label": channel.label(),
        "family": channel.family(),
        "flavor": channel.flavor(),
        "channel": channel,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
