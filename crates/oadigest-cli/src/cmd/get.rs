//! Get subcommand - fetch one record by ID

use anyhow::{Context, Result};
use clap::Args;

use oadigest_openalex::{Entity, OpenAlexClient};

use super::{DigestArgs, EntityArg};

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Entity type
    #[arg(value_enum)]
    pub entity: EntityArg,

    /// OpenAlex ID ("W2741809807" or full URL) or external ID ("doi:10.7717/peerj.4375")
    pub id: String,

    #[command(flatten)]
    pub digest: DigestArgs,
}

pub fn run(args: GetArgs, client: &OpenAlexClient) -> Result<()> {
    let entity = Entity::from(args.entity);
    let item = client
        .get(entity, &args.id, args.digest.into())
        .with_context(|| format!("Failed to fetch {entity}/{}", args.id))?;
    println!("{}", serde_json::to_string_pretty(&item)?);
    Ok(())
}
