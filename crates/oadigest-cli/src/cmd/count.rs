//! Count subcommand - number of matching records

use anyhow::{Context, Result};
use clap::Args;

use oadigest_openalex::{Entity, OpenAlexClient};

use super::EntityArg;

#[derive(Args, Debug)]
pub struct CountArgs {
    /// Entity type
    #[arg(value_enum)]
    pub entity: EntityArg,

    /// Filter expression, e.g. "publication_year:2023,is_oa:true"
    #[arg(short, long)]
    pub filter: Option<String>,
}

pub fn run(args: CountArgs, client: &OpenAlexClient) -> Result<()> {
    let entity = Entity::from(args.entity);
    let total = client
        .get_total_count(entity, args.filter.as_deref())
        .with_context(|| format!("Failed to count {entity}"))?;
    println!("{total}");
    Ok(())
}
