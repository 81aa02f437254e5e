//! Subcommands and the arguments they share

pub mod count;
pub mod get;
pub mod list;

use clap::{Args, ValueEnum};

use oadigest_openalex::{DigestOptions, Entity};

#[derive(Clone, Copy, ValueEnum, Debug)]
pub enum EntityArg {
    Works,
    Authors,
    Sources,
    Institutions,
    Publishers,
    Topics,
    Funders,
}

impl From<EntityArg> for Entity {
    fn from(e: EntityArg) -> Self {
        match e {
            EntityArg::Works => Entity::Works,
            EntityArg::Authors => Entity::Authors,
            EntityArg::Sources => Entity::Sources,
            EntityArg::Institutions => Entity::Institutions,
            EntityArg::Publishers => Entity::Publishers,
            EntityArg::Topics => Entity::Topics,
            EntityArg::Funders => Entity::Funders,
        }
    }
}

#[derive(Args, Debug, Clone, Copy)]
pub struct DigestArgs {
    /// Flatten records into scalar and pipe-joined fields
    #[arg(long)]
    pub digest: bool,

    /// Include the reconstructed abstract (works only)
    #[arg(long = "abstract", requires = "digest")]
    pub include_abstract: bool,
}

impl From<DigestArgs> for DigestOptions {
    fn from(args: DigestArgs) -> Self {
        DigestOptions::new(args.digest, args.include_abstract)
    }
}
