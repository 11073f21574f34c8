use clap::Args;
use serde_json::json;

use crate::auth::hash_password_with_cost;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct HashPasswordArgs {
    #[arg(help = "Plain-text password to hash")]
    pub password: String,

    #[arg(long, help = "bcrypt cost factor", default_value_t = bcrypt::DEFAULT_COST)]
    pub cost: u32,
}

pub fn handle(args: HashPasswordArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let hash = hash_password_with_cost(&args.password, args.cost)?;

    match output_format {
        OutputFormat::Text => println!("{}", hash),
        OutputFormat::Json => output_success(&output_format, "Password hashed", Some(json!({ "passwordHash": hash })))?,
    }
    Ok(())
}
